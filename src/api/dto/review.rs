use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewReview, Review, ReviewChanges};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    #[validate(range(min = 1, message = "Invalid productId"))]
    pub product_id: i32,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub service_address: String,
    /// Optimistic-lock version of the stored review; ignored on create.
    #[serde(default)]
    pub version: i32,
}

impl ReviewDto {
    pub fn from_model(review: Review, service_address: &str) -> Self {
        Self {
            product_id: review.product_id,
            review_id: review.review_id,
            author: review.author,
            subject: review.subject,
            content: review.content,
            service_address: service_address.to_string(),
            version: review.version,
        }
    }

    pub fn into_new_model(self) -> NewReview {
        NewReview {
            product_id: self.product_id,
            review_id: self.review_id,
            author: self.author,
            subject: self.subject,
            content: self.content,
        }
    }
}

/// Review edit guarded by the `version` the client last read from a
/// [`ReviewDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdateDto {
    #[validate(range(min = 1, message = "Invalid productId"))]
    pub product_id: i32,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
    #[validate(range(min = 0, message = "Invalid version"))]
    pub version: i32,
}

impl ReviewUpdateDto {
    pub fn changes(&self) -> ReviewChanges {
        ReviewChanges {
            author: self.author.clone(),
            subject: self.subject.clone(),
            content: self.content.clone(),
        }
    }
}
