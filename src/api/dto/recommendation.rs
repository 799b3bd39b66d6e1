use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewRecommendation, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    #[validate(range(min = 1, message = "Invalid productId"))]
    pub product_id: i32,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
    #[serde(default)]
    pub service_address: String,
}

impl RecommendationDto {
    pub fn from_model(recommendation: Recommendation, service_address: &str) -> Self {
        Self {
            product_id: recommendation.product_id,
            recommendation_id: recommendation.recommendation_id,
            author: recommendation.author,
            rate: recommendation.rate,
            content: recommendation.content,
            service_address: service_address.to_string(),
        }
    }

    pub fn into_new_model(self) -> NewRecommendation {
        NewRecommendation {
            product_id: self.product_id,
            recommendation_id: self.recommendation_id,
            author: self.author,
            rate: self.rate,
            content: self.content,
        }
    }
}
