use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{RecommendationDto, ReviewDto};

/// Product merged with its recommendations and reviews.
///
/// Lists are always present; an empty list also blanks the matching
/// provenance address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "productId": 1,
    "name": "name",
    "weight": 1,
    "recommendations": [{"recommendationId": 1, "author": "a", "rate": 1, "content": "c"}],
    "reviews": [{"reviewId": 1, "author": "a", "subject": "s", "content": "c"}],
    "serviceAddresses": {
        "compositeAddress": "composite-host/10.0.0.2:7000",
        "productAddress": "product-host/10.0.0.5:7001",
        "reviewAddress": "review-host/10.0.0.7:7003",
        "recommendationAddress": "recommendation-host/10.0.0.6:7002"
    }
}))]
pub struct ProductAggregateDto {
    #[validate(range(min = 1, message = "Invalid productId"))]
    pub product_id: i32,
    pub name: String,
    pub weight: i32,
    #[serde(default)]
    pub recommendations: Vec<RecommendationSummaryDto>,
    #[serde(default)]
    pub reviews: Vec<ReviewSummaryDto>,
    #[serde(default)]
    pub service_addresses: ServiceAddressesDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSummaryDto {
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}

impl From<&RecommendationDto> for RecommendationSummaryDto {
    fn from(r: &RecommendationDto) -> Self {
        Self {
            recommendation_id: r.recommendation_id,
            author: r.author.clone(),
            rate: r.rate,
            content: r.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummaryDto {
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

impl From<&ReviewDto> for ReviewSummaryDto {
    fn from(r: &ReviewDto) -> Self {
        Self {
            review_id: r.review_id,
            author: r.author.clone(),
            subject: r.subject.clone(),
            content: r.content.clone(),
        }
    }
}

/// Addresses of the instances that served each part of an aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAddressesDto {
    pub composite_address: String,
    pub product_address: String,
    pub review_address: String,
    pub recommendation_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aggregate_serializes_camel_case() {
        let aggregate = ProductAggregateDto {
            product_id: 1,
            name: "name".to_string(),
            weight: 1,
            recommendations: vec![],
            reviews: vec![],
            service_addresses: ServiceAddressesDto::default(),
        };

        let value = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(
            value,
            json!({
                "productId": 1,
                "name": "name",
                "weight": 1,
                "recommendations": [],
                "reviews": [],
                "serviceAddresses": {
                    "compositeAddress": "",
                    "productAddress": "",
                    "reviewAddress": "",
                    "recommendationAddress": ""
                }
            })
        );
    }

    #[test]
    fn test_aggregate_draft_without_lists_deserializes() {
        let draft: ProductAggregateDto =
            serde_json::from_value(json!({"productId": 123, "name": "product 123", "weight": 123}))
                .unwrap();
        assert!(draft.recommendations.is_empty());
        assert!(draft.reviews.is_empty());
    }
}
