use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewProduct, Product};

/// Product as exchanged over HTTP.
///
/// `serviceAddress` is ignored on input and stamped by the serving instance
/// on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "productId": 1,
    "name": "product 1",
    "weight": 1,
    "serviceAddress": "product-host/10.0.0.5:7001"
}))]
pub struct ProductDto {
    #[validate(range(min = 1, message = "Invalid productId"))]
    pub product_id: i32,
    pub name: String,
    pub weight: i32,
    #[serde(default)]
    pub service_address: String,
}

impl ProductDto {
    pub fn from_model(product: Product, service_address: &str) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name,
            weight: product.weight,
            service_address: service_address.to_string(),
        }
    }

    pub fn into_new_model(self) -> NewProduct {
        NewProduct {
            product_id: self.product_id,
            name: self.name,
            weight: self.weight,
        }
    }
}
