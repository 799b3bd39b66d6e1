//! Product service: validation, duplicate translation and address stamping
//! on top of the product repository.

use std::sync::Arc;

use tracing::debug;

use crate::api::dto::ProductDto;
use crate::error::{AppError, AppResult};
use crate::repositories::ProductRepository;
use crate::services::{ServiceAddress, ensure_valid_product_id};

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    address: ServiceAddress,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, address: ServiceAddress) -> Self {
        Self { repo, address }
    }

    /// Gets a product by its business id.
    ///
    /// # Errors
    /// `InvalidInput` for ids below 1, `NotFound` when no product exists.
    pub async fn get_product(&self, product_id: i32) -> AppResult<ProductDto> {
        ensure_valid_product_id(product_id)?;

        let product = self
            .repo
            .find_by_product_id(product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No product found for productId: {}", product_id))
            })?;

        debug!(product_id, "Product found");
        Ok(ProductDto::from_model(product, self.address.as_str()))
    }

    /// Persists a new product.
    ///
    /// # Errors
    /// `InvalidInput` for ids below 1 or when the product id already exists.
    pub async fn create_product(&self, body: ProductDto) -> AppResult<ProductDto> {
        ensure_valid_product_id(body.product_id)?;
        let product_id = body.product_id;

        let created = self
            .repo
            .create(body.into_new_model())
            .await
            .map_err(|e| match e {
                AppError::Duplicate { .. } => {
                    AppError::invalid_input(format!("Duplicate key, Product Id: {}", product_id))
                }
                other => other,
            })?;

        debug!(product_id, "Product created");
        Ok(ProductDto::from_model(created, self.address.as_str()))
    }

    /// Deletes a product. The product must exist.
    pub async fn delete_product(&self, product_id: i32) -> AppResult<()> {
        ensure_valid_product_id(product_id)?;

        let affected = self.repo.delete_by_product_id(product_id).await?;
        if affected == 0 {
            return Err(AppError::not_found(format!(
                "No product found for productId: {}",
                product_id
            )));
        }

        debug!(product_id, "Product deleted");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryProductRepository;
    use proptest::prelude::*;

    fn service() -> ProductService {
        ProductService::new(
            Arc::new(InMemoryProductRepository::new()),
            ServiceAddress::from_parts(Some("product-host"), Some("10.0.0.5"), 7001),
        )
    }

    fn body(product_id: i32, name: &str) -> ProductDto {
        ProductDto {
            product_id,
            name: name.to_string(),
            weight: product_id,
            service_address: "ignored".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_stamps_address() {
        let service = service();
        let created = service.create_product(body(1, "product 1")).await.unwrap();
        assert_eq!(created.service_address, "product-host/10.0.0.5:7001");

        let found = service.get_product(1).await.unwrap();
        assert_eq!(found.name, "product 1");
        assert_eq!(found.weight, 1);
        assert_eq!(found.service_address, "product-host/10.0.0.5:7001");
    }

    #[tokio::test]
    async fn test_duplicate_create_is_invalid_input() {
        let service = service();
        service.create_product(body(1, "first")).await.unwrap();

        let err = service.create_product(body(1, "second")).await.unwrap_err();
        assert!(
            matches!(err, AppError::InvalidInput { ref message } if message == "Duplicate key, Product Id: 1")
        );
        assert_eq!(service.get_product(1).await.unwrap().name, "first");
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let err = service().get_product(13).await.unwrap_err();
        assert!(
            matches!(err, AppError::NotFound { ref message } if message == "No product found for productId: 13")
        );
    }

    #[tokio::test]
    async fn test_delete_requires_existing_product() {
        let service = service();
        service.create_product(body(2, "p")).await.unwrap();
        service.delete_product(2).await.unwrap();

        let err = service.delete_product(2).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    proptest! {
        #[test]
        fn prop_non_positive_ids_are_rejected(product_id in i32::MIN..1) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let expected = format!("Invalid productId: {}", product_id);
            let service = service();

            for err in [
                rt.block_on(service.get_product(product_id)).unwrap_err(),
                rt.block_on(service.create_product(body(product_id, "p"))).unwrap_err(),
                rt.block_on(service.delete_product(product_id)).unwrap_err(),
            ] {
                let message = match err {
                    AppError::InvalidInput { message } => message,
                    other => return Err(TestCaseError::fail(format!("unexpected error: {:?}", other))),
                };
                prop_assert_eq!(&message, &expected);
            }
        }
    }
}
