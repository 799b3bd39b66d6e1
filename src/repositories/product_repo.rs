//! PostgreSQL product repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{NewProduct, Product};
use crate::repositories::ProductRepository;

#[derive(Clone)]
pub struct PgProductRepository {
    pool: AsyncDbPool,
}

impl PgProductRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, new_product: NewProduct) -> AppResult<Product> {
        use crate::schema::products::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(products)
            .values(&new_product)
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "insert product"))
    }

    async fn find_by_product_id(&self, wanted: i32) -> AppResult<Option<Product>> {
        use crate::schema::products::dsl::*;
        let mut conn = self.pool.get().await?;

        products
            .filter(product_id.eq(wanted))
            .select(Product::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn delete_by_product_id(&self, wanted: i32) -> AppResult<usize> {
        use crate::schema::products::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(products.filter(product_id.eq(wanted)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete product"))
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "ping products store"))
    }
}
