use diesel::prelude::*;

/// Product row
/// Derives Queryable for SELECT operations and Selectable for type-safe column selection
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: i32,
    pub version: i32,
    pub product_id: i32,
    pub name: String,
    pub weight: i32,
}

/// Product data for INSERT; `id` and `version` come from the store
#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub product_id: i32,
    pub name: String,
    pub weight: i32,
}
