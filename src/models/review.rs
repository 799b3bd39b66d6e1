use diesel::prelude::*;

/// Review row; `version` backs optimistic locking on update
#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Review {
    pub id: i32,
    pub version: i32,
    pub product_id: i32,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview {
    pub product_id: i32,
    pub review_id: i32,
    pub author: String,
    pub subject: String,
    pub content: String,
}

/// Mutable review fields for UPDATE operations
#[derive(Debug, AsChangeset, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::reviews)]
pub struct ReviewChanges {
    pub author: String,
    pub subject: String,
    pub content: String,
}
