use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::recommendations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recommendation {
    pub id: i32,
    pub version: i32,
    pub product_id: i32,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}

#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::recommendations)]
pub struct NewRecommendation {
    pub product_id: i32,
    pub recommendation_id: i32,
    pub author: String,
    pub rate: i32,
    pub content: String,
}
