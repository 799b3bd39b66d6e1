mod product;
mod recommendation;
mod review;

pub use product::{NewProduct, Product};
pub use recommendation::{NewRecommendation, Recommendation};
pub use review::{NewReview, Review, ReviewChanges};
