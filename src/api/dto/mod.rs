//! Data Transfer Objects shared by the HTTP handlers and the composite's
//! downstream clients.
//!
//! DTOs are organized by domain:
//! - `product`, `recommendation`, `review` - core service payloads
//! - `composite` - the aggregate view and its summaries
//! - `health` - health endpoint payloads
//! - `error` - the error envelope

mod composite;
mod error;
mod health;
mod product;
mod recommendation;
mod review;

pub use composite::{ProductAggregateDto, RecommendationSummaryDto, ReviewSummaryDto, ServiceAddressesDto};
pub use error::ApiErrorResponse;
pub use health::{HealthDto, HealthStatus};
pub use product::ProductDto;
pub use recommendation::RecommendationDto;
pub use review::{ReviewDto, ReviewUpdateDto};
