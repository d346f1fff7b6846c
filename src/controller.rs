/// REST error responses
pub mod error;
/// Subscription endpoints
pub mod subscriptions;
