mod subscriptions;

pub use subscriptions::*;
