pub mod analytics;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod source;
pub mod store;
pub mod validate;
pub mod workflow;
