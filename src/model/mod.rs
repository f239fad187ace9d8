pub mod metrics;
pub mod partition;
pub mod profile;
