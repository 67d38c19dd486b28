pub mod registry;
pub mod traits;

// API provider implementations
pub mod er_api;
pub mod frankfurter;
pub mod metals_dev;
