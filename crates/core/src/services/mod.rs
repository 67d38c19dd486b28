pub mod chart_service;
pub mod delta_service;
pub mod rate_service;
pub mod valuation_service;
