pub mod chart;
pub mod delta;
pub mod history;
pub mod rates;
pub mod settings;
pub mod snapshot;
