use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::delta::Trend;

/// A single data point for the totals-over-time chart.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// When the underlying history entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Total value in the local currency
    pub total: f64,

    /// Change since the previous point (`None` for the first point)
    pub change: Option<f64>,

    pub trend: Trend,
}
