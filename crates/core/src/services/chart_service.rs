use crate::models::chart::ChartDataPoint;
use crate::models::history::HistoryLog;

use super::delta_service::DeltaService;

/// Generates chart-ready data sets from the history log.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService {
    delta_service: DeltaService,
}

impl ChartService {
    pub fn new() -> Self {
        Self {
            delta_service: DeltaService::new(),
        }
    }

    /// Recorded totals, oldest first, each annotated with its change and
    /// trend against the point before it.
    pub fn totals_over_time(&self, history: &HistoryLog) -> Vec<ChartDataPoint> {
        let mut points = Vec::with_capacity(history.len());
        let mut previous: Option<f64> = None;

        for entry in history.iter().rev() {
            points.push(ChartDataPoint {
                timestamp: entry.timestamp,
                total: entry.total,
                change: previous.map(|p| entry.total - p),
                trend: self.delta_service.trend(entry.total, previous),
            });
            previous = Some(entry.total);
        }

        points
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
