//! Stage timing for a single pool analysis
//!
//! `PerformanceMonitor` records wall-clock time for the whole run plus named
//! markers (`fetchPoolInfo`, `decodePoolInfo`, ...). Only completed markers
//! are reported.

use crate::logger::{self, LogTag};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Marker {
    start: Instant,
    end: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    markers: BTreeMap<String, Marker>,
}

/// Timings in milliseconds as they appear in the JSON output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_time: f64,
    pub markers: BTreeMap<String, f64>,
}

fn millis_between(start: Instant, end: Instant) -> f64 {
    end.saturating_duration_since(start).as_secs_f64() * 1000.0
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn end(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Starting an existing marker again resets it
    pub fn mark_start(&mut self, name: &str) {
        self.markers.insert(
            name.to_string(),
            Marker {
                start: Instant::now(),
                end: None,
            },
        );
    }

    /// No-op for markers that were never started
    pub fn mark_end(&mut self, name: &str) {
        if let Some(marker) = self.markers.get_mut(name) {
            marker.end = Some(Instant::now());
        }
    }

    /// Time between `start` and `end`, 0 until both happened
    pub fn execution_time_ms(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => millis_between(start, end),
            _ => 0.0,
        }
    }

    pub fn marker_time_ms(&self, name: &str) -> Option<f64> {
        let marker = self.markers.get(name)?;
        marker.end.map(|end| millis_between(marker.start, end))
    }

    pub fn all_markers(&self) -> BTreeMap<String, f64> {
        self.markers
            .iter()
            .filter_map(|(name, marker)| {
                marker
                    .end
                    .map(|end| (name.clone(), millis_between(marker.start, end)))
            })
            .collect()
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            total_time: self.execution_time_ms(),
            markers: self.all_markers(),
        }
    }

    pub fn log_report(&self) {
        logger::info(
            LogTag::System,
            &format!("Total execution time: {:.2}ms", self.execution_time_ms()),
        );
        for (name, elapsed) in self.all_markers() {
            logger::info(LogTag::System, &format!("  {}: {:.2}ms", name, elapsed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_only_completed_markers_are_reported() {
        let mut monitor = PerformanceMonitor::new();
        monitor.start();
        monitor.mark_start("fetchPoolInfo");
        sleep(Duration::from_millis(5));
        monitor.mark_end("fetchPoolInfo");
        monitor.mark_start("decodePoolInfo");
        monitor.mark_end("neverStarted");
        monitor.end();

        let markers = monitor.all_markers();
        assert_eq!(markers.len(), 1);
        assert!(markers["fetchPoolInfo"] >= 5.0);
        assert_eq!(monitor.marker_time_ms("decodePoolInfo"), None);
        assert_eq!(monitor.marker_time_ms("neverStarted"), None);
        assert!(monitor.execution_time_ms() >= markers["fetchPoolInfo"]);
    }

    #[test]
    fn test_execution_time_zero_until_ended() {
        let mut monitor = PerformanceMonitor::new();
        assert_eq!(monitor.execution_time_ms(), 0.0);
        monitor.start();
        assert_eq!(monitor.execution_time_ms(), 0.0);
        monitor.end();
        assert!(monitor.execution_time_ms() >= 0.0);
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let mut monitor = PerformanceMonitor::new();
        monitor.start();
        monitor.mark_start("total");
        monitor.mark_end("total");
        monitor.end();

        let json = serde_json::to_value(monitor.metrics()).unwrap();
        assert!(json["totalTime"].is_number());
        assert!(json["markers"]["total"].is_number());
    }
}
