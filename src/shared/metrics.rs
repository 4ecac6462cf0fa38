//! Prometheus metrics
//!
//! Core telemetry for the matching engine. Advisory only: nothing here feeds
//! back into matching decisions.
//!
//! ## Metric types
//! - **Counter**: orders received, trades executed, cancellations, rejections
//! - **Histogram**: matching latency in microseconds
//! - **Gauge**: live orders per book side
//!
//! ## Usage
//! ```rust,ignore
//! use matchbook::shared::metrics::METRICS;
//!
//! METRICS.orders_total.with_label_values(&["buy", "AAPL"]).inc();
//!
//! METRICS.matching_duration
//!     .with_label_values(&["AAPL"])
//!     .observe(elapsed_micros);
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, CounterVec, Encoder,
    GaugeVec, HistogramVec, TextEncoder,
};

lazy_static! {
    /// Global metrics instance
    pub static ref METRICS: Metrics = Metrics::new();
}

/// Matching engine core metrics
pub struct Metrics {
    /// Orders accepted (by side and symbol)
    pub orders_total: CounterVec,

    /// Trades executed (by symbol)
    pub trades_total: CounterVec,

    /// Cancellations (by symbol)
    pub cancellations_total: CounterVec,

    /// Orders rejected by validation (by violated field)
    pub rejections_total: CounterVec,

    /// Matching latency distribution in microseconds
    pub matching_duration: HistogramVec,

    /// Live resting orders per side
    pub book_depth: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            orders_total: register_counter_vec!(
                "matchbook_orders_total",
                "Total number of orders accepted",
                &["side", "symbol"]
            )
            .unwrap(),

            trades_total: register_counter_vec!(
                "matchbook_trades_total",
                "Total number of trades executed",
                &["symbol"]
            )
            .unwrap(),

            cancellations_total: register_counter_vec!(
                "matchbook_cancellations_total",
                "Total number of order cancellations",
                &["symbol"]
            )
            .unwrap(),

            rejections_total: register_counter_vec!(
                "matchbook_rejections_total",
                "Total number of orders rejected by validation",
                &["field"]
            )
            .unwrap(),

            matching_duration: register_histogram_vec!(
                "matchbook_matching_duration_microseconds",
                "Order matching duration in microseconds",
                &["symbol"],
                vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 50000.0]
            )
            .unwrap(),

            book_depth: register_gauge_vec!(
                "matchbook_book_depth",
                "Number of live resting orders",
                &["symbol", "side"]
            )
            .unwrap(),
        }
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    /// Reset all metrics (tests only)
    #[cfg(test)]
    pub fn reset(&self) {
        self.orders_total.reset();
        self.trades_total.reset();
        self.cancellations_total.reset();
        self.rejections_total.reset();
        self.book_depth.reset();
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
