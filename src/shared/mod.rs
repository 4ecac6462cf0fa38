/// Shared utilities and types used across all layers
///
/// This module contains:
/// - Protocol definitions (orders, trades, snapshots)
/// - Clock utilities (arrival stamps, latency marks)
/// - Prometheus metrics

pub mod metrics;
pub mod protocol;
pub mod timestamp;

// Re-export commonly used types
pub use protocol::{Order, OrderRequest, OrderStatus, Side, Trade, TradeBatch};
pub use timestamp::{arrival_nanos, epoch_nanos};
