/// Domain layer - core business logic
///
/// Pure matching rules with no I/O and no infrastructure concerns, testable
/// in isolation.
///
/// ## Modules
/// - `orderbook`: per-symbol book (priority queue pair, order index, matching)
/// - `validation`: order admission rules

pub mod orderbook;
pub mod validation;

pub use orderbook::OrderBook;
pub use validation::{OrderValidator, ValidationConfig, ValidationError};
