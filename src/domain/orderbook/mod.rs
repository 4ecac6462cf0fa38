/// Domain layer - order book module
///
/// The heart of the matching engine: one book per symbol, built on a pair of
/// binary heaps (price-time priority per side) with a live-order index that
/// backs lazy cancellation.

pub mod book;

pub use book::OrderBook;
