use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// Order side, distinguishing buys from sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Lowercase label, used for metrics and logging
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Canceled,
}

/// New order request, as handed over by the order entry collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub user_id: u64,
    pub symbol: Arc<str>,
    pub side: Side,
    // u64 minor units avoid float comparison drift, e.g. price 123.45 is stored as 12345
    pub price: u64,
    pub quantity: u64,
}

/// An order accepted by the engine
///
/// Identity fields (`id`, `user_id`, `symbol`, `side`, `price`, `quantity`,
/// `arrival`) never change after admission; only `remaining` and `status`
/// mutate, and `remaining` decreases solely through matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub symbol: Arc<str>,
    pub side: Side,
    pub price: u64,
    /// Original quantity at admission
    pub quantity: u64,
    /// Unfilled quantity, `0 <= remaining <= quantity`
    pub remaining: u64,
    /// Monotonic arrival stamp, strictly increasing per submission
    pub arrival: u64,
    pub status: OrderStatus,
}

impl Order {
    /// Quantity filled so far
    pub fn filled(&self) -> u64 {
        self.quantity - self.remaining
    }
}

/// An executed trade, immutable once emitted
///
/// `price` is always the resting (maker) order's price, never the taker's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: u64,
    pub buy_order_id: u64,
    pub sell_order_id: u64,
    pub symbol: Arc<str>,
    pub price: u64,
    pub quantity: u64,
    /// Epoch nanoseconds at execution
    pub timestamp: u64,
}

/// Trades produced by one submission; a handful at most in the common case
pub type TradeBatch = SmallVec<[Trade; 8]>;

/// Aggregated view of one live price level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelView {
    pub price: u64,
    pub quantity: u64,
    pub orders: usize,
}

/// Top-of-book snapshot with aggregated depth per side
#[derive(Debug, Clone, Serialize)]
pub struct BookSnapshot {
    pub symbol: Arc<str>,
    /// Best bids first
    pub bids: Vec<LevelView>,
    /// Best asks first
    pub asks: Vec<LevelView>,
    pub spread: Option<u64>,
}
