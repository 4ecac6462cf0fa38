/// Matching engine
///
/// Owns one `OrderBook` per symbol plus the cross-book bookkeeping: order and
/// trade id assignment, arrival stamping, validation, latency accounting, and
/// the read-only metrics surface. Calls are synchronous and run to completion;
/// the books are never touched by anything else.
///
/// The book emits trades with zero ids and timestamps; the engine stamps both
/// before handing the batch to the caller, which forwards them to persistence,
/// P&L, and reconciliation collaborators.

use crate::domain::orderbook::OrderBook;
use crate::domain::validation::{OrderValidator, ValidationConfig, ValidationError};
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{BookSnapshot, Order, OrderRequest, OrderStatus, Side, TradeBatch};
use crate::shared::timestamp::{arrival_nanos, epoch_nanos};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one submission: the trades executed plus the final state of the
/// incoming order (possibly resting, possibly filled)
#[derive(Debug, Clone)]
pub struct Submission {
    pub order: Order,
    pub trades: TradeBatch,
}

/// Running latency average over all submissions
#[derive(Debug, Clone, Copy, Default)]
struct LatencyStats {
    total: Duration,
    samples: u64,
}

impl LatencyStats {
    fn record(&mut self, span: Duration) {
        self.total += span;
        self.samples += 1;
    }

    fn average(&self) -> Duration {
        if self.samples == 0 {
            Duration::ZERO
        } else {
            self.total / self.samples as u32
        }
    }
}

/// Point-in-time engine statistics
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub orders_processed: u64,
    pub trades_executed: u64,
    pub average_latency_us: f64,
    pub symbols_traded: usize,
    /// Trades per hundred orders
    pub match_rate: f64,
}

pub struct MatchingEngine {
    books: HashMap<Arc<str>, OrderBook>,
    /// Resting order id -> owning symbol, for cancel routing and lookups
    routes: HashMap<u64, Arc<str>>,
    validator: OrderValidator,
    next_order_id: u64,
    next_trade_id: u64,
    latency: LatencyStats,
    orders_processed: u64,
    trades_executed: u64,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::with_validation(ValidationConfig::default())
    }

    pub fn with_validation(config: ValidationConfig) -> Self {
        MatchingEngine {
            books: HashMap::new(),
            routes: HashMap::new(),
            validator: OrderValidator::with_config(config),
            next_order_id: 1,
            next_trade_id: 1,
            latency: LatencyStats::default(),
            orders_processed: 0,
            trades_executed: 0,
        }
    }

    /// Submits a new order
    ///
    /// Validation failures reject the request before any book state is
    /// touched. On success the returned `Submission` carries every trade the
    /// order produced, in execution order, and the order's final state.
    pub fn submit(&mut self, request: OrderRequest) -> Result<Submission, ValidationError> {
        if let Err(error) = self.validator.validate(&request) {
            METRICS
                .rejections_total
                .with_label_values(&[error.field()])
                .inc();
            return Err(error);
        }

        let started = Instant::now();

        let order = Order {
            id: self.next_order_id,
            user_id: request.user_id,
            symbol: Arc::clone(&request.symbol),
            side: request.side,
            price: request.price,
            quantity: request.quantity,
            remaining: request.quantity,
            arrival: arrival_nanos(),
            status: OrderStatus::New,
        };
        self.next_order_id += 1;

        let book = self
            .books
            .entry(Arc::clone(&order.symbol))
            .or_insert_with(|| OrderBook::new(Arc::clone(&order.symbol)));
        let (mut trades, order) = book.submit(order);

        let timestamp = epoch_nanos();
        for trade in trades.iter_mut() {
            trade.id = self.next_trade_id;
            trade.timestamp = timestamp;
            self.next_trade_id += 1;

            // Makers that filled are gone from the book; drop their routes.
            let maker_id = match order.side {
                Side::Buy => trade.sell_order_id,
                Side::Sell => trade.buy_order_id,
            };
            if book.order(maker_id).is_none() {
                self.routes.remove(&maker_id);
            }

            tracing::debug!(
                trade_id = trade.id,
                symbol = %trade.symbol,
                price = trade.price,
                quantity = trade.quantity,
                "trade executed"
            );
        }

        if matches!(order.status, OrderStatus::New | OrderStatus::PartiallyFilled) {
            self.routes.insert(order.id, Arc::clone(&order.symbol));
        }

        let span = started.elapsed();
        self.latency.record(span);
        self.orders_processed += 1;
        self.trades_executed += trades.len() as u64;

        let symbol: &str = order.symbol.as_ref();
        METRICS
            .orders_total
            .with_label_values(&[order.side.as_str(), symbol])
            .inc();
        METRICS
            .trades_total
            .with_label_values(&[symbol])
            .inc_by(trades.len() as f64);
        METRICS
            .matching_duration
            .with_label_values(&[symbol])
            .observe(span.as_secs_f64() * 1e6);
        METRICS
            .book_depth
            .with_label_values(&[symbol, "bid"])
            .set(book.live_orders(Side::Buy) as f64);
        METRICS
            .book_depth
            .with_label_values(&[symbol, "ask"])
            .set(book.live_orders(Side::Sell) as f64);

        Ok(Submission { order, trades })
    }

    /// Cancels a resting order by id
    ///
    /// Idempotent: returns `false` for unknown, filled, or already canceled
    /// ids and never fails loudly.
    pub fn cancel(&mut self, order_id: u64) -> bool {
        let Some(symbol) = self.routes.remove(&order_id) else {
            return false;
        };
        let canceled = self
            .books
            .get_mut(&symbol)
            .map(|book| book.cancel(order_id))
            .unwrap_or(false);

        if canceled {
            METRICS
                .cancellations_total
                .with_label_values(&[symbol.as_ref()])
                .inc();
            tracing::debug!(order_id, symbol = %symbol, "order canceled");
        }
        canceled
    }

    /// Best live bid price for a symbol
    pub fn best_bid(&mut self, symbol: &str) -> Option<u64> {
        self.books.get_mut(symbol)?.best_bid()
    }

    /// Best live ask price for a symbol
    pub fn best_ask(&mut self, symbol: &str) -> Option<u64> {
        self.books.get_mut(symbol)?.best_ask()
    }

    /// Looks up a live resting order by id
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        let symbol = self.routes.get(&order_id)?;
        self.books.get(symbol)?.order(order_id)
    }

    /// Aggregated depth snapshot for a symbol
    pub fn snapshot(&self, symbol: &str, depth: usize) -> Option<BookSnapshot> {
        Some(self.books.get(symbol)?.snapshot(depth))
    }

    /// Running average submission latency
    pub fn average_latency(&self) -> Duration {
        self.latency.average()
    }

    pub fn orders_processed(&self) -> u64 {
        self.orders_processed
    }

    pub fn trades_executed(&self) -> u64 {
        self.trades_executed
    }

    pub fn stats(&self) -> EngineStats {
        let match_rate = if self.orders_processed == 0 {
            0.0
        } else {
            self.trades_executed as f64 / self.orders_processed as f64 * 100.0
        };
        EngineStats {
            orders_processed: self.orders_processed,
            trades_executed: self.trades_executed,
            average_latency_us: self.latency.average().as_secs_f64() * 1e6,
            symbols_traded: self.books.len(),
            match_rate,
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::protocol::Side;

    fn request(symbol: &str, side: Side, price: u64, quantity: u64) -> OrderRequest {
        OrderRequest {
            user_id: 1,
            symbol: Arc::from(symbol),
            side,
            price,
            quantity,
        }
    }

    #[test]
    fn test_rejection_before_mutation() {
        let mut engine = MatchingEngine::new();
        let result = engine.submit(request("AAPL", Side::Buy, 0, 10));
        assert!(matches!(result, Err(ValidationError::InvalidPrice(_))));

        assert_eq!(engine.orders_processed(), 0);
        assert!(engine.best_bid("AAPL").is_none(), "no book was created");
    }

    #[test]
    fn test_submit_assigns_ids_and_stamps() {
        let mut engine = MatchingEngine::new();
        let first = engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        let second = engine.submit(request("AAPL", Side::Sell, 100, 10)).unwrap();

        assert_eq!(first.order.id, 1);
        assert_eq!(second.order.id, 2);
        assert!(second.order.arrival > first.order.arrival);

        assert_eq!(second.trades.len(), 1);
        let trade = &second.trades[0];
        assert_eq!(trade.id, 1);
        assert!(trade.timestamp > 0);
        assert_eq!(trade.price, 100);
    }

    #[test]
    fn test_latency_counters_advance() {
        let mut engine = MatchingEngine::new();
        engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        engine.submit(request("AAPL", Side::Sell, 100, 4)).unwrap();

        assert_eq!(engine.orders_processed(), 2);
        assert_eq!(engine.trades_executed(), 1);
        assert!(engine.average_latency() > Duration::ZERO);

        let stats = engine.stats();
        assert_eq!(stats.orders_processed, 2);
        assert_eq!(stats.trades_executed, 1);
        assert_eq!(stats.symbols_traded, 1);
        assert!((stats.match_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_routes_across_symbols() {
        let mut engine = MatchingEngine::new();
        let aapl = engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        let msft = engine.submit(request("MSFT", Side::Buy, 200, 10)).unwrap();

        assert!(engine.cancel(msft.order.id));
        assert!(!engine.cancel(msft.order.id), "second cancel is a no-op");
        assert_eq!(engine.best_bid("MSFT"), None);
        assert_eq!(engine.best_bid("AAPL"), Some(100));
        assert!(engine.order(aapl.order.id).is_some());
        assert!(engine.order(msft.order.id).is_none());
    }

    #[test]
    fn test_cancel_unknown_or_filled() {
        let mut engine = MatchingEngine::new();
        assert!(!engine.cancel(42));

        engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        let sell = engine.submit(request("AAPL", Side::Sell, 100, 10)).unwrap();
        assert_eq!(sell.order.status, OrderStatus::Filled);

        // Both sides are filled; neither can be canceled
        assert!(!engine.cancel(1));
        assert!(!engine.cancel(sell.order.id));
    }

    #[test]
    fn test_order_lookup_tracks_fills() {
        let mut engine = MatchingEngine::new();
        let buy = engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        engine.submit(request("AAPL", Side::Sell, 100, 4)).unwrap();

        let resting = engine.order(buy.order.id).unwrap();
        assert_eq!(resting.status, OrderStatus::PartiallyFilled);
        assert_eq!(resting.remaining, 6);

        engine.submit(request("AAPL", Side::Sell, 100, 6)).unwrap();
        assert!(engine.order(buy.order.id).is_none(), "filled orders leave the index");
    }

    #[test]
    fn test_snapshot_surface() {
        let mut engine = MatchingEngine::new();
        engine.submit(request("AAPL", Side::Buy, 100, 10)).unwrap();
        engine.submit(request("AAPL", Side::Sell, 103, 5)).unwrap();

        let snapshot = engine.snapshot("AAPL", 10).unwrap();
        assert_eq!(snapshot.spread, Some(3));
        assert!(engine.snapshot("MSFT", 10).is_none());
    }

    #[test]
    fn test_validation_limits_apply() {
        let config = ValidationConfig {
            max_quantity: 100,
            ..Default::default()
        };
        let mut engine = MatchingEngine::with_validation(config);
        let result = engine.submit(request("AAPL", Side::Buy, 100, 500));
        assert!(matches!(
            result,
            Err(ValidationError::QuantityOutOfRange(_))
        ));
    }
}
