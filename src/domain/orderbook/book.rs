/// Order book for a single symbol
///
/// Structure:
/// - `bids` / `asks`: binary heaps of `(price, arrival, order_id)` entries,
///   each ordered by an explicit per-side policy type. The bid policy ranks
///   higher prices first, the ask policy lower prices first; ties go to the
///   earlier arrival. Ordering is expressed in the policy's `Ord` impl, not
///   by negating prices.
/// - `live`: order-id index of resting orders. Presence in the index defines
///   liveness; a heap entry whose id is absent is a tombstone (canceled or
///   filled elsewhere) and is discarded the next time it surfaces at the top
///   of its heap. Nothing is ever removed from the middle of a heap.
///
/// A resting order keeps its single heap entry across partial fills, so its
/// original arrival stamp (and therefore its queue position) is preserved.

use crate::shared::protocol::{
    BookSnapshot, LevelView, Order, OrderStatus, Side, Trade, TradeBatch,
};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

/// Heap entry: the identity a queue needs to rank an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    price: u64,
    arrival: u64,
    order_id: u64,
}

/// Bid-side ordering policy: highest price first, ties to the earliest arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BidPriority(Entry);

impl Ord for BidPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .price
            .cmp(&other.0.price)
            .then_with(|| other.0.arrival.cmp(&self.0.arrival))
            .then_with(|| other.0.order_id.cmp(&self.0.order_id))
    }
}

impl PartialOrd for BidPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ask-side ordering policy: lowest price first, ties to the earliest arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AskPriority(Entry);

impl Ord for AskPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .price
            .cmp(&self.0.price)
            .then_with(|| other.0.arrival.cmp(&self.0.arrival))
            .then_with(|| other.0.order_id.cmp(&self.0.order_id))
    }
}

impl PartialOrd for AskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-symbol order book
#[derive(Clone)]
pub struct OrderBook {
    symbol: Arc<str>,
    bids: BinaryHeap<BidPriority>,
    asks: BinaryHeap<AskPriority>,
    /// Live resting orders; the source of truth for liveness
    live: HashMap<u64, Order>,
}

impl OrderBook {
    pub fn new(symbol: Arc<str>) -> Self {
        OrderBook {
            symbol,
            bids: BinaryHeap::new(),
            asks: BinaryHeap::new(),
            live: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Arc<str> {
        &self.symbol
    }

    /// Matches an incoming (taker) order against the opposite side
    ///
    /// Drains crossing price levels while the taker has remaining quantity,
    /// emitting one trade per maker touched, each at the maker's price. Any
    /// unfilled remainder rests on the taker's own side. Returns the trades
    /// in execution order plus the taker's final state.
    ///
    /// Trade ids and timestamps are left at zero; the engine stamps them.
    pub fn submit(&mut self, mut taker: Order) -> (TradeBatch, Order) {
        let mut trades: TradeBatch = SmallVec::new();

        while taker.remaining > 0 {
            let top = match taker.side {
                Side::Buy => self.live_ask_top(),
                Side::Sell => self.live_bid_top(),
            };
            let Some((maker_id, maker_price)) = top else {
                break;
            };

            let crossed = match taker.side {
                Side::Buy => taker.price >= maker_price,
                Side::Sell => taker.price <= maker_price,
            };
            if !crossed {
                break;
            }

            let Some(maker) = self.live.get_mut(&maker_id) else {
                break;
            };
            let quantity = taker.remaining.min(maker.remaining);

            let (buy_order_id, sell_order_id) = match taker.side {
                Side::Buy => (taker.id, maker.id),
                Side::Sell => (maker.id, taker.id),
            };
            trades.push(Trade {
                id: 0,
                buy_order_id,
                sell_order_id,
                symbol: Arc::clone(&self.symbol),
                price: maker.price,
                quantity,
                timestamp: 0,
            });

            taker.remaining -= quantity;
            maker.remaining -= quantity;

            if maker.remaining == 0 {
                maker.status = OrderStatus::Filled;
                // The heap entry stays behind as a tombstone and is discarded
                // the next time it reaches the top.
                self.live.remove(&maker_id);
            } else {
                maker.status = OrderStatus::PartiallyFilled;
            }
        }

        if taker.remaining > 0 {
            taker.status = if trades.is_empty() {
                OrderStatus::New
            } else {
                OrderStatus::PartiallyFilled
            };
            let entry = Entry {
                price: taker.price,
                arrival: taker.arrival,
                order_id: taker.id,
            };
            match taker.side {
                Side::Buy => self.bids.push(BidPriority(entry)),
                Side::Sell => self.asks.push(AskPriority(entry)),
            }
            self.live.insert(taker.id, taker.clone());
        } else {
            taker.status = OrderStatus::Filled;
        }

        (trades, taker)
    }

    /// Cancels a resting order
    ///
    /// Idempotent: returns `false` for unknown, already filled, or already
    /// canceled ids. The heap entry is left in place as a tombstone.
    pub fn cancel(&mut self, order_id: u64) -> bool {
        match self.live.remove(&order_id) {
            Some(mut order) => {
                order.status = OrderStatus::Canceled;
                true
            }
            None => false,
        }
    }

    /// Looks up a live resting order
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        self.live.get(&order_id)
    }

    /// Best live bid price, discarding tombstones encountered at the top
    pub fn best_bid(&mut self) -> Option<u64> {
        self.live_bid_top().map(|(_, price)| price)
    }

    /// Best live ask price, discarding tombstones encountered at the top
    pub fn best_ask(&mut self) -> Option<u64> {
        self.live_ask_top().map(|(_, price)| price)
    }

    /// Number of live resting orders on one side
    pub fn live_orders(&self, side: Side) -> usize {
        self.live.values().filter(|o| o.side == side).count()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Aggregated view of the top `depth` live price levels per side
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        let mut bids: Vec<&Order> = self
            .live
            .values()
            .filter(|o| o.side == Side::Buy)
            .collect();
        bids.sort_by(|a, b| b.price.cmp(&a.price).then(a.arrival.cmp(&b.arrival)));

        let mut asks: Vec<&Order> = self
            .live
            .values()
            .filter(|o| o.side == Side::Sell)
            .collect();
        asks.sort_by(|a, b| a.price.cmp(&b.price).then(a.arrival.cmp(&b.arrival)));

        let bids = aggregate_levels(&bids, depth);
        let asks = aggregate_levels(&asks, depth);

        let spread = match (bids.first(), asks.first()) {
            (Some(bid), Some(ask)) => ask.price.checked_sub(bid.price),
            _ => None,
        };

        BookSnapshot {
            symbol: Arc::clone(&self.symbol),
            bids,
            asks,
            spread,
        }
    }

    /// Top live bid, popping tombstones off the heap on the way
    fn live_bid_top(&mut self) -> Option<(u64, u64)> {
        loop {
            let entry = self.bids.peek()?.0;
            if self.live.contains_key(&entry.order_id) {
                return Some((entry.order_id, entry.price));
            }
            self.bids.pop();
        }
    }

    /// Top live ask, popping tombstones off the heap on the way
    fn live_ask_top(&mut self) -> Option<(u64, u64)> {
        loop {
            let entry = self.asks.peek()?.0;
            if self.live.contains_key(&entry.order_id) {
                return Some((entry.order_id, entry.price));
            }
            self.asks.pop();
        }
    }
}

/// Collapses price-sorted orders into at most `depth` aggregated levels
fn aggregate_levels(orders: &[&Order], depth: usize) -> Vec<LevelView> {
    let mut levels: Vec<LevelView> = Vec::new();
    for order in orders {
        match levels.last_mut() {
            Some(level) if level.price == order.price => {
                level.quantity += order.remaining;
                level.orders += 1;
            }
            _ => {
                if levels.len() == depth {
                    break;
                }
                levels.push(LevelView {
                    price: order.price,
                    quantity: order.remaining,
                    orders: 1,
                });
            }
        }
    }
    levels
}
