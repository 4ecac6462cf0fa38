use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use matchbook::domain::orderbook::OrderBook;
use matchbook::shared::protocol::{Order, OrderStatus, Side};
use std::sync::Arc;

fn make_order(id: u64, side: Side, price: u64, quantity: u64, arrival: u64) -> Order {
    Order {
        id,
        user_id: id,
        symbol: Arc::from("AAPL"),
        side,
        price,
        quantity,
        remaining: quantity,
        arrival,
        status: OrderStatus::New,
    }
}

fn realistic_match_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("orderbook matching");

    // One pre-filled master book; each iteration only pays for a clone.
    let book_size = 1_000u64;
    let mut master = OrderBook::new(Arc::from("AAPL"));
    for i in 0..book_size {
        master.submit(make_order(i + 1, Side::Sell, 50_000 + i, 10, i + 1));
    }

    group.bench_function("1-to-1 match against 1000-level book", |b| {
        b.iter_batched(
            || {
                let book = master.clone();
                let order = make_order(1_000_001, Side::Buy, 50_000, 10, 1_000_001);
                (book, order)
            },
            |(mut book, order)| {
                book.submit(black_box(order));
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("sweep 100 levels", |b| {
        b.iter_batched(
            || {
                let book = master.clone();
                let order = make_order(1_000_001, Side::Buy, 50_099, 1_000, 1_000_001);
                (book, order)
            },
            |(mut book, order)| {
                book.submit(black_box(order));
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("cancel then refresh best ask", |b| {
        b.iter_batched(
            || master.clone(),
            |mut book| {
                book.cancel(black_box(1));
                black_box(book.best_ask());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, realistic_match_benchmark);
criterion_main!(benches);
