#![allow(missing_docs)]

use std::time::Duration;

use axum::{Router, http::StatusCode, routing::get};

use crate::{
    AppState,
    models::{TransactionRecord, parse_date_of_sale},
    pagination::PaginationConfig,
    seed::SeedSource,
    stores::{
        MemoryTransactionStore, TransactionStore,
        sqlite::{SQLAppState, create_app_state},
    },
};

/// A record sold on `date`, which must be in the form `YYYY-MM-DD`.
pub(crate) fn record(
    id: i64,
    title: &str,
    price: f64,
    date: &str,
    category: &str,
    sold: bool,
) -> TransactionRecord {
    TransactionRecord {
        id,
        title: title.to_owned(),
        description: String::new(),
        price,
        date_of_sale: parse_date_of_sale(date).expect("invalid test date"),
        category: category.to_owned(),
        sold,
    }
}

/// A bike sold and a pen left unsold in March 2021.
pub(crate) fn scenario_records() -> Vec<TransactionRecord> {
    vec![
        record(1, "Bike", 150.0, "2021-03-05", "sport", true),
        record(2, "Pen", 5.0, "2021-03-20", "office", false),
    ]
}

/// Sixty records spread over every month of three years, with prices in
/// every bucket and a mix of categories and sold flags.
///
/// Prices are multiples of a quarter so that sums are exact.
pub(crate) fn sample_year_records() -> Vec<TransactionRecord> {
    const CATEGORIES: [&str; 4] = ["electronics", "jewelery", "men's clothing", "women's clothing"];

    (1..=60)
        .map(|i: i64| {
            let year = 2020 + i % 3;
            let month = i % 12 + 1;
            let day = i % 27 + 1;
            let price = ((i * 37) % 1000) as f64 + 0.25 * (i % 4) as f64;

            let mut sample = record(
                i,
                &format!("Item {i}"),
                price,
                &format!("{year}-{month:02}-{day:02}"),
                CATEGORIES[(i % 4) as usize],
                i % 3 != 0,
            );

            if i % 5 == 0 {
                sample.description = "Described in great detail".to_owned();
            }

            sample
        })
        .collect()
}

/// A seed source that points at a port nothing listens on.
pub(crate) fn unreachable_seed_source() -> SeedSource {
    SeedSource::new("http://127.0.0.1:9/seed.json", Duration::from_secs(1))
        .expect("could not build seed source")
}

/// App state backed by an in-memory SQLite database holding `records`.
pub(crate) fn sqlite_app_state(
    records: Vec<TransactionRecord>,
    seed_source: SeedSource,
) -> SQLAppState {
    let connection = rusqlite::Connection::open_in_memory().expect("could not open database");
    let mut state = create_app_state(connection, PaginationConfig::default(), seed_source)
        .expect("could not create app state");

    state
        .transaction_store
        .insert_many(records)
        .expect("could not insert test records");

    state
}

/// App state backed by the in-memory store holding `records`.
pub(crate) fn memory_app_state(
    records: Vec<TransactionRecord>,
) -> AppState<MemoryTransactionStore> {
    let mut store = MemoryTransactionStore::new();
    store
        .insert_many(records)
        .expect("could not insert test records");

    AppState::new(store, PaginationConfig::default(), unreachable_seed_source())
}

/// Serve `body` with `status` from a throwaway HTTP server and return its URL.
pub(crate) async fn spawn_seed_server(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/seed.json",
        get(move || async move {
            (
                status,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body,
            )
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind seed server");
    let address = listener.local_addr().expect("seed server has no address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("seed server failed");
    });

    format!("http://{address}/seed.json")
}
