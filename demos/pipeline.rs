//! # Example: Timed Pipeline
//!
//! Two stages timed by one shared [`Timing`] instance (separators keep counting
//! across stages), a flaky fetch behind a timeout and retry, a run quota, and a
//! daily cache in front of a "query".
//!
//! Run with `RUST_LOG=callvisor=debug cargo run --example pipeline` to see the
//! policy decisions.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use callvisor::{Call, CallError, CallExt, CallFn, MeasureOptions, Timing};

#[derive(Serialize, Deserialize, Clone, Debug)]
struct Price {
    symbol: String,
    close: f64,
}

async fn crop(_: ()) -> &'static str {
    tokio::time::sleep(Duration::from_millis(40)).await;
    "cropped"
}

async fn remove_text(_: ()) -> &'static str {
    tokio::time::sleep(Duration::from_millis(120)).await;
    "cleaned"
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Stages sharing one separator counter.
    let timing = Timing::new(MeasureOptions::default().split_after())?;
    let crop = timing.wrap(callvisor::call_fn!(crop));
    let remove_text = timing.wrap(callvisor::call_fn!(remove_text));
    for _ in 0..2 {
        crop.call(()).await;
        remove_text.call(()).await;
    }
    println!("separators printed: {}", timing.runs());

    // Fails twice, then answers; each attempt gets its own 500ms deadline.
    let attempts = Arc::new(AtomicU32::new(0));
    let seen = attempts.clone();
    let fetch = CallFn::new("fetch", move |id: u32| {
        let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if n < 3 {
                return Err(CallError::fail(format!("attempt {n}: connection reset")));
            }
            Ok(format!("user-{id}"))
        }
    })
    .timeout(Duration::from_millis(500), "fetch timed out")
    .retry(3)?
    .limit_run(Some(2))?;

    println!("fetched: {}", fetch.call(7).await?);
    println!("fetched: {}", fetch.call(8).await?);
    if let Err(e) = fetch.call(9).await {
        println!("third call refused: {e}");
    }

    // Suppressed failure with a trace on stderr.
    let risky = CallFn::new("risky", |_: ()| async { Err::<u8, _>(CallError::fail("boom")) })
        .pass_except(true);
    println!("risky returned: {:?}", risky.call(()).await);

    // Daily cache: the query runs once, later calls read memory or the file.
    let dir = tempfile::tempdir()?;
    let queries = Arc::new(AtomicU32::new(0));
    let counter = queries.clone();
    let prices = CallFn::new("load_prices", move |_: ()| {
        counter.fetch_add(1, Ordering::SeqCst);
        async {
            Ok::<_, CallError>(vec![
                Price { symbol: "AAPL".into(), close: 189.5 },
                Price { symbol: "MSFT".into(), close: 402.25 },
            ])
        }
    })
    .reduce_query(dir.path().join("prices.csv"))?;

    for _ in 0..3 {
        let rows = prices.call(()).await?;
        println!("{} rows", rows.len());
    }
    println!("queries run: {}", queries.load(Ordering::SeqCst));

    Ok(())
}
