use std::convert::Infallible;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use courier_core::{
    BoxError, CancellationSignal, Cancelled, DispatchError, Handler, MediatorBuilder, Request,
    ServiceCollection, register_handler,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Ping {
    seq: u32,
}

#[derive(Debug, Serialize)]
struct Pong {
    seq: u32,
    served_by: u32,
}

impl Request for Ping {
    type Response = Pong;
}

/// Shared across dispatches; counts how many pings it answered.
#[derive(Default)]
struct PingHandler {
    served: AtomicU32,
}

#[async_trait]
impl Handler<Ping> for PingHandler {
    type Error = Infallible;

    async fn handle(&self, ping: Ping, _cancel: CancellationSignal) -> Result<Pong, Infallible> {
        let served_by = self.served.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(Pong {
            seq: ping.seq,
            served_by,
        })
    }
}

#[derive(Debug)]
struct Divide {
    a: i64,
    b: i64,
}

impl Request for Divide {
    type Response = i64;
}

#[derive(Debug, thiserror::Error)]
#[error("cannot divide {0} by zero")]
struct DivideByZero(i64);

#[derive(Default)]
struct DivideHandler;

#[async_trait]
impl Handler<Divide> for DivideHandler {
    type Error = DivideByZero;

    async fn handle(&self, req: Divide, _cancel: CancellationSignal) -> Result<i64, DivideByZero> {
        req.a.checked_div(req.b).ok_or(DivideByZero(req.a))
    }
}

/// Sleeps in small steps, giving up as soon as the caller cancels.
#[derive(Debug)]
struct Countdown {
    steps: u32,
}

impl Request for Countdown {
    type Response = u32;
}

struct CountdownHandler {
    step: Duration,
}

#[async_trait]
impl Handler<Countdown> for CountdownHandler {
    type Error = Cancelled;

    async fn handle(&self, req: Countdown, cancel: CancellationSignal) -> Result<u32, Cancelled> {
        for done in 0..req.steps {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(done, "countdown interrupted");
                    return Err(Cancelled);
                }
                _ = tokio::time::sleep(self.step) => {}
            }
        }
        Ok(req.steps)
    }
}

/// Bound to nothing.
#[derive(Debug)]
struct Shutdown;

impl Request for Shutdown {
    type Response = ();
}

register_handler!(Ping => PingHandler);
register_handler!(Divide => DivideHandler);

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_logging();

    // (A) registry: link-time bindings plus one bound explicitly
    let builder = MediatorBuilder::new()
        .discover()
        .bind::<Countdown, CountdownHandler>()
        .expect::<Ping>()
        .expect::<Divide>()
        .expect::<Countdown>();

    // (B) provider: singleton ping handler, the rest per dispatch
    let provider = ServiceCollection::new()
        .add_singleton(PingHandler::default())
        .add_scoped_default::<DivideHandler>()
        .add_scoped(|| {
            Ok::<_, BoxError>(CountdownHandler {
                step: Duration::from_millis(20),
            })
        })
        .build();

    let dispatcher = builder.build(provider)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&dispatcher.registry().describe())?
    );

    // (C) plain request/response
    for seq in 1..=3 {
        let pong = dispatcher.send(Ping { seq }).await?;
        info!(pong = %serde_json::to_string(&pong)?, "ping answered");
    }

    // (D) handler failure comes back as the handler's own error
    match dispatcher.send(Divide { a: 10, b: 0 }).await {
        Ok(q) => info!(q, "divided"),
        Err(err) => match err.handler_error::<DivideByZero>() {
            Some(e) => warn!(error = %e, "handler rejected request"),
            None => return Err(err.into()),
        },
    }
    let q = dispatcher.send(Divide { a: 10, b: 3 }).await?;
    info!(q, "divided");

    // (E) cooperative cancellation
    let token = CancellationToken::new();
    let signal = CancellationSignal::from(&token);
    let d = dispatcher.clone();
    let countdown = tokio::spawn(async move { d.dispatch(Countdown { steps: 50 }, &signal).await });
    tokio::time::sleep(Duration::from_millis(70)).await;
    token.cancel();
    match countdown.await? {
        Ok(steps) => info!(steps, "countdown finished"),
        Err(err) if err.handler_error::<Cancelled>().is_some() => info!("countdown cancelled"),
        Err(err) => return Err(err.into()),
    }

    // (F) unbound request
    match dispatcher.send(Shutdown).await {
        Err(DispatchError::NoHandler { request }) => warn!(%request, "no route"),
        other => info!(?other, "unexpected"),
    }

    info!(bindings = dispatcher.registry().len(), "done");
    Ok(())
}
