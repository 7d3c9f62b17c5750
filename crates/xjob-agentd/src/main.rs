mod args;
mod handlers;
mod server;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use xjob_api::{ExecutorAdapter, HttpApi};
use xjob_core::{Executor, MemoryLogStore};
use xjob_discover::{Heartbeat, SchedulerClient};
use xjob_observe::logger_init;
use xjob_prometheus::PrometheusMetrics;

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger_init(&args.logger_config()?)?;

    let discover = args.discover_config();
    info!(
        scheduler = %discover.scheduler_addr,
        key = %discover.registry_key,
        value = %discover.registry_value(),
        "starting executor agent"
    );

    let client = SchedulerClient::new(discover).context("building scheduler client")?;
    let metrics = Arc::new(PrometheusMetrics::new().context("registering metrics")?);
    let logs = Arc::new(MemoryLogStore::new(args.log_capacity));

    let executor = Executor::builder()
        .with_completion(Arc::new(client.clone()))
        .with_log_sink(logs.clone())
        .with_metrics(metrics.clone())
        .build();
    handlers::register_demo(&executor);
    info!(handlers = ?executor.registry().names(), "handlers registered");
    let executor = Arc::new(executor);

    let adapter = ExecutorAdapter::new(Arc::clone(&executor)).with_log_handler(logs);
    let app = server::router(HttpApi::new(Arc::new(adapter)).router(), metrics);

    let bind = args.bind_addr();
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    info!(addr = %bind, "command surface listening");

    let stop = shutdown::install_shutdown_handler().context("installing signal handlers")?;
    let heartbeat = Heartbeat::new(client).spawn(stop.clone());

    let serve_stop = stop.clone();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { serve_stop.cancelled().await })
        .await;
    if let Err(e) = &served {
        warn!("http server exited with error: {}", e);
    }

    // Deregister even when the server failed on its own.
    stop.cancel();
    heartbeat.await.context("heartbeat task")?;

    let live = executor.runs().len();
    if live > 0 {
        warn!(live, "exiting with jobs still running");
    }
    info!("executor agent stopped");

    served.context("http server")
}
