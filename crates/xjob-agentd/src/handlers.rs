//! Built-in demo handlers, useful for wiring checks against a real scheduler.

use std::time::Duration;

use xjob_core::{Executor, HandlerFn, JobContext, JobError};

const DEFAULT_SLEEP_SECS: u64 = 5;

pub fn register_demo(executor: &Executor) {
    executor.register(
        "demo.echo",
        HandlerFn::arc(|ctx: JobContext| async move {
            ctx.log().line(format!("echo: {}", ctx.params()));
            Ok(())
        }),
    );

    // Params: seconds to sleep. Stops early on kill or timeout.
    executor.register(
        "demo.sleep",
        HandlerFn::arc(|ctx: JobContext| async move {
            let secs = parse_secs(ctx.params())?;
            ctx.log().line(format!("sleeping {secs}s"));

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    ctx.log().line("woke up");
                    Ok(())
                }
                _ = ctx.cancelled() => Err(JobError::Canceled),
            }
        }),
    );

    executor.register(
        "demo.fail",
        HandlerFn::arc(|ctx: JobContext| async move {
            let reason = match ctx.params().trim() {
                "" => "demo failure",
                other => other,
            };
            Err(JobError::fail(reason))
        }),
    );
}

fn parse_secs(params: &str) -> Result<u64, JobError> {
    let params = params.trim();
    if params.is_empty() {
        return Ok(DEFAULT_SLEEP_SECS);
    }
    params
        .parse()
        .map_err(|_| JobError::fail(format!("invalid sleep seconds: {params:?}")))
}
