use std::time::Duration;

use tracing::info;
use xjob_core::{TaskContext, TaskFn, TaskOutcome, TaskRegistry};
use xjob_exec::ShellTask;

/// Handlers shipped with the agent binary.
pub fn register_builtin(tasks: &TaskRegistry) {
    tasks
        .register("demoJobHandler", TaskFn::arc(demo))
        .register("shellJobHandler", ShellTask::new().arc());
}

/// Ticks once per second for `params` seconds (default 5), stopping early on cancellation.
async fn demo(ctx: TaskContext) -> TaskOutcome {
    let beats: u32 = ctx.params.trim().parse().unwrap_or(5);
    for beat in 1..=beats {
        tokio::select! {
            _ = ctx.cancelled() => return TaskOutcome::fail(format!("cancelled after {} beats", beat - 1)),
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                info!(job_id = ctx.job_id, run_id = ctx.run_id, beat, "demo beat");
            }
        }
    }
    TaskOutcome::success_with(format!("{beats} beats"))
}
