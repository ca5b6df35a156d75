use std::{path::PathBuf, process::Stdio, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};
use tracing::{debug, trace};

use xjob_core::{Task, TaskContext, TaskOutcome, TaskRef};

use crate::{
    error::{ExecError, ExecResult},
    util::{kill_graceful, kill_group},
};

const DEFAULT_SHELL: &str = "sh";
const DEFAULT_GRACE: Duration = Duration::from_secs(2);

/// Runs a script through `sh -c`.
///
/// Without a fixed script the run's `executorParams` is executed instead.
/// Exit status `0` maps to a success outcome; anything else fails the run.
/// On cancellation the child gets SIGTERM and, after a grace period, SIGKILL.
#[derive(Clone, Debug)]
pub struct ShellTask {
    shell: String,
    script: Option<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
    grace: Duration,
}

impl Default for ShellTask {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            script: None,
            env: Vec::new(),
            cwd: None,
            grace: DEFAULT_GRACE,
        }
    }
}

impl ShellTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn arc(self) -> TaskRef {
        Arc::new(self)
    }

    async fn exec(&self, ctx: &TaskContext) -> ExecResult<String> {
        let script = self.script.as_deref().unwrap_or(ctx.params.as_str());
        if script.trim().is_empty() {
            return Err(ExecError::MissingScript);
        }

        trace!(target: "xjob.exec.shell", job_id = ctx.job_id, shell = %self.shell, "spawn");
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(script)
            .env("XJOB_JOB_ID", ctx.job_id.to_string())
            .env("XJOB_BROADCAST_INDEX", ctx.broadcast_index.to_string())
            .env("XJOB_BROADCAST_TOTAL", ctx.broadcast_total.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        // own group, so cancellation reaches everything the script starts
        #[cfg(target_family = "unix")]
        cmd.process_group(0);

        let mut child = cmd.spawn().map_err(|e| ExecError::Spawn(e.to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::Io("stdout not captured".into()))?;
        let job_id = ctx.job_id;
        let mut read_stdout = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let mut last = String::new();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "xjob.exec.shell.out", job_id, %line);
                last = line;
            }
            last
        });

        let pgid = child.id();
        let exited = tokio::select! {
            status = child.wait() => Some(status?),
            _ = ctx.cancelled() => None,
        };
        let Some(status) = exited else {
            debug!(target: "xjob.exec.shell", job_id, "cancelled; stopping child");
            kill_graceful(&mut child, self.grace).await?;
            read_stdout.abort();
            return Err(ExecError::Cancelled);
        };

        // background jobs of the script may still hold stdout open
        let last = tokio::select! {
            last = &mut read_stdout => last.unwrap_or_default(),
            _ = ctx.cancelled() => {
                debug!(target: "xjob.exec.shell", job_id, "cancelled while background jobs held stdout");
                kill_group(pgid);
                read_stdout.abort();
                return Err(ExecError::Cancelled);
            }
        };

        if status.success() {
            debug!(target: "xjob.exec.shell", job_id, "exit success");
            return Ok(last);
        }
        match status.code() {
            Some(code) => Err(ExecError::NonZeroExit { code }),
            None => Err(ExecError::KilledBySignal),
        }
    }
}

#[async_trait]
impl Task for ShellTask {
    async fn run(&self, ctx: TaskContext) -> TaskOutcome {
        match self.exec(&ctx).await {
            Ok(last_line) => TaskOutcome::success_with(last_line),
            Err(e) => TaskOutcome::fail(e.to_string()),
        }
    }
}
