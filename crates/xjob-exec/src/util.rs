use std::time::Duration;

use tokio::process::Child;
use tracing::{debug, trace};

/// Send `signal` to every process in the group led by `pgid`.
#[cfg(target_family = "unix")]
fn signal_group(pgid: Option<u32>, signal: libc::c_int) {
    let Some(pgid) = pgid.and_then(|id| libc::pid_t::try_from(id).ok()) else {
        return;
    };
    // SAFETY: signal delivery only; a negative pid addresses the group we created at spawn.
    let rc = unsafe { libc::kill(-pgid, signal) };
    if rc != 0 {
        trace!(pgid, signal, "process group already gone");
    }
}

/// Kill whatever is left of the group, e.g. background jobs of a script that already exited.
#[cfg(target_family = "unix")]
pub fn kill_group(pgid: Option<u32>) {
    signal_group(pgid, libc::SIGKILL);
}

#[cfg(not(target_family = "unix"))]
pub fn kill_group(_pgid: Option<u32>) {}

/// SIGTERM the child's process group, then SIGKILL it after `grace`.
///
/// The child must have been spawned as a group leader.
#[cfg(target_family = "unix")]
pub async fn kill_graceful(child: &mut Child, grace: Duration) -> std::io::Result<()> {
    let pgid = child.id();
    signal_group(pgid, libc::SIGTERM);

    let exited = tokio::time::timeout(grace, child.wait()).await.is_ok();
    if exited {
        debug!(?pgid, "child stopped after SIGTERM");
    }
    // members that ignored SIGTERM or outlived the leader
    signal_group(pgid, libc::SIGKILL);
    if exited {
        return Ok(());
    }
    child.kill().await
}

#[cfg(not(target_family = "unix"))]
pub async fn kill_graceful(child: &mut Child, _grace: Duration) -> std::io::Result<()> {
    child.kill().await
}
