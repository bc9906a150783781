// src/exec/process.rs

//! Single external process execution.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::Context;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::errors::{CharmError, Result};
use crate::exec::{Invocation, OutputMode};

/// How long a child gets to exit on its own after Ctrl-C before it is killed.
const INTERRUPT_GRACE: Duration = Duration::from_secs(5);

/// Run one invocation through `sh -c` and wait for it.
///
/// The escaped line that is logged is the exact string passed to the shell.
/// On Ctrl-C the child (same process group, so it sees the same SIGINT) is
/// given [`INTERRUPT_GRACE`] to exit, then killed; the result is
/// `CharmError::Interrupted` rather than success.
pub async fn run_process(invocation: &Invocation) -> Result<()> {
    let line = invocation.spec.to_shell_line();

    info!(
        cmd = %line,
        cwd = %invocation.cwd.display(),
        env = %invocation.spec.env_assignments(),
        "running command"
    );

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(&line)
        .current_dir(&invocation.cwd)
        .envs(invocation.spec.env_overlay())
        .kill_on_drop(true);

    match invocation.output {
        OutputMode::Inherit => {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        }
        OutputMode::Silent => {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{line}` in {}", invocation.cwd.display()))?;

    let status = tokio::select! {
        status_res = child.wait() => {
            status_res.with_context(|| format!("waiting for `{line}`"))?
        }

        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    warn!(cmd = %line, "interrupted; waiting for command to stop");
                    stop_child(&mut child, &line).await;
                    return Err(CharmError::Interrupted { command: line });
                }
                Err(e) => {
                    // No signal handling available; just wait for the child.
                    debug!(error = %e, "could not listen for Ctrl-C");
                    child
                        .wait()
                        .await
                        .with_context(|| format!("waiting for `{line}`"))?
                }
            }
        }
    };

    check_status(&line, status)
}

fn check_status(line: &str, status: ExitStatus) -> Result<()> {
    let code = exit_code(&status);

    if status.success() {
        debug!(cmd = %line, "command succeeded");
        Ok(())
    } else {
        error!(cmd = %line, exit_code = code, "command failed");
        Err(CharmError::ExternalTool {
            command: line.to_string(),
            code,
        })
    }
}

/// Exit code of a finished child; signals map to `128 + signo`.
fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

async fn stop_child(child: &mut Child, line: &str) {
    match timeout(INTERRUPT_GRACE, child.wait()).await {
        Ok(Ok(status)) => {
            info!(cmd = %line, exit_code = exit_code(&status), "command stopped after interrupt");
        }
        Ok(Err(e)) => {
            warn!(cmd = %line, error = %e, "failed waiting for interrupted command");
        }
        Err(_) => {
            warn!(cmd = %line, "command ignored interrupt; killing it");
            if let Err(e) = child.kill().await {
                warn!(cmd = %line, error = %e, "failed to kill command");
            }
        }
    }
}
