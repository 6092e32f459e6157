//! Run the rendering tool once, bounded by an optional wall-clock timeout.
//!
//! Both pipes are drained by background tasks into shared buffers while the
//! child runs. That keeps a chatty child from blocking on a full pipe, and it
//! means whatever was written before a timeout kill is still available for
//! the error report.
//!
//! On Unix the child leads its own process group. A timeout kills the whole
//! group, so helpers the tool forked (LibreOffice's `oosplash` starts
//! `soffice.bin`) die with it instead of holding the pipes open.

use crate::error::Ppt2PdfError;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long to keep reading pipes after the child is gone. LibreOffice can
/// leave helper processes holding the pipes open past its own exit.
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Text captured from the child's standard streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// How a single run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The child exited on its own (or was killed by someone else).
    Exited {
        /// `None` when terminated by a signal.
        code: Option<i32>,
        success: bool,
        output: CapturedOutput,
        elapsed: Duration,
    },
    /// The timeout fired; the child was killed and reaped.
    TimedOut {
        output: CapturedOutput,
        elapsed: Duration,
    },
}

impl ProcessOutcome {
    pub fn output(&self) -> &CapturedOutput {
        match self {
            ProcessOutcome::Exited { output, .. } | ProcessOutcome::TimedOut { output, .. } => {
                output
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            ProcessOutcome::Exited { elapsed, .. } | ProcessOutcome::TimedOut { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Spawn `command[0]` with `command[1..]` and wait for it.
///
/// `on_spawned` runs right after a successful spawn. The timeout is measured
/// from that point.
pub async fn run_with_timeout(
    command: &[String],
    timeout: Option<Duration>,
    on_spawned: impl FnOnce(),
) -> Result<ProcessOutcome, Ppt2PdfError> {
    let Some((program, args)) = command.split_first() else {
        return Err(Ppt2PdfError::InvalidConfig("command must not be empty".into()));
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|source| Ppt2PdfError::SpawnFailed {
            program: PathBuf::from(program),
            source,
        })?;
    let started = Instant::now();
    debug!("Spawned {} (pid {:?})", program, child.id());
    on_spawned();

    let stdout_buf = Arc::new(Mutex::new(Vec::new()));
    let stderr_buf = Arc::new(Mutex::new(Vec::new()));
    let stdout_task = child
        .stdout
        .take()
        .map(|pipe| tokio::spawn(drain(pipe, Arc::clone(&stdout_buf))));
    let stderr_task = child
        .stderr
        .take()
        .map(|pipe| tokio::spawn(drain(pipe, Arc::clone(&stderr_buf))));

    let waited = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
        None => Some(child.wait().await),
    };

    match waited {
        Some(status) => {
            let status = status?;
            let elapsed = started.elapsed();
            settle(stdout_task, stderr_task).await;
            debug!("{} exited with {} after {:?}", program, status, elapsed);
            Ok(ProcessOutcome::Exited {
                code: status.code(),
                success: status.success(),
                output: snapshot(&stdout_buf, &stderr_buf),
                elapsed,
            })
        }
        None => {
            warn!(
                "{} exceeded {:?}; killing pid {:?}",
                program,
                timeout.unwrap_or_default(),
                child.id()
            );
            kill_tree(&mut child, program).await;
            let elapsed = started.elapsed();
            settle(stdout_task, stderr_task).await;
            Ok(ProcessOutcome::TimedOut {
                output: snapshot(&stdout_buf, &stderr_buf),
                elapsed,
            })
        }
    }
}

/// Copy everything from `pipe` into `sink` until EOF or a read error.
async fn drain<R: AsyncRead + Unpin>(mut pipe: R, sink: Arc<Mutex<Vec<u8>>>) {
    let mut chunk = vec![0u8; 8 * 1024];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                if let Ok(mut buf) = sink.lock() {
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Pipe read stopped: {}", e);
                break;
            }
        }
    }
}

/// Kill the child's process group (Unix), then the child itself, and reap it.
async fn kill_tree(child: &mut Child, program: &str) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SAFETY: killpg takes no pointers; the group id is our own child's pid.
            if unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) } != 0 {
                debug!(
                    "killpg({}) failed: {}",
                    pid,
                    std::io::Error::last_os_error()
                );
            }
        }
    }
    if let Err(e) = child.kill().await {
        warn!("Failed to kill {}: {}", program, e);
    }
}

/// Give both reader tasks one shared window to reach EOF, then abandon them.
async fn settle(stdout: Option<JoinHandle<()>>, stderr: Option<JoinHandle<()>>) {
    let deadline = tokio::time::Instant::now() + PIPE_DRAIN_GRACE;
    tokio::join!(settle_one(stdout, deadline), settle_one(stderr, deadline));
}

async fn settle_one(task: Option<JoinHandle<()>>, deadline: tokio::time::Instant) {
    let Some(mut task) = task else {
        return;
    };
    if tokio::time::timeout_at(deadline, &mut task).await.is_err() {
        debug!("Pipe still open after {:?}; abandoning reader", PIPE_DRAIN_GRACE);
        task.abort();
    }
}

fn snapshot(stdout: &Mutex<Vec<u8>>, stderr: &Mutex<Vec<u8>>) -> CapturedOutput {
    let text = |m: &Mutex<Vec<u8>>| {
        m.lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    };
    CapturedOutput {
        stdout: text(stdout),
        stderr: text(stderr),
    }
}
