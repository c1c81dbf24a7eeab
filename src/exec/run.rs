use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to wait for the pipes to close after a timeout kill. Output still
/// held open by a grandchild is abandoned after this.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Captured result of a finished child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Turn the output into the executor contract: stdout on success, an
    /// error naming the exit status and stderr otherwise.
    pub fn into_result(self, command: &str, timeout: Duration) -> Result<String> {
        if self.timed_out {
            bail!("command timed out after {timeout:?}: {command}");
        }
        match self.exit_code {
            Some(0) => Ok(self.stdout),
            Some(code) => bail!(
                "command exited with status {code}: {command}: {}",
                self.stderr.trim_end()
            ),
            None => bail!(
                "command terminated by signal: {command}: {}",
                self.stderr.trim_end()
            ),
        }
    }
}

/// Spawn `cmd`, wait for it to finish or for `timeout` to elapse, and
/// collect both output streams. A zero timeout waits forever.
pub fn run_to_completion(mut cmd: Command, timeout: Duration) -> Result<ProcessOutput> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn `{program}`"))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout of `{program}` was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr of `{program}` was not piped"))?;

    // Drain both pipes on their own threads so a chatty child cannot block.
    let stdout_drain = Drain::spawn(stdout);
    let stderr_drain = Drain::spawn(stderr);

    let (exit_code, timed_out) = wait(&mut child, timeout)
        .with_context(|| format!("failed waiting for `{program}`"))?;

    // A killed child may leave grandchildren holding the pipes open.
    let grace = timed_out.then_some(DRAIN_GRACE);
    let stdout = stdout_drain.collect(grace);
    let stderr = stderr_drain.collect(grace);

    debug!(program = %program, ?exit_code, timed_out, "process finished");
    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
    })
}

/// Output read so far from one pipe, plus a signal once it hits EOF.
struct Drain {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

impl Drain {
    fn spawn<R: Read + Send + 'static>(mut pipe: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let shared = buf.clone();
        std::thread::spawn(move || {
            let mut chunk = [0u8; 4096];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if let Ok(mut buf) = shared.lock() {
                            buf.extend_from_slice(&chunk[..n]);
                        }
                    }
                }
            }
            // Receiver may be gone after a timeout.
            let _ = tx.send(());
        });
        Self { buf, done }
    }

    /// Wait for EOF (at most `grace` when given) and return what was read.
    fn collect(self, grace: Option<Duration>) -> String {
        match grace {
            Some(grace) => {
                let _ = self.done.recv_timeout(grace);
            }
            None => {
                let _ = self.done.recv();
            }
        }
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

fn wait(child: &mut Child, timeout: Duration) -> std::io::Result<(Option<i32>, bool)> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }

        if !timeout.is_zero() && start.elapsed() > timeout {
            warn!(?timeout, "killing process after timeout");
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, true));
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}
