//! Test execution back-ends.
//!
//! The built-in back-end swaps the mutated file into place, runs `go test`
//! against the package, and restores the original on every exit path. The
//! custom back-end hands the paths to a user command through `MUTATE_*`
//! environment variables and lets it do its own patching.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Cooperative cancellation flag, set from the interrupt handler and polled
/// by every subprocess wait loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Terminal state of one mutant execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Killed,
    Survived,
    CompileError,
    Timeout,
    Cancelled,
    Unknown(String),
}

pub struct GoTestOptions<'a> {
    pub package_path: &'a str,
    pub recursive: bool,
    pub timeout: Duration,
    pub dir: Option<&'a Path>,
}

pub struct CustomOptions<'a> {
    pub changed: &'a Path,
    pub original: &'a Path,
    pub package_path: &'a str,
    pub debug: bool,
    pub verbose: bool,
    pub timeout_secs: u64,
    pub recursive: bool,
}

enum WaitResult {
    Exited { code: Option<i32>, output: String },
    TimedOut,
    Cancelled,
    SpawnFailed(String),
}

/// Built-in back-end: swap the mutant into place, run `go test`, restore.
///
/// The restoration rename runs on every exit path, including panics in the
/// wait loop. A failed restoration is returned so the caller can treat it as
/// fatal: the source tree is possibly damaged.
pub fn exec_builtin(
    original: &Path,
    mutant: &Path,
    opts: &GoTestOptions,
    cancel: &CancelToken,
) -> std::io::Result<Outcome> {
    let backup = PathBuf::from(format!("{}.tmp", original.display()));
    std::fs::rename(original, &backup)?;
    let guard = RestoreGuard { from: backup, to: original.to_path_buf(), armed: true };

    let outcome = match std::fs::copy(mutant, original) {
        Ok(_) => run_go_test(opts, cancel),
        Err(e) => Outcome::Unknown(format!("copy mutant into place: {}", e)),
    };

    guard.restore()?;
    Ok(outcome)
}

struct RestoreGuard {
    from: PathBuf,
    to: PathBuf,
    armed: bool,
}

impl RestoreGuard {
    fn restore(mut self) -> std::io::Result<()> {
        self.armed = false;
        std::fs::rename(&self.from, &self.to)
    }
}

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::rename(&self.from, &self.to);
        }
    }
}

/// Runs `go test -count 1 <pkg>` with the inherited environment. The
/// `-count` flag defeats the test cache.
pub fn run_go_test(opts: &GoTestOptions, cancel: &CancelToken) -> Outcome {
    let mut pkg = opts.package_path.to_string();
    if opts.recursive {
        pkg.push_str("/...");
    }

    let mut cmd = Command::new("go");
    cmd.arg("test").arg("-count").arg("1").arg(&pkg);
    if let Some(dir) = opts.dir {
        cmd.current_dir(dir);
    }

    match wait_with_deadline(cmd, opts.timeout, cancel, true) {
        WaitResult::Exited { code, output } => {
            debug!(target: "gomute", "go test output:\n{}", output);
            match code {
                Some(0) => Outcome::Survived,
                Some(1) => Outcome::Killed,
                Some(2) => Outcome::CompileError,
                Some(other) => Outcome::Unknown(format!("go test exit code {}", other)),
                None => Outcome::Unknown("go test terminated by signal".to_string()),
            }
        }
        WaitResult::TimedOut => Outcome::Timeout,
        WaitResult::Cancelled => Outcome::Cancelled,
        WaitResult::SpawnFailed(msg) => Outcome::Unknown(msg),
    }
}

/// Custom back-end: run the user command with the mutation environment.
/// Exit 0 means the command killed the mutant, 1 that it survived, 2 that
/// the mutant did not compile.
pub fn exec_custom(argv: &[String], opts: &CustomOptions, cancel: &CancelToken) -> Outcome {
    if argv.is_empty() {
        return Outcome::Unknown("empty exec command".to_string());
    }

    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .env("MUTATE_CHANGED", opts.changed)
        .env("MUTATE_ORIGINAL", opts.original)
        .env("MUTATE_PACKAGE", opts.package_path)
        .env("MUTATE_DEBUG", bool_str(opts.debug))
        .env("MUTATE_VERBOSE", bool_str(opts.verbose))
        .env("MUTATE_TIMEOUT", opts.timeout_secs.to_string())
        .env("TEST_RECURSIVE", bool_str(opts.recursive));

    match wait_with_deadline(cmd, Duration::from_secs(opts.timeout_secs), cancel, false) {
        WaitResult::Exited { code, .. } => match code {
            Some(0) => Outcome::Killed,
            Some(1) => Outcome::Survived,
            Some(2) => Outcome::CompileError,
            Some(other) => Outcome::Unknown(format!("exit code {}", other)),
            None => Outcome::Unknown("command terminated by signal".to_string()),
        },
        WaitResult::TimedOut => Outcome::Timeout,
        WaitResult::Cancelled => Outcome::Cancelled,
        WaitResult::SpawnFailed(msg) => Outcome::Unknown(msg),
    }
}

fn bool_str(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

/// Spawns the command and polls it against the deadline and the cancel
/// token. The child is killed when either fires.
fn wait_with_deadline(
    mut cmd: Command,
    timeout: Duration,
    cancel: &CancelToken,
    capture: bool,
) -> WaitResult {
    if capture {
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return WaitResult::SpawnFailed(format!("run {:?}: {}", cmd.get_program(), e)),
    };

    let readers = if capture { spawn_readers(&mut child) } else { Vec::new() };
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let output = collect_output(readers);
                return WaitResult::Exited { code: status.code(), output };
            }
            Ok(None) => {
                if cancel.is_cancelled() {
                    let _ = child.kill();
                    let _ = child.wait();
                    collect_output(readers);
                    return WaitResult::Cancelled;
                }
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    collect_output(readers);
                    return WaitResult::TimedOut;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                collect_output(readers);
                return WaitResult::SpawnFailed(format!("wait: {}", e));
            }
        }
    }
}

fn spawn_readers(child: &mut Child) -> Vec<std::thread::JoinHandle<String>> {
    let mut handles = Vec::new();
    if let Some(mut stdout) = child.stdout.take() {
        handles.push(std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stdout.read_to_string(&mut buf);
            buf
        }));
    }
    if let Some(mut stderr) = child.stderr.take() {
        handles.push(std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf);
            buf
        }));
    }
    handles
}

fn collect_output(readers: Vec<std::thread::JoinHandle<String>>) -> String {
    let mut out = String::new();
    for handle in readers {
        if let Ok(chunk) = handle.join() {
            out.push_str(&chunk);
        }
    }
    out
}
