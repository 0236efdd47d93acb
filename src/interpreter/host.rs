use std::{
    cell::RefCell,
    io::{self, BufRead, BufReader, Read, Write},
    path::Path,
    process::{Child, Command, Stdio},
    rc::Rc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::debug;

use crate::config::Settings;

/// What an external script produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptOutput {
    /// Everything written to standard output.
    pub stdout:    String,
    /// Everything written to standard error.
    pub stderr:    String,
    /// The exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl ScriptOutput {
    /// Returns `true` if the script exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs external scripts on behalf of the interpreter.
///
/// The evaluator never spawns processes itself; it hands the resolved path
/// and the stringified arguments to a runner. Tests substitute a runner that
/// records calls and returns canned output.
pub trait ScriptRunner {
    /// Runs the script at `path` with `args` and waits for it to finish.
    ///
    /// # Errors
    /// Returns an `io::Error` if the process cannot be started, or one of kind
    /// `TimedOut` if it was killed for running too long.
    fn run(&self, path: &Path, args: &[String]) -> io::Result<ScriptOutput>;
}

/// Runs scripts as `<python> <path> <args...>`.
#[derive(Debug, Clone)]
pub struct PythonRunner {
    program: String,
    timeout: Option<Duration>,
}

impl PythonRunner {
    /// Creates a runner that starts `program` and waits at most `timeout`.
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self { program: program.into(),
               timeout }
    }

    /// Creates a runner from the interpreter and timeout in `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.python.clone(), settings.script_timeout)
    }
}

impl ScriptRunner for PythonRunner {
    fn run(&self, path: &Path, args: &[String]) -> io::Result<ScriptOutput> {
        debug!("spawning {} {} with {} argument(s)",
               self.program,
               path.display(),
               args.len());
        let mut command = Command::new(&self.program);
        command.arg(path).args(args);

        let Some(timeout) = self.timeout else {
            let output = command.output()?;
            return Ok(ScriptOutput { stdout:    String::from_utf8_lossy(&output.stdout).into_owned(),
                                     stderr:    String::from_utf8_lossy(&output.stderr).into_owned(),
                                     exit_code: output.status.code(), });
        };

        let mut child = command.stdin(Stdio::null())
                               .stdout(Stdio::piped())
                               .stderr(Stdio::piped())
                               .spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = wait_with_deadline(&mut child, timeout)?;

        Ok(ScriptOutput { stdout:    collect(stdout),
                          stderr:    collect(stderr),
                          exit_code: status.code(), })
    }
}

/// Reads a child's pipe to the end on a separate thread so the child never
/// blocks on a full pipe while we wait for it.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = pipe.read_to_end(&mut buffer);
                buffer
            })
        })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle.and_then(|handle| handle.join().ok())
          .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
          .unwrap_or_default()
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<std::process::ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Err(io::Error::new(io::ErrorKind::TimedOut,
                                      format!("killed after {} second(s)", timeout.as_secs())));
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// The outside world as seen by a running program: where `print` writes,
/// where `input` reads, and who runs external scripts.
pub struct Host {
    pub(crate) output: Box<dyn Write>,
    pub(crate) input:  Box<dyn BufRead>,
    pub(crate) runner: Box<dyn ScriptRunner>,
}

impl Host {
    /// Creates a host from explicit parts.
    #[must_use]
    pub fn new(output: Box<dyn Write>, input: Box<dyn BufRead>, runner: Box<dyn ScriptRunner>) -> Self {
        Self { output,
               input,
               runner }
    }

    /// Creates a host bound to the process's standard streams, running
    /// scripts with a [`PythonRunner`] configured from `settings`.
    #[must_use]
    pub fn stdio(settings: &Settings) -> Self {
        Self::new(Box::new(io::stdout()),
                  Box::new(BufReader::new(io::stdin())),
                  Box::new(PythonRunner::from_settings(settings)))
    }
}

/// An in-memory output sink whose contents stay readable after it has been
/// handed to a [`Host`].
///
/// # Example
/// ```
/// use std::io::Write;
///
/// use quill::interpreter::host::CapturedOutput;
///
/// let captured = CapturedOutput::default();
/// let mut sink = captured.clone();
/// write!(sink, "hello").unwrap();
///
/// assert_eq!(captured.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl CapturedOutput {
    /// Returns everything written so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
