use std::{path::PathBuf, time::Duration};

/// Default interpreter used to run external scripts.
pub const DEFAULT_PYTHON: &str = "python3";
/// Default limit on nested user function calls.
///
/// Each call nests the evaluator several frames deep, so this must fit the
/// 2 MiB stack of an ordinary spawned thread in a debug build. Raise it only
/// together with the stack of the thread running the program.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Settings for one run of a program.
///
/// Each run owns its settings; nothing here is process-wide.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use quill::config::Settings;
///
/// let settings = Settings::default().with_script_timeout(Some(Duration::from_secs(5)))
///                                   .with_max_call_depth(64);
///
/// assert_eq!(settings.python, "python3");
/// assert_eq!(settings.max_call_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Program used to run external scripts.
    pub python:         String,
    /// How long an external script may run before it is killed. `None` waits
    /// indefinitely.
    pub script_timeout: Option<Duration>,
    /// Directory relative script paths are resolved against. `None` uses the
    /// current working directory of the process.
    pub working_dir:    Option<PathBuf>,
    /// Maximum number of nested user function calls.
    pub max_call_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { python:         DEFAULT_PYTHON.to_string(),
               script_timeout: None,
               working_dir:    None,
               max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

impl Settings {
    /// Sets the program used to run external scripts.
    #[must_use]
    pub fn with_python(mut self, python: impl Into<String>) -> Self {
        self.python = python.into();
        self
    }

    /// Sets the external script timeout.
    #[must_use]
    pub const fn with_script_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Sets the directory relative script paths are resolved against.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the maximum number of nested user function calls.
    #[must_use]
    pub const fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
