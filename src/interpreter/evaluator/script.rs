use std::{
    io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    ast::ScriptCall,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an external script call.
    ///
    /// The path is resolved first (absolute paths as written, relative ones
    /// against the configured working directory or the process's current
    /// directory) and must name an existing file. The arguments are then
    /// evaluated, rendered as text, and handed to the host's script runner.
    ///
    /// # Returns
    /// The script's standard output with trailing whitespace removed.
    ///
    /// # Errors
    /// - `ScriptNotFound` if the file does not exist.
    /// - `ScriptSpawn` if the process cannot be started.
    /// - `ScriptTimeout` if it was killed for running too long.
    /// - `ScriptFailed` for a non-zero exit; the message carries its stderr.
    pub fn eval_script_call(&mut self, call: &ScriptCall) -> EvalResult<Value> {
        let path = self.resolve_script_path(&call.path, call.line)?;
        if !path.is_file() {
            return Err(RuntimeError::ScriptNotFound { path: path.display().to_string(),
                                                      line: call.line, });
        }

        let args = self.eval_all(&call.arguments)?
                       .iter()
                       .map(ToString::to_string)
                       .collect::<Vec<_>>();

        debug!("running script {} with {} argument(s)",
               path.display(),
               args.len());
        let output = self.host.runner.run(&path, &args).map_err(|e| {
                         self.script_error(&path, &e, call.line)
                     })?;

        if !output.success() {
            return Err(RuntimeError::ScriptFailed { path:   path.display().to_string(),
                                                    code:   output.exit_code,
                                                    stderr: output.stderr.trim().to_string(),
                                                    line:   call.line, });
        }
        Ok(Value::Str(output.stdout.trim_end().to_string()))
    }

    /// Resolves a script reference as written in the source.
    ///
    /// Both `/` and `\` separate directories.
    fn resolve_script_path(&self, written: &str, line: usize) -> EvalResult<PathBuf> {
        let relative = written.split(['/', '\\'])
                              .filter(|part| !part.is_empty())
                              .collect::<PathBuf>();
        let drive_qualified = written.get(1..2) == Some(":");
        if relative.is_absolute() || drive_qualified {
            return Ok(PathBuf::from(written));
        }

        let base = match &self.settings.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| {
                        RuntimeError::Io { details: e.to_string(),
                                           line }
                    })?,
        };
        Ok(base.join(relative))
    }

    fn script_error(&self, path: &Path, error: &io::Error, line: usize) -> RuntimeError {
        let path = path.display().to_string();
        match (error.kind(), self.settings.script_timeout) {
            (io::ErrorKind::TimedOut, Some(timeout)) => {
                RuntimeError::ScriptTimeout { path,
                                              seconds: timeout.as_secs(),
                                              line }
            },
            _ => RuntimeError::ScriptSpawn { path,
                                             details: error.to_string(),
                                             line },
        }
    }
}
