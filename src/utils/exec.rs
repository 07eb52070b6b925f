//! External command execution utilities.
//!
//! Runs a command with stderr merged into the stdout pipe, the way a
//! terminal would show it, and captures the combined stream.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let out = Cmd::new("mjml").args(["welcome.mjml"]).run()?;
//! ```

use std::{
    ffi::{OsStr, OsString},
    io::{self, Read},
    path::Path,
    process::{Command, ExitStatus, Stdio},
};

use thiserror::Error;

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to execute `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{}", format_failure(.program, .status, .output))]
    Failed {
        program: String,
        status: ExitStatus,
        /// Captured stdout and stderr, interleaved.
        output: String,
    },
}

/// Result of a finished command.
#[derive(Debug)]
pub struct Captured {
    pub status: ExitStatus,
    /// Stdout and stderr as one stream.
    pub output: Vec<u8>,
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Execute the command and wait for it.
    ///
    /// A non-zero exit status is returned as `ExecError::Failed`.
    pub fn run(self) -> Result<Captured, ExecError> {
        let name = self.program_name();
        let captured = self.run_merged().map_err(|source| ExecError::Spawn {
            program: name.clone(),
            source,
        })?;

        if !captured.status.success() {
            return Err(ExecError::Failed {
                program: name,
                status: captured.status,
                output: String::from_utf8_lossy(&captured.output).into_owned(),
            });
        }

        Ok(captured)
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .to_string()
    }

    /// Both streams write into one pipe, preserving their interleaving.
    fn run_merged(self) -> io::Result<Captured> {
        let (mut reader, writer) = io::pipe()?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        let mut child = cmd.spawn()?;
        // The parent's write ends live in `cmd`; close them so EOF arrives.
        drop(cmd);

        let mut output = Vec::new();
        reader.read_to_end(&mut output)?;
        let status = child.wait()?;

        Ok(Captured { status, output })
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Format error message for failed command.
fn format_failure(name: &str, status: &ExitStatus, output: &str) -> String {
    let mut msg = format!("Command `{name}` failed with {status}");
    let output = output.trim();
    if !output.is_empty() {
        msg.push('\n');
        msg.push_str(output);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
