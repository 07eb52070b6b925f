//! Compilation error types.

use std::{io, path::PathBuf, string::FromUtf8Error};
use thiserror::Error;

use crate::utils::exec::ExecError;

/// Errors raised while compiling mjml sources.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{program} command not found. Run `npm install -g mjml`")]
    CompilerNotFound { program: String },

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("`{program}` produced output that is not valid UTF-8")]
    InvalidOutput {
        program: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("`<mjml>` tag not found in `{}`", .0.display())]
    MissingRoot(PathBuf),

    #[error("IO error when reading `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("IO error when writing `{}`", .0.display())]
    Write(PathBuf, #[source] io::Error),

    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("`{}` is a directory, expected an mjml file", .0.display())]
    NotAFile(PathBuf),
}

impl CompileError {
    /// Errors that no later compilation can recover from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CompilerNotFound { .. })
    }
}
