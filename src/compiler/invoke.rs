//! External mjml compiler invocation.
//!
//! The executable is looked up on the search path on every call, so
//! installing or switching the compiler while `watch` runs takes effect on
//! the next compile.

use std::{ffi::OsStr, path::PathBuf};

use super::CompileError;
use crate::config::CompilerConfig;
use crate::debug;
use crate::utils::exec::Cmd;

/// Locate `program` on the search path.
///
/// Paths containing a separator are checked directly.
pub fn resolve(program: &str) -> Result<PathBuf, CompileError> {
    which::which(program).map_err(|_| CompileError::CompilerNotFound {
        program: program.to_string(),
    })
}

/// Run the configured compiler with `args` appended to its command line.
///
/// Returns stdout with stderr merged in, decoded as UTF-8.
pub fn invoke<I, S>(config: &CompilerConfig, args: I) -> Result<String, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = resolve(config.program())?;
    debug!("compile"; "running {}", program.display());

    let captured = Cmd::new(&program)
        .args(config.extra_args())
        .args(args)
        .run()?;

    String::from_utf8(captured.output).map_err(|source| CompileError::InvalidOutput {
        program: config.program().to_string(),
        source,
    })
}
