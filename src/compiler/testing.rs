//! Fake compilers and source trees for tests.
//!
//! Compilers are shell scripts run through `sh`, so no file needs the
//! executable bit.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CompilerConfig;

/// Prints the `<!-- FILE: ... -->` banner, then the source verbatim.
pub(crate) const ECHO_SCRIPT: &str = "echo \"<!-- FILE: $1 -->\"\ncat \"$1\"\n";

/// Prints the source verbatim, no banner.
pub(crate) const PLAIN_SCRIPT: &str = "cat \"$1\"\n";

/// Reports an error on stderr and exits non-zero.
pub(crate) const FAILING_SCRIPT: &str = "echo \"Line 1 of $1: Element mj-bogus doesn't exist\" 1>&2\nexit 1\n";

/// Write `body` as a script in `dir` and configure `sh <script>` as compiler.
pub(crate) fn script_compiler(dir: &Path, name: &str, body: &str) -> CompilerConfig {
    let script = dir.join(name);
    fs::write(&script, body).unwrap();
    CompilerConfig {
        command: vec!["sh".into(), script.display().to_string()],
    }
}

/// Like `ECHO_SCRIPT`, also appending each source path to `log`.
pub(crate) fn logging_compiler(dir: &Path, log: &Path) -> CompilerConfig {
    let body = format!("echo \"$1\" >> '{}'\n{ECHO_SCRIPT}", log.display());
    script_compiler(dir, "logging.sh", &body)
}

/// Write a file under `root`, creating parent directories.
pub(crate) fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Expected html from `ECHO_SCRIPT` for a source with the given header.
pub(crate) fn echoed(header: &str, source: &str) -> String {
    format!("{header}\n{source}")
}

/// Source paths recorded by `logging_compiler`, empty if it never ran.
pub(crate) fn logged(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
