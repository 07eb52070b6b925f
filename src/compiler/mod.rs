//! Compilation of mjml sources into html.
//!
//! - [`template`]: one file, header kept above the compiled body
//! - [`invoke`]: the external `mjml` executable
//!
//! Files whose name contains `_template_` are partials included by other
//! files. They are never compiled on their own; changing one recompiles
//! every regular source in its directory instead.

mod error;
pub mod invoke;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CompilerConfig;
use crate::log;
use crate::utils::path::parent_dir;

pub use error::CompileError;

/// Suffix of source file names.
pub const SOURCE_SUFFIX: &str = ".mjml";

/// File name marker for partials.
pub const TEMPLATE_MARKER: &str = "_template_";

/// Compiles mjml sources with a configured external compiler.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile `path`, or its whole directory when it is a partial.
    pub fn compile(&self, path: &Path) -> Result<(), CompileError> {
        if path.is_dir() {
            return Err(CompileError::NotAFile(path.to_path_buf()));
        }

        if is_template(path) {
            log!("template"; "template detected, compiling all templates");
            self.compile_all(&parent_dir(path))?;
        } else {
            self.compile_file(path)?;
        }
        Ok(())
    }

    /// Compile every non-partial source under `dir`, recursively.
    ///
    /// Stops at the first failure. Returns the number of files compiled.
    pub fn compile_all(&self, dir: &Path) -> Result<usize, CompileError> {
        if !dir.is_dir() {
            return Err(CompileError::NotADirectory(dir.to_path_buf()));
        }

        let mut compiled = 0;
        for source in collect_sources(dir) {
            if is_template(&source) {
                continue;
            }
            self.compile_file(&source)?;
            compiled += 1;
        }
        Ok(compiled)
    }
}

/// Whether the file name marks a partial.
pub fn is_template(path: impl AsRef<Path>) -> bool {
    file_name(path.as_ref()).contains(TEMPLATE_MARKER)
}

/// Whether the file name matches `*.mjml`.
pub fn is_source(path: impl AsRef<Path>) -> bool {
    file_name(path.as_ref()).ends_with(SOURCE_SUFFIX)
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}

/// Whether the file name matches `*.mjml`, ignoring ASCII case.
pub fn is_source_ignore_case(path: impl AsRef<Path>) -> bool {
    let name = file_name(path.as_ref());
    name.len() >= SOURCE_SUFFIX.len()
        && name.as_bytes()[name.len() - SOURCE_SUFFIX.len()..]
            .eq_ignore_ascii_case(SOURCE_SUFFIX.as_bytes())
}

/// Collect `*.mjml` files under `dir` recursively, siblings in name order.
///
/// Symlinks to files are included; symlinked directories are not entered.
pub fn collect_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| is_source(p) && fs::metadata(p).is_ok_and(|m| m.is_file()))
        .collect()
}
