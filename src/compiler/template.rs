//! Single file compilation with header preservation.
//!
//! Everything before the first `<mjml>` is copied verbatim above the
//! compiled html, which lets a file start with template-engine directives:
//!
//! ```text
//! {% extends "emails/base.html" %}     ← header, kept as-is
//! <mjml>                               ← sent through the compiler
//!   ...
//! </mjml>
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{CompileError, Compiler, invoke::invoke};
use crate::log;

/// Root element marking where mjml markup starts.
pub const MJML_ROOT: &str = "<mjml>";

/// Prefix of the banner line some compiler versions print first.
pub const FILE_COMMENT: &str = "<!-- FILE:";

impl Compiler {
    /// Compile `path` into its sibling `.html`, returning the written path.
    ///
    /// The source is checked for `<mjml>` before the compiler runs, so a
    /// file without it never touches the output.
    pub fn compile_file(&self, path: &Path) -> Result<PathBuf, CompileError> {
        let source =
            fs::read_to_string(path).map_err(|err| CompileError::Read(path.to_path_buf(), err))?;
        let header =
            split_header(&source).ok_or_else(|| CompileError::MissingRoot(path.to_path_buf()))?;

        let compiled = invoke(&self.config, [path])?;
        let html = assemble(header, strip_file_comment(&compiled));

        let output = output_path(path);
        fs::write(&output, html).map_err(|err| CompileError::Write(output.clone(), err))?;

        log!("compile"; "compiled template written to {}", output.display());
        Ok(output)
    }
}

/// Text before the first `<mjml>`, or `None` without one.
pub fn split_header(source: &str) -> Option<&str> {
    source.find(MJML_ROOT).map(|start| &source[..start])
}

/// Drop a leading `<!-- FILE: ... -->` line.
///
/// Output made only of that line (no newline) becomes empty.
pub fn strip_file_comment(output: &str) -> &str {
    if !output.starts_with(FILE_COMMENT) {
        return output;
    }
    output.split_once('\n').map_or("", |(_, rest)| rest)
}

/// Header, a newline, then the compiled body.
pub fn assemble(header: &str, body: &str) -> String {
    let mut html = String::with_capacity(header.len() + 1 + body.len());
    html.push_str(header);
    html.push('\n');
    html.push_str(body);
    html
}

/// `<dir>/<stem>.html` for a source `<dir>/<stem>.mjml`.
pub fn output_path(source: &Path) -> PathBuf {
    source.with_extension("html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_header() {
        assert_eq!(
            split_header("{% load static %}\n<mjml><mj-body/></mjml>"),
            Some("{% load static %}\n")
        );
        assert_eq!(split_header("<mjml></mjml>"), Some(""));
        assert_eq!(split_header("<mj-body></mj-body>"), None);
    }

    #[test]
    fn test_split_header_uses_first_root() {
        let source = "{# <mj-raw> #}<mjml>a</mjml><mjml>b</mjml>";
        assert_eq!(split_header(source), Some("{# <mj-raw> #}"));
    }

    #[test]
    fn test_split_header_is_case_sensitive() {
        assert_eq!(split_header("<MJML></MJML>"), None);
    }

    #[test]
    fn test_strip_file_comment() {
        assert_eq!(
            strip_file_comment("<!-- FILE: welcome.mjml -->\n<!doctype html>\n"),
            "<!doctype html>\n"
        );
        assert_eq!(strip_file_comment("<!doctype html>"), "<!doctype html>");
        assert_eq!(strip_file_comment("<!-- FILE: welcome.mjml -->"), "");
    }

    #[test]
    fn test_strip_file_comment_only_at_start() {
        let output = "<!doctype html>\n<!-- FILE: x -->\n";
        assert_eq!(strip_file_comment(output), output);
        // Other comments are kept
        assert_eq!(strip_file_comment("<!-- layout -->\n<p/>"), "<!-- layout -->\n<p/>");
    }

    #[test]
    fn test_assemble() {
        assert_eq!(
            assemble("{% extends 'base.html' %}\n", "<html></html>"),
            "{% extends 'base.html' %}\n\n<html></html>"
        );
        assert_eq!(assemble("", "<html></html>"), "\n<html></html>");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("emails/welcome.mjml")),
            PathBuf::from("emails/welcome.html")
        );
        assert_eq!(
            output_path(Path::new("emails/welcome.v2.mjml")),
            PathBuf::from("emails/welcome.v2.html")
        );
    }
}
