use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

use super::ChangeHandler;
use crate::compiler::{CompileError, is_source_ignore_case};
use crate::debug;
use crate::logger::{status_error, status_success};

/// Content writes count; metadata-only changes and renames do not.
pub(super) fn is_modification(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any | ModifyKind::Other)
    )
}

/// Paths in `event` that are mjml sources, as opposed to directories
/// whose name happens to end in `.mjml`. The suffix match ignores case.
pub(super) fn changed_sources(event: &notify::Event) -> impl Iterator<Item = &PathBuf> {
    event
        .paths
        .iter()
        .filter(|path| is_source_ignore_case(path) && !path.is_dir())
}

/// Run `handler` for every modified source in `event`.
///
/// Per-file errors are shown and swallowed so the watch keeps going;
/// fatal ones are returned.
pub(super) fn dispatch<H: ChangeHandler>(
    event: &notify::Event,
    handler: &H,
) -> Result<(), CompileError> {
    debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

    if !is_modification(&event.kind) {
        return Ok(());
    }

    for path in changed_sources(event) {
        match handler.on_source_changed(path) {
            Ok(()) => status_success(&format!("compiled: {}", display_name(path))),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => status_error(&format!("failed: {}", display_name(path)), &describe(&err)),
        }
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Error message followed by its causes.
fn describe(err: &CompileError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
