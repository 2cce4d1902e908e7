//! Call-site capture.
//!
//! Depth zero is answered from `#[track_caller]` and costs nothing. Deeper
//! frames are found by resolving a backtrace, locating the depth-zero frame in
//! it, and stepping outward; only frames with source information are counted.

use std::panic::Location;
use std::path::PathBuf;

use backtrace::Backtrace;

/// Path components that mark the root of a crate's sources.
const SOURCE_ROOTS: [&str; 4] = ["src", "tests", "benches", "examples"];

/// Format the call site `skip` frames above `origin` as `file:line`.
///
/// Returns `None` when the frame cannot be resolved (no debug info, or the
/// stack is shallower than requested).
pub(crate) fn capture(skip: usize, origin: &Location<'_>) -> Option<String> {
    if skip == 0 {
        return Some(format_location(origin.file(), origin.line()));
    }

    let frames = resolved_frames();
    let start = frames
        .iter()
        .position(|(file, line)| *line == origin.line() && file.ends_with(origin.file()))?;
    let (file, line) = start.checked_add(skip).and_then(|i| frames.get(i))?;
    Some(format_location(&file.to_string_lossy(), *line))
}

fn resolved_frames() -> Vec<(PathBuf, u32)> {
    let backtrace = Backtrace::new();
    backtrace
        .frames()
        .iter()
        .flat_map(backtrace::BacktraceFrame::symbols)
        .filter_map(|symbol| Some((symbol.filename()?.to_path_buf(), symbol.lineno()?)))
        .collect()
}

fn format_location(file: &str, line: u32) -> String {
    format!("{}:{line}", trim_source_path(file))
}

/// Trim a source path to start at the crate directory.
///
/// `/home/u/work/errctx/src/context/mod.rs` becomes `errctx/src/context/mod.rs`.
/// Paths without a recognised source root are returned unchanged.
pub(crate) fn trim_source_path(file: &str) -> &str {
    let mut starts = vec![0];
    starts.extend(
        file.char_indices()
            .filter(|&(_, c)| c == '/' || c == '\\')
            .map(|(i, _)| i + 1),
    );

    // Skip the final component: it is the file name.
    for i in (1..starts.len().saturating_sub(1)).rev() {
        let component = &file[starts[i]..starts[i + 1] - 1];
        if SOURCE_ROOTS.contains(&component) {
            return &file[starts[i - 1]..];
        }
    }
    file
}
