use std::fs;
use std::io;
use std::path::Path;

/// Extracts the `[FLTSIM.x]` block from a readme's lines.
///
/// Scanning starts at the first line beginning (case-insensitively) with
/// `[FLTSIM.` and stops at the first whitespace-only line or end of input.
/// Returns an empty vec when no header is present.
pub fn fltsim_block<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut block = Vec::new();
    let mut reading = false;

    for line in lines {
        let line = line.as_ref();
        if !reading && !starts_with_ci(line, "[FLTSIM.") {
            continue;
        }
        if reading && line.trim().is_empty() {
            break;
        }
        reading = true;
        block.push(line.to_string());
    }

    block
}

/// Scans `dir` for readme files and concatenates their extracted blocks.
///
/// A readme is any file whose name contains `README` or `READ ME`, ignoring
/// case. At most one is expected per livery folder; when several exist their
/// blocks concatenate and the pair validation downstream catches the mess.
pub fn block_from_dir(dir: &Path) -> io::Result<Vec<String>> {
    let mut block = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_uppercase();
        if !name.contains("README") && !name.contains("READ ME") {
            continue;
        }

        let text = fs::read_to_string(entry.path())?;
        block.extend(fltsim_block(text.lines()));
    }

    Ok(block)
}

pub(crate) fn starts_with_ci(line: &str, prefix: &str) -> bool {
    // line.get() rather than slicing: readme text is arbitrary and the
    // prefix length may land inside a multi-byte character.
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
