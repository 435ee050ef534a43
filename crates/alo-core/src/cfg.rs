use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfgError {
    #[error("No [FLTSIM.x] entries found in {0}")]
    NoEntries(PathBuf),
    #[error("Malformed [FLTSIM.x] header: {0:?}")]
    BadHeader(String),
    #[error("The header {0:?} already exists")]
    DuplicateHeader(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An `aircraft.cfg` held in memory as lines.
///
/// The format is plain text with CRLF separators: `[FLTSIM.N]` headers open
/// blocks of `key=value` lines and a blank line closes each block. Loading
/// tolerates bare LF; saving always writes CRLF.
pub struct CfgFile {
    pub path: PathBuf,
    lines: Vec<String>,
}

impl CfgFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CfgError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path)?;
        let lines = text
            .split('\n')
            .map(|l| l.trim_end_matches('\r').to_string())
            .collect();
        Ok(Self { path, lines })
    }

    pub fn save(&self) -> Result<(), CfgError> {
        fs::write(&self.path, self.lines.join("\r\n"))?;
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The next free FLTSIM sequence number: numeric max of every
    /// `[FLTSIM.N]` suffix in the file, plus one.
    ///
    /// Hard errors: a file with no `[FLTSIM.` header at all, or any header
    /// whose suffix does not parse as an integer.
    pub fn next_number(&self) -> Result<u32, CfgError> {
        let header_re = Regex::new(r"(?i)^\[FLTSIM\.(.*)$").unwrap();

        let mut max: Option<u32> = None;
        for line in &self.lines {
            let Some(caps) = header_re.captures(line) else {
                continue;
            };
            let suffix = caps[1].replace(']', "");
            let number: u32 = suffix
                .trim()
                .parse()
                .map_err(|_| CfgError::BadHeader(line.clone()))?;
            max = Some(max.map_or(number, |m| m.max(number)));
        }

        match max {
            Some(m) => Ok(m + 1),
            None => Err(CfgError::NoEntries(self.path.clone())),
        }
    }

    /// Whether `[FLTSIM.{number}]` appears anywhere in the file text,
    /// ignoring case. Substring match, as a guard against hand-edited files
    /// where the header is not alone on its line.
    pub fn contains_header(&self, number: u32) -> bool {
        let header = format!("[FLTSIM.{number}]").to_uppercase();
        self.lines.iter().any(|l| l.to_uppercase().contains(&header))
    }

    /// Inserts a livery block as entry `number`.
    ///
    /// The block lands immediately after the blank line that closes the
    /// `[FLTSIM.{number - 1}]` block, followed by its own blank separator.
    /// When no predecessor header exists (first insertion, or a gap left by
    /// a skipped candidate), or the predecessor's block never ends in a
    /// blank line, the block is appended at the end of the file instead.
    pub fn insert_block(&mut self, block: &[String], number: u32) -> Result<(), CfgError> {
        if self.contains_header(number) {
            return Err(CfgError::DuplicateHeader(format!("[FLTSIM.{number}]")));
        }

        let insert_at = self.insertion_index(number);
        let new_lines = block.iter().cloned().chain(std::iter::once(String::new()));
        self.lines.splice(insert_at..insert_at, new_lines);
        Ok(())
    }

    fn insertion_index(&self, number: u32) -> usize {
        let Some(prev) = number.checked_sub(1) else {
            return self.lines.len();
        };
        let prev_header = format!("[FLTSIM.{prev}]");

        let mut after_prev = false;
        for (i, line) in self.lines.iter().enumerate() {
            if !after_prev && line.eq_ignore_ascii_case(&prev_header) {
                after_prev = true;
            }
            if after_prev && line.trim().is_empty() {
                return i + 1;
            }
        }
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cfg_file(text: &str) -> (tempfile::TempDir, CfgFile) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aircraft.cfg");
        fs::write(&path, text).unwrap();
        (dir, CfgFile::load(&path).unwrap())
    }

    fn block(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_next_number_is_numeric_max_plus_one() {
        let (_d, cfg) = cfg_file("[FLTSIM.1]\r\ntexture=A\r\n\r\n[FLTSIM.3]\r\ntexture=B\r\n");
        assert_eq!(cfg.next_number().unwrap(), 4);
    }

    #[test]
    fn test_next_number_not_fooled_by_lexicographic_order() {
        // "9" > "10" as strings; must still pick 10 as the max.
        let (_d, cfg) = cfg_file("[FLTSIM.9]\r\n\r\n[FLTSIM.10]\r\n\r\n");
        assert_eq!(cfg.next_number().unwrap(), 11);
    }

    #[test]
    fn test_next_number_requires_entries() {
        let (_d, cfg) = cfg_file("[GENERAL]\r\natc_type=BOEING\r\n");
        assert!(matches!(cfg.next_number(), Err(CfgError::NoEntries(_))));
    }

    #[test]
    fn test_next_number_rejects_malformed_suffix() {
        let (_d, cfg) = cfg_file("[FLTSIM.0]\r\n\r\n[FLTSIM.old]\r\n");
        assert!(matches!(cfg.next_number(), Err(CfgError::BadHeader(_))));
    }

    #[test]
    fn test_insert_after_predecessor_block() {
        let (_d, mut cfg) = cfg_file(
            "[FLTSIM.0]\r\ntexture=Base\r\n\r\n[GENERAL]\r\natc_type=BOEING\r\n",
        );
        cfg.insert_block(&block(&["[FLTSIM.1]", "texture=New"]), 1)
            .unwrap();

        assert_eq!(
            cfg.lines(),
            &[
                "[FLTSIM.0]",
                "texture=Base",
                "",
                "[FLTSIM.1]",
                "texture=New",
                "",
                "[GENERAL]",
                "atc_type=BOEING",
                ""
            ]
        );
    }

    #[test]
    fn test_insert_appends_when_predecessor_missing() {
        let (_d, mut cfg) = cfg_file("[FLTSIM.0]\r\ntexture=Base\r\n\r\n");
        // No [FLTSIM.4] in the file: entry 5 goes to the end.
        cfg.insert_block(&block(&["[FLTSIM.5]", "texture=Gap"]), 5)
            .unwrap();

        let lines = cfg.lines();
        assert_eq!(&lines[lines.len() - 3..], &["[FLTSIM.5]", "texture=Gap", ""]);
    }

    #[test]
    fn test_insert_rejects_duplicate_header() {
        let (_d, mut cfg) = cfg_file("[FLTSIM.0]\r\ntexture=Base\r\n\r\n[fltsim.1]\r\n\r\n");
        let result = cfg.insert_block(&block(&["[FLTSIM.1]", "texture=New"]), 1);
        assert!(matches!(result, Err(CfgError::DuplicateHeader(_))));
    }

    #[test]
    fn test_save_writes_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aircraft.cfg");
        // LF on disk is tolerated on load
        fs::write(&path, "[FLTSIM.0]\ntexture=Base\n").unwrap();

        let mut cfg = CfgFile::load(&path).unwrap();
        cfg.insert_block(&block(&["[FLTSIM.1]", "texture=New"]), 1)
            .unwrap();
        cfg.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[FLTSIM.0]\r\ntexture=Base\r\n"));
        assert!(text.contains("[FLTSIM.1]\r\ntexture=New\r\n"));
    }
}
