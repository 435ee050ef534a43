use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::readme::starts_with_ci;
use crate::LiveryError;

/// The `Texture.` prefix every livery folder carries.
pub const TEXTURE_PREFIX: &str = "Texture.";

/// One candidate livery: a texture folder paired with the `[FLTSIM.x]`
/// config entry pulled from its readme.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveryPair {
    pub source_dir: PathBuf,
    config_block: Vec<String>,
    /// A `Texture.<name>` folder with the same name already exists in the
    /// target. Set by the conflict scan.
    pub file_conflict: bool,
    /// A `texture=<name>` line with the same value already exists in the
    /// target config. Set by the conflict scan.
    pub config_conflict: bool,
}

impl LiveryPair {
    /// Builds a pair, validating that the source directory exists and the
    /// block opens with a `[FLTSIM.x]` header.
    pub fn new<P: AsRef<Path>>(source_dir: P, config_block: Vec<String>) -> Result<Self, LiveryError> {
        let source_dir = source_dir.as_ref().to_path_buf();
        if !source_dir.is_dir() {
            return Err(LiveryError::SourceDirMissing(source_dir));
        }

        match config_block.first() {
            Some(first) if starts_with_ci(first, "[FLTSIM.") => {}
            first => {
                return Err(LiveryError::InvalidBlock(
                    first.cloned().unwrap_or_default(),
                ))
            }
        }

        Ok(Self {
            source_dir,
            config_block,
            file_conflict: false,
            config_conflict: false,
        })
    }

    pub fn config_block(&self) -> &[String] {
        &self.config_block
    }

    /// The `.air` file name (without the extension) this entry points at:
    /// the value of the first `sim=` line.
    pub fn sim_type(&self) -> Option<String> {
        self.value_of("sim=")
    }

    /// The `Texture.` folder name this entry points at: the value of the
    /// first `texture=` line.
    pub fn texture_folder_name(&self) -> Option<String> {
        self.value_of("texture=")
    }

    /// A pair is valid when its `texture=` value is non-empty and matches
    /// the source folder name with the 8-character `Texture.` prefix
    /// stripped, exactly. `Texture.Delta747` + `texture=delta747` is a
    /// repaint author mistake the sim would trip over, so it is invalid here.
    pub fn is_valid(&self) -> bool {
        let texture = match self.texture_folder_name() {
            Some(t) if !t.is_empty() => t,
            _ => return false,
        };

        let folder = self
            .source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        folder.get(TEXTURE_PREFIX.len()..) == Some(texture.as_str())
    }

    pub fn has_conflict(&self) -> bool {
        self.file_conflict || self.config_conflict
    }

    /// Rewrites the block's `[FLTSIM.x]` header to the given sequence
    /// number. Every matching line is rewritten; a well-formed block only
    /// has one.
    pub fn set_number(&mut self, number: u32) {
        let header = format!("[FLTSIM.{number}]");
        for line in &mut self.config_block {
            if starts_with_ci(line, "[FLTSIM.") {
                *line = header.clone();
            }
        }
    }

    fn value_of(&self, key_prefix: &str) -> Option<String> {
        self.config_block
            .iter()
            .find(|l| starts_with_ci(l, key_prefix))
            .and_then(|l| l.split('=').nth(1))
            .map(|v| v.trim().to_string())
    }

    pub fn report(&self) -> LiveryReport {
        LiveryReport {
            source_dir: self.source_dir.clone(),
            sim_type: self.sim_type(),
            texture_folder_name: self.texture_folder_name(),
            valid: self.is_valid(),
            file_conflict: self.file_conflict,
            config_conflict: self.config_conflict,
        }
    }
}

/// Flattened view of one candidate for the CLI's scan report.
#[derive(Debug, Clone, Serialize)]
pub struct LiveryReport {
    pub source_dir: PathBuf,
    pub sim_type: Option<String>,
    pub texture_folder_name: Option<String>,
    pub valid: bool,
    pub file_conflict: bool,
    pub config_conflict: bool,
}
