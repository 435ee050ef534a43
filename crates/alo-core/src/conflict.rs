use log::debug;
use std::fs;

use crate::livery::{LiveryPair, TEXTURE_PREFIX};
use crate::readme::starts_with_ci;
use crate::{AircraftDir, LiveryError};

pub struct ConflictScanner;

impl ConflictScanner {
    /// Flags each candidate against the target installation's current state.
    ///
    /// `file_conflict`: a `Texture.<name>` subdirectory with the candidate's
    /// texture name already exists (compared ignoring case, like the
    /// Windows filesystems these installs live on).
    ///
    /// `config_conflict`: some `texture=` value in the target config equals
    /// the candidate's texture name exactly.
    ///
    /// The target's subdirectory list and config values are each read once;
    /// candidates are then checked independently.
    pub fn scan(target: &AircraftDir, pairs: &mut [LiveryPair]) -> Result<(), LiveryError> {
        let mut existing_dirs = Vec::new();
        for entry in fs::read_dir(&target.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                existing_dirs.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        let cfg_text = fs::read_to_string(&target.cfg_path)?;
        let existing_textures: Vec<String> = cfg_text
            .lines()
            .filter(|l| starts_with_ci(l, "texture"))
            .filter_map(|l| l.split('=').nth(1))
            .map(|v| v.trim().to_string())
            .collect();

        for pair in pairs {
            let texture = pair.texture_folder_name().unwrap_or_default();
            let wanted_dir = format!("{TEXTURE_PREFIX}{texture}");

            pair.file_conflict = existing_dirs
                .iter()
                .any(|d| d.eq_ignore_ascii_case(&wanted_dir));
            pair.config_conflict = existing_textures.iter().any(|t| *t == texture);

            if pair.has_conflict() {
                debug!(
                    "Conflicts for {texture}: file={} config={}",
                    pair.file_conflict, pair.config_conflict
                );
            }
        }

        Ok(())
    }
}
