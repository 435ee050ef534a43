// SPDX-License-Identifier: MIT

use log::{debug, info};
use std::path::Path;
use walkdir::WalkDir;

use crate::livery::{LiveryPair, TEXTURE_PREFIX};
use crate::{readme, LiveryError};

pub struct DiscoveryManager;

impl DiscoveryManager {
    /// Scans the immediate subdirectories of `base` for livery candidates:
    /// folders named `Texture.<something>` (any case) whose readme yields a
    /// `[FLTSIM.x]` block.
    ///
    /// Result order follows filesystem enumeration order, which is not
    /// stable across platforms.
    pub fn find_liveries(base: &Path) -> Result<Vec<LiveryPair>, LiveryError> {
        info!("Scanning {} for liveries", base.display());

        let mut pairs = Vec::new();
        let walker = WalkDir::new(base).min_depth(1).max_depth(1);

        for entry in walker {
            let entry = entry.map_err(|e| {
                LiveryError::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::Other, "walk error")
                }))
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let folder_name = entry.file_name().to_string_lossy().into_owned();
            if !readme::starts_with_ci(&folder_name, TEXTURE_PREFIX) {
                debug!("Ignoring {folder_name:?}");
                continue;
            }

            let block = readme::block_from_dir(entry.path())?;
            if block.is_empty() {
                debug!("Ignoring {folder_name:?}: no config entry in readme");
                continue;
            }

            info!("Found livery in {folder_name}");
            pairs.push(LiveryPair::new(entry.path(), block)?);
        }

        Ok(pairs)
    }

    /// Distinct `sim=` values across the given pairs. More than one makes
    /// the whole import a fatal precondition failure: the tool targets a
    /// single aircraft installation per run.
    pub fn distinct_sim_types(pairs: &[LiveryPair]) -> Vec<String> {
        let mut types = Vec::new();
        for pair in pairs {
            if let Some(sim) = pair.sim_type() {
                if !types.contains(&sim) {
                    types.push(sim);
                }
            }
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn livery(base: &Path, folder: &str, readme: &str) {
        let dir = base.join(folder);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("README.txt"), readme).unwrap();
    }

    #[test]
    fn test_find_liveries_filters_by_prefix_and_readme() {
        let base = tempdir().unwrap();
        livery(
            base.path(),
            "Texture.Delta747",
            "[FLTSIM.0]\nsim=B747\ntexture=Delta747\n",
        );
        // Wrong prefix, valid readme
        livery(base.path(), "Paint.KLM747", "[FLTSIM.0]\ntexture=KLM747\n");
        // Right prefix, readme without a block
        livery(base.path(), "Texture.Empty", "no config in here\n");
        // Right prefix, no readme at all
        fs::create_dir(base.path().join("Texture.Bare")).unwrap();

        let pairs = DiscoveryManager::find_liveries(base.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            pairs[0].texture_folder_name().as_deref(),
            Some("Delta747")
        );
    }

    #[test]
    fn test_prefix_match_ignores_case() {
        let base = tempdir().unwrap();
        livery(
            base.path(),
            "TEXTURE.Delta747",
            "[FLTSIM.0]\nsim=B747\ntexture=Delta747\n",
        );

        let pairs = DiscoveryManager::find_liveries(base.path()).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_distinct_sim_types() {
        let base = tempdir().unwrap();
        livery(
            base.path(),
            "Texture.A",
            "[FLTSIM.0]\nsim=B747\ntexture=A\n",
        );
        livery(
            base.path(),
            "Texture.B",
            "[FLTSIM.0]\nsim=B747\ntexture=B\n",
        );
        livery(
            base.path(),
            "Texture.C",
            "[FLTSIM.0]\nsim=MD11\ntexture=C\n",
        );

        let pairs = DiscoveryManager::find_liveries(base.path()).unwrap();
        let mut types = DiscoveryManager::distinct_sim_types(&pairs);
        types.sort();
        assert_eq!(types, vec!["B747", "MD11"]);
    }
}
