pub mod cfg;
pub mod conflict;
pub mod discovery;
pub mod install;
pub mod livery;
pub mod readme;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cfg::CfgError;

#[derive(Error, Debug)]
pub enum LiveryError {
    #[error("Source directory not found: {0}")]
    SourceDirMissing(PathBuf),
    #[error("Target aircraft directory not found: {0}")]
    TargetNotFound(PathBuf),
    #[error("No aircraft.cfg found in {0}")]
    MissingCfg(PathBuf),
    #[error("No {0}.air file found in {1}")]
    MissingAirFile(String, PathBuf),
    #[error("Config entry does not start with a [FLTSIM.x] header: {0:?}")]
    InvalidBlock(String),
    #[error("Multiple aircraft sim types in one import: {0:?}")]
    MultipleSimTypes(Vec<String>),
    #[error("Config error: {0}")]
    Cfg(#[from] CfgError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated handle on one aircraft installation directory.
pub struct AircraftDir {
    pub root: PathBuf,
    pub cfg_path: PathBuf,
}

impl AircraftDir {
    /// Tries to create a handle from a given path.
    /// Validates that the directory holds an `aircraft.cfg` and the
    /// `<sim_type>.air` file the liveries will be pointing at.
    pub fn new<P: AsRef<Path>>(path: P, sim_type: &str) -> Result<Self, LiveryError> {
        let root = path.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(LiveryError::TargetNotFound(root));
        }

        let air_name = format!("{sim_type}.air");
        if find_file_ci(&root, &air_name)?.is_none() {
            return Err(LiveryError::MissingAirFile(sim_type.to_string(), root));
        }

        let cfg_path = match find_file_ci(&root, "aircraft.cfg")? {
            Some(p) => p,
            None => return Err(LiveryError::MissingCfg(root)),
        };

        Ok(Self { root, cfg_path })
    }
}

/// Looks up a file by name in `dir`, ignoring ASCII case. Simulator installs
/// routinely mix `Aircraft.CFG`, `aircraft.cfg` and friends.
pub fn find_file_ci(dir: &Path, name: &str) -> std::io::Result<Option<PathBuf>> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().eq_ignore_ascii_case(name) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_aircraft_dir_validation() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        // Empty dir: no .air file yet
        assert!(matches!(
            AircraftDir::new(root, "B737"),
            Err(LiveryError::MissingAirFile(_, _))
        ));

        // .air present (odd casing), cfg still missing
        fs::write(root.join("b737.AIR"), b"").unwrap();
        assert!(matches!(
            AircraftDir::new(root, "B737"),
            Err(LiveryError::MissingCfg(_))
        ));

        fs::write(root.join("Aircraft.CFG"), b"[FLTSIM.0]\r\n").unwrap();
        let target = AircraftDir::new(root, "B737").unwrap();
        assert_eq!(target.cfg_path, root.join("Aircraft.CFG"));
    }

    #[test]
    fn test_missing_target() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(matches!(
            AircraftDir::new(&gone, "B737"),
            Err(LiveryError::TargetNotFound(_))
        ));
    }
}
