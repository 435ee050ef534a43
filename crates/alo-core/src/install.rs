use chrono::Local;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

use crate::cfg::CfgFile;
use crate::discovery::DiscoveryManager;
use crate::livery::{LiveryPair, TEXTURE_PREFIX};
use crate::{AircraftDir, LiveryError};

/// Where install progress lines go. The CLI prints them; tests collect
/// them.
pub trait Operator {
    fn say(&mut self, msg: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstallOutcome {
    /// Both conflicts set: nothing touched, no sequence number consumed.
    SkippedExisting,
    /// Config entry inserted as `[FLTSIM.{number}]`. `copied` is false when
    /// the texture folder already existed and only the config was written.
    Installed { number: u32, copied: bool },
    /// Config already referenced the texture: files were copied but the
    /// config was left alone. Still consumes a sequence number, leaving a
    /// numbering gap (legacy behavior, kept so re-runs produce the same
    /// FLTSIM numbers the original tool did).
    CopiedOnly { number: u32 },
}

pub struct InstallReport {
    pub backup_path: PathBuf,
    pub items: Vec<(String, InstallOutcome)>,
}

pub struct Installer<'a> {
    target: &'a AircraftDir,
}

impl<'a> Installer<'a> {
    pub fn new(target: &'a AircraftDir) -> Self {
        Self { target }
    }

    /// Installs every candidate in order: copy the texture folder, then
    /// insert its renumbered config block, skipping either half when the
    /// conflict scan says it is already present.
    ///
    /// A timestamped copy of `aircraft.cfg` is taken before any mutation.
    /// Any error mid-loop restores the config from that copy wholesale and
    /// aborts; texture folders already copied stay on disk.
    pub fn run(
        &self,
        pairs: Vec<LiveryPair>,
        op: &mut dyn Operator,
    ) -> Result<InstallReport, LiveryError> {
        let sim_types = DiscoveryManager::distinct_sim_types(&pairs);
        if sim_types.len() > 1 {
            return Err(LiveryError::MultipleSimTypes(sim_types));
        }

        let backup_path = self.target.root.join(format!(
            "aircraft.backup-{}.cfg",
            Local::now().format("%y%m%d%H%M%S")
        ));
        fs::copy(&self.target.cfg_path, &backup_path)?;
        info!("Config backed up to {}", backup_path.display());

        match self.install_all(pairs, op) {
            Ok(items) => Ok(InstallReport { backup_path, items }),
            Err(e) => {
                if let Err(restore_err) = fs::copy(&backup_path, &self.target.cfg_path) {
                    error!(
                        "Failed to restore {} from backup: {restore_err}",
                        self.target.cfg_path.display()
                    );
                }
                Err(e)
            }
        }
    }

    fn install_all(
        &self,
        pairs: Vec<LiveryPair>,
        op: &mut dyn Operator,
    ) -> Result<Vec<(String, InstallOutcome)>, LiveryError> {
        let mut sequence = CfgFile::load(&self.target.cfg_path)?.next_number()?;
        let mut items = Vec::new();

        for mut pair in pairs {
            let name = pair.texture_folder_name().unwrap_or_default();

            if pair.file_conflict && pair.config_conflict {
                op.say(&format!("Skipping {name}. Livery already exists."));
                items.push((name, InstallOutcome::SkippedExisting));
                continue;
            }

            op.say(&format!("Installing {name}."));

            let mut copied = false;
            if pair.file_conflict {
                op.say("Skipping file transfer. Already exists.");
            } else {
                op.say(&format!(
                    "Copying {} to {}",
                    pair.source_dir.display(),
                    self.target.root.display()
                ));
                self.copy_textures(&pair, &name)?;
                copied = true;
                op.say(&format!("{name} copied."));
            }

            if pair.config_conflict {
                op.say("Skipping config modification. Already configured.");
                items.push((name, InstallOutcome::CopiedOnly { number: sequence }));
            } else {
                pair.set_number(sequence);
                let mut cfg = CfgFile::load(&self.target.cfg_path)?;
                cfg.insert_block(pair.config_block(), sequence)?;
                cfg.save()?;
                op.say(&format!("{name} added as [FLTSIM.{sequence}]"));
                items.push((name, InstallOutcome::Installed { number: sequence, copied }));
            }

            // Consumed even when the insert was skipped for a config
            // conflict; only fully-skipped candidates keep their number.
            sequence += 1;
        }

        Ok(items)
    }

    /// Copies the source folder's top-level files into
    /// `<target>/Texture.<name>`. Subdirectories are ignored, as repaint
    /// packages keep everything flat.
    fn copy_textures(&self, pair: &LiveryPair, name: &str) -> Result<(), LiveryError> {
        let dest = self.target.root.join(format!("{TEXTURE_PREFIX}{name}"));
        fs::create_dir_all(&dest)?;

        for entry in fs::read_dir(&pair.source_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::copy(entry.path(), dest.join(entry.file_name()))?;
            }
        }
        Ok(())
    }
}
