//! On-disk store for [`ViewPreferences`].
//!
//! Preferences live in `prefs.json` inside the configuration directory. A
//! missing file is created with defaults; an unreadable one is moved aside to
//! `prefs.json.bak` and replaced. Every change is written back immediately.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use sauna_core::ViewPreferences;
use thiserror::Error;

const FILE_NAME: &str = "prefs.json";

#[derive(Debug, Error)]
pub enum Error {
  #[error("preference file {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Handle on the preference file. Holds no preferences itself; the caller
/// owns the live value and hands it back to [`PrefsStore::save`].
#[derive(Debug, Clone)]
pub struct PrefsStore {
  path: PathBuf,
}

impl PrefsStore {
  /// Open (creating if needed) the store in `dir` and load the stored
  /// preferences.
  pub fn open(dir: &Path) -> Result<(Self, ViewPreferences)> {
    fs::create_dir_all(dir).map_err(|source| Error::Io {
      path: dir.to_path_buf(),
      source,
    })?;
    let store = Self { path: dir.join(FILE_NAME) };
    let prefs = store.load()?;
    Ok((store, prefs))
  }

  pub fn path(&self) -> &Path { &self.path }

  fn load(&self) -> Result<ViewPreferences> {
    let raw = match fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        tracing::info!(path = %self.path.display(), "no stored preferences, creating defaults");
        let prefs = ViewPreferences::default();
        self.save(&prefs)?;
        return Ok(prefs);
      }
      Err(source) => {
        return Err(Error::Io {
          path: self.path.clone(),
          source,
        });
      }
    };

    match serde_json::from_str(&raw) {
      Ok(prefs) => Ok(prefs),
      Err(e) => {
        tracing::warn!(error = %e, "stored preferences unreadable, backing up and resetting");
        let backup = self.path.with_extension("json.bak");
        if let Err(e) = fs::rename(&self.path, &backup) {
          tracing::warn!(error = %e, "failed to back up preference file");
        }
        let prefs = ViewPreferences::default();
        self.save(&prefs)?;
        Ok(prefs)
      }
    }
  }

  /// Write `prefs` to disk. The search text is never persisted.
  pub fn save(&self, prefs: &ViewPreferences) -> Result<()> {
    let json = serde_json::to_string_pretty(prefs)?;
    fs::write(&self.path, json).map_err(|source| Error::Io {
      path: self.path.clone(),
      source,
    })
  }
}
