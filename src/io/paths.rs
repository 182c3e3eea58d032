use std::fs;
use std::path::{Path, PathBuf};

/// Database filename inside the data directory
pub const DB_FILE: &str = "tasks.toml";

/// Directory and file locations the program works with
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub downloads_dir: PathBuf,
}

/// Error type for startup path discovery
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("no data directory known for this platform")]
    NoDataDir,
    #[error("no home directory known for this platform")]
    NoHomeDir,
    #[error("could not create {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("downloads folder not found at {0}")]
    NoDownloads(PathBuf),
}

/// Resolve the data directory (honoring an override), the database file
/// inside it, and the user's downloads folder. The data directory is created
/// on first run; the downloads folder must already exist.
pub fn discover(data_dir_override: Option<&Path>) -> Result<AppPaths, PathError> {
    let data_dir = match data_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => dirs::data_dir().ok_or(PathError::NoDataDir)?.join("thicket"),
    };
    if !data_dir.is_dir() {
        fs::create_dir_all(&data_dir).map_err(|e| PathError::CreateFailed {
            path: data_dir.clone(),
            source: e,
        })?;
    }
    let downloads_dir = downloads_folder()?;
    let db_path = data_dir.join(DB_FILE);
    Ok(AppPaths {
        data_dir,
        db_path,
        downloads_dir,
    })
}

/// The platform downloads folder, falling back to `$HOME/Downloads`.
/// Nothing is ever created here implicitly — exports land in this directory,
/// so a missing folder is an error, not an invitation.
fn downloads_folder() -> Result<PathBuf, PathError> {
    let candidate = match dirs::download_dir() {
        Some(dir) => dir,
        None => dirs::home_dir()
            .ok_or(PathError::NoHomeDir)?
            .join("Downloads"),
    };
    if candidate.is_dir() {
        Ok(candidate)
    } else {
        Err(PathError::NoDownloads(candidate))
    }
}
