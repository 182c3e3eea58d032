use std::fs;
use std::path::{Path, PathBuf};

use crate::model::document::{Document, RawDocument};
use crate::model::task::Task;
use crate::parse::{reconcile_document, tasks_from_document};

/// Error type for database load/save operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize task database: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The task database: the persisted document, the in-memory task list
/// rebuilt from it, and the file both live in.
///
/// The document and the task list are reconciled only at load and save; in
/// between they drift apart on purpose. Sessions mutate `tasks` and leave the
/// document alone until [`Database::save`].
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    doc: Document,
    pub tasks: Vec<Task>,
    migrated: bool,
}

impl Database {
    /// Open the database at `path`.
    ///
    /// An existing file is backed up to its `.bak` sibling *before* parsing,
    /// so a session crash never costs the only good copy. A missing file is
    /// created empty (no backup on a first run) and opens as a fresh
    /// document. A file that exists but does not parse is an error — user
    /// data is never silently reset.
    pub fn open(path: impl Into<PathBuf>) -> Result<Database, StoreError> {
        let path = path.into();
        if path.exists() {
            backup_file(&path)?;
        } else {
            fs::write(&path, "").map_err(|e| io_err(&path, e))?;
        }
        let text = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let raw: RawDocument = toml::from_str(&text).map_err(|e| StoreError::Parse {
            path: path.clone(),
            source: e,
        })?;
        let (doc, migrated) = raw.into_document();
        let tasks = tasks_from_document(&doc);
        Ok(Database {
            path,
            doc,
            tasks,
            migrated,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// True when open had to back-fill missing schema keys. Sessions treat
    /// this as an unsaved change so the back-fill reaches disk.
    pub fn migrated(&self) -> bool {
        self.migrated
    }

    /// Copy the database file to its `.bak` sibling
    pub fn backup(&self) -> Result<PathBuf, StoreError> {
        backup_file(&self.path)
    }

    /// Reconcile the task list into the document and rewrite the whole file.
    /// Not an atomic rename: a crash mid-write can corrupt the file, and the
    /// pre-load backup is the safety net for that.
    pub fn save(&mut self) -> Result<(), StoreError> {
        reconcile_document(&mut self.doc, &self.tasks);
        let text = toml::to_string(&self.doc)?;
        fs::write(&self.path, text).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}

/// The `.bak` sibling for a database file
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}

/// Copy `path` to its `.bak` sibling. Fails when the source does not exist
/// yet — there is nothing to back up on a first run, and callers skip it.
pub fn backup_file(path: &Path) -> Result<PathBuf, StoreError> {
    let bak = backup_path(path);
    fs::copy(path, &bak).map_err(|e| io_err(path, e))?;
    Ok(bak)
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
