use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::io::gpg;
use crate::session::prompt::{Prompt, PromptError};

/// Fixed name of the encrypted copy dropped into the downloads folder
pub const EXPORT_FILE_NAME: &str = "thicket-export.gpg";

/// Error type for the export flow
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Gpg(#[from] gpg::GpgError),
    #[error("could not copy export to {path}: {source}")]
    Copy {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read passphrase: {0}")]
    Prompt(PromptError),
}

/// The `.gpg` sibling the encryption step writes next to the database file
pub fn encrypted_path(db_path: &Path) -> PathBuf {
    let mut os = db_path.as_os_str().to_os_string();
    os.push(".gpg");
    PathBuf::from(os)
}

/// Encrypted-export flow: gate on gpg availability, collect a confirmed
/// passphrase, encrypt next to the database file, copy into downloads.
///
/// Returns the downloads-side path, or `None` when the flow stopped before
/// writing anything — gpg missing, or the user backed out of the passphrase
/// prompts. A mismatched confirmation re-prompts in place.
pub fn run_export(
    db_path: &Path,
    downloads_dir: &Path,
    prompt: &mut dyn Prompt,
) -> Result<Option<PathBuf>, ExportError> {
    if !gpg::is_available() {
        println!(
            "{}",
            "GPG is NOT available; install it to use export".yellow()
        );
        return Ok(None);
    }
    let passphrase = match read_passphrase(prompt) {
        Ok(passphrase) => passphrase,
        Err(PromptError::Interrupted) | Err(PromptError::Eof) => {
            println!("export cancelled");
            return Ok(None);
        }
        Err(e) => return Err(ExportError::Prompt(e)),
    };

    let encrypted = encrypted_path(db_path);
    gpg::encrypt_file(db_path, &encrypted, &passphrase)?;

    let target = downloads_dir.join(EXPORT_FILE_NAME);
    fs::copy(&encrypted, &target).map_err(|e| ExportError::Copy {
        path: target.clone(),
        source: e,
    })?;
    Ok(Some(target))
}

/// Ask for the passphrase twice, masked, until both entries agree
fn read_passphrase(prompt: &mut dyn Prompt) -> Result<String, PromptError> {
    loop {
        let first = prompt.secret("passphrase: ")?;
        let second = prompt.secret("confirm passphrase: ")?;
        if first == second {
            return Ok(first);
        }
        println!("passphrases do not match, try again");
    }
}
