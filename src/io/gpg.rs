use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Error type for the external gpg tool
#[derive(Debug, thiserror::Error)]
pub enum GpgError {
    #[error("gpg is not available on this system")]
    Unavailable,
    #[error("gpg exited with {0}")]
    Failed(ExitStatus),
    #[error("could not run gpg: {0}")]
    Io(#[from] io::Error),
}

/// True when `gpg --version` runs and exits successfully
pub fn is_available() -> bool {
    Command::new("gpg")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Symmetric AES256 encryption of `input` into `output`
pub fn encrypt_file(input: &Path, output: &Path, passphrase: &str) -> Result<(), GpgError> {
    run_gpg(&["--symmetric", "--cipher-algo", "AES256"], input, output, passphrase)
}

/// Decrypt counterpart of [`encrypt_file`]
pub fn decrypt_file(input: &Path, output: &Path, passphrase: &str) -> Result<(), GpgError> {
    run_gpg(&["--decrypt"], input, output, passphrase)
}

fn run_gpg(mode: &[&str], input: &Path, output: &Path, passphrase: &str) -> Result<(), GpgError> {
    let status = Command::new("gpg")
        .args(mode)
        .args(["--pinentry-mode", "loopback", "--passphrase", passphrase])
        .args(["--batch", "--yes"])
        .arg("-o")
        .arg(output)
        .arg(input)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => GpgError::Unavailable,
            _ => GpgError::Io(e),
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(GpgError::Failed(status))
    }
}
