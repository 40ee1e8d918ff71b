//! Export the still-encrypted document.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{confirm, Outcome, Vault};
use crate::errors::{LocalSafeError, Result};

/// Only JSON is supported.
pub const FORMAT_JSON: &str = "json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExportDestination {
    #[default]
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: String,
    pub pretty: bool,
    pub destination: ExportDestination,
    /// Needed (as `export`) when writing to stdout.
    pub confirm: Option<String>,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            format: FORMAT_JSON.to_string(),
            pretty: false,
            destination: ExportDestination::Stdout,
            confirm: None,
        }
    }
}

/// Where the export went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exported {
    /// Rendered text for the caller to print.
    Stdout(String),
    File(PathBuf),
}

impl Vault {
    pub fn export(&self, request: &ExportRequest) -> Result<Outcome<Exported>> {
        let (document, _) = self.load()?;
        if !request.format.trim().eq_ignore_ascii_case(FORMAT_JSON) {
            return Err(LocalSafeError::UnsupportedFormat(request.format.clone()));
        }

        let rendered = if request.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        }
        .map_err(|e| LocalSafeError::SerializationError(format!("export: {e}")))?;

        match &request.destination {
            ExportDestination::Stdout => {
                if !confirm::is_confirmed(request.confirm.as_deref(), confirm::EXPORT) {
                    return Ok(Outcome::Pending {
                        count: document.entries.len(),
                    });
                }
                Ok(Outcome::Done(Exported::Stdout(rendered)))
            }
            ExportDestination::File(path) => {
                write_private(path, format!("{rendered}\n").as_bytes())?;

                tracing::info!(path = %path.display(), entries = document.entries.len(), "vault exported");
                Ok(Outcome::Done(Exported::File(path.clone())))
            }
        }
    }
}

/// Write `bytes` to `path` through an owner-only temp file and a rename,
/// so the export is never visible with wider permissions.
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)?;

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
