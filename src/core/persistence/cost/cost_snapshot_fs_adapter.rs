use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::info;

use crate::domain::cost::model::CostReport;

/// FS adapter that keeps the last fetched report as pretty-printed JSON.
///
/// Writes go to a temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct CostSnapshotFsAdapter {
    path: PathBuf,
}

impl CostSnapshotFsAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, report: &CostReport) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create snapshot directory")?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp_path).context("Failed to create temp snapshot file")?;
        serde_json::to_writer_pretty(&mut f, report).context("Failed to serialize cost report")?;
        writeln!(f)?;
        f.flush()?;
        f.sync_all().context("Failed to sync temp snapshot file")?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err).context("Failed to finalize snapshot file");
        }

        info!(path = %self.path.display(), "Cost report snapshot stored");
        Ok(())
    }
}
