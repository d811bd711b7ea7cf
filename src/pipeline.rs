use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::download::{Diagnostics, FetchOutcome, Fetcher, StatusPolicy};
use crate::extract::{open_archive, unpack_archive};
use crate::request::DatasetRequest;
use crate::verify::ensure_zip_archive;

/// Whether partial output is removed when a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    #[default]
    RemoveOnFailure,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub fetch: FetchOutcome,
    pub archive_path: PathBuf,
    pub extract_dir: PathBuf,
}

pub struct Pipeline {
    request: DatasetRequest,
    archive_path: PathBuf,
    extract_dir: PathBuf,
    status_policy: StatusPolicy,
    cleanup_policy: CleanupPolicy,
    diagnostics: Diagnostics,
}

impl Pipeline {
    pub fn new(
        request: DatasetRequest,
        archive_path: impl Into<PathBuf>,
        extract_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            request,
            archive_path: archive_path.into(),
            extract_dir: extract_dir.into(),
            status_policy: StatusPolicy::default(),
            cleanup_policy: CleanupPolicy::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn with_cleanup_policy(mut self, policy: CleanupPolicy) -> Self {
        self.cleanup_policy = policy;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn run(&self) -> Result<PipelineReport> {
        log::info!("Starting dataset download for {}", self.request.persistent_id);

        self.request.validate()?;
        let fetcher = Fetcher::new(self.diagnostics, self.status_policy)?;

        // The archive only belongs to this run once the fetcher has written it.
        let fetch = fetcher.fetch_to_file(&self.request, &self.archive_path)?;
        let mut guard = OutputGuard::new(self.cleanup_policy, &self.archive_path);

        ensure_zip_archive(&self.archive_path)?;

        let archive = open_archive(&self.archive_path)?;
        guard.track(&self.extract_dir);
        unpack_archive(archive, &self.extract_dir)?;

        guard.disarm();
        log::info!("Dataset {} ready in {:?}", self.request.persistent_id, self.extract_dir);

        Ok(PipelineReport {
            fetch,
            archive_path: self.archive_path.clone(),
            extract_dir: self.extract_dir.clone(),
        })
    }
}

/// Removes the paths it tracks when dropped, unless disarmed first.
struct OutputGuard<'a> {
    policy: CleanupPolicy,
    archive: &'a Path,
    extract_dir: Option<&'a Path>,
    armed: bool,
}

impl<'a> OutputGuard<'a> {
    fn new(policy: CleanupPolicy, archive: &'a Path) -> Self {
        Self {
            policy,
            archive,
            extract_dir: None,
            armed: true,
        }
    }

    fn track(&mut self, extract_dir: &'a Path) {
        self.extract_dir = Some(extract_dir);
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for OutputGuard<'_> {
    fn drop(&mut self) {
        if !self.armed || self.policy == CleanupPolicy::Keep {
            return;
        }

        if self.archive.exists() {
            log::warn!("Removing partial archive {:?}", self.archive);
            if let Err(e) = fs::remove_file(self.archive) {
                log::error!("Failed to remove {:?}: {}", self.archive, e);
            }
        }

        if let Some(dir) = self.extract_dir.filter(|d| d.exists()) {
            log::warn!("Removing partial extraction {:?}", dir);
            if let Err(e) = fs::remove_dir_all(dir) {
                log::error!("Failed to remove {:?}: {}", dir, e);
            }
        }
    }
}
