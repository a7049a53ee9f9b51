//! Per-file reconciliation and the bounded batch driver.

use std::path::Path;

use futures_util::TryStreamExt;
use futures_util::stream::FuturesUnordered;
use mapsync_fetch::{Fetcher, HttpClient, replace_with_buffer};
use mapsync_fs::{displace, find_matching_backup_and_swap};
use mapsync_verify::{Digest, hash_file};
use tracing::{debug, info, warn};

use crate::gate::{AdmissionGate, DEFAULT_CONCURRENCY};
use crate::{FileStatus, Manifest, MapSource, Result, SyncError};

/// What a reconciliation may do to bring a file in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Hash and report only; never touches the directory.
    Check,
    /// Backup swaps only; never downloads or displaces.
    Revert,
    /// Swap from backup, else displace the stale file and download.
    Download,
}

/// Final statuses of one batch, indexed like the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub statuses:       Vec<FileStatus>,
    /// Highest number of files that were being reconciled at once.
    pub peak_in_flight: usize,
}

impl SyncReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }

    pub fn all_ok(&self) -> bool { self.statuses.iter().all(|s| *s == FileStatus::Ok) }
}

/// Brings a directory in line with a [`Manifest`] served from one base URL.
pub struct Reconciler<'f, C: HttpClient> {
    fetcher:     &'f Fetcher<C>,
    base_url:    String,
    concurrency: usize,
}

impl<'f, C: HttpClient> Reconciler<'f, C> {
    pub fn new(fetcher: &'f Fetcher<C>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn for_source(fetcher: &'f Fetcher<C>, source: &MapSource) -> Self {
        Self::new(fetcher, source.base_url.clone())
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Reconcile one file, reporting every status transition to `report`.
    pub async fn reconcile_file(
        &self,
        dir: &Path,
        name: &str,
        expected: &Digest,
        mode: Mode,
        report: impl Fn(FileStatus),
    ) -> Result<FileStatus> {
        let done = |status: FileStatus| {
            report(status);
            Ok(status)
        };
        let path = dir.join(name);

        if mapsync_fs::exists(&path).await {
            report(FileStatus::Checking);
            if hash_file(&path).await? == *expected {
                return done(FileStatus::Ok);
            }
            if mode == Mode::Check {
                warn!(file = name, "digest mismatch");
                return done(FileStatus::Mismatch);
            }
            if find_matching_backup_and_swap(&path, expected).await? {
                return done(FileStatus::Ok);
            }
            if mode == Mode::Revert {
                return done(FileStatus::RevertFailed);
            }
            let slot = displace(&path).await?;
            debug!(file = name, slot = %slot.display(), "displaced stale file");
        } else {
            match mode {
                Mode::Check => return done(FileStatus::Missing),
                Mode::Revert => {
                    return if find_matching_backup_and_swap(&path, expected).await? {
                        done(FileStatus::Ok)
                    } else {
                        done(FileStatus::RevertFailed)
                    };
                }
                Mode::Download => {}
            }
        }

        report(FileStatus::Downloading);
        let url = format!("{}{}", self.base_url, name);
        let (buffer, digest) = self.fetcher.fetch_with_digest(&url).await?;
        if digest != *expected {
            warn!(file = name, %expected, actual = %digest, "downloaded content does not match");
            return done(FileStatus::DownloadMismatch);
        }

        report(FileStatus::Writing);
        replace_with_buffer(&path, &buffer).await?;
        done(FileStatus::Ok)
    }

    /// Check every file, downloading missing or mismatched ones when
    /// `allow_download` is set.
    ///
    /// `on_status` receives `(index, status)` with the index of the entry in
    /// `manifest`. A transport or I/O failure of any file aborts the batch and
    /// cancels the files still in flight; digest mismatches are only statuses.
    pub async fn sync_manifest<F>(
        &self,
        dir: &Path,
        manifest: &Manifest,
        allow_download: bool,
        on_status: F,
    ) -> Result<SyncReport>
    where
        F: Fn(usize, FileStatus) + Sync,
    {
        let mode = if allow_download { Mode::Download } else { Mode::Check };
        if allow_download {
            tokio::fs::create_dir_all(dir).await.map_err(|source| SyncError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        self.run(dir, manifest, mode, on_status).await
    }

    /// Restore every file from its backup slots without touching the network.
    pub async fn revert_manifest<F>(&self, dir: &Path, manifest: &Manifest, on_status: F) -> Result<SyncReport>
    where
        F: Fn(usize, FileStatus) + Sync,
    {
        self.run(dir, manifest, Mode::Revert, on_status).await
    }

    async fn run<F>(&self, dir: &Path, manifest: &Manifest, mode: Mode, on_status: F) -> Result<SyncReport>
    where
        F: Fn(usize, FileStatus) + Sync,
    {
        info!(dir = %dir.display(), files = manifest.len(), ?mode, "reconciling");
        let gate = AdmissionGate::new(self.concurrency);
        let mut statuses = vec![FileStatus::Pending; manifest.len()];
        for index in 0..manifest.len() {
            on_status(index, FileStatus::Pending);
        }

        let gate = &gate;
        let on_status = &on_status;
        let mut tasks: FuturesUnordered<_> = manifest
            .iter()
            .enumerate()
            .map(|(index, entry)| async move {
                let _admission = gate.admit().await?;
                let status = self
                    .reconcile_file(dir, &entry.name, &entry.digest, mode, |s| on_status(index, s))
                    .await?;
                Ok::<_, SyncError>((index, status))
            })
            .collect();

        while let Some((index, status)) = tasks.try_next().await? {
            statuses[index] = status;
        }

        let report = SyncReport {
            statuses,
            peak_in_flight: gate.peak(),
        };
        info!(
            ok = report.count(FileStatus::Ok),
            mismatch = report.count(FileStatus::Mismatch),
            missing = report.count(FileStatus::Missing),
            download_mismatch = report.count(FileStatus::DownloadMismatch),
            revert_failed = report.count(FileStatus::RevertFailed),
            "reconciled"
        );
        Ok(report)
    }
}
