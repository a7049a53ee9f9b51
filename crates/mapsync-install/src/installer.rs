//! Patch installation: detect which release is on disk, revert from backups
//! where possible, otherwise apply the preferred release from its archive.

use std::path::Path;

use mapsync_archive::Archive;
use mapsync_fetch::{Fetcher, HttpClient, replace_with_buffer};
use mapsync_fs::{displace, find_matching_backup_and_swap, validate_file_name};
use mapsync_verify::{Digest, hash_file};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::matcher::{MatchState, StateMatcher};
use crate::{CurrentFileDigests, InstallError, InstallEvent, ReleaseDescriptor, ReleaseSet, Result, splice_entries};

fn default_content_types() -> Vec<String> {
    vec!["application/x-zip-compressed".into(), "application/zip".into()]
}

/// Where releases come from and which states are known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Releases API root, ending in `/`.
    pub api_base_url:        String,
    /// Known states, preferred first.
    #[serde(rename = "releases")]
    pub catalog:             Vec<ReleaseSet>,
    /// Release to revert to when the preferred one is already applied.
    #[serde(default)]
    pub on_already_applied:  Option<String>,
    /// Archive member written after the release files, with extra entries spliced in.
    #[serde(default)]
    pub config_member:       Option<String>,
    #[serde(default = "default_content_types")]
    pub asset_content_types: Vec<String>,
}

impl InstallerConfig {
    pub fn release(&self, tag: &str) -> Result<&ReleaseSet> {
        self.catalog
            .iter()
            .find(|r| r.tag == tag)
            .ok_or_else(|| InstallError::UnknownTag(tag.to_string()))
    }

    pub fn preferred(&self) -> Result<&ReleaseSet> { self.catalog.first().ok_or(InstallError::EmptyCatalog) }
}

/// Result of a backup-only revert towards one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reversion {
    pub tag:    String,
    /// Files no backup slot could supply.
    pub failed: Vec<String>,
}

impl Reversion {
    pub fn is_complete(&self) -> bool { self.failed.is_empty() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The preferred release was already on disk; `post_action` is the
    /// configured follow-up revert, if any.
    AlreadyApplied { post_action: Option<Reversion> },
    /// Mismatching files were restored from backups.
    Reverted,
    /// Some files were present but could not be restored. Nothing was downloaded.
    RevertFailed { files: Vec<String> },
    /// The release carries no archive of an accepted type. Nothing was changed.
    NoAsset,
    Patched { tag: String },
}

pub struct Installer<'a, C: HttpClient> {
    fetcher: &'a Fetcher<C>,
    config:  &'a InstallerConfig,
}

impl<'a, C: HttpClient> Installer<'a, C> {
    pub fn new(fetcher: &'a Fetcher<C>, config: &'a InstallerConfig) -> Self { Self { fetcher, config } }

    /// Bring `dir` to the preferred release.
    ///
    /// `extra_entries` are spliced into the configured config member, when
    /// there is one. Every user-facing step is reported through `on_log`; a
    /// failure while applying the release is reported as
    /// [`InstallEvent::Error`] before being returned.
    pub async fn install_patch(
        &self,
        dir: &Path,
        extra_entries: &[String],
        on_log: impl Fn(&InstallEvent),
    ) -> Result<InstallOutcome> {
        let preferred = self.config.preferred()?;
        let names = self.config.catalog.iter().flat_map(|r| r.files.names());
        let mut current = CurrentFileDigests::scan(dir, names).await?;

        match StateMatcher::new(preferred).classify(&current) {
            MatchState::Applied => {
                info!(tag = %preferred.tag, "release already applied");
                on_log(&InstallEvent::AlreadyApplied);
                let post_action = match &self.config.on_already_applied {
                    Some(tag) => {
                        let release = self.config.release(tag)?;
                        Some(self.revert_to(dir, release, &mut current, &on_log).await?)
                    }
                    None => None,
                };
                return Ok(InstallOutcome::AlreadyApplied { post_action });
            }
            MatchState::Absent { missing } => {
                for file in missing {
                    on_log(&InstallEvent::Missing { file });
                }
            }
            MatchState::Mixed { .. } => {
                let reversion = self.revert_to(dir, preferred, &mut current, &on_log).await?;
                return Ok(if reversion.is_complete() {
                    InstallOutcome::Reverted
                } else {
                    InstallOutcome::RevertFailed {
                        files: reversion.failed,
                    }
                });
            }
        }

        let result = self.apply(dir, preferred, &mut current, extra_entries, &on_log).await;
        match &result {
            // Already reported as `HashMismatch`.
            Err(InstallError::DigestMismatch { .. }) | Ok(_) => {}
            Err(e) => on_log(&InstallEvent::Error(e.to_string())),
        }
        result
    }

    /// Swap in a backup for every file of `release` that does not match yet.
    async fn revert_to(
        &self,
        dir: &Path,
        release: &ReleaseSet,
        current: &mut CurrentFileDigests,
        on_log: &impl Fn(&InstallEvent),
    ) -> Result<Reversion> {
        let mut failed = Vec::new();
        for entry in &release.files {
            if current.matches(&entry.name, &entry.digest) {
                continue;
            }
            if find_matching_backup_and_swap(&dir.join(&entry.name), &entry.digest).await? {
                current.record(&entry.name, entry.digest);
            } else {
                failed.push(entry.name.clone());
            }
        }

        if failed.is_empty() {
            info!(tag = %release.tag, "reverted from backups");
            on_log(&InstallEvent::Reverted {
                tag: release.tag.clone(),
            });
        } else {
            warn!(tag = %release.tag, files = ?failed, "revert incomplete");
            on_log(&InstallEvent::RevertFailed {
                tag:   release.tag.clone(),
                files: failed.clone(),
            });
        }
        Ok(Reversion {
            tag: release.tag.clone(),
            failed,
        })
    }

    async fn apply(
        &self,
        dir: &Path,
        release: &ReleaseSet,
        current: &mut CurrentFileDigests,
        extra_entries: &[String],
        on_log: &impl Fn(&InstallEvent),
    ) -> Result<InstallOutcome> {
        let api = &self.config.api_base_url;

        on_log(&InstallEvent::CheckingRelease);
        let latest: ReleaseDescriptor = self.fetcher.fetch_json(&format!("{api}releases/latest")).await?;
        if latest.tag_name != release.tag {
            info!(latest = %latest.tag_name, preferred = %release.tag, "newer release published");
            on_log(&InstallEvent::UpdateAvailable {
                latest: latest.tag_name,
            });
        } else {
            on_log(&InstallEvent::ResolvingAsset);
        }

        let descriptor: ReleaseDescriptor = self
            .fetcher
            .fetch_json(&format!("{api}releases/tags/{}", release.tag))
            .await?;
        let Some(asset) = descriptor.find_asset(&self.config.asset_content_types) else {
            warn!(tag = %release.tag, "release has no archive asset");
            on_log(&InstallEvent::NoAsset);
            return Ok(InstallOutcome::NoAsset);
        };

        on_log(&InstallEvent::Downloading);
        let data = self.fetcher.fetch(&asset.browser_download_url).await?;
        let mut archive = Archive::open(data)?;
        debug!(members = ?archive.names(), "opened release archive");

        for entry in &release.files {
            if current.matches(&entry.name, &entry.digest) {
                continue;
            }
            let content = archive.read_member(&entry.name)?;
            let actual = Digest::of(&content);
            if actual != entry.digest {
                warn!(file = %entry.name, expected = %entry.digest, %actual, "archive member does not match");
                on_log(&InstallEvent::HashMismatch {
                    file: entry.name.clone(),
                });
                return Err(InstallError::DigestMismatch {
                    file: entry.name.clone(),
                    expected: entry.digest,
                    actual,
                });
            }

            let path = dir.join(&entry.name);
            if mapsync_fs::exists(&path).await {
                displace(&path).await?;
            }
            replace_with_buffer(&path, &content).await?;
            current.record(&entry.name, actual);
            info!(file = %entry.name, "installed");
        }

        if let Some(member) = &self.config.config_member {
            self.install_config_member(dir, &mut archive, member, extra_entries).await?;
        }

        info!(tag = %release.tag, "patched");
        on_log(&InstallEvent::Patched {
            tag: release.tag.clone(),
        });
        Ok(InstallOutcome::Patched {
            tag: release.tag.clone(),
        })
    }

    async fn install_config_member(
        &self,
        dir: &Path,
        archive: &mut Archive,
        member: &str,
        extra_entries: &[String],
    ) -> Result<()> {
        validate_file_name(member)?;
        let content = splice_entries(&archive.read_member(member)?, extra_entries);
        let digest = Digest::of(&content);
        let path = dir.join(member);

        if mapsync_fs::exists(&path).await {
            if hash_file(&path).await? == digest {
                debug!(file = member, "config already up to date");
                return Ok(());
            }
            if find_matching_backup_and_swap(&path, &digest).await? {
                return Ok(());
            }
            displace(&path).await?;
        }
        replace_with_buffer(&path, &content).await?;
        info!(file = member, extra = extra_entries.len(), "config written");
        Ok(())
    }
}
