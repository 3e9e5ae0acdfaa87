//! Reconciliation driver.
//!
//! One tick resolves every configured item against live remote metadata,
//! copies what the destination is missing or holds an older copy of, and
//! deletes sources the destination has caught up with. Fixed-file items
//! and the dated-subfolder sweep run as independent concurrent tasks; no
//! outcome aborts a sibling, and only a credential failure aborts the
//! tick itself. Every decision is re-derived from current metadata, so an
//! interrupted tick is safely retried by the next one.

use dropmirror_api::{DropboxClient, EntryKind};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cleanup::CleanupExecutor;
use crate::config::SyncConfig;
use crate::credentials::CredentialProvider;
use crate::error::SyncResult;
use crate::policy;
use crate::resolver::MetadataResolver;
use crate::store::TokenStore;
use crate::transfer::TransferEngine;

/// Outcome of one fixed-file item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// Source missing; nothing to do.
    SourceAbsent,
    /// Destination caught up (by transfer or already); `deleted` records
    /// whether the source cleanup went through.
    Synced { transferred: bool, deleted: bool },
    /// Download or upload failed; the source must stay.
    TransferFailed,
    /// Destination still older than the source; deletion skipped.
    NotCaughtUp,
}

/// Outcome of one dated subfolder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FolderOutcome {
    /// Archive-year folder or archive subfolder not in place yet.
    ArchiveMissing,
    /// No matching documents inside; never deleted.
    Empty,
    /// All documents synced and the subfolder deleted.
    Archived { files: usize },
    /// All documents synced but the subfolder deletion failed.
    DeleteFailed { files: usize },
    /// At least one document did not end the tick synced.
    Incomplete { synced: usize, failed: usize },
}

/// Summary of one reconciliation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub files_transferred: usize,
    pub files_deleted: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub folders_archived: usize,
    pub folders_skipped: usize,
    pub folders_incomplete: usize,
}

/// Drives the compare-and-sync pass over all configured items.
pub struct Reconciler {
    config: SyncConfig,
    client: Arc<DropboxClient>,
    credentials: CredentialProvider,
    resolver: MetadataResolver,
    transfer: TransferEngine,
    cleanup: CleanupExecutor,
}

impl Reconciler {
    pub fn new(config: SyncConfig, store: Arc<dyn TokenStore>) -> Self {
        let client = Arc::new(DropboxClient::new(config.api.clone()));
        Self {
            credentials: CredentialProvider::new(
                client.clone(),
                store,
                config.refresh_margin_secs,
            ),
            resolver: MetadataResolver::new(client.clone()),
            transfer: TransferEngine::new(client.clone()),
            cleanup: CleanupExecutor::new(client.clone()),
            client,
            config,
        }
    }

    /// Runs one reconciliation tick. Only a credential failure aborts it;
    /// every other failure is absorbed into the report.
    pub async fn run_tick(&self) -> SyncResult<TickReport> {
        let token = self.credentials.get_valid_token().await?;
        let token = token.secret.as_str();

        let fixed = join_all(
            self.config
                .files
                .iter()
                .map(|name| self.reconcile_file(token, name)),
        );
        let dated = self.reconcile_dated_folders(token);
        let (file_outcomes, folder_outcomes) = tokio::join!(fixed, dated);

        let mut report = TickReport::default();
        for outcome in &file_outcomes {
            match outcome {
                FileOutcome::SourceAbsent | FileOutcome::NotCaughtUp => {
                    report.files_skipped += 1;
                }
                FileOutcome::Synced {
                    transferred,
                    deleted,
                } => {
                    if *transferred {
                        report.files_transferred += 1;
                    }
                    if *deleted {
                        report.files_deleted += 1;
                    }
                }
                FileOutcome::TransferFailed => report.files_failed += 1,
            }
        }
        for outcome in &folder_outcomes {
            match outcome {
                FolderOutcome::Archived { .. } => report.folders_archived += 1,
                FolderOutcome::ArchiveMissing | FolderOutcome::Empty => {
                    report.folders_skipped += 1;
                }
                FolderOutcome::DeleteFailed { .. } | FolderOutcome::Incomplete { .. } => {
                    report.folders_incomplete += 1;
                }
            }
        }
        Ok(report)
    }

    /// Mirrors one fixed file from the source folder to the target folder,
    /// deleting the source once the target has caught up.
    async fn reconcile_file(&self, token: &str, name: &str) -> FileOutcome {
        let source = policy::join_path(&self.config.source_folder, name);
        let destination = policy::join_path(&self.config.target_folder, name);

        let source_mtime = self.resolver.resolve(token, &source).await;
        let dest_mtime = self.resolver.resolve(token, &destination).await;

        let Some(source_mtime) = source_mtime else {
            debug!("skipping {source}: source absent");
            return FileOutcome::SourceAbsent;
        };

        let mut transferred = false;
        if policy::needs_transfer(Some(source_mtime), dest_mtime) {
            if !self.transfer.stream(token, &source, &destination).await {
                return FileOutcome::TransferFailed;
            }
            transferred = true;
        }

        let effective = policy::effective_destination(source_mtime, dest_mtime, transferred);
        if !policy::safe_to_delete(source_mtime, effective) {
            info!(
                "keeping {source}: destination at {dest_mtime:?} has not caught up to {source_mtime}"
            );
            return FileOutcome::NotCaughtUp;
        }

        let deleted = self.cleanup.delete(token, &source).await;
        FileOutcome::Synced {
            transferred,
            deleted,
        }
    }

    /// Sweeps the dated subfolders under the documents root. A listing
    /// failure degrades to an empty sweep — no action this tick.
    async fn reconcile_dated_folders(&self, token: &str) -> Vec<FolderOutcome> {
        let root = &self.config.documents_folder;
        let entries = match self.client.list_folder(token, root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("listing {root} failed, skipping dated folders: {e}");
                return Vec::new();
            }
        };

        let mut outcomes = Vec::new();
        for entry in entries {
            if !entry.is_folder() {
                continue;
            }
            let Some(year) = policy::year_prefix(&entry.name) else {
                debug!("ignoring {}: no year prefix", entry.name);
                continue;
            };
            outcomes.push(self.reconcile_folder(token, &entry.name, year).await);
        }
        outcomes
    }

    /// Archives one dated subfolder. The archive-year folder and the
    /// archive subfolder must already exist; the subfolder is deleted only
    /// when it held at least one document and every document ended the
    /// tick synced.
    async fn reconcile_folder(&self, token: &str, name: &str, year: &str) -> FolderOutcome {
        let source_folder = policy::join_path(&self.config.documents_folder, name);
        let archive_year = policy::join_path(&self.config.archive_folder, year);
        let archive_folder = policy::join_path(&archive_year, name);

        if !self.resolver.folder_exists(token, &archive_year).await
            || !self.resolver.folder_exists(token, &archive_folder).await
        {
            info!("skipping {source_folder}: archive folder {archive_folder} not ready");
            return FolderOutcome::ArchiveMissing;
        }

        let entries = match self.client.list_folder(token, &source_folder).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("listing {source_folder} failed: {e}");
                Vec::new()
            }
        };

        let documents: Vec<_> = entries
            .iter()
            .filter(|e| {
                e.kind == EntryKind::File
                    && policy::is_document(&e.name, &self.config.document_extensions)
            })
            .collect();
        if documents.is_empty() {
            debug!("nothing to archive in {source_folder}");
            return FolderOutcome::Empty;
        }

        let mut synced = 0usize;
        let mut failed = 0usize;
        for doc in &documents {
            let source = policy::join_path(&source_folder, &doc.name);
            let destination = policy::join_path(&archive_folder, &doc.name);
            if self.sync_document(token, &source, &destination).await {
                synced += 1;
            } else {
                failed += 1;
            }
        }

        if failed > 0 {
            info!(
                "keeping {source_folder}: {failed} of {} documents not synced",
                documents.len()
            );
            return FolderOutcome::Incomplete { synced, failed };
        }

        if self.cleanup.delete(token, &source_folder).await {
            FolderOutcome::Archived { files: synced }
        } else {
            FolderOutcome::DeleteFailed { files: synced }
        }
    }

    /// Returns true when the document ends the tick in a synced state:
    /// transferred successfully, or the archive copy is already as new.
    async fn sync_document(&self, token: &str, source: &str, destination: &str) -> bool {
        let source_mtime = self.resolver.resolve(token, source).await;
        let dest_mtime = self.resolver.resolve(token, destination).await;

        let Some(source_mtime) = source_mtime else {
            warn!("cannot resolve {source}; leaving its folder in place");
            return false;
        };

        if !policy::needs_transfer(Some(source_mtime), dest_mtime) {
            return true;
        }
        self.transfer.stream(token, source, destination).await
    }
}
