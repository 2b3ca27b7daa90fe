//! The run-once download pipeline.
//!
//! Failure policy: only total-count discovery is fatal. Every per-item and
//! per-asset failure is logged, surfaced as an event, and skips exactly that
//! unit — no retries, no abort. The asymmetry is deliberate: a run either
//! never starts, or it visits every ordinal it discovered.

use crate::error::{Error, Result};
use crate::naming;
use crate::progress::ProgressCounter;
use crate::types::{Event, RunState};
use std::path::Path;

use super::DownloadWorker;
use super::control::Checkpoint;

impl DownloadWorker {
    /// Pipeline task body: run to completion, then transition to `Stopped`.
    pub(crate) async fn run(&self) {
        self.run_pipeline().await;

        let mut state = self.lifecycle.state.lock().await;
        *state = RunState::Stopped;
        tracing::info!(collection = %self.descriptor.title, "worker stopped");
    }

    async fn run_pipeline(&self) {
        // 1. Resolve the total item count. This is the only fatal step: there
        //    is no partial-collection fallback.
        let total = match self
            .walker
            .discover_total(&self.descriptor, &self.credentials)
            .await
        {
            Ok(total) => total,
            Err(e) => {
                tracing::error!(
                    title_id = %self.descriptor.title_id,
                    error = %e,
                    "total discovery failed, aborting run"
                );
                self.emit_event(Event::RunFailed {
                    error: e.to_string(),
                });
                return;
            }
        };

        tracing::info!(collection = %self.descriptor.title, total, "beginning run");
        self.emit_event(Event::RunStarted { total });

        let mut overall = ProgressCounter::new(self.config.progress.overall);
        let mut partial = ProgressCounter::new(self.config.progress.partial);

        // 2. Kind folder, then collection folder. Both are reused when they
        //    already exist, never recreated or cleared.
        let base = self
            .config
            .storage
            .save_root
            .join(self.descriptor.kind.folder_name());
        let collection_dir = base.join(naming::sanitize_name(
            &self.descriptor.title,
            &self.descriptor.title_id,
        ));

        match self.prepare_collection_dirs(&base, &collection_dir).await {
            Ok(()) => self.sink.save_location(&collection_dir),
            Err(e) => {
                // Not fatal: each item's folder creation will fail below and
                // that item is skipped with an event, keeping discovery the
                // only run-aborting step.
                tracing::warn!(error = %e, "could not prepare destination folders");
            }
        }

        // 3. Visit every ordinal in the originally discovered range.
        for ordinal in 1..=total {
            overall.set_step(ordinal - 1, total);
            self.sink.overall_progress(overall.current());

            let item = match self
                .walker
                .fetch_item(&self.descriptor, ordinal, &self.credentials)
                .await
            {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!(ordinal, error = %e, "item fetch failed, skipping");
                    self.emit_event(Event::ItemFetchFailed {
                        ordinal,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let item_dir =
                collection_dir.join(naming::sanitize_name(&item.title, &ordinal.to_string()));

            // Resumability: a pre-existing folder is treated as already
            // downloaded, however many assets it actually holds.
            match tokio::fs::try_exists(&item_dir).await {
                Ok(true) => {
                    tracing::info!(ordinal, path = %item_dir.display(), "item folder exists, skipping");
                    self.emit_event(Event::ItemAlreadyPresent {
                        ordinal,
                        path: item_dir,
                    });
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(ordinal, error = %e, "could not probe item folder, skipping");
                    self.emit_event(Event::ItemFolderFailed {
                        ordinal,
                        path: item_dir,
                        error: e.to_string(),
                    });
                    continue;
                }
            }

            if let Err(e) = tokio::fs::create_dir(&item_dir).await {
                tracing::warn!(ordinal, error = %e, "could not create item folder, skipping");
                self.emit_event(Event::ItemFolderFailed {
                    ordinal,
                    path: item_dir,
                    error: e.to_string(),
                });
                continue;
            }

            tracing::info!(ordinal, title = %item.title, assets = item.assets.len(), "downloading item");
            self.emit_event(Event::ItemStarted {
                ordinal,
                title: item.title.clone(),
            });
            self.sink.now_downloading(&item.title);
            partial.reset();
            self.sink.partial_progress(partial.current());

            let asset_count = item.assets.len() as u32;
            // Sequence numbers are dense: advanced only for successful writes
            let mut seq: u32 = 1;
            let mut written: u32 = 0;

            for (index, asset) in item.assets.iter().enumerate() {
                // Per-asset checkpoint: the only suspension point inside an
                // item. On shutdown the item's remaining assets are abandoned
                // and the per-item checkpoint below decides the exit.
                if self.checkpoint().await == Checkpoint::Shutdown {
                    break;
                }

                partial.set_step(index as u32, asset_count);
                self.sink.partial_progress(partial.current());

                let bytes = match self
                    .fetcher
                    .fetch_bytes(asset, &item.page_url, &self.credentials)
                    .await
                {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::warn!(ordinal, index, url = %asset, error = %e, "asset fetch failed, skipping");
                        self.emit_event(Event::AssetFetchFailed {
                            ordinal,
                            index,
                            error: e.to_string(),
                        });
                        continue;
                    }
                };

                let file = item_dir.join(format!("Image_{seq}.jpg"));
                match tokio::fs::write(&file, &bytes).await {
                    Ok(()) => {
                        seq += 1;
                        written += 1;
                    }
                    Err(e) => {
                        tracing::warn!(ordinal, path = %file.display(), error = %e, "asset write failed, skipping");
                        self.emit_event(Event::AssetWriteFailed {
                            ordinal,
                            path: file,
                            error: e.to_string(),
                        });
                    }
                }
            }

            // Per-item checkpoint, evaluated once more after the asset loop.
            if self.checkpoint().await == Checkpoint::Shutdown {
                tracing::info!(ordinal, "shutdown observed, ending run");
                self.emit_event(Event::RunInterrupted {
                    last_ordinal: ordinal,
                });
                return;
            }

            partial.complete();
            self.sink.partial_progress(partial.current());
            self.emit_event(Event::ItemCompleted {
                ordinal,
                assets_written: written,
            });
        }

        // 4. Clean completion: only now does the overall counter reach its
        //    maximum, letting the sink distinguish a finish from an interrupt.
        overall.complete();
        self.sink.overall_progress(overall.current());
        tracing::info!(collection = %self.descriptor.title, "run complete");
        self.emit_event(Event::RunCompleted);
    }

    async fn prepare_collection_dirs(&self, base: &Path, collection_dir: &Path) -> Result<()> {
        let save_root = &self.config.storage.save_root;
        tokio::fs::create_dir_all(save_root)
            .await
            .map_err(|e| Error::filesystem(save_root, e))?;
        ensure_dir(base).await?;
        ensure_dir(collection_dir).await
    }
}

/// Create a directory only if it is absent; pre-existing directories are
/// reused untouched.
async fn ensure_dir(path: &Path) -> Result<()> {
    if tokio::fs::try_exists(path)
        .await
        .map_err(|e| Error::filesystem(path, e))?
    {
        return Ok(());
    }
    tokio::fs::create_dir(path)
        .await
        .map_err(|e| Error::filesystem(path, e))
}
