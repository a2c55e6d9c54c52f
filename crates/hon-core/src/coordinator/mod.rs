// ── State coordinator ──
//
// One coordinator per appliance. It is the only writer of the appliance's
// snapshot: refreshes replace it wholesale, staged setting writes replace
// it with a modified copy. Readers get wait-free `Arc` loads and never see
// a partially updated snapshot.

mod refresh;
mod stream;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ApplianceClient, ClientError, CommandRequest};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::{ApplianceInfo, ApplianceSnapshot, ApplianceState, Setting};

pub use stream::{SnapshotStream, SnapshotWatchStream};

// ── RefreshStatus ────────────────────────────────────────────────

/// Outcome history of the coordinator's refreshes, observable by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl RefreshStatus {
    /// `true` once a refresh has succeeded and none has failed since.
    pub fn last_refresh_succeeded(&self) -> bool {
        self.last_success.is_some() && self.consecutive_failures == 0
    }
}

// ── Coordinator ──────────────────────────────────────────────────

/// Owns refresh and the cached snapshot for one appliance.
///
/// Cheaply cloneable; every capability controller of the appliance holds
/// a clone.
pub struct Coordinator<C: ApplianceClient> {
    inner: Arc<CoordinatorInner<C>>,
}

impl<C: ApplianceClient> Clone for Coordinator<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<C> {
    client: C,
    config: CoordinatorConfig,
    snapshot: ArcSwapOption<ApplianceSnapshot>,
    /// Last issued snapshot version. Held while a new snapshot is published.
    writer: Mutex<u64>,
    updates: watch::Sender<Option<Arc<ApplianceSnapshot>>>,
    status: watch::Sender<RefreshStatus>,
    refresh_lock: AsyncMutex<()>,
    cancel: CancellationToken,
    started: AtomicBool,
    task_handles: AsyncMutex<Vec<JoinHandle<()>>>,
}

impl<C: ApplianceClient> Coordinator<C> {
    /// Create a coordinator. Does NOT fetch -- call
    /// [`first_refresh()`](Self::first_refresh) before building controllers.
    pub fn new(client: C, config: CoordinatorConfig) -> Self {
        let (updates, _) = watch::channel(None);
        let (status, _) = watch::channel(RefreshStatus::default());

        Self {
            inner: Arc::new(CoordinatorInner {
                client,
                config,
                snapshot: ArcSwapOption::empty(),
                writer: Mutex::new(0),
                updates,
                status,
                refresh_lock: AsyncMutex::new(()),
                cancel: CancellationToken::new(),
                started: AtomicBool::new(false),
                task_handles: AsyncMutex::new(Vec::new()),
            }),
        }
    }

    pub fn info(&self) -> &ApplianceInfo {
        self.inner.client.info()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    // ── Snapshot access ──────────────────────────────────────────

    /// The current snapshot, or `None` before the first successful refresh.
    pub fn snapshot(&self) -> Option<Arc<ApplianceSnapshot>> {
        self.inner.snapshot.load_full()
    }

    /// Ready means at least one snapshot has been obtained.
    pub fn is_ready(&self) -> bool {
        self.inner.snapshot.load().is_some()
    }

    pub fn status(&self) -> RefreshStatus {
        self.inner.status.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.status.subscribe()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.updates.subscribe())
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch the appliance state and replace the snapshot.
    ///
    /// Refreshes are serialized. On failure the previous snapshot stays in
    /// place and the failure is recorded in [`RefreshStatus`].
    pub async fn refresh(&self) -> Result<Arc<ApplianceSnapshot>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;
        let appliance = self.info().unique_id.as_str();
        let timeout = self.inner.config.request_timeout;

        let fetched = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Err(self.removed()),
            res = tokio::time::timeout(timeout, self.inner.client.fetch()) => res,
        };

        let state = match fetched {
            Ok(Ok(state)) => state,
            Ok(Err(e)) => return Err(self.record_failure(CoreError::refresh(appliance, &e))),
            Err(_) => {
                let err = CoreError::refresh(appliance, &ClientError::Timeout);
                return Err(self.record_failure(err));
            }
        };

        let snapshot = self.publish_state(state);
        self.inner.status.send_modify(|status| {
            status.last_success = Some(snapshot.fetched_at);
            status.consecutive_failures = 0;
            status.last_error = None;
        });

        debug!(
            appliance,
            version = snapshot.version,
            attributes = snapshot.state.attributes.len(),
            settings = snapshot.state.settings.len(),
            "appliance refresh complete"
        );
        Ok(snapshot)
    }

    /// Initial refresh with the configured retry policy.
    ///
    /// Makes up to `first_refresh_attempts` attempts, pausing
    /// `retry_backoff` between them, and returns the last error if all fail.
    pub async fn first_refresh(&self) -> Result<Arc<ApplianceSnapshot>, CoreError> {
        let attempts = self.inner.config.first_refresh_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.refresh().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(e @ CoreError::ApplianceRemoved { .. }) => return Err(e),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    warn!(
                        appliance = %self.info().unique_id,
                        attempt,
                        attempts,
                        error = %e,
                        "first refresh failed, retrying"
                    );
                }
            }

            tokio::select! {
                biased;
                () = self.inner.cancel.cancelled() => return Err(self.removed()),
                () = tokio::time::sleep(self.inner.config.retry_backoff) => {}
            }
            attempt += 1;
        }
    }

    // ── Background task lifecycle ────────────────────────────────

    /// Spawn the periodic refresh task. No-op if the interval is zero or the
    /// task already runs.
    pub async fn start(&self) {
        let period = self.inner.config.refresh_interval;
        if period.is_zero() || self.inner.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let coordinator = self.clone();
        let cancel = self.inner.cancel.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(refresh::refresh_task(coordinator, period, cancel)));

        debug!(appliance = %self.info().unique_id, ?period, "refresh task started");
    }

    /// Stop background refresh and abandon in-flight commands.
    ///
    /// Abandoned refreshes and commands apply nothing to the snapshot.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        info!(appliance = %self.info().unique_id, "coordinator shut down");
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Send `command` with the parameters currently staged for it.
    ///
    /// Waits for the appliance to acknowledge, bounded by
    /// `command_timeout`. Never touches the snapshot.
    pub async fn send_command(&self, command: &str) -> Result<(), CoreError> {
        let appliance = self.info().unique_id.as_str();
        let snapshot = self.snapshot().ok_or_else(|| CoreError::NotReady {
            appliance: appliance.to_owned(),
        })?;

        if !snapshot.has_command(command) {
            return Err(CoreError::CommandUnavailable {
                appliance: appliance.to_owned(),
                command: command.to_owned(),
            });
        }

        let request = CommandRequest {
            name: command.to_owned(),
            parameters: snapshot.command_parameters(command),
        };
        drop(snapshot);

        let timeout = self.inner.config.command_timeout;
        let sent = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Err(self.removed()),
            res = tokio::time::timeout(timeout, self.inner.client.send_command(request)) => res,
        };

        match sent {
            Ok(Ok(())) => {
                info!(appliance, command, "command sent");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(appliance, command, error = %e, "command failed");
                Err(CoreError::command(command, &e))
            }
            Err(_) => {
                warn!(appliance, command, "command timed out");
                Err(CoreError::CommandTimeout {
                    command: command.to_owned(),
                    timeout,
                })
            }
        }
    }

    /// Replace one setting locally with `update(current)`.
    ///
    /// The new value is staged for the next command that carries it; the
    /// remote appliance is not contacted and a later refresh may overwrite it.
    pub fn update_setting(
        &self,
        key: &str,
        update: impl FnOnce(&Setting) -> Setting,
    ) -> Result<Arc<ApplianceSnapshot>, CoreError> {
        if self.is_shut_down() {
            return Err(self.removed());
        }

        let appliance = &self.info().unique_id;
        let mut version = self.lock_writer();

        let current = self.inner.snapshot.load_full().ok_or_else(|| CoreError::NotReady {
            appliance: appliance.clone(),
        })?;
        let unavailable = || CoreError::SettingUnavailable {
            appliance: appliance.clone(),
            key: key.to_owned(),
        };
        let setting = current.setting(key).ok_or_else(unavailable)?;

        let next = current
            .with_setting_replaced(key, update(setting), *version + 1)
            .ok_or_else(unavailable)?;
        *version = next.version;

        let next = Arc::new(next);
        self.store(&next);
        debug!(appliance = %appliance, key, version = next.version, "setting staged");
        Ok(next)
    }

    // ── Private helpers ──────────────────────────────────────────

    fn lock_writer(&self) -> std::sync::MutexGuard<'_, u64> {
        self.inner
            .writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wrap fetched state in a new snapshot version and publish it.
    fn publish_state(&self, state: ApplianceState) -> Arc<ApplianceSnapshot> {
        let mut version = self.lock_writer();
        *version += 1;
        let snapshot = Arc::new(ApplianceSnapshot::new(state, *version));
        self.store(&snapshot);
        snapshot
    }

    /// Callers must hold the writer lock.
    fn store(&self, snapshot: &Arc<ApplianceSnapshot>) {
        self.inner.snapshot.store(Some(Arc::clone(snapshot)));
        self.inner.updates.send_replace(Some(Arc::clone(snapshot)));
    }

    fn record_failure(&self, err: CoreError) -> CoreError {
        warn!(appliance = %self.info().unique_id, error = %err, "appliance refresh failed");
        self.inner.status.send_modify(|status| {
            status.last_failure = Some(Utc::now());
            status.consecutive_failures += 1;
            status.last_error = Some(err.to_string());
        });
        err
    }

    fn removed(&self) -> CoreError {
        CoreError::ApplianceRemoved {
            appliance: self.info().unique_id.clone(),
        }
    }
}
