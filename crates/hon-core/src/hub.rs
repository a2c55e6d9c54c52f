// ── Appliance hub ──
//
// Host-facing setup entry point. Keeps one coordinator per appliance,
// reused across setups, and turns each appliance into its set of
// capability controllers.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::capability::{CapabilityController, CapabilityTable, Resolver};
use crate::client::ApplianceClient;
use crate::config::CoordinatorConfig;
use crate::coordinator::Coordinator;
use crate::error::CoreError;

/// Registry of appliance coordinators sharing one capability table.
pub struct Hub<C: ApplianceClient> {
    resolver: Resolver,
    config: CoordinatorConfig,
    coordinators: DashMap<String, Coordinator<C>>,
}

impl<C: ApplianceClient> Hub<C> {
    pub fn new(table: Arc<CapabilityTable>, config: CoordinatorConfig) -> Self {
        Self {
            resolver: Resolver::new(table),
            config,
            coordinators: DashMap::new(),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn coordinator(&self, unique_id: &str) -> Option<Coordinator<C>> {
        self.coordinators.get(unique_id).map(|c| c.value().clone())
    }

    pub fn appliance_ids(&self) -> Vec<String> {
        self.coordinators.iter().map(|c| c.key().clone()).collect()
    }

    /// Set up one appliance and return a controller per supported capability.
    ///
    /// Reuses the appliance's coordinator if one is already registered
    /// (the passed client is then dropped). Fails only when the first
    /// refresh fails; an appliance without supported capabilities yields
    /// an empty list.
    pub async fn setup_appliance(
        &self,
        client: C,
    ) -> Result<Vec<CapabilityController<C>>, CoreError> {
        let unique_id = client.info().unique_id.clone();
        let coordinator = self
            .coordinators
            .entry(unique_id)
            .or_insert_with(|| Coordinator::new(client, self.config.clone()))
            .value()
            .clone();

        let snapshot = coordinator.first_refresh().await?;
        coordinator.start().await;

        let controllers: Vec<_> = self
            .resolver
            .resolve(coordinator.info(), &snapshot)
            .into_iter()
            .map(|capability| CapabilityController::new(coordinator.clone(), capability))
            .collect();

        info!(
            appliance = %coordinator.info().unique_id,
            appliance_type = %coordinator.info().appliance_type,
            switches = controllers.len(),
            "appliance set up"
        );
        Ok(controllers)
    }

    /// Remove an appliance, stopping its refresh and abandoning in-flight
    /// commands. Returns `false` if it was not registered.
    pub async fn teardown(&self, unique_id: &str) -> bool {
        let Some((_, coordinator)) = self.coordinators.remove(unique_id) else {
            return false;
        };
        coordinator.shutdown().await;
        true
    }

    /// Tear down every registered appliance.
    pub async fn shutdown(&self) {
        for unique_id in self.appliance_ids() {
            self.teardown(&unique_id).await;
        }
    }
}
