//! Switch resolution against appliance fixtures.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use hon_core::{CapabilityController, Category, Hub, SwitchState};

use crate::cli::SwitchesArgs;
use crate::error::CliError;
use crate::fixture::FixtureClient;
use crate::output;

use super::Context;
use super::capabilities::control_label;

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SwitchReport {
    unique_id: String,
    appliance: String,
    key: String,
    name: String,
    category: Category,
    control: String,
    state: SwitchState,
    available: bool,
}

impl From<&CapabilityController<FixtureClient>> for SwitchReport {
    fn from(c: &CapabilityController<FixtureClient>) -> Self {
        Self {
            unique_id: c.unique_id().to_owned(),
            appliance: c.coordinator().info().display_name().to_owned(),
            key: c.key().to_owned(),
            name: c.name().to_owned(),
            category: c.category(),
            control: control_label(c.strategy()),
            state: c.read_state(),
            available: c.is_available(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "Appliance")]
    appliance: String,
    #[tabled(rename = "Switch")]
    name: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "State")]
    state: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: SwitchesArgs, ctx: &Context) -> Result<(), CliError> {
    let table = Arc::new(ctx.config.capability_table()?);
    let hub = Hub::new(table, ctx.config.coordinator_config()?.oneshot());

    let result = resolve_and_toggle(&hub, &args).await;
    hub.shutdown().await;
    let reports = result?;

    let color = ctx.color;
    let out = output::render_list(
        ctx.output,
        &reports,
        |r| SwitchRow {
            appliance: r.appliance.clone(),
            name: r.name.clone(),
            key: r.key.clone(),
            category: r.category.to_string(),
            state: output::paint_state(r.state, color),
        },
        |r| r.unique_id.clone(),
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// Set up every fixture, apply the requested toggles, and report.
async fn resolve_and_toggle(
    hub: &Hub<FixtureClient>,
    args: &SwitchesArgs,
) -> Result<Vec<SwitchReport>, CliError> {
    let mut controllers = Vec::new();
    for path in &args.fixtures {
        let client = FixtureClient::load(path)?;
        controllers.extend(hub.setup_appliance(client).await?);
    }

    let mut matched = BTreeSet::new();
    let toggles = args
        .turn_on
        .iter()
        .map(|key| (key, true))
        .chain(args.turn_off.iter().map(|key| (key, false)));

    for (key, on) in toggles {
        for controller in controllers.iter().filter(|c| c.key() == key) {
            if on {
                controller.activate().await?;
            } else {
                controller.deactivate().await?;
            }
            matched.insert(key.as_str());
        }
        if !matched.contains(key.as_str()) {
            return Err(CliError::SwitchNotFound { key: key.clone() });
        }
    }

    Ok(controllers.iter().map(SwitchReport::from).collect())
}
