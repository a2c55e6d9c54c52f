//! Capability table listing.

use serde::Serialize;
use tabled::Tabled;

use hon_core::{CapabilityDescriptor, Category, Strategy};

use crate::cli::CapabilitiesArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

// ── Serialized entry ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CapabilityEntry<'a> {
    appliance_type: &'a str,
    category: Category,
    #[serde(flatten)]
    descriptor: &'a CapabilityDescriptor,
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CapabilityRow {
    #[tabled(rename = "Type")]
    appliance_type: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "Icon")]
    icon: String,
}

impl From<&CapabilityEntry<'_>> for CapabilityRow {
    fn from(e: &CapabilityEntry<'_>) -> Self {
        Self {
            appliance_type: e.appliance_type.to_owned(),
            key: e.descriptor.key.clone(),
            name: e.descriptor.name.clone(),
            category: e.category.to_string(),
            control: control_label(&e.descriptor.strategy),
            icon: e.descriptor.icon.clone().unwrap_or_default(),
        }
    }
}

pub(super) fn control_label(strategy: &Strategy) -> String {
    match strategy {
        Strategy::CommandPair(pair) => format!("{} / {}", pair.on, pair.off),
        Strategy::Setting => "setting".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &CapabilitiesArgs, ctx: &Context) -> Result<(), CliError> {
    let table = ctx.config.capability_table()?;

    if let Some(wanted) = &args.appliance_type {
        if table.for_type(wanted).is_none() {
            return Err(CliError::UnknownApplianceType {
                appliance_type: wanted.clone(),
                available: table.appliance_types().collect::<Vec<_>>().join(", "),
            });
        }
    }

    let entries: Vec<CapabilityEntry<'_>> = table
        .entries()
        .filter(|(appliance_type, _)| {
            args.appliance_type
                .as_deref()
                .is_none_or(|wanted| wanted == *appliance_type)
        })
        .flat_map(|(appliance_type, descriptors)| {
            descriptors.iter().map(move |descriptor| CapabilityEntry {
                appliance_type,
                category: descriptor.category(),
                descriptor,
            })
        })
        .collect();

    let out = output::render_list(ctx.output, &entries, |e| CapabilityRow::from(e), |e| {
        format!("{}/{}", e.appliance_type, e.descriptor.key)
    })?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
