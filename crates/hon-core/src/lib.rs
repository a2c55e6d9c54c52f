//! Switch capabilities for hOn appliances.
//!
//! This crate maps declarative capability tables onto the two ways an
//! appliance toggle can be driven, and keeps appliance state cached so
//! toggles read current state without a network call per read:
//!
//! - **[`CapabilityTable`]** -- Immutable per-appliance-type lists of
//!   [`CapabilityDescriptor`]s. [`CapabilityTable::builtin()`] covers
//!   washing machines, tumble dryers, washer dryers and dishwashers.
//!
//! - **[`Resolver`]** -- Filters a table down to what one appliance
//!   actually offers. Unsupported entries are logged and skipped.
//!
//! - **[`Coordinator`]** -- One per appliance. Owns refresh against the
//!   [`ApplianceClient`] and the versioned, copy-on-write
//!   [`ApplianceSnapshot`]; it is the only snapshot writer.
//!
//! - **[`CapabilityController`]** -- Bound to one resolved capability.
//!   `read_state` / `activate` / `deactivate` via either a command pair or
//!   a setting toggled between its off and on values.
//!
//! - **[`Hub`]** -- Host entry point: sets up appliances (first refresh,
//!   resolution, controllers) and tears them down.

pub mod capability;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod hub;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capability::{
    CapabilityController, CapabilityDescriptor, CapabilityTable, Category, CommandPair,
    ResolvedCapability, Resolver, Strategy, SwitchState,
};
pub use client::{ApplianceClient, ClientError, CommandRequest};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, RefreshStatus, SnapshotStream};
pub use error::CoreError;
pub use hub::Hub;
pub use model::{ApplianceInfo, ApplianceSnapshot, ApplianceState, RangeSetting, Setting};
