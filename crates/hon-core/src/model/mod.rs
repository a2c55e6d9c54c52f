// ── Domain model ──
//
// Appliance identity, settings, and the state snapshots the coordinator
// caches. These mirror what the vendor client exposes, nothing more.

pub mod appliance;
pub mod setting;
pub mod snapshot;

pub use appliance::ApplianceInfo;
pub use setting::{RangeSetting, Setting};
pub use snapshot::{ApplianceSnapshot, ApplianceState, is_truthy};
