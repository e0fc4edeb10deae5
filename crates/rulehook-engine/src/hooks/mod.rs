//! Hook timing model: methods, timings, event names, and the per-method
//! timing and validator tables.

pub mod definitions;
pub mod model;

pub use definitions::{ActionHookMethod, ActionHookTime, FullEventName, HookKey};
pub use model::{HookModel, PossibleHookPerMethod, ValidateHookPerMethod, Validator};
