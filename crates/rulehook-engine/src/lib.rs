//! # rulehook-engine
//!
//! Rule execution engine with per-method lifecycle hooks. Provides:
//!
//! - Hook timing model: which `(method, timing)` hooks exist and which
//!   validator gates each method
//! - `Rule`: a named condition and action bound to one hook
//! - `RuleRunner`: ordered rule registry with synchronous dispatch
//! - `SharedRuleRunner`: lock-guarded runner for concurrent callers
//! - `update_value`: dotted-path writes used by rule actions

pub mod context;
pub mod hooks;
pub mod rule;
pub mod runner;
pub mod shared;
pub mod update;

pub use context::RuleContext;
pub use hooks::definitions::{ActionHookMethod, ActionHookTime, FullEventName, HookKey};
pub use hooks::model::{HookModel, PossibleHookPerMethod, ValidateHookPerMethod, Validator};
pub use rule::{Action, Condition, Rule};
pub use runner::{DispatchReport, ERROR_METADATA_KEY, LifecycleReport, RuleFailure, RuleRunner};
pub use shared::SharedRuleRunner;
pub use update::update_value;
