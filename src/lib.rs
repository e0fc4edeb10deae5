//! # rulehook
//!
//! Register named rules against `(method, timing)` hooks and dispatch
//! events to them. This crate re-exports the public surface of the
//! workspace crates.
//!
//! ```
//! use rulehook::{ActionHookMethod, ActionHookTime, HookModel, Rule, RuleContext, RuleRunner};
//! use serde_json::json;
//!
//! let model = HookModel::default();
//! let mut runner = RuleRunner::new(model.clone());
//! runner
//!     .register(Rule::create(
//!         "stamp",
//!         ActionHookMethod::Write,
//!         ActionHookTime::Before,
//!         |_: &RuleContext| Ok(true),
//!         |ctx: &mut RuleContext| ctx.update("stamped", json!(true)),
//!         &model,
//!     )?)?;
//!
//! let mut ctx = RuleContext::new(json!({}));
//! let report = runner.dispatch(&"write.before".parse()?, &mut ctx)?;
//! assert_eq!(report.executed_count(), 1);
//! assert_eq!(ctx.data, json!({"stamped": true}));
//! # Ok::<(), rulehook::AppError>(())
//! ```

pub use rulehook_core::config::logging::LoggingConfig;
pub use rulehook_core::config::runner::RunnerConfig;
pub use rulehook_core::config::EngineConfig;
pub use rulehook_core::logging::init_logging;
pub use rulehook_core::{AppError, AppResult, ErrorKind};

pub use rulehook_engine::{
    Action, ActionHookMethod, ActionHookTime, Condition, DispatchReport, ERROR_METADATA_KEY,
    FullEventName, HookKey, HookModel, LifecycleReport, PossibleHookPerMethod, Rule, RuleContext,
    RuleFailure, RuleRunner, SharedRuleRunner, ValidateHookPerMethod, Validator, update_value,
};
