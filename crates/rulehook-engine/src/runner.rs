//! Rule runner: owns registered rules and dispatches events to them.
//!
//! Dispatch semantics:
//! - The event resolves to a `(method, timing)` hook key.
//! - Rules under that key run in priority order; equal priorities keep
//!   insertion order.
//! - Each rule's `matches` is evaluated against the context; eligible rules
//!   run their action, which may mutate the context.
//! - By default the first failing rule aborts the dispatch. With
//!   `continue_on_error` the failure is recorded and dispatch moves on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use rulehook_core::config::runner::RunnerConfig;
use rulehook_core::config::EngineConfig;
use rulehook_core::{AppError, AppResult};

use crate::context::RuleContext;
use crate::hooks::definitions::{ActionHookMethod, ActionHookTime, FullEventName, HookKey};
use crate::hooks::model::HookModel;
use crate::rule::Rule;

/// Metadata key under which `run_lifecycle` exposes an operation failure to
/// `on_error` rules.
pub const ERROR_METADATA_KEY: &str = "error";

/// A rule failure collected while dispatching with `continue_on_error`.
#[derive(Debug, Clone)]
pub struct RuleFailure {
    /// Name of the failing rule.
    pub rule: String,
    /// The wrapped failure.
    pub error: AppError,
}

/// Outcome of dispatching one event.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Identifier correlating this dispatch in logs.
    pub dispatch_id: Uuid,
    /// The dispatched event.
    pub event: FullEventName,
    /// When dispatch started.
    pub started_at: DateTime<Utc>,
    /// Names of rules whose action ran, in execution order.
    pub executed: Vec<String>,
    /// Names of rules that did not match.
    pub skipped: Vec<String>,
    /// Failures recorded when continuing past errors.
    pub failures: Vec<RuleFailure>,
}

impl DispatchReport {
    fn new(event: FullEventName) -> Self {
        Self {
            dispatch_id: Uuid::new_v4(),
            event,
            started_at: Utc::now(),
            executed: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of rules whose action ran.
    pub fn executed_count(&self) -> usize {
        self.executed.len()
    }

    /// Whether no rule failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Value produced by `run_lifecycle` plus the reports of every hook
/// dispatched around it.
#[derive(Debug, Clone)]
pub struct LifecycleReport<T> {
    /// The operation's result.
    pub value: T,
    /// Reports for the `before` and `after` dispatches that ran.
    pub reports: Vec<DispatchReport>,
}

/// Registry of rules keyed by hook, with synchronous dispatch.
#[derive(Debug)]
pub struct RuleRunner {
    model: HookModel,
    config: RunnerConfig,
    /// Hook key → rules in execution order.
    rules: HashMap<HookKey, Vec<Rule>>,
    /// Rule name → hook key.
    index: HashMap<String, HookKey>,
}

impl RuleRunner {
    /// Creates a fail-fast runner over `model`.
    pub fn new(model: HookModel) -> Self {
        Self::with_config(model, RunnerConfig::default())
    }

    /// Creates a runner with explicit dispatch configuration.
    pub fn with_config(model: HookModel, config: RunnerConfig) -> Self {
        Self {
            model,
            config,
            rules: HashMap::new(),
            index: HashMap::new(),
        }
    }

    /// Creates a runner from engine configuration.
    pub fn from_config(config: &EngineConfig) -> AppResult<Self> {
        let model = HookModel::from_config(config)?;
        Ok(Self::with_config(model, config.runner.clone()))
    }

    /// Registers a rule.
    ///
    /// The rule's hook is re-checked against this runner's model and the
    /// rule is rebound to this model's validator for its method, so dispatch
    /// always gates on the runner's own table. Names must be unique across
    /// the runner.
    pub fn register(&mut self, rule: Rule) -> AppResult<()> {
        let key = rule.key();
        self.model.check(key.method, key.timing)?;
        let rule = rule.with_validator(self.model.validator_for(key.method)?);

        if self.index.contains_key(rule.name()) {
            return Err(AppError::conflict(format!(
                "Rule '{}' is already registered",
                rule.name()
            )));
        }

        let name = rule.name().to_string();
        let priority = rule.priority();
        let entries = self.rules.entry(key).or_default();
        let position = entries
            .iter()
            .position(|existing| existing.priority() > priority)
            .unwrap_or(entries.len());
        entries.insert(position, rule);
        self.index.insert(name.clone(), key);

        info!(rule = %name, hook = %key, priority = priority, "Rule registered");
        Ok(())
    }

    /// Removes the rule called `name`, returning it, or `None` if absent.
    pub fn deregister(&mut self, name: &str) -> Option<Rule> {
        let key = self.index.remove(name)?;
        let entries = self.rules.get_mut(&key)?;
        let position = entries.iter().position(|r| r.name() == name)?;
        let rule = entries.remove(position);

        if entries.is_empty() {
            self.rules.remove(&key);
        }

        info!(rule = %name, hook = %key, "Rule deregistered");
        Some(rule)
    }

    /// Dispatches `event` to every rule registered under its hook.
    ///
    /// Fails with an invalid-timing error if the event names a hook the
    /// model does not permit.
    pub fn dispatch(
        &self,
        event: &FullEventName,
        ctx: &mut RuleContext,
    ) -> AppResult<DispatchReport> {
        let key = event.key();
        self.model.check(key.method, key.timing)?;

        let rules = self.rules_for(key);
        let mut report = DispatchReport::new(*event);

        debug!(
            event = %event,
            dispatch_id = %report.dispatch_id,
            rule_count = rules.len(),
            "Dispatching event"
        );

        for rule in &rules {
            match apply(rule, ctx) {
                Ok(true) => {
                    debug!(event = %event, rule = %rule.name(), "Rule executed");
                    report.executed.push(rule.name().to_string());
                }
                Ok(false) => {
                    debug!(event = %event, rule = %rule.name(), "Rule did not match");
                    report.skipped.push(rule.name().to_string());
                }
                Err(err) if self.config.continue_on_error => {
                    warn!(
                        event = %event,
                        dispatch_id = %report.dispatch_id,
                        rule = %rule.name(),
                        error = %err,
                        "Rule failed, continuing"
                    );
                    report.failures.push(RuleFailure {
                        rule: rule.name().to_string(),
                        error: err,
                    });
                }
                Err(err) => {
                    error!(
                        event = %event,
                        dispatch_id = %report.dispatch_id,
                        rule = %rule.name(),
                        error = %err,
                        "Rule failed, aborting dispatch"
                    );
                    return Err(err);
                }
            }
        }

        Ok(report)
    }

    /// Runs `operation` wrapped by the method's `before`, `after`, and
    /// `on_error` hooks.
    ///
    /// Hooks the model does not permit for `method` are skipped. A failing
    /// `before` dispatch prevents the operation from running. When the
    /// operation fails, `on_error` rules see the failure under
    /// [`ERROR_METADATA_KEY`] and the operation's error is returned. The key
    /// is removed from the context once the `on_error` dispatch finishes.
    pub fn run_lifecycle<T, F>(
        &self,
        method: ActionHookMethod,
        ctx: &mut RuleContext,
        operation: F,
    ) -> AppResult<LifecycleReport<T>>
    where
        F: FnOnce(&mut RuleContext) -> AppResult<T>,
    {
        let mut reports = Vec::new();

        if let Some(report) = self.dispatch_if_permitted(method, ActionHookTime::Before, ctx)? {
            reports.push(report);
        }

        let value = match operation(ctx) {
            Ok(value) => value,
            Err(err) => {
                ctx.metadata.insert(
                    ERROR_METADATA_KEY.to_string(),
                    serde_json::json!(err.to_string()),
                );
                let handled = self.dispatch_if_permitted(method, ActionHookTime::OnError, ctx);
                ctx.metadata.remove(ERROR_METADATA_KEY);
                if let Err(hook_err) = handled {
                    warn!(
                        method = %method,
                        error = %hook_err,
                        "on_error hooks failed while handling operation failure"
                    );
                }
                return Err(err);
            }
        };

        if let Some(report) = self.dispatch_if_permitted(method, ActionHookTime::After, ctx)? {
            reports.push(report);
        }

        Ok(LifecycleReport { value, reports })
    }

    fn dispatch_if_permitted(
        &self,
        method: ActionHookMethod,
        timing: ActionHookTime,
        ctx: &mut RuleContext,
    ) -> AppResult<Option<DispatchReport>> {
        if !self.model.possible().is_allowed(method, timing)? {
            return Ok(None);
        }
        self.dispatch(&FullEventName::new(method, timing), ctx)
            .map(Some)
    }

    /// Snapshot of the rules registered under `key`, in execution order.
    pub fn rules_for(&self, key: HookKey) -> Vec<Rule> {
        self.rules.get(&key).cloned().unwrap_or_default()
    }

    /// Gets a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        let key = self.index.get(name)?;
        self.rules.get(key)?.iter().find(|r| r.name() == name)
    }

    /// Returns whether a rule with `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Hook keys that currently have rules.
    pub fn hooks(&self) -> Vec<HookKey> {
        let mut keys: Vec<HookKey> = self.rules.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The hook model rules are checked against.
    pub fn model(&self) -> &HookModel {
        &self.model
    }

    /// The dispatch configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }
}

fn apply(rule: &Rule, ctx: &mut RuleContext) -> AppResult<bool> {
    if !rule.matches(ctx)? {
        return Ok(false);
    }
    rule.run(ctx)?;
    Ok(true)
}
