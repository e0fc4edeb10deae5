//! Rules: a named condition and action bound to one hook.

use std::fmt;
use std::sync::Arc;

use rulehook_core::{AppError, AppResult};

use crate::context::RuleContext;
use crate::hooks::definitions::{ActionHookMethod, ActionHookTime, HookKey};
use crate::hooks::model::{HookModel, Validator};

/// Default rule priority. Lower runs first.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Predicate deciding whether a rule applies to a context.
pub type Condition = Arc<dyn Fn(&RuleContext) -> AppResult<bool> + Send + Sync>;

/// Side-effecting procedure run when a rule applies.
pub type Action = Arc<dyn Fn(&mut RuleContext) -> AppResult<()> + Send + Sync>;

/// A named condition/action pair attached to a `(method, timing)` hook.
///
/// Rules are immutable once created and cheap to clone; clones share the
/// same condition and action.
#[derive(Clone)]
pub struct Rule {
    name: String,
    key: HookKey,
    priority: i32,
    condition: Condition,
    action: Action,
    validator: Validator,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("priority", &self.priority)
            .field("condition", &"<closure>")
            .field("action", &"<closure>")
            .finish()
    }
}

impl Rule {
    /// Creates a rule for `method` at `timing`.
    ///
    /// Fails with an invalid-timing error when `model` does not permit the
    /// timing for the method, and with a configuration error when the
    /// method has no timing set or validator. The method's validator is
    /// captured so [`Rule::matches`] can be evaluated standalone.
    pub fn create<C, A>(
        name: impl Into<String>,
        method: ActionHookMethod,
        timing: ActionHookTime,
        condition: C,
        action: A,
        model: &HookModel,
    ) -> AppResult<Self>
    where
        C: Fn(&RuleContext) -> AppResult<bool> + Send + Sync + 'static,
        A: Fn(&mut RuleContext) -> AppResult<()> + Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::validation("Rule name must not be empty"));
        }

        model.check(method, timing)?;
        let validator = model.validator_for(method)?;

        Ok(Self {
            name,
            key: HookKey::new(method, timing),
            priority: DEFAULT_PRIORITY,
            condition: Arc::new(condition),
            action: Arc::new(action),
            validator,
        })
    }

    /// Returns a copy of this rule with a different priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Rebinds the rule to the validator of the model it is registered in.
    pub(crate) fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// The rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hook this rule is attached to.
    pub fn key(&self) -> HookKey {
        self.key
    }

    /// The hooked method.
    pub fn method(&self) -> ActionHookMethod {
        self.key.method
    }

    /// The hook timing.
    pub fn timing(&self) -> ActionHookTime {
        self.key.timing
    }

    /// Execution priority (lower = runs first).
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns whether the rule is eligible for `ctx`.
    ///
    /// The condition runs first; the method validator is only consulted when
    /// the condition passes. A failing condition is reported as a rule
    /// execution error naming this rule.
    pub fn matches(&self, ctx: &RuleContext) -> AppResult<bool> {
        let applies = (self.condition)(ctx)
            .map_err(|e| AppError::rule_execution(&self.name, "condition", e))?;
        Ok(applies && (self.validator)(ctx))
    }

    /// Runs the rule's action against `ctx`.
    pub fn run(&self, ctx: &mut RuleContext) -> AppResult<()> {
        (self.action)(ctx).map_err(|e| AppError::rule_execution(&self.name, "action", e))
    }
}
