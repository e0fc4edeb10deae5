//! Shared test helpers for integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

use rulehook::{
    ActionHookMethod, ActionHookTime, AppResult, HookModel, Rule, RuleContext, RuleRunner,
};

/// Runner over the default hook model.
pub fn runner() -> RuleRunner {
    RuleRunner::new(HookModel::default())
}

/// Context whose data is `{"list": []}`.
pub fn list_context() -> RuleContext {
    RuleContext::new(json!({"list": []}))
}

/// Rule that appends `item` to the `list` array in the context data.
pub fn append_rule(
    name: &str,
    method: ActionHookMethod,
    timing: ActionHookTime,
    item: &'static str,
) -> AppResult<Rule> {
    conditional_append_rule(name, method, timing, true, item)
}

/// Like [`append_rule`] but with a fixed condition outcome.
pub fn conditional_append_rule(
    name: &str,
    method: ActionHookMethod,
    timing: ActionHookTime,
    condition: bool,
    item: &'static str,
) -> AppResult<Rule> {
    Rule::create(
        name,
        method,
        timing,
        move |_: &RuleContext| Ok(condition),
        move |ctx: &mut RuleContext| append(ctx, item),
        &HookModel::default(),
    )
}

/// Appends `item` to the `list` array of `ctx.data`.
pub fn append(ctx: &mut RuleContext, item: &str) -> AppResult<()> {
    let len = ctx
        .get("list")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    ctx.update(&format!("list.{len}"), json!(item))
}
