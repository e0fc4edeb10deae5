//! Integration tests for lifecycle-wrapped operations and error policy.

mod helpers;

use serde_json::json;

use rulehook::{
    ActionHookMethod, ActionHookTime, AppError, ERROR_METADATA_KEY, ErrorKind, HookModel, Rule,
    RuleContext, RuleRunner, RunnerConfig,
};

fn failing(name: &str, timing: ActionHookTime) -> Rule {
    Rule::create(
        name,
        ActionHookMethod::Write,
        timing,
        |_: &RuleContext| Ok(true),
        |_: &mut RuleContext| Err(AppError::internal("quota exceeded")),
        &HookModel::default(),
    )
    .unwrap()
}

#[test]
fn test_lifecycle_order() {
    let mut runner = helpers::runner();
    runner
        .register(
            helpers::append_rule("pre", ActionHookMethod::Write, ActionHookTime::Before, "pre")
                .unwrap(),
        )
        .unwrap();
    runner
        .register(
            helpers::append_rule("post", ActionHookMethod::Write, ActionHookTime::After, "post")
                .unwrap(),
        )
        .unwrap();

    let mut ctx = helpers::list_context();
    let outcome = runner
        .run_lifecycle(ActionHookMethod::Write, &mut ctx, |ctx| {
            helpers::append(ctx, "write")?;
            Ok("stored")
        })
        .unwrap();

    assert_eq!(outcome.value, "stored");
    assert_eq!(ctx.data, json!({"list": ["pre", "write", "post"]}));
    assert!(outcome.reports.iter().all(|r| r.is_clean()));
}

#[test]
fn test_fail_fast_error_identifies_rule() {
    let mut runner = helpers::runner();
    runner.register(failing("quota", ActionHookTime::Before)).unwrap();

    let err = runner
        .dispatch(&"write.before".parse().unwrap(), &mut helpers::list_context())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::RuleExecution);
    assert!(err.message.contains("quota"));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("quota exceeded"));
}

#[test]
fn test_continue_on_error_runs_remaining_rules() {
    let mut runner = RuleRunner::with_config(HookModel::default(), RunnerConfig::continue_on_error());
    runner.register(failing("quota", ActionHookTime::After)).unwrap();
    runner
        .register(
            helpers::append_rule("audit", ActionHookMethod::Write, ActionHookTime::After, "a")
                .unwrap(),
        )
        .unwrap();

    let mut ctx = helpers::list_context();
    let outcome = runner
        .run_lifecycle(ActionHookMethod::Write, &mut ctx, |_| Ok(()))
        .unwrap();

    let after = outcome.reports.last().unwrap();
    assert_eq!(after.failures.len(), 1);
    assert_eq!(after.failures[0].rule, "quota");
    assert_eq!(after.executed, vec!["audit"]);
    assert_eq!(ctx.data, json!({"list": ["a"]}));
}

#[test]
fn test_on_error_hooks_receive_failure() {
    let mut runner = helpers::runner();
    runner
        .register(
            Rule::create(
                "capture",
                ActionHookMethod::Delete,
                ActionHookTime::OnError,
                |_: &RuleContext| Ok(true),
                |ctx: &mut RuleContext| {
                    let message = ctx
                        .get_string(ERROR_METADATA_KEY)
                        .unwrap_or_default()
                        .to_string();
                    ctx.update("last_error", json!(message))
                },
                &HookModel::default(),
            )
            .unwrap(),
        )
        .unwrap();

    let mut ctx = RuleContext::new(json!({}));
    let err = runner
        .run_lifecycle::<(), _>(ActionHookMethod::Delete, &mut ctx, |_| {
            Err(AppError::not_found("record 42"))
        })
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(ctx.data["last_error"], json!("NOT_FOUND: record 42"));
}
