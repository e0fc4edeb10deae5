//! Integration tests for rule registration and dispatch.

mod helpers;

use serde_json::json;

use rulehook::{ActionHookMethod, ActionHookTime, ErrorKind, FullEventName};

#[test]
fn test_single_rule_appends_to_list() {
    let mut runner = helpers::runner();
    runner
        .register(
            helpers::append_rule("R1", ActionHookMethod::Write, ActionHookTime::Before, "x")
                .unwrap(),
        )
        .unwrap();

    let mut ctx = helpers::list_context();
    let event: FullEventName = "write.before".parse().unwrap();
    let report = runner.dispatch(&event, &mut ctx).unwrap();

    assert_eq!(ctx.data, json!({"list": ["x"]}));
    assert_eq!(report.executed_count(), 1);
    assert_eq!(report.event, event);
}

#[test]
fn test_only_matching_condition_executes() {
    let mut runner = helpers::runner();
    runner
        .register(
            helpers::conditional_append_rule(
                "R1",
                ActionHookMethod::Write,
                ActionHookTime::Before,
                false,
                "from-r1",
            )
            .unwrap(),
        )
        .unwrap();
    runner
        .register(
            helpers::conditional_append_rule(
                "R2",
                ActionHookMethod::Write,
                ActionHookTime::Before,
                true,
                "from-r2",
            )
            .unwrap(),
        )
        .unwrap();

    let mut ctx = helpers::list_context();
    let report = runner
        .dispatch(&"write.before".parse().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(report.executed, vec!["R2"]);
    assert_eq!(report.skipped, vec!["R1"]);
    assert_eq!(ctx.data, json!({"list": ["from-r2"]}));
}

#[test]
fn test_invalid_timing_rejected_at_creation_not_dispatch() {
    let err = helpers::append_rule("R1", ActionHookMethod::Read, ActionHookTime::OnError, "x")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTiming);

    // Nothing was registered, so a permitted dispatch finds no rules.
    let runner = helpers::runner();
    let report = runner
        .dispatch(&"read.after".parse().unwrap(), &mut helpers::list_context())
        .unwrap();
    assert_eq!(report.executed_count(), 0);
}

#[test]
fn test_every_matching_rule_runs_exactly_once_in_order() {
    let mut runner = helpers::runner();
    for (name, item) in [("one", "1"), ("two", "2"), ("three", "3")] {
        runner
            .register(
                helpers::append_rule(name, ActionHookMethod::Create, ActionHookTime::After, item)
                    .unwrap(),
            )
            .unwrap();
    }
    // Same method, different timing: must not run.
    runner
        .register(
            helpers::append_rule("other", ActionHookMethod::Create, ActionHookTime::Before, "b")
                .unwrap(),
        )
        .unwrap();

    let mut ctx = helpers::list_context();
    runner
        .dispatch(&"create.after".parse().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(ctx.data, json!({"list": ["1", "2", "3"]}));
}

#[test]
fn test_deregistered_rule_never_runs_again() {
    let mut runner = helpers::runner();
    runner
        .register(
            helpers::append_rule("gone", ActionHookMethod::Delete, ActionHookTime::Before, "g")
                .unwrap(),
        )
        .unwrap();

    let event: FullEventName = "delete.before".parse().unwrap();
    let mut first = helpers::list_context();
    runner.dispatch(&event, &mut first).unwrap();
    assert_eq!(first.data, json!({"list": ["g"]}));

    assert!(runner.deregister("gone").is_some());

    for _ in 0..3 {
        let mut ctx = helpers::list_context();
        let report = runner.dispatch(&event, &mut ctx).unwrap();
        assert_eq!(report.executed_count(), 0);
        assert_eq!(ctx.data, json!({"list": []}));
    }
}

#[test]
fn test_validator_gates_rule() {
    let mut runner = helpers::runner();
    runner
        .register(
            helpers::append_rule("w", ActionHookMethod::Write, ActionHookTime::After, "x")
                .unwrap(),
        )
        .unwrap();

    // Write's built-in validator only approves object data.
    let mut ctx = rulehook::RuleContext::new(json!(["not", "an", "object"]));
    let report = runner
        .dispatch(&"write.after".parse().unwrap(), &mut ctx)
        .unwrap();

    assert_eq!(report.executed_count(), 0);
    assert_eq!(report.skipped, vec!["w"]);
}

#[test]
fn test_malformed_event_name() {
    let err = "write:before".parse::<FullEventName>().unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidEventName);
}

#[tokio::test]
async fn test_shared_runner_dispatch() {
    let shared = rulehook::SharedRuleRunner::new(helpers::runner());
    shared
        .register(
            helpers::append_rule("s", ActionHookMethod::Update, ActionHookTime::Before, "s")
                .unwrap(),
        )
        .await
        .unwrap();

    let mut ctx = helpers::list_context();
    let report = shared
        .dispatch(&"update.before".parse().unwrap(), &mut ctx)
        .await
        .unwrap();

    assert_eq!(report.executed_count(), 1);
    assert_eq!(ctx.data, json!({"list": ["s"]}));
}
