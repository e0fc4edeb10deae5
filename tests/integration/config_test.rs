//! Integration tests for configuration-driven runners.

mod helpers;

use rulehook::{ActionHookMethod, ActionHookTime, EngineConfig, ErrorKind, RuleRunner};

#[test]
fn test_runner_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rulehook.toml");
    std::fs::write(
        &path,
        r#"
[runner]
continue_on_error = true

[hooks]
write = ["before"]
"#,
    )
    .unwrap();

    let config = EngineConfig::load(Some(&path)).unwrap();
    let mut runner = RuleRunner::from_config(&config).unwrap();
    assert!(runner.config().continue_on_error);

    // Rules are created against the default model, the runner re-checks
    // them against its own narrower table.
    let before =
        helpers::append_rule("b", ActionHookMethod::Write, ActionHookTime::Before, "b").unwrap();
    let after =
        helpers::append_rule("a", ActionHookMethod::Write, ActionHookTime::After, "a").unwrap();

    runner.register(before).unwrap();
    let err = runner.register(after).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTiming);
}

#[test]
fn test_unknown_method_in_config_rejected() {
    let config = EngineConfig::from_toml_str("[hooks]\nupsert = [\"before\"]\n").unwrap();
    let err = RuleRunner::from_config(&config).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[test]
fn test_method_missing_from_config_is_configuration_error() {
    let config = EngineConfig::from_toml_str("[hooks]\nread = [\"after\"]\n").unwrap();
    let runner = RuleRunner::from_config(&config).unwrap();

    let err = runner
        .dispatch(&"write.after".parse().unwrap(), &mut helpers::list_context())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}
