// tests/resolution.rs

//! Option and dependency resolution through the public API.

mod common;

use brigade::recipe::options::{OptionValue, UserOverrides};
use brigade::recipe::{
    resolve_dependencies, resolve_options, Dependency, OptionSchema, Predicate, Requirement,
};
use brigade::{evaluate, parse_recipe, Error, PlatformFact};
use common::{linux, windows, GVW_RECIPE};

fn overrides(pairs: &[(&str, OptionValue)]) -> UserOverrides {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[test]
fn test_override_replaces_default() {
    let schema = OptionSchema::default()
        .with_option("x", OptionSchema::boolean())
        .with_default("x", false);

    let config = resolve_options(
        &schema,
        &overrides(&[("x", OptionValue::Bool(true))]),
        &linux(),
    )
    .unwrap();

    assert_eq!(config.get("x"), Some(&OptionValue::Bool(true)));
}

#[test]
fn test_unknown_override_rejected() {
    let schema = OptionSchema::default().with_option("x", OptionSchema::boolean());

    let err = resolve_options(
        &schema,
        &overrides(&[("y", OptionValue::Bool(true))]),
        &linux(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::UnknownOption(name) if name == "y"));
}

#[test]
fn test_removed_option_absent_despite_override() {
    let schema = OptionSchema::default()
        .with_option("fPIC", OptionSchema::boolean())
        .with_default("fPIC", true)
        .with_removal(Predicate::platform(PlatformFact::Os, "Windows"), &["fPIC"]);
    let user = overrides(&[("fPIC", OptionValue::Bool(true))]);

    let on_windows = resolve_options(&schema, &user, &windows()).unwrap();
    assert!(!on_windows.contains("fPIC"));

    let on_linux = resolve_options(&schema, &user, &linux()).unwrap();
    assert_eq!(on_linux.get("fPIC"), Some(&OptionValue::Bool(true)));
}

#[test]
fn test_excluded_requirement_does_not_shadow_later_one() {
    let config = resolve_options(
        &OptionSchema::default()
            .with_option("new_lib", OptionSchema::boolean())
            .with_default("new_lib", true),
        &UserOverrides::new(),
        &linux(),
    )
    .unwrap();

    let requires = vec![
        Requirement::when(
            Dependency::new("lib", "1.0"),
            Predicate::option("new_lib", false),
        ),
        Requirement::when(
            Dependency::new("lib", "2.0"),
            Predicate::option("new_lib", true),
        ),
    ];

    let graph = resolve_dependencies(&requires, &[], &config, &linux()).unwrap();
    assert_eq!(graph.requires, vec![Dependency::new("lib", "2.0")]);
}

#[test]
fn test_first_declared_version_wins() {
    let config = resolve_options(&OptionSchema::default(), &UserOverrides::new(), &linux())
        .unwrap();
    let requires = vec![
        Requirement::always(Dependency::new("lib", "1.0")),
        Requirement::always(Dependency::new("zlib", "1.3")),
        Requirement::always(Dependency::new("lib", "2.0")),
    ];

    let graph = resolve_dependencies(&requires, &[], &config, &linux()).unwrap();
    assert_eq!(
        graph.requires,
        vec![Dependency::new("lib", "1.0"), Dependency::new("zlib", "1.3")]
    );
}

#[test]
fn test_condition_on_removed_option_is_an_error() {
    let recipe = parse_recipe(
        r#"
[package]
name = "pic"
version = "0.1.0"

[options.domains]
fPIC = [true, false]

[options.defaults]
fPIC = true

[[options.remove]]
when = { platform = { fact = "os", equals = "Windows" } }
options = ["fPIC"]

[[requires]]
ref = "pic-helper/1.0.0"
when = { option = { name = "fPIC", equals = true } }
"#,
    )
    .unwrap();

    assert!(evaluate(&recipe, &linux(), &UserOverrides::new()).is_ok());

    let err = evaluate(&recipe, &windows(), &UserOverrides::new()).unwrap_err();
    assert!(matches!(err, Error::UndefinedOptionReference(name) if name == "fPIC"));
}

#[test]
fn test_evaluation_is_deterministic() {
    let recipe = parse_recipe(GVW_RECIPE).unwrap();
    let user = overrides(&[("gvw_examples", OptionValue::from("true"))]);

    let first = evaluate(&recipe, &linux(), &user).unwrap();
    let second = evaluate(&recipe, &linux(), &user).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.graph.requires.len(), 2);
    assert_eq!(
        first.config.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
        vec!["shared", "fPIC", "gvw_static", "gvw_examples"]
    );
}

#[test]
fn test_invalid_value_reports_option_and_value() {
    let recipe = parse_recipe(GVW_RECIPE).unwrap();
    let user = overrides(&[("shared", OptionValue::from("sometimes"))]);

    let err = evaluate(&recipe, &linux(), &user).unwrap_err();
    match err {
        Error::InvalidOptionValue { option, value } => {
            assert_eq!(option, "shared");
            assert_eq!(value, "sometimes");
        }
        other => panic!("unexpected error: {other}"),
    }
}
