use serial_test::serial;
use std::fs;
use synth::{
    load_services, synthesize, write_templates, EnvironmentSelection, SynthError, Targets,
};
use topology::{ServiceConfig, TopologyError};

const DUPLICATE_PRIORITY_SERVICES: &str = r#"
[[services]]
name = "EmailService"
path = "EmailService"
priority = 10

[[services]]
name = "OtherService"
path = "OtherService"
priority = 10
"#;

#[test]
fn test_full_synthesis_writes_both_stacks() {
    let dir = tempfile::tempdir().unwrap();
    let stacks = synthesize(
        EnvironmentSelection::All.environments(),
        &ServiceConfig::defaults(),
        &Targets::default(),
    )
    .unwrap();

    let written = write_templates(&stacks, dir.path()).unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("DevStack.template.json"),
            dir.path().join("ProdStack.template.json"),
        ]
    );

    let prod: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(prod["stack"], "ProdStack");
    assert_eq!(prod["environment"], "prod");
    assert_eq!(prod["region"], "eu-west-1");
    let rules = prod["listener"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["target"], "prod-emailservice-tg");
}

#[test]
fn test_repeated_synthesis_is_byte_identical() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();

    for dir in [&first_dir, &second_dir] {
        let stacks = synthesize(
            EnvironmentSelection::All.environments(),
            &ServiceConfig::defaults(),
            &Targets::default(),
        )
        .unwrap();
        write_templates(&stacks, dir.path()).unwrap();
    }

    for file in ["DevStack.template.json", "ProdStack.template.json"] {
        let first = fs::read(first_dir.path().join(file)).unwrap();
        let second = fs::read(second_dir.path().join(file)).unwrap();
        assert_eq!(first, second, "{file} differs between runs");
    }
}

#[test]
fn test_invalid_services_abort_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let services_path = dir.path().join("services.toml");
    fs::write(&services_path, DUPLICATE_PRIORITY_SERVICES).unwrap();
    let out = dir.path().join("out");

    let services = load_services(&services_path).unwrap();
    let result = synthesize(
        EnvironmentSelection::All.environments(),
        &services,
        &Targets::default(),
    )
    .and_then(|stacks| write_templates(&stacks, &out));

    assert!(matches!(
        result,
        Err(SynthError::Topology(TopologyError::DuplicatePriority { priority: 10, .. }))
    ));
    assert!(!out.exists());
}

#[test]
#[serial]
fn test_targets_from_environment_reach_templates() {
    std::env::set_var("DEV_ACCOUNT", "123456789012");
    std::env::set_var("DEV_REGION", "eu-north-1");
    let targets = Targets::from_env();
    std::env::remove_var("DEV_ACCOUNT");
    std::env::remove_var("DEV_REGION");

    let stacks = synthesize(
        EnvironmentSelection::Dev.environments(),
        &ServiceConfig::defaults(),
        &targets,
    )
    .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&stacks[0].to_template_json().unwrap()).unwrap();
    assert_eq!(json["account"], "123456789012");
    assert_eq!(json["region"], "eu-north-1");
}
