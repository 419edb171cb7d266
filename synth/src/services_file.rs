//! Service descriptors loaded from TOML.
//!
//! ```toml
//! [[services]]
//! name = "EmailService"
//! path = "EmailService"
//! priority = 10
//! image = "amazon/amazon-ecs-sample"
//!
//! [services.health_check]
//! interval_secs = 30
//! timeout_secs = 10
//! ```
//!
//! Omitted sizing fields take the same defaults as [`ServiceConfig::new`].

use crate::error::{SynthError, SynthResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use topology::ServiceConfig;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServicesFile {
    #[serde(default)]
    services: Vec<ServiceConfig>,
}

pub fn parse_services(raw: &str) -> SynthResult<Vec<ServiceConfig>> {
    let file: ServicesFile = toml::from_str(raw)?;
    Ok(file.services)
}

pub fn load_services(path: &Path) -> SynthResult<Vec<ServiceConfig>> {
    let raw = fs::read_to_string(path).map_err(|source| SynthError::ServicesFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let services = parse_services(&raw)?;
    info!(path = %path.display(), services = services.len(), "loaded services file");
    Ok(services)
}

/// Services from `path` when given, otherwise the built-in defaults.
pub fn resolve_services(path: Option<&Path>) -> SynthResult<Vec<ServiceConfig>> {
    match path {
        Some(path) => load_services(path),
        None => Ok(ServiceConfig::defaults()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_descriptor() {
        let raw = r#"
            [[services]]
            name = "Billing"
            path = "billing"
            priority = 30
            image = "registry.example.com/billing:1.0"
            cpu = 512
            memory_mib = 1024
            desired_count = 3
            container_port = 8080
            target_port = 8080

            [services.health_check]
            path = "/health"
            interval_secs = 15
            timeout_secs = 5
        "#;

        let services = parse_services(raw).unwrap();
        assert_eq!(services.len(), 1);
        let billing = &services[0];
        assert_eq!(billing.name, "Billing");
        assert_eq!(billing.cpu, 512);
        assert_eq!(billing.container_port, 8080);
        assert_eq!(billing.health_check.path, "/health");
        assert_eq!(billing.health_check.timeout_secs, 5);
    }

    #[test]
    fn test_parse_applies_defaults() {
        let raw = r#"
            [[services]]
            name = "EmailService"
            path = "EmailService"
            priority = 10

            [[services]]
            name = "OtherService"
            path = "OtherService"
            priority = 20
            image = "nginx:latest"
        "#;

        assert_eq!(parse_services(raw).unwrap(), ServiceConfig::defaults());
    }

    #[test]
    fn test_health_check_path_defaults_to_root() {
        let raw = r#"
            [[services]]
            name = "Search"
            path = "search"
            priority = 40

            [services.health_check]
            interval_secs = 20
            timeout_secs = 5
        "#;

        let services = parse_services(raw).unwrap();
        assert_eq!(services[0].health_check.path, "/");
        assert_eq!(services[0].health_check.interval_secs, 20);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_services("[[services]]\nname = \"NoPriority\"\npath = \"x\"\n"),
            Err(SynthError::ServicesFileParse(_))
        ));
        assert!(matches!(
            parse_services("unexpected = true\n"),
            Err(SynthError::ServicesFileParse(_))
        ));
        assert!(parse_services("").unwrap().is_empty());
    }

    #[test]
    fn test_misspelled_fields_are_rejected() {
        let raw = r#"
            [[services]]
            name = "EmailService"
            path = "EmailService"
            priority = 5
            memory = 4096
            desired_cout = 6
        "#;
        assert!(matches!(parse_services(raw), Err(SynthError::ServicesFileParse(_))));

        let raw = r#"
            [[services]]
            name = "EmailService"
            path = "EmailService"
            priority = 5

            [services.health_check]
            interval_secs = 30
            timeout_secs = 10
            healthy_threshold = 3
        "#;
        assert!(matches!(parse_services(raw), Err(SynthError::ServicesFileParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[services]]\nname = \"EmailService\"\npath = \"EmailService\"\npriority = 10"
        )
        .unwrap();

        let services = load_services(file.path()).unwrap();
        assert_eq!(services, vec![ServiceConfig::email_service()]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("services.toml");
        assert!(matches!(
            load_services(&missing),
            Err(SynthError::ServicesFileRead { path, .. }) if path == missing
        ));
    }

    #[test]
    fn test_resolve_without_path_uses_defaults() {
        assert_eq!(resolve_services(None).unwrap(), ServiceConfig::defaults());
    }
}
