use crate::error::{TopologyError, TopologyResult};
use crate::routing::{MAX_PRIORITY, MIN_PRIORITY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Unreserved URL characters; anything else would need escaping in a path pattern.
fn path_segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("static pattern"))
}

fn service_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").expect("static pattern"))
}

fn default_image() -> String {
    "amazon/amazon-ecs-sample".to_string()
}

fn default_cpu() -> u32 {
    256
}

fn default_memory_mib() -> u32 {
    512
}

fn default_desired_count() -> u32 {
    2
}

fn default_port() -> u16 {
    80
}

fn default_health_path() -> String {
    "/".to_string()
}

/// Target-group health check. The path must be served with a 200 by the
/// container behind the target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckConfig {
    #[serde(default = "default_health_path")]
    pub path: String,
    pub interval_secs: u32,
    pub timeout_secs: u32,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            interval_secs: 30,
            timeout_secs: 10,
        }
    }
}

impl HealthCheckConfig {
    pub fn validate(&self, service: &str) -> TopologyResult<()> {
        let field = |name: &str| format!("{service}.health_check.{name}");

        if !self.path.starts_with('/') {
            return Err(TopologyError::invalid(field("path"), "must start with '/'"));
        }

        if !(5..=300).contains(&self.interval_secs) {
            return Err(TopologyError::invalid(
                field("interval_secs"),
                "must be between 5 and 300 seconds",
            ));
        }

        if !(2..=120).contains(&self.timeout_secs) {
            return Err(TopologyError::invalid(
                field("timeout_secs"),
                "must be between 2 and 120 seconds",
            ));
        }

        if self.timeout_secs >= self.interval_secs {
            return Err(TopologyError::invalid(
                field("timeout_secs"),
                format!(
                    "must be less than the interval ({}s)",
                    self.interval_secs
                ),
            ));
        }

        Ok(())
    }
}

/// One deployable unit: its image, sizing and routing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub name: String,
    pub path: String,
    pub priority: u32,
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_cpu")]
    pub cpu: u32,
    #[serde(default = "default_memory_mib")]
    pub memory_mib: u32,
    #[serde(default = "default_desired_count")]
    pub desired_count: u32,
    #[serde(default = "default_port")]
    pub container_port: u16,
    #[serde(default = "default_port")]
    pub target_port: u16,
    #[serde(default)]
    pub health_check: HealthCheckConfig,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>, path: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            priority,
            image: default_image(),
            cpu: default_cpu(),
            memory_mib: default_memory_mib(),
            desired_count: default_desired_count(),
            container_port: default_port(),
            target_port: default_port(),
            health_check: HealthCheckConfig::default(),
        }
    }

    pub fn email_service() -> Self {
        Self::new("EmailService", "EmailService", 10)
    }

    pub fn other_service() -> Self {
        Self::new("OtherService", "OtherService", 20).with_image("nginx:latest")
    }

    /// The services deployed to every environment unless overridden.
    pub fn defaults() -> Vec<Self> {
        vec![Self::email_service(), Self::other_service()]
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_cpu(mut self, cpu: u32) -> Self {
        self.cpu = cpu;
        self
    }

    pub fn with_memory(mut self, memory_mib: u32) -> Self {
        self.memory_mib = memory_mib;
        self
    }

    pub fn with_desired_count(mut self, desired_count: u32) -> Self {
        self.desired_count = desired_count;
        self
    }

    pub fn with_container_port(mut self, port: u16) -> Self {
        self.container_port = port;
        self
    }

    pub fn with_target_port(mut self, port: u16) -> Self {
        self.target_port = port;
        self
    }

    pub fn with_health_check(mut self, health_check: HealthCheckConfig) -> Self {
        self.health_check = health_check;
        self
    }

    /// Lowercased service name used inside resource names.
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }

    /// Exact path plus everything below it.
    pub fn path_patterns(&self) -> Vec<String> {
        vec![format!("/{}", self.path), format!("/{}/*", self.path)]
    }

    pub fn validate(&self) -> TopologyResult<()> {
        if self.name.is_empty() {
            return Err(TopologyError::invalid("service.name", "must not be empty"));
        }

        if !service_name_pattern().is_match(&self.name) {
            return Err(TopologyError::invalid(
                format!("{}.name", self.name),
                "must start with a letter and contain only letters, digits and hyphens",
            ));
        }

        let field = |name: &str| format!("{}.{}", self.name, name);

        if self.path.is_empty() {
            return Err(TopologyError::invalid(field("path"), "must not be empty"));
        }

        if !path_segment_pattern().is_match(&self.path) {
            return Err(TopologyError::invalid(
                field("path"),
                format!("'{}' is not a URL-safe path segment", self.path),
            ));
        }

        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(TopologyError::invalid(
                field("priority"),
                format!("must be between {MIN_PRIORITY} and {MAX_PRIORITY}"),
            ));
        }

        if self.image.is_empty() {
            return Err(TopologyError::invalid(field("image"), "must not be empty"));
        }

        if self.cpu == 0 {
            return Err(TopologyError::invalid(field("cpu"), "must be greater than 0"));
        }

        if self.memory_mib == 0 {
            return Err(TopologyError::invalid(
                field("memory_mib"),
                "must be greater than 0",
            ));
        }

        if self.desired_count == 0 {
            return Err(TopologyError::invalid(
                field("desired_count"),
                "must be greater than 0",
            ));
        }

        if self.container_port == 0 {
            return Err(TopologyError::invalid(
                field("container_port"),
                "must be greater than 0",
            ));
        }

        if self.target_port == 0 {
            return Err(TopologyError::invalid(
                field("target_port"),
                "must be greater than 0",
            ));
        }

        self.health_check.validate(&self.name)
    }
}
