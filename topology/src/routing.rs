use crate::config::EnvironmentConfig;
use crate::error::TopologyResult;
use crate::naming::{ResourceKind, ResourceName};
use crate::service::ServiceConfig;
use crate::validation::validate_services;
use serde::{Deserialize, Serialize};

/// Listener rule priorities accepted by the load balancer.
pub const MIN_PRIORITY: u32 = 1;
pub const MAX_PRIORITY: u32 = 50_000;

/// Path-based forward from the shared listener to one service's target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub action_id: String,
    pub priority: u32,
    pub path_patterns: Vec<String>,
    pub target: ResourceName,
}

impl RoutingRule {
    pub fn for_service(environment: &str, service: &ServiceConfig) -> Self {
        Self {
            action_id: format!("forward-to-{}-target-group", service.name),
            priority: service.priority,
            path_patterns: service.path_patterns(),
            target: ResourceName::per_service(environment, &service.name, ResourceKind::TargetGroup),
        }
    }

    /// Case-sensitive match; a trailing `*` matches any remainder, including none.
    pub fn matches(&self, path: &str) -> bool {
        self.path_patterns.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => path == pattern,
        })
    }
}

/// Action taken when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DefaultAction {
    FixedResponse {
        status_code: u16,
        content_type: String,
        message_body: String,
    },
}

impl Default for DefaultAction {
    fn default() -> Self {
        DefaultAction::FixedResponse {
            status_code: 200,
            content_type: "text/plain".to_string(),
            message_body: "Default Response".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision<'a> {
    Forward(&'a RoutingRule),
    Default(&'a DefaultAction),
}

/// Rules attached to the environment's listener, in service declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerRules {
    pub rules: Vec<RoutingRule>,
    pub default_action: DefaultAction,
}

impl ListenerRules {
    pub(crate) fn derive(environment: &str, services: &[ServiceConfig]) -> Self {
        Self {
            rules: services
                .iter()
                .map(|service| RoutingRule::for_service(environment, service))
                .collect(),
            default_action: DefaultAction::default(),
        }
    }

    /// Rules plus the default action.
    pub fn total_rules(&self) -> usize {
        self.rules.len() + 1
    }

    /// Evaluate a request path the way the listener does: lowest priority
    /// number first, falling through to the default action.
    pub fn route(&self, path: &str) -> RouteDecision<'_> {
        let mut ordered: Vec<&RoutingRule> = self.rules.iter().collect();
        ordered.sort_by_key(|rule| rule.priority);

        ordered
            .into_iter()
            .find(|rule| rule.matches(path))
            .map(RouteDecision::Forward)
            .unwrap_or(RouteDecision::Default(&self.default_action))
    }
}

/// Validate the services and derive one rule per service plus the default.
pub fn derive_routing(
    environment: &EnvironmentConfig,
    services: &[ServiceConfig],
) -> TopologyResult<ListenerRules> {
    validate_services(environment, services)?;
    Ok(ListenerRules::derive(&environment.name, services))
}
