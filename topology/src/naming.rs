//! Deterministic resource naming.
//!
//! Every name is `{environment}-{suffix}` for shared resources and
//! `{environment}-{service}-{suffix}` for per-service resources, where
//! `{service}` is the lowercased service name. The same string is the
//! human-facing identifier and the provider-side lookup key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Load balancer and target group names are capped by the provider.
pub const MAX_BALANCER_NAME_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    PublicSubnet,
    PrivateSubnet,
    LoadBalancer,
    Listener,
    Cluster,
    ExecutionRole,
    Repository,
    TaskDefinition,
    Container,
    FargateService,
    TargetGroup,
    PostgresInstance,
    SqlServerInstance,
}

impl ResourceKind {
    /// Kinds that exist once per environment.
    pub const SHARED: [ResourceKind; 10] = [
        ResourceKind::Vpc,
        ResourceKind::PublicSubnet,
        ResourceKind::PrivateSubnet,
        ResourceKind::LoadBalancer,
        ResourceKind::Listener,
        ResourceKind::Cluster,
        ResourceKind::ExecutionRole,
        ResourceKind::Repository,
        ResourceKind::PostgresInstance,
        ResourceKind::SqlServerInstance,
    ];

    /// Kinds that exist once per service.
    pub const PER_SERVICE: [ResourceKind; 4] = [
        ResourceKind::TaskDefinition,
        ResourceKind::Container,
        ResourceKind::FargateService,
        ResourceKind::TargetGroup,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::PublicSubnet => "public",
            ResourceKind::PrivateSubnet => "private",
            ResourceKind::LoadBalancer => "lb",
            ResourceKind::Listener => "listener",
            ResourceKind::Cluster => "fargate-cluster",
            ResourceKind::ExecutionRole => "execution-role",
            ResourceKind::Repository => "repository",
            ResourceKind::TaskDefinition => "task-definition",
            ResourceKind::Container => "app-container",
            ResourceKind::FargateService => "service",
            ResourceKind::TargetGroup => "tg",
            ResourceKind::PostgresInstance => "db-microservices",
            ResourceKind::SqlServerInstance => "umbracodb",
        }
    }

    pub fn is_per_service(self) -> bool {
        Self::PER_SERVICE.contains(&self)
    }

    pub fn name_limit(self) -> Option<usize> {
        match self {
            ResourceKind::LoadBalancer | ResourceKind::TargetGroup => Some(MAX_BALANCER_NAME_LEN),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::PublicSubnet => "public subnet",
            ResourceKind::PrivateSubnet => "private subnet",
            ResourceKind::LoadBalancer => "load balancer",
            ResourceKind::Listener => "listener",
            ResourceKind::Cluster => "cluster",
            ResourceKind::ExecutionRole => "execution role",
            ResourceKind::Repository => "repository",
            ResourceKind::TaskDefinition => "task definition",
            ResourceKind::Container => "container",
            ResourceKind::FargateService => "fargate service",
            ResourceKind::TargetGroup => "target group",
            ResourceKind::PostgresInstance => "postgres instance",
            ResourceKind::SqlServerInstance => "sql server instance",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    /// Name of a resource shared by the whole environment.
    pub fn shared(environment: &str, kind: ResourceKind) -> Self {
        Self(format!("{}-{}", environment, kind.suffix()))
    }

    /// Name of a resource owned by one service.
    pub fn per_service(environment: &str, service: &str, kind: ResourceKind) -> Self {
        Self(format!(
            "{}-{}-{}",
            environment,
            service.to_lowercase(),
            kind.suffix()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Every name one environment needs, in declaration order.
pub fn environment_names<'a>(
    environment: &str,
    services: impl IntoIterator<Item = &'a str>,
) -> Vec<(ResourceKind, ResourceName)> {
    let mut names: Vec<_> = ResourceKind::SHARED
        .iter()
        .map(|&kind| (kind, ResourceName::shared(environment, kind)))
        .collect();

    for service in services {
        names.extend(
            ResourceKind::PER_SERVICE
                .iter()
                .map(|&kind| (kind, ResourceName::per_service(environment, service, kind))),
        );
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shared_names() {
        assert_eq!(ResourceName::shared("dev", ResourceKind::Vpc).as_str(), "dev-vpc");
        assert_eq!(
            ResourceName::shared("dev", ResourceKind::PublicSubnet).as_str(),
            "dev-public"
        );
        assert_eq!(ResourceName::shared("dev", ResourceKind::LoadBalancer).as_str(), "dev-lb");
        assert_eq!(
            ResourceName::shared("prod", ResourceKind::Cluster).as_str(),
            "prod-fargate-cluster"
        );
        assert_eq!(
            ResourceName::shared("prod", ResourceKind::ExecutionRole).as_str(),
            "prod-execution-role"
        );
        assert_eq!(
            ResourceName::shared("dev", ResourceKind::PostgresInstance).as_str(),
            "dev-db-microservices"
        );
        assert_eq!(
            ResourceName::shared("dev", ResourceKind::SqlServerInstance).as_str(),
            "dev-umbracodb"
        );
    }

    #[test]
    fn test_per_service_names_are_lowercased() {
        assert_eq!(
            ResourceName::per_service("dev", "EmailService", ResourceKind::TaskDefinition).as_str(),
            "dev-emailservice-task-definition"
        );
        assert_eq!(
            ResourceName::per_service("dev", "EmailService", ResourceKind::Container).as_str(),
            "dev-emailservice-app-container"
        );
        assert_eq!(
            ResourceName::per_service("dev", "EmailService", ResourceKind::FargateService).as_str(),
            "dev-emailservice-service"
        );
        assert_eq!(
            ResourceName::per_service("prod", "OtherService", ResourceKind::TargetGroup).as_str(),
            "prod-otherservice-tg"
        );
    }

    #[test]
    fn test_kind_partition() {
        for kind in ResourceKind::PER_SERVICE {
            assert!(kind.is_per_service());
            assert!(!ResourceKind::SHARED.contains(&kind));
        }
        for kind in ResourceKind::SHARED {
            assert!(!kind.is_per_service());
        }
    }

    #[test]
    fn test_environment_names_are_unique() {
        let names = environment_names("dev", ["EmailService", "OtherService"]);
        assert_eq!(
            names.len(),
            ResourceKind::SHARED.len() + 2 * ResourceKind::PER_SERVICE.len()
        );

        let unique: HashSet<_> = names.iter().map(|(_, name)| name).collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_name_limits() {
        assert_eq!(ResourceKind::LoadBalancer.name_limit(), Some(32));
        assert_eq!(ResourceKind::TargetGroup.name_limit(), Some(32));
        assert_eq!(ResourceKind::Cluster.name_limit(), None);
    }

    #[test]
    fn test_name_serializes_as_plain_string() {
        let name = ResourceName::shared("dev", ResourceKind::Vpc);
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"dev-vpc\"");
        assert_eq!(name.to_string(), "dev-vpc");
    }
}
