//! Declarative resource graph handed to the provisioning engine.

use crate::config::DatabaseEngine;
use crate::naming::{ResourceKind, ResourceName};
use crate::routing::DefaultAction;
use crate::service::HealthCheckConfig;
use serde::{Deserialize, Serialize};

pub const ECS_TASKS_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";
pub const TASK_EXECUTION_POLICY: &str = "service-role/AmazonECSTaskExecutionRolePolicy";
pub const LOG_STREAM_PREFIX: &str = "FargateLogs";
pub const LISTENER_PORT: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubnetType {
    Public,
    PrivateWithEgress,
}

/// What happens to the physical resource when the stack is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfiguration {
    pub driver: String,
    pub stream_prefix: String,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            driver: "awslogs".to_string(),
            stream_prefix: LOG_STREAM_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDefinition {
    pub name: ResourceName,
    pub image: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub port: u16,
    pub logging: LogConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceProperties {
    Vpc {
        max_azs: u8,
        nat_gateways: u8,
    },
    Subnet {
        vpc: ResourceName,
        subnet_type: SubnetType,
        cidr_mask: u8,
    },
    LoadBalancer {
        vpc: ResourceName,
        internet_facing: bool,
        subnets: ResourceName,
    },
    Listener {
        load_balancer: ResourceName,
        port: u16,
        open: bool,
        default_action: DefaultAction,
    },
    Cluster {
        vpc: ResourceName,
    },
    ExecutionRole {
        assumed_by: String,
        managed_policies: Vec<String>,
    },
    Repository {
        removal_policy: RemovalPolicy,
    },
    TaskDefinition {
        family: String,
        execution_role: ResourceName,
        containers: Vec<ContainerDefinition>,
    },
    FargateService {
        cluster: ResourceName,
        task_definition: ResourceName,
        desired_count: u32,
        subnets: ResourceName,
    },
    TargetGroup {
        vpc: ResourceName,
        port: u16,
        target_type: String,
        health_check: HealthCheckConfig,
        targets: Vec<ResourceName>,
    },
    Database {
        engine: DatabaseEngine,
        engine_version: String,
        instance_type: String,
        allocated_storage_gib: u32,
        port: u16,
        master_username: String,
        vpc: ResourceName,
        subnets: ResourceName,
        deletion_protection: bool,
        removal_policy: RemovalPolicy,
    },
}

/// One node of the graph. `depends_on` lists every resource referenced by
/// the properties, so the engine can order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: ResourceName,
    pub kind: ResourceKind,
    pub properties: ResourceProperties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<ResourceName>,
}

impl Resource {
    pub fn new(name: ResourceName, kind: ResourceKind, properties: ResourceProperties) -> Self {
        Self {
            name,
            kind,
            properties,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, name: &ResourceName) -> Self {
        self.depends_on.push(name.clone());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputAttribute {
    DnsName,
    EndpointAddress,
}

/// Value exported from the stack once it is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub id: String,
    pub resource: ResourceName,
    pub attribute: OutputAttribute,
}
