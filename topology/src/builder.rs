use crate::config::{DatabaseConfig, EnvironmentConfig};
use crate::error::TopologyResult;
use crate::naming::{ResourceKind, ResourceName};
use crate::resources::{
    ContainerDefinition, LogConfiguration, Output, OutputAttribute, RemovalPolicy, Resource,
    ResourceProperties, SubnetType, ECS_TASKS_PRINCIPAL, LISTENER_PORT, TASK_EXECUTION_POLICY,
};
use crate::routing::ListenerRules;
use crate::service::ServiceConfig;
use crate::validation::validate_services;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Collects the inputs for one environment and derives its [`Topology`].
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    environment: EnvironmentConfig,
    services: Vec<ServiceConfig>,
}

impl TopologyBuilder {
    pub fn new(environment: EnvironmentConfig) -> Self {
        Self {
            environment,
            services: Vec::new(),
        }
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = ServiceConfig>) -> Self {
        self.services.extend(services);
        self
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    pub fn services(&self) -> &[ServiceConfig] {
        &self.services
    }

    /// Validate everything, then derive names, routing and the resource graph.
    ///
    /// Nothing is produced unless the whole input is valid.
    pub fn build(&self) -> TopologyResult<Topology> {
        validate_services(&self.environment, &self.services)?;

        let env = self.environment.name.as_str();
        let mut graph = Graph::default();

        let vpc = graph.add(Resource::new(
            ResourceName::shared(env, ResourceKind::Vpc),
            ResourceKind::Vpc,
            ResourceProperties::Vpc {
                max_azs: self.environment.network.max_azs,
                nat_gateways: self.environment.network.nat_gateways,
            },
        ));

        let public = graph.add(
            Resource::new(
                ResourceName::shared(env, ResourceKind::PublicSubnet),
                ResourceKind::PublicSubnet,
                ResourceProperties::Subnet {
                    vpc: vpc.clone(),
                    subnet_type: SubnetType::Public,
                    cidr_mask: self.environment.network.subnet_cidr_mask,
                },
            )
            .depends_on(&vpc),
        );

        let private = graph.add(
            Resource::new(
                ResourceName::shared(env, ResourceKind::PrivateSubnet),
                ResourceKind::PrivateSubnet,
                ResourceProperties::Subnet {
                    vpc: vpc.clone(),
                    subnet_type: SubnetType::PrivateWithEgress,
                    cidr_mask: self.environment.network.subnet_cidr_mask,
                },
            )
            .depends_on(&vpc),
        );

        let load_balancer = graph.add(
            Resource::new(
                ResourceName::shared(env, ResourceKind::LoadBalancer),
                ResourceKind::LoadBalancer,
                ResourceProperties::LoadBalancer {
                    vpc: vpc.clone(),
                    internet_facing: true,
                    subnets: public.clone(),
                },
            )
            .depends_on(&vpc)
            .depends_on(&public),
        );

        let listener = ListenerRules::derive(env, &self.services);
        let listener_name = graph.add(
            Resource::new(
                ResourceName::shared(env, ResourceKind::Listener),
                ResourceKind::Listener,
                ResourceProperties::Listener {
                    load_balancer: load_balancer.clone(),
                    port: LISTENER_PORT,
                    open: true,
                    default_action: listener.default_action.clone(),
                },
            )
            .depends_on(&load_balancer),
        );

        let cluster = graph.add(
            Resource::new(
                ResourceName::shared(env, ResourceKind::Cluster),
                ResourceKind::Cluster,
                ResourceProperties::Cluster { vpc: vpc.clone() },
            )
            .depends_on(&vpc),
        );

        let execution_role = graph.add(Resource::new(
            ResourceName::shared(env, ResourceKind::ExecutionRole),
            ResourceKind::ExecutionRole,
            ResourceProperties::ExecutionRole {
                assumed_by: ECS_TASKS_PRINCIPAL.to_string(),
                managed_policies: vec![TASK_EXECUTION_POLICY.to_string()],
            },
        ));

        graph.add(Resource::new(
            ResourceName::shared(env, ResourceKind::Repository),
            ResourceKind::Repository,
            ResourceProperties::Repository {
                removal_policy: RemovalPolicy::Destroy,
            },
        ));

        for service in &self.services {
            let task_definition = ResourceName::per_service(env, &service.name, ResourceKind::TaskDefinition);
            graph.add(
                Resource::new(
                    task_definition.clone(),
                    ResourceKind::TaskDefinition,
                    ResourceProperties::TaskDefinition {
                        family: task_definition.to_string(),
                        execution_role: execution_role.clone(),
                        containers: vec![ContainerDefinition {
                            name: ResourceName::per_service(env, &service.name, ResourceKind::Container),
                            image: service.image.clone(),
                            cpu: service.cpu,
                            memory_mib: service.memory_mib,
                            port: service.container_port,
                            logging: LogConfiguration::default(),
                        }],
                    },
                )
                .depends_on(&execution_role),
            );

            let fargate_service = graph.add(
                Resource::new(
                    ResourceName::per_service(env, &service.name, ResourceKind::FargateService),
                    ResourceKind::FargateService,
                    ResourceProperties::FargateService {
                        cluster: cluster.clone(),
                        task_definition: task_definition.clone(),
                        desired_count: service.desired_count,
                        subnets: private.clone(),
                    },
                )
                .depends_on(&cluster)
                .depends_on(&task_definition)
                .depends_on(&private),
            );

            graph.add(
                Resource::new(
                    ResourceName::per_service(env, &service.name, ResourceKind::TargetGroup),
                    ResourceKind::TargetGroup,
                    ResourceProperties::TargetGroup {
                        vpc: vpc.clone(),
                        port: service.target_port,
                        target_type: "ip".to_string(),
                        health_check: service.health_check.clone(),
                        targets: vec![fargate_service.clone()],
                    },
                )
                .depends_on(&vpc)
                .depends_on(&fargate_service)
                .depends_on(&listener_name),
            );
        }

        let postgres = graph.add(database(
            env,
            ResourceKind::PostgresInstance,
            &self.environment.postgres,
            &vpc,
            &private,
        ));
        let sql_server = graph.add(database(
            env,
            ResourceKind::SqlServerInstance,
            &self.environment.sql_server,
            &vpc,
            &private,
        ));

        let outputs = vec![
            Output {
                id: "LoadBalancerDNS".to_string(),
                resource: load_balancer,
                attribute: OutputAttribute::DnsName,
            },
            Output {
                id: format!("{env}-db-microservices-PostgresEndpoint"),
                resource: postgres,
                attribute: OutputAttribute::EndpointAddress,
            },
            Output {
                id: "SqlServerEndpoint".to_string(),
                resource: sql_server,
                attribute: OutputAttribute::EndpointAddress,
            },
        ];

        info!(
            environment = env,
            services = self.services.len(),
            resources = graph.resources.len(),
            rules = listener.rules.len(),
            "topology derived"
        );

        Ok(Topology {
            environment: env.to_string(),
            resources: graph.resources,
            listener,
            outputs,
        })
    }
}

fn database(
    env: &str,
    kind: ResourceKind,
    config: &DatabaseConfig,
    vpc: &ResourceName,
    subnets: &ResourceName,
) -> Resource {
    Resource::new(
        ResourceName::shared(env, kind),
        kind,
        ResourceProperties::Database {
            engine: config.engine,
            engine_version: config.engine.version().to_string(),
            instance_type: config.instance_type.clone(),
            allocated_storage_gib: config.allocated_storage_gib,
            port: config.port,
            master_username: config.master_username.clone(),
            vpc: vpc.clone(),
            subnets: subnets.clone(),
            deletion_protection: true,
            removal_policy: RemovalPolicy::Retain,
        },
    )
    .depends_on(vpc)
    .depends_on(subnets)
}

#[derive(Default)]
struct Graph {
    resources: Vec<Resource>,
}

impl Graph {
    fn add(&mut self, resource: Resource) -> ResourceName {
        debug!(resource = %resource.name, kind = %resource.kind, "declared resource");
        let name = resource.name.clone();
        self.resources.push(resource);
        name
    }
}

/// Everything one environment deploys, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub environment: String,
    pub resources: Vec<Resource>,
    pub listener: ListenerRules,
    pub outputs: Vec<Output>,
}

impl Topology {
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.name.as_str() == name)
    }

    pub fn resources_of(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |resource| resource.kind == kind)
    }

    pub fn resource_names(&self) -> Vec<&ResourceName> {
        self.resources.iter().map(|resource| &resource.name).collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
