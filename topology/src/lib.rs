//! Deployment topology for the Fargate microservice environments.
//!
//! Given an [`EnvironmentConfig`] and an ordered list of [`ServiceConfig`]s,
//! [`TopologyBuilder`] derives every resource name, the listener routing rules
//! and the full declarative resource graph that an external provisioning
//! engine applies. Nothing in this crate performs I/O: the whole derivation is
//! a pure function over immutable configuration, so identical input always
//! produces identical output.
//!
//! Validation runs before anything is derived. A duplicate rule priority,
//! a clashing resource name or a malformed field aborts the whole pass with a
//! [`TopologyError`].

pub mod builder;
pub mod config;
pub mod error;
pub mod naming;
pub mod resources;
pub mod routing;
pub mod service;
pub mod stack;
pub mod validation;

pub use builder::{Topology, TopologyBuilder};
pub use config::{DatabaseConfig, DatabaseEngine, EnvironmentConfig, NetworkConfig};
pub use error::{TopologyError, TopologyResult};
pub use naming::{ResourceKind, ResourceName};
pub use resources::{Output, OutputAttribute, RemovalPolicy, Resource, ResourceProperties, SubnetType};
pub use routing::{derive_routing, DefaultAction, ListenerRules, RouteDecision, RoutingRule};
pub use service::{HealthCheckConfig, ServiceConfig};
pub use stack::{DeploymentTarget, Stack};
pub use validation::validate_services;

