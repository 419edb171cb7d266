use crate::builder::{Topology, TopologyBuilder};
use crate::config::EnvironmentConfig;
use crate::error::TopologyResult;
use crate::service::ServiceConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "eu-west-1";

/// Account and region a stack is deployed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub account: Option<String>,
    pub region: String,
}

impl Default for DeploymentTarget {
    fn default() -> Self {
        Self {
            account: None,
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl DeploymentTarget {
    pub fn new(account: Option<String>, region: impl Into<String>) -> Self {
        Self {
            account,
            region: region.into(),
        }
    }
}

/// One environment's topology bound to the target it deploys into.
///
/// Serializes as one flat template object:
/// `{ stack, account, region, environment, resources, listener, outputs }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    #[serde(rename = "stack")]
    pub id: String,
    #[serde(flatten)]
    pub target: DeploymentTarget,
    #[serde(flatten)]
    pub topology: Topology,
}

impl Stack {
    /// `dev` becomes `DevStack`, `prod` becomes `ProdStack`.
    pub fn stack_id(environment: &str) -> String {
        let mut chars = environment.chars();
        match chars.next() {
            Some(first) => format!("{}{}Stack", first.to_uppercase(), chars.as_str()),
            None => "Stack".to_string(),
        }
    }

    pub fn synthesize(
        environment: EnvironmentConfig,
        services: &[ServiceConfig],
        target: DeploymentTarget,
    ) -> TopologyResult<Self> {
        let id = Self::stack_id(&environment.name);
        let topology = TopologyBuilder::new(environment)
            .with_services(services.iter().cloned())
            .build()?;

        Ok(Self {
            id,
            target,
            topology,
        })
    }

    pub fn template_file_name(&self) -> String {
        format!("{}.template.json", self.id)
    }

    pub fn to_template_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
