use std::env;
use topology::config::{DEV, PROD};
use topology::stack::DEFAULT_REGION;
use topology::{DeploymentTarget, TopologyError, TopologyResult};
use tracing::{info, warn};

pub const DEFAULT_ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";
pub const DEFAULT_REGION_VAR: &str = "CDK_DEFAULT_REGION";

/// Deployment targets for both environments, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targets {
    pub dev: DeploymentTarget,
    pub prod: DeploymentTarget,
}

impl Targets {
    /// `{DEV,PROD}_ACCOUNT` and `{DEV,PROD}_REGION`, falling back to the
    /// `CDK_DEFAULT_*` variables and then to the default region.
    pub fn from_env() -> Self {
        Self {
            dev: load_target("DEV"),
            prod: load_target("PROD"),
        }
    }

    pub fn for_environment(&self, name: &str) -> TopologyResult<&DeploymentTarget> {
        match name {
            DEV => Ok(&self.dev),
            PROD => Ok(&self.prod),
            other => Err(TopologyError::UnknownEnvironment {
                name: other.to_string(),
            }),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_target(prefix: &str) -> DeploymentTarget {
    let account_var = format!("{prefix}_ACCOUNT");
    let account = var(&account_var).or_else(|| var(DEFAULT_ACCOUNT_VAR));
    if account.is_none() {
        warn!("Neither {account_var} nor {DEFAULT_ACCOUNT_VAR} is set; the stack will be environment-agnostic");
    }

    let region_var = format!("{prefix}_REGION");
    let region = var(&region_var)
        .or_else(|| var(DEFAULT_REGION_VAR))
        .unwrap_or_else(|| {
            info!("{region_var} not set, using default: {DEFAULT_REGION}");
            DEFAULT_REGION.to_string()
        });

    DeploymentTarget { account, region }
}
