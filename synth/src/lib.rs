//! Synthesis entry point for the `dev` and `prod` stacks.
//!
//! Reads deployment targets from the process environment, resolves the
//! service descriptors and builds every requested stack before anything is
//! written. One invalid environment aborts the whole run.

pub mod error;
pub mod output;
pub mod services_file;
pub mod targets;

pub use error::{SynthError, SynthResult};
pub use output::{render_routes, render_summary, write_templates, DEFAULT_OUT_DIR};
pub use services_file::{load_services, parse_services, resolve_services};
pub use targets::Targets;

use clap::ValueEnum;
use topology::{EnvironmentConfig, ServiceConfig, Stack, TopologyResult};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EnvironmentSelection {
    Dev,
    Prod,
    All,
}

impl EnvironmentSelection {
    pub fn environments(self) -> Vec<EnvironmentConfig> {
        match self {
            EnvironmentSelection::Dev => vec![EnvironmentConfig::dev()],
            EnvironmentSelection::Prod => vec![EnvironmentConfig::prod()],
            EnvironmentSelection::All => vec![EnvironmentConfig::dev(), EnvironmentConfig::prod()],
        }
    }
}

/// Build one stack per environment. Fails on the first invalid environment
/// without returning any stack.
pub fn synthesize(
    environments: Vec<EnvironmentConfig>,
    services: &[ServiceConfig],
    targets: &Targets,
) -> SynthResult<Vec<Stack>> {
    let stacks = environments
        .into_iter()
        .map(|environment| -> TopologyResult<Stack> {
            let target = targets.for_environment(&environment.name)?.clone();
            Stack::synthesize(environment, services, target)
        })
        .collect::<TopologyResult<Vec<_>>>()?;

    info!(stacks = stacks.len(), "synthesis complete");
    Ok(stacks)
}
