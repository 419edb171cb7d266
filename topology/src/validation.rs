use crate::config::EnvironmentConfig;
use crate::error::{TopologyError, TopologyResult};
use crate::naming::environment_names;
use crate::service::ServiceConfig;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Check an environment and its services as a whole.
///
/// Runs every field check first, then the cross-service invariants: rule
/// priorities, routing paths and derived resource names must all be
/// pairwise distinct, and names must fit the provider's length limits.
pub fn validate_services(
    environment: &EnvironmentConfig,
    services: &[ServiceConfig],
) -> TopologyResult<()> {
    environment.validate()?;

    for service in services {
        service.validate()?;
    }

    let mut priorities: HashMap<u32, &str> = HashMap::new();
    for service in services {
        if let Some(first) = priorities.insert(service.priority, &service.name) {
            return Err(TopologyError::DuplicatePriority {
                priority: service.priority,
                first: first.to_string(),
                second: service.name.clone(),
            });
        }
    }

    let mut paths = HashSet::new();
    for service in services {
        if !paths.insert(service.path.as_str()) {
            return Err(TopologyError::DuplicatePath {
                path: service.path.clone(),
            });
        }
    }

    let mut names = HashSet::new();
    for (kind, name) in environment_names(
        &environment.name,
        services.iter().map(|service| service.name.as_str()),
    ) {
        if let Some(limit) = kind.name_limit() {
            if name.len() > limit {
                return Err(TopologyError::NameTooLong {
                    name: name.to_string(),
                    limit,
                });
            }
        }

        if !names.insert(name.clone()) {
            return Err(TopologyError::DuplicateName {
                name: name.to_string(),
            });
        }
    }

    debug!(
        environment = %environment.name,
        services = services.len(),
        names = names.len(),
        "configuration validated"
    );

    Ok(())
}
