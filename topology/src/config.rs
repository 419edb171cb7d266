use crate::error::{TopologyError, TopologyResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const DEV: &str = "dev";
pub const PROD: &str = "prod";

/// Environments that have a preset configuration.
pub const ENVIRONMENTS: [&str; 2] = [DEV, PROD];

fn environment_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("static pattern"))
}

/// VPC sizing shared by every environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub max_azs: u8,
    pub nat_gateways: u8,
    pub subnet_cidr_mask: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_azs: 2,
            nat_gateways: 1,
            subnet_cidr_mask: 24,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> TopologyResult<()> {
        if self.max_azs == 0 {
            return Err(TopologyError::invalid(
                "network.max_azs",
                "must be greater than 0",
            ));
        }

        if self.nat_gateways > self.max_azs {
            return Err(TopologyError::invalid(
                "network.nat_gateways",
                format!("cannot exceed max_azs ({})", self.max_azs),
            ));
        }

        if !(16..=28).contains(&self.subnet_cidr_mask) {
            return Err(TopologyError::invalid(
                "network.subnet_cidr_mask",
                "must be between 16 and 28",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseEngine {
    Postgres,
    SqlServerExpress,
}

impl DatabaseEngine {
    /// Engine version pinned for new instances.
    pub fn version(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "14.6",
            DatabaseEngine::SqlServerExpress => "15.00.4236.7.v1",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            DatabaseEngine::Postgres => 5432,
            DatabaseEngine::SqlServerExpress => 1433,
        }
    }

    pub fn default_master_username(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::SqlServerExpress => "admin",
        }
    }
}

impl fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseEngine::Postgres => write!(f, "postgres"),
            DatabaseEngine::SqlServerExpress => write!(f, "sqlserver-ex"),
        }
    }
}

/// Sizing for one database instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub engine: DatabaseEngine,
    pub instance_type: String,
    pub allocated_storage_gib: u32,
    pub port: u16,
    pub master_username: String,
}

impl DatabaseConfig {
    pub fn new(engine: DatabaseEngine, instance_type: impl Into<String>) -> Self {
        Self {
            engine,
            instance_type: instance_type.into(),
            allocated_storage_gib: 20,
            port: engine.default_port(),
            master_username: engine.default_master_username().to_string(),
        }
    }

    pub fn postgres(instance_type: impl Into<String>) -> Self {
        Self::new(DatabaseEngine::Postgres, instance_type)
    }

    pub fn sql_server(instance_type: impl Into<String>) -> Self {
        Self::new(DatabaseEngine::SqlServerExpress, instance_type)
    }

    pub fn with_allocated_storage(mut self, gib: u32) -> Self {
        self.allocated_storage_gib = gib;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_master_username(mut self, username: impl Into<String>) -> Self {
        self.master_username = username.into();
        self
    }

    pub fn validate(&self) -> TopologyResult<()> {
        let field = |name: &str| format!("{}.{}", self.engine, name);

        if self.instance_type.is_empty() {
            return Err(TopologyError::invalid(
                field("instance_type"),
                "must not be empty",
            ));
        }

        if self.allocated_storage_gib == 0 {
            return Err(TopologyError::invalid(
                field("allocated_storage_gib"),
                "must be greater than 0",
            ));
        }

        if self.port == 0 {
            return Err(TopologyError::invalid(
                field("port"),
                "must be greater than 0",
            ));
        }

        if self.master_username.is_empty() {
            return Err(TopologyError::invalid(
                field("master_username"),
                "must not be empty",
            ));
        }

        Ok(())
    }
}

/// Everything that differs between deployment environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub name: String,
    pub network: NetworkConfig,
    pub postgres: DatabaseConfig,
    pub sql_server: DatabaseConfig,
}

impl EnvironmentConfig {
    pub fn dev() -> Self {
        Self {
            name: DEV.to_string(),
            network: NetworkConfig::default(),
            postgres: DatabaseConfig::postgres("t3.micro"),
            sql_server: DatabaseConfig::sql_server("t3.micro"),
        }
    }

    pub fn prod() -> Self {
        Self {
            name: PROD.to_string(),
            network: NetworkConfig::default(),
            postgres: DatabaseConfig::postgres("m5d.large"),
            sql_server: DatabaseConfig::sql_server("t3.micro"),
        }
    }

    /// Look up the preset for a named environment.
    pub fn for_name(name: &str) -> TopologyResult<Self> {
        match name {
            DEV => Ok(Self::dev()),
            PROD => Ok(Self::prod()),
            other => Err(TopologyError::UnknownEnvironment {
                name: other.to_string(),
            }),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_postgres(mut self, postgres: DatabaseConfig) -> Self {
        self.postgres = postgres;
        self
    }

    pub fn with_sql_server(mut self, sql_server: DatabaseConfig) -> Self {
        self.sql_server = sql_server;
        self
    }

    pub fn validate(&self) -> TopologyResult<()> {
        if self.name.is_empty() {
            return Err(TopologyError::invalid(
                "environment.name",
                "must not be empty",
            ));
        }

        if !environment_name_pattern().is_match(&self.name) {
            return Err(TopologyError::invalid(
                "environment.name",
                "must start with a lowercase letter and contain only lowercase letters, digits and hyphens",
            ));
        }

        self.network.validate()?;

        if self.postgres.engine != DatabaseEngine::Postgres {
            return Err(TopologyError::invalid(
                "environment.postgres",
                format!("expected a postgres engine, found {}", self.postgres.engine),
            ));
        }
        self.postgres.validate()?;

        if self.sql_server.engine != DatabaseEngine::SqlServerExpress {
            return Err(TopologyError::invalid(
                "environment.sql_server",
                format!(
                    "expected a sqlserver-ex engine, found {}",
                    self.sql_server.engine
                ),
            ));
        }
        self.sql_server.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_preset() {
        let config = EnvironmentConfig::dev();
        assert_eq!(config.name, "dev");
        assert_eq!(config.postgres.instance_type, "t3.micro");
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.master_username, "postgres");
        assert_eq!(config.sql_server.port, 1433);
        assert_eq!(config.sql_server.master_username, "admin");
        assert_eq!(config.network, NetworkConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prod_preset_uses_larger_postgres() {
        let config = EnvironmentConfig::prod();
        assert_eq!(config.name, "prod");
        assert_eq!(config.postgres.instance_type, "m5d.large");
        assert_eq!(config.sql_server.instance_type, "t3.micro");
        assert_eq!(config.postgres.allocated_storage_gib, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_name() {
        assert_eq!(EnvironmentConfig::for_name("dev").unwrap().name, "dev");
        assert_eq!(EnvironmentConfig::for_name("prod").unwrap().name, "prod");
        assert_eq!(
            EnvironmentConfig::for_name("staging"),
            Err(TopologyError::UnknownEnvironment {
                name: "staging".to_string()
            })
        );
    }

    #[test]
    fn test_environment_name_validation() {
        assert!(EnvironmentConfig::dev().with_name("").validate().is_err());
        assert!(EnvironmentConfig::dev().with_name("Dev").validate().is_err());
        assert!(EnvironmentConfig::dev().with_name("1dev").validate().is_err());
        assert!(EnvironmentConfig::dev().with_name("dev_1").validate().is_err());
        assert!(EnvironmentConfig::dev().with_name("qa-2").validate().is_ok());
    }

    #[test]
    fn test_network_validation() {
        let mut network = NetworkConfig::default();
        assert!(network.validate().is_ok());

        network.nat_gateways = 3;
        assert!(network.validate().is_err());

        network.nat_gateways = 1;
        network.max_azs = 0;
        assert!(network.validate().is_err());

        network.max_azs = 2;
        network.subnet_cidr_mask = 30;
        assert!(network.validate().is_err());
    }

    #[test]
    fn test_database_builder_and_validation() {
        let db = DatabaseConfig::postgres("db.r5.large")
            .with_allocated_storage(100)
            .with_port(6543)
            .with_master_username("root");
        assert_eq!(db.allocated_storage_gib, 100);
        assert_eq!(db.port, 6543);
        assert_eq!(db.master_username, "root");
        assert!(db.validate().is_ok());

        assert!(DatabaseConfig::postgres("").validate().is_err());
        assert!(DatabaseConfig::sql_server("t3.micro")
            .with_allocated_storage(0)
            .validate()
            .is_err());
        assert!(DatabaseConfig::sql_server("t3.micro")
            .with_master_username("")
            .validate()
            .is_err());
    }

    #[test]
    fn test_swapped_engines_rejected() {
        let config = EnvironmentConfig::dev().with_postgres(DatabaseConfig::sql_server("t3.micro"));
        assert!(matches!(
            config.validate(),
            Err(TopologyError::InvalidConfig { field, .. }) if field == "environment.postgres"
        ));
    }

    #[test]
    fn test_engine_display_and_versions() {
        assert_eq!(DatabaseEngine::Postgres.to_string(), "postgres");
        assert_eq!(DatabaseEngine::SqlServerExpress.to_string(), "sqlserver-ex");
        assert_eq!(DatabaseEngine::Postgres.version(), "14.6");
        assert_eq!(DatabaseEngine::SqlServerExpress.version(), "15.00.4236.7.v1");
    }

    #[test]
    fn test_serialization() {
        let config = EnvironmentConfig::prod();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EnvironmentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
