pub mod graphql;

pub use crate::{config::graphql::GraphQLLimitsConfig, defaults};
pub use clap::{Args, Parser, ValueEnum};
use serde::Deserialize;
use std::{
    fs::File,
    io::Error,
    path::{Path, PathBuf},
};
use strum::{AsRefStr, EnumString};
use thiserror::Error;

/// Error type returned by configuration operations.
#[derive(Error, Debug)]
pub enum EndpointConfigError {
    #[error("Error processing file: {0:?}")]
    ConfigFileError(#[from] Error),
    #[error("Error processing YAML file: {0:?}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("Error processing JSON file: {0:?}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Unsupported document extension: {0:?}")]
    UnsupportedExtension(String),
}

/// Result type returned by configuration operations.
pub type EndpointConfigResult<T> = core::result::Result<T, EndpointConfigError>;

/// Environment variables understood by the converter.
#[derive(Debug, EnumString, AsRefStr)]
pub enum EnvVar {
    #[strum(serialize = "ENDPOINT_PROJECT")]
    Project,
    #[strum(serialize = "RUST_LOG")]
    RustLog,
    #[strum(serialize = "HUMAN_LOGGING")]
    HumanLogging,
}

/// Return the value of an environment variable or a default value.
pub fn env_or_default(var: EnvVar, default: String) -> String {
    std::env::var(var.as_ref()).unwrap_or(default)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "endpoint-graphql",
    about = "Build a GraphQL schema from a batch of table schemas.",
    version
)]
pub struct ConverterArgs {
    /// Log level passed to the converter.
    #[arg(long, default_value = defaults::LOG_LEVEL, value_parser = ["info", "debug", "error", "warn", "trace"], help = "Log level passed to the converter.")]
    pub log_level: String,

    /// Converter config file.
    #[arg(short, long, value_name = "FILE", help = "Converter config file.")]
    pub config: Option<PathBuf>,

    /// Table batch file (JSON or YAML).
    #[arg(short, long, value_name = "FILE", help = "Table batch file (JSON or YAML).")]
    pub tables: PathBuf,

    /// Additional ref schema files (JSON or YAML).
    #[arg(long, value_name = "FILE", help = "Additional ref schema files (JSON or YAML).")]
    pub refs: Vec<PathBuf>,

    /// Project name used to namespace every generated type.
    #[arg(long, env = "ENDPOINT_PROJECT", help = "Project name used to namespace every generated type.")]
    pub project: Option<String>,

    /// Do not register the well-known row and file schemas.
    #[arg(long, help = "Do not register the well-known row and file schemas.")]
    pub no_system_schemas: bool,

    /// Print the excluded tables instead of the SDL.
    #[arg(long, help = "Print the excluded tables instead of the SDL.")]
    pub excluded: bool,

    /// Enable verbose logging.
    #[arg(short, long, help = "Enable verbose logging.")]
    pub verbose: bool,
}

/// Converter configuration.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Project name used to namespace every generated type.
    #[serde(default = "default_project")]
    pub project: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub verbose: bool,

    /// Register the well-known row and file schemas.
    #[serde(default = "default_system_schemas")]
    pub system_schemas: bool,

    /// Additional ref schema files.
    #[serde(default)]
    pub refs: Vec<PathBuf>,

    #[serde(default)]
    pub graphql_limits: GraphQLLimitsConfig,
}

fn default_project() -> String {
    defaults::PROJECT_NAME.to_string()
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

fn default_system_schemas() -> bool {
    defaults::SYSTEM_SCHEMAS
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            log_level: default_log_level(),
            verbose: false,
            system_schemas: defaults::SYSTEM_SCHEMAS,
            refs: Vec::new(),
            graphql_limits: GraphQLLimitsConfig::default(),
        }
    }
}

impl From<ConverterArgs> for ConverterConfig {
    fn from(args: ConverterArgs) -> Self {
        Self {
            project: args.project.unwrap_or_else(|| {
                env_or_default(EnvVar::Project, defaults::PROJECT_NAME.to_string())
            }),
            log_level: args.log_level,
            verbose: args.verbose,
            system_schemas: !args.no_system_schemas,
            refs: args.refs,
            graphql_limits: GraphQLLimitsConfig::default(),
        }
    }
}

impl ConverterConfig {
    // When building the config via a file, any missing key is replaced with
    // its respective default value.
    pub fn from_file(path: impl AsRef<Path>) -> EndpointConfigResult<Self> {
        let file = File::open(path)?;
        let config: ConverterConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Merge command line arguments over a config file. Arguments win when given.
    pub fn from_opts(args: ConverterArgs) -> EndpointConfigResult<Self> {
        match &args.config {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                if let Some(project) = args.project {
                    config.project = project;
                }
                config.verbose |= args.verbose;
                config.system_schemas &= !args.no_system_schemas;
                config.refs.extend(args.refs);
                Ok(config)
            }
            None => Ok(args.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_from_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "project: blog\ngraphql_limits:\n  max_depth: 12\n"
        )
        .unwrap();

        let config = ConverterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.project, "blog");
        assert_eq!(config.log_level, defaults::LOG_LEVEL);
        assert!(config.system_schemas);
        assert!(config.refs.is_empty());
        assert_eq!(config.graphql_limits.max_depth, Some(12));
        assert_eq!(config.graphql_limits.max_complexity, None);
    }

    #[test]
    fn test_config_from_args() {
        let args = ConverterArgs::parse_from([
            "endpoint-graphql",
            "--tables",
            "tables.json",
            "--project",
            "shop",
            "--no-system-schemas",
        ]);
        let config = ConverterConfig::from_opts(args).unwrap();
        assert_eq!(config.project, "shop");
        assert!(!config.system_schemas);
    }

    #[test]
    fn test_args_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project: blog\nverbose: false\n").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = ConverterArgs::parse_from([
            "endpoint-graphql",
            "--tables",
            "tables.json",
            "--config",
            path.as_str(),
            "--project",
            "news",
            "--verbose",
        ]);
        let config = ConverterConfig::from_opts(args).unwrap();
        assert_eq!(config.project, "news");
        assert!(config.verbose);
    }
}
