use crate::config::{ConverterConfig, EndpointConfigError, EndpointConfigResult, EnvVar};
use serde::de::DeserializeOwned;
use std::{env, fs::File, path::Path, str::FromStr};
use tracing::debug;
use tracing_subscriber::filter::EnvFilter;

/// Read a JSON or YAML document, picking the format from the file extension.
pub fn load_document<T: DeserializeOwned>(path: impl AsRef<Path>) -> EndpointConfigResult<T> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    debug!("Loading document '{}'", path.display());

    let file = File::open(path)?;
    match extension.as_str() {
        "json" => Ok(serde_json::from_reader(file)?),
        "yaml" | "yml" => Ok(serde_yaml::from_reader(file)?),
        other => Err(EndpointConfigError::UnsupportedExtension(other.to_string())),
    }
}

/// Initialize the logging context for the converter.
pub fn init_logging(config: &ConverterConfig) -> anyhow::Result<()> {
    let level = match config.verbose {
        true => "debug".to_string(),
        false => config.log_level.clone(),
    };

    let filter = match env::var_os(EnvVar::RustLog.as_ref()) {
        Some(_) => EnvFilter::try_from_default_env()?,
        None => EnvFilter::new(level),
    };

    let human_logging = match env::var(EnvVar::HumanLogging.as_ref()) {
        Ok(value) => bool::from_str(&value).map_err(|_| {
            anyhow::anyhow!("Expected `true` or `false` to be provided for `HUMAN_LOGGING`")
        })?,
        Err(_) => true,
    };

    let sub = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if human_logging {
        sub.with_ansi(true)
            .with_level(true)
            .with_line_number(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    } else {
        sub.with_ansi(false)
            .with_level(true)
            .with_line_number(true)
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    #[test]
    fn test_load_json_and_yaml_documents() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"a": 1, "b": 2}}"#).unwrap();
        let doc: BTreeMap<String, u32> = load_document(json.path()).unwrap();
        assert_eq!(doc.get("b"), Some(&2));

        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        write!(yaml, "a: 1\nb: 3\n").unwrap();
        let doc: BTreeMap<String, u32> = load_document(yaml.path()).unwrap();
        assert_eq!(doc.get("b"), Some(&3));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let res = load_document::<BTreeMap<String, u32>>(file.path());
        assert!(matches!(res, Err(EndpointConfigError::UnsupportedExtension(ext)) if ext == "toml"));
    }
}
