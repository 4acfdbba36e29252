pub mod codec;
pub mod schema;

use codec_avro::AvroSerializer;
use codec_json::JsonSerializer;
use registry_api::{AuditSerializer, DataFormat, RegistryConfig};
use registry_glue::GlueRegistry;

use crate::error::CliError;

/// Config file (optional) + env overrides.
pub fn load_config(path: &str) -> Result<RegistryConfig, CliError> {
    let config = RegistryConfig::resolve(path)?;
    tracing::debug!(
        config = %path,
        registry = %config.registry_name,
        region = %config.region,
        "resolved config"
    );
    Ok(config)
}

pub async fn connect(config: &RegistryConfig) -> Result<GlueRegistry, CliError> {
    Ok(GlueRegistry::connect(config).await?)
}

pub fn serializer_for(format: DataFormat) -> Result<Box<dyn AuditSerializer>, CliError> {
    match format {
        DataFormat::Avro => Ok(Box::new(AvroSerializer)),
        DataFormat::Json => Ok(Box::new(JsonSerializer)),
        other => Err(CliError::UnsupportedFormat(other)),
    }
}

/// Explicit `--schema` wins, otherwise the configured name for the format.
pub fn schema_name(
    config: &RegistryConfig,
    format: DataFormat,
    explicit: Option<String>,
) -> Result<String, CliError> {
    match explicit {
        Some(name) => Ok(name),
        None => config
            .schemas
            .for_format(format)
            .map(str::to_string)
            .ok_or(CliError::UnsupportedFormat(format)),
    }
}

pub(crate) fn read_file(path: &std::path::Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::io(path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_name_defaults_per_format() {
        let config = RegistryConfig::default();
        assert_eq!(schema_name(&config, DataFormat::Avro, None).unwrap(), "SalesforceAudit");
        assert_eq!(schema_name(&config, DataFormat::Json, None).unwrap(), "SalesAuditJSON");
        assert_eq!(
            schema_name(&config, DataFormat::Avro, Some("Custom".into())).unwrap(),
            "Custom"
        );
        assert!(matches!(
            schema_name(&config, DataFormat::Protobuf, None),
            Err(CliError::UnsupportedFormat(DataFormat::Protobuf))
        ));
    }

    #[test]
    fn serializer_matches_format() {
        assert_eq!(serializer_for(DataFormat::Avro).unwrap().format(), DataFormat::Avro);
        assert_eq!(serializer_for(DataFormat::Json).unwrap().format(), DataFormat::Json);
        assert!(serializer_for(DataFormat::Protobuf).is_err());
    }
}
