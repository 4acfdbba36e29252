use std::io::{Read, Write};
use std::path::Path;

use registry_api::{AuditEvent, RegistryConfig, SchemaRegistry};

use super::{connect, load_config, schema_name, serializer_for};
use crate::config::{DecodeArgs, EncodeArgs};
use crate::error::CliError;

pub async fn encode(config_path: &str, args: EncodeArgs) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let registry = connect(&config).await?;
    let bytes = encode_event(&registry, &config, &args).await?;
    write_output(args.out.as_deref(), &bytes)?;
    tracing::info!(format = %args.format, bytes = bytes.len(), out = ?args.out, "encoded event");
    Ok(())
}

pub async fn decode(config_path: &str, args: DecodeArgs) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let registry = connect(&config).await?;
    let data = read_input(args.input.as_deref())?;
    let event = decode_event(&registry, &config, &args, &data).await?;
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

pub(crate) async fn encode_event(
    registry: &dyn SchemaRegistry,
    config: &RegistryConfig,
    args: &EncodeArgs,
) -> Result<Vec<u8>, CliError> {
    let schema = schema_name(config, args.format, args.schema.clone())?;
    let serializer = serializer_for(args.format)?;
    let event = AuditEvent::new(
        args.event_id.as_str(),
        args.event_name.as_str(),
        args.timestamp,
        args.details.as_str(),
    )?;
    Ok(serializer.serialize(registry, &schema, &event).await?)
}

pub(crate) async fn decode_event(
    registry: &dyn SchemaRegistry,
    config: &RegistryConfig,
    args: &DecodeArgs,
    data: &[u8],
) -> Result<AuditEvent, CliError> {
    let schema = schema_name(config, args.format, args.schema.clone())?;
    let serializer = serializer_for(args.format)?;
    Ok(serializer.deserialize(registry, &schema, data).await?)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, bytes).map_err(|e| CliError::io(path.display(), e)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| CliError::io("stdout", e))
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => std::fs::read(path).map_err(|e| CliError::io(path.display(), e)),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| CliError::io("stdin", e))?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_api::{DataFormat, RegistryError};
    use registry_memory::MemoryRegistry;

    const AVSC: &str = r#"{"type":"record","name":"SalesforceAudit","fields":[
        {"name":"eventId","type":"string"},
        {"name":"eventName","type":"string"},
        {"name":"timestamp","type":"long"},
        {"name":"eventDetails","type":"string"}
    ]}"#;

    fn registry() -> MemoryRegistry {
        MemoryRegistry::default()
            .with_schema("SalesforceAudit", DataFormat::Avro, AVSC)
            .with_schema("SalesAuditJSON", DataFormat::Json, "{}")
    }

    fn encode_args(format: DataFormat, timestamp: i64) -> EncodeArgs {
        EncodeArgs {
            format,
            schema: None,
            event_id: "evt-001".into(),
            event_name: "Create".into(),
            timestamp,
            details: "Created new account".into(),
            out: None,
        }
    }

    fn decode_args(format: DataFormat) -> DecodeArgs {
        DecodeArgs {
            format,
            schema: None,
            input: None,
        }
    }

    #[tokio::test]
    async fn encode_then_decode_with_configured_names() {
        let registry = registry();
        let config = RegistryConfig::default();
        for format in [DataFormat::Avro, DataFormat::Json] {
            let bytes = encode_event(&registry, &config, &encode_args(format, 1_609_459_200_000))
                .await
                .unwrap();
            let event = decode_event(&registry, &config, &decode_args(format), &bytes)
                .await
                .unwrap();
            assert_eq!(
                event,
                AuditEvent::new("evt-001", "Create", 1_609_459_200_000, "Created new account").unwrap()
            );
        }
    }

    #[tokio::test]
    async fn negative_timestamp_is_invalid_record() {
        let err = encode_event(&registry(), &RegistryConfig::default(), &encode_args(DataFormat::Avro, -1))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Registry(RegistryError::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn explicit_schema_overrides_config() {
        let mut args = decode_args(DataFormat::Json);
        args.schema = Some("Unknown".into());
        let err = decode_event(&registry(), &RegistryConfig::default(), &args, b"{}")
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Registry(RegistryError::SerializationFailed(_))));
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn output_file_round_trip() {
        let path = std::env::temp_dir().join(format!("registry-cli-out-{}.bin", std::process::id()));
        write_output(Some(path.as_path()), &[1, 2, 3]).unwrap();
        let data = read_input(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(data, [1, 2, 3]);
    }
}
