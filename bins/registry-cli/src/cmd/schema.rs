use serde_json::Value;

use super::{connect, load_config, read_file};
use crate::config::SchemaCommand;
use crate::error::CliError;

/// Admin commands go straight to Glue; each prints the result as JSON.
pub async fn run(config_path: &str, command: SchemaCommand) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let registry = connect(&config).await?;
    tracing::debug!(registry = %registry.registry_name(), command = ?command, "schema command");

    let output: Value = match command {
        SchemaCommand::List => serde_json::to_value(registry.list_schemas().await?)?,
        SchemaCommand::Get { name } => serde_json::to_value(registry.get_schema(&name).await?)?,
        SchemaCommand::Create(args) => {
            let definition = read_file(&args.definition)?;
            let info = registry
                .create_schema(&args.name, args.format, &definition, args.compatibility)
                .await?;
            serde_json::to_value(info)?
        }
        SchemaCommand::Register { name, definition } => {
            let definition = read_file(&definition)?;
            serde_json::to_value(registry.register_schema_version(&name, &definition).await?)?
        }
        SchemaCommand::Compat { name, mode } => {
            serde_json::to_value(registry.update_compatibility(&name, mode).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
