use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use registry_api::{Compatibility, DataFormat};

#[derive(Parser)]
#[command(name = "registry-cli", about = "Аудит-события через AWS Glue Schema Registry (Avro / JSON)")]
pub struct Cli {
    /// Путь к TOML конфиг файлу (необязателен)
    #[arg(long, global = true, default_value = "registry.toml", env = "REGISTRY_CONFIG")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Сериализовать событие по последней версии схемы
    Encode(EncodeArgs),
    /// Десериализовать событие и вывести его как JSON
    Decode(DecodeArgs),
    /// Управление схемами в реестре
    #[command(subcommand)]
    Schema(SchemaCommand),
}

#[derive(Args, Clone, Debug)]
pub struct EncodeArgs {
    /// Формат: avro | json
    #[arg(long)]
    pub format: DataFormat,
    /// Имя схемы (по умолчанию из конфига для формата)
    #[arg(long)]
    pub schema: Option<String>,
    #[arg(long)]
    pub event_id: String,
    #[arg(long)]
    pub event_name: String,
    /// Миллисекунды Unix epoch
    #[arg(long, allow_negative_numbers = true)]
    pub timestamp: i64,
    #[arg(long, default_value = "")]
    pub details: String,
    /// Файл для результата (по умолчанию stdout)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct DecodeArgs {
    /// Формат: avro | json
    #[arg(long)]
    pub format: DataFormat,
    /// Имя схемы (по умолчанию из конфига для формата)
    #[arg(long)]
    pub schema: Option<String>,
    /// Входной файл (по умолчанию stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCommand {
    /// Список схем реестра
    List,
    /// Метаданные схемы
    Get { name: String },
    /// Создать схему (версия 1)
    Create(CreateArgs),
    /// Зарегистрировать новую версию схемы
    Register {
        name: String,
        /// Файл с определением схемы
        #[arg(long)]
        definition: PathBuf,
    },
    /// Изменить режим совместимости
    Compat { name: String, mode: Compatibility },
}

#[derive(Args, Clone, Debug)]
pub struct CreateArgs {
    pub name: String,
    #[arg(long)]
    pub format: DataFormat,
    /// Файл с определением схемы
    #[arg(long)]
    pub definition: PathBuf,
    #[arg(long, default_value = "BACKWARD")]
    pub compatibility: Compatibility,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_encode() {
        let cli = Cli::try_parse_from([
            "registry-cli",
            "encode",
            "--format",
            "avro",
            "--event-id",
            "evt-001",
            "--event-name",
            "Create",
            "--timestamp",
            "1609459200000",
            "--details",
            "Created new account",
        ])
        .unwrap();
        assert_eq!(cli.config, "registry.toml");
        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.format, DataFormat::Avro);
        assert_eq!(args.timestamp, 1_609_459_200_000);
        assert!(args.schema.is_none());
        assert!(args.out.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["registry-cli", "decode", "--format", "JSON", "--config", "x.toml"])
            .unwrap();
        assert_eq!(cli.config, "x.toml");
        let Commands::Decode(args) = cli.command else {
            panic!("expected decode");
        };
        assert_eq!(args.format, DataFormat::Json);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["registry-cli", "decode", "--format", "xml"]).is_err());
    }

    #[test]
    fn parses_schema_commands() {
        let cli = Cli::try_parse_from(["registry-cli", "schema", "compat", "Audit", "full-all"]).unwrap();
        let Commands::Schema(SchemaCommand::Compat { name, mode }) = cli.command else {
            panic!("expected compat");
        };
        assert_eq!(name, "Audit");
        assert_eq!(mode, Compatibility::FullAll);

        let cli = Cli::try_parse_from([
            "registry-cli",
            "schema",
            "create",
            "Audit",
            "--format",
            "avro",
            "--definition",
            "audit.avsc",
        ])
        .unwrap();
        let Commands::Schema(SchemaCommand::Create(args)) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.compatibility, Compatibility::Backward);
        assert_eq!(args.definition, PathBuf::from("audit.avsc"));
    }
}
