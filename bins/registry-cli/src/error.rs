use registry_api::{DataFormat, RegistryError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("io ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no serializer for format {0}")]
    UnsupportedFormat(DataFormat),

    #[error("output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn io(context: impl std::fmt::Display, source: std::io::Error) -> Self {
        CliError::Io {
            context: context.to_string(),
            source,
        }
    }
}
