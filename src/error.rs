use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Failed to fetch machine-type catalog: {0}")]
    CatalogFetch(#[from] reqwest::Error),

    #[error("Machine-type catalog contains no two-part instance types")]
    EmptyCatalog,

    #[error("'{resource}' references undeclared name '{reference}'")]
    UndeclaredReference { resource: String, reference: String },

    #[error("Duplicate declaration of '{0}'")]
    DuplicateName(String),

    #[error("Disk pools need {requested} device letters, only {available} are available")]
    DeviceLetterOverflow { requested: usize, available: usize },

    #[error("Failed to serialize template to YAML: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
