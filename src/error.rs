use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("No bounding box for municipality reference '{0}'")]
    UnknownMunicipality(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
