use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access database file: {0}")]
    Io(#[from] std::io::Error),
    #[error("database content is not valid JSON: {0}")]
    Data(#[from] serde_json::Error),
}
