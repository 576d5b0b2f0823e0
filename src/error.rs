use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        Self::Schema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
