use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElementsError {
    #[error("element fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty element response for catalog {0}")]
    EmptyResponse(u32),
    #[error("invalid TLE for catalog {catalog}: {message}")]
    InvalidTle { catalog: u32, message: String },
    #[error("element refresh failed for {satellite}: {source}")]
    RefreshFailed {
        satellite: String,
        #[source]
        source: Box<ElementsError>,
    },
}
