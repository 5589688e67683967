use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolyfillError {
    #[error("Error performing IO")]
    Io(#[from] std::io::Error),
    #[error("Error reading JSON")]
    Json(#[from] serde_json::Error),
    #[error("Invalid density descriptor `{descriptor}` for {url}")]
    InvalidDensity { url: String, descriptor: String },
    #[error("Empty srcset candidate")]
    EmptyCandidate,
    #[error("Pixel ratio must be a positive number, got {0}")]
    InvalidPixelRatio(f64),
    #[error("Viewport dimensions must be greater than zero")]
    InvalidViewport,
}
