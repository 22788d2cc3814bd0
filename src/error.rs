// error.rs

use crate::panorama::PanoramaId;

#[derive(Debug, thiserror::Error)]
pub enum PanoramaError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Panoramas should be at different position")]
    NoIntersection,

    #[error("unknown panorama {0:?}")]
    UnknownPanorama(PanoramaId),
}

pub type Result<T> = std::result::Result<T, PanoramaError>;
