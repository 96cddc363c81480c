use std::path::PathBuf;
use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read shapefile {path:?}: {source}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    #[error("Failed to parse GeoJSON {path:?}: {source}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported geometry format: {0}")]
    UnsupportedFormat(String),

    #[error("GeoJSON must be a FeatureCollection")]
    NotAFeatureCollection,

    #[error("Failed to convert geometry: {0}")]
    Geometry(String),

    #[error("Layer '{layer}' references unknown style '{style}'")]
    UnknownStyle { layer: String, style: String },

    #[error("Map has no content to zoom to")]
    EmptyExtent,

    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
