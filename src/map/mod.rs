//! Minimal map model: shapes from a borders file, styled by attribute
//! filters and rasterized into an image.
//!
//! Everything is built as plain values first (rules, styles, layers) and
//! then handed to [`Map::new`], which only reads them.

pub mod canvas;
pub mod datasource;
pub mod error;
pub mod style;

pub use canvas::{Map, Viewport};
pub use datasource::{Datasource, Feature};
pub use error::{MapError, MapResult};
pub use style::{Filter, Layer, PolygonSymbolizer, Rule, Style};
