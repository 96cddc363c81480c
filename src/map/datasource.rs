use super::error::{MapError, MapResult};
use geo::MultiPolygon;
use geojson::GeoJson;
use shapefile::dbase::FieldValue;
use shapefile::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Feature {
    pub attributes: HashMap<String, String>,
    pub geometry: MultiPolygon<f64>,
}

impl Feature {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Polygon features loaded from a borders file.
#[derive(Debug, Clone, Default)]
pub struct Datasource {
    features: Vec<Feature>,
}

impl Datasource {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Loads polygons from a shapefile (`.shp`) or a GeoJSON
    /// FeatureCollection (`.json`, `.geojson`).
    ///
    /// Only the named attributes are kept on each feature. Non-polygon
    /// shapes are skipped.
    pub fn from_path(path: &Path, attributes: &[String]) -> MapResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .ok_or_else(|| MapError::UnsupportedFormat(format!("{:?} has no extension", path)))?;

        let features = match extension.as_str() {
            "shp" => load_shapefile(path, attributes)?,
            "json" | "geojson" => load_geojson(path, attributes)?,
            _ => return Err(MapError::UnsupportedFormat(extension)),
        };

        info!("Loaded {} shapes from {:?}", features.len(), path);

        for name in attributes {
            let missing = features.iter().filter(|f| f.attribute(name).is_none()).count();
            if missing > 0 {
                warn!("{} of {} shapes have no '{}' attribute", missing, features.len(), name);
            }
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn load_shapefile(path: &Path, attributes: &[String]) -> MapResult<Vec<Feature>> {
    let shapefile_error = |source| MapError::Shapefile {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = Reader::from_path(path).map_err(shapefile_error)?;

    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.map_err(shapefile_error)?;

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon
                .try_into()
                .map_err(|e| MapError::Geometry(format!("polygon: {:?}", e)))?,
            shapefile::Shape::PolygonM(polygon) => polygon
                .try_into()
                .map_err(|e| MapError::Geometry(format!("polygonM: {:?}", e)))?,
            shapefile::Shape::PolygonZ(polygon) => polygon
                .try_into()
                .map_err(|e| MapError::Geometry(format!("polygonZ: {:?}", e)))?,
            _ => continue, // Skip non-polygon shapes
        };

        let attributes = attributes
            .iter()
            .filter_map(|name| {
                let value = record.get(name).and_then(field_to_string)?;
                Some((name.clone(), value))
            })
            .collect();

        features.push(Feature { attributes, geometry });
    }

    Ok(features)
}

fn field_to_string(value: &FieldValue) -> Option<String> {
    match value {
        // dBase pads character fields to their declared width
        FieldValue::Character(Some(s)) => Some(s.trim_end().to_string()),
        FieldValue::Memo(s) => Some(s.clone()),
        FieldValue::Numeric(Some(n)) => Some(n.to_string()),
        FieldValue::Float(Some(n)) => Some(n.to_string()),
        FieldValue::Double(n) => Some(n.to_string()),
        FieldValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

fn load_geojson(path: &Path, attributes: &[String]) -> MapResult<Vec<Feature>> {
    let file = File::open(path).map_err(|source| MapError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader).map_err(|source| MapError::GeoJson {
        path: path.to_path_buf(),
        source,
    })?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(MapError::NotAFeatureCollection),
    };

    let mut features = Vec::new();

    for feature in collection.features {
        let geometry = match feature.geometry {
            Some(geom) => {
                let geo_geom: geo::Geometry<f64> = geom
                    .value
                    .try_into()
                    .map_err(|e| MapError::Geometry(format!("{:?}", e)))?;

                match geo_geom {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => continue, // Skip points/lines
                }
            }
            None => continue,
        };

        let attributes = attributes
            .iter()
            .filter_map(|name| {
                let value = match feature.properties.as_ref()?.get(name)? {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some((name.clone(), value))
            })
            .collect();

        features.push(Feature { attributes, geometry });
    }

    Ok(features)
}
