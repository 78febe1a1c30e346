// src/io/layer.rs

use crate::io::error::{IoError, IoResult};
use crate::math::geometry::{Layer, PolygonSet};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

type Position = [f64; 2];

/// GeoJSON-ähnliche Geometrie. Alle Typen werden gelesen; ob sie unterstützt sind,
/// entscheidet die Konvertierung in [`crate::math::geometry::Geometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeometryRecord {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

fn line_string(positions: &[Position]) -> geo::LineString<f64> {
    positions.iter().map(|&[x, y]| geo::Coord { x, y }).collect()
}

fn polygon(rings: &[Vec<Position>]) -> geo::Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.collect())
}

fn positions(line: &geo::LineString<f64>) -> Vec<Position> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

impl From<&GeometryRecord> for geo::Geometry<f64> {
    fn from(record: &GeometryRecord) -> Self {
        match record {
            GeometryRecord::Point([x, y]) => geo::Geometry::Point(geo::Point::new(*x, *y)),
            GeometryRecord::LineString(positions) => {
                geo::Geometry::LineString(line_string(positions))
            }
            GeometryRecord::Polygon(rings) => geo::Geometry::Polygon(polygon(rings)),
            GeometryRecord::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(polygons.iter().map(|p| polygon(p)).collect()),
            ),
        }
    }
}

impl From<&geo::Polygon<f64>> for GeometryRecord {
    fn from(polygon: &geo::Polygon<f64>) -> Self {
        let mut rings = vec![positions(polygon.exterior())];
        rings.extend(polygon.interiors().iter().map(positions));
        GeometryRecord::Polygon(rings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub geometry: GeometryRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
}

/// Dateiformat einer Schicht
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    pub features: Vec<FeatureRecord>,
}

impl LayerRecord {
    /// Konvertiert in eine [`Layer`]. Ein einziger nicht unterstützter Geometrietyp
    /// bricht die Konvertierung ab.
    pub fn into_layer(self) -> IoResult<Layer> {
        let geometries = self
            .features
            .iter()
            .map(|feature| (geo::Geometry::from(&feature.geometry), feature.area));
        Ok(Layer::from_geo(self.crs.clone(), geometries)?)
    }

    /// Jeder Ring der Menge wird ein eigenes Polygon-Feature.
    pub fn from_polygon_set(set: &PolygonSet) -> Self {
        Self {
            crs: set.crs.clone(),
            features: set
                .to_geo()
                .iter()
                .map(|polygon| FeatureRecord {
                    geometry: GeometryRecord::from(polygon),
                    area: None,
                })
                .collect(),
        }
    }
}

pub fn parse_layer(json: &str) -> IoResult<Layer> {
    serde_json::from_str::<LayerRecord>(json)?.into_layer()
}

pub fn read_layer(path: impl AsRef<Path>) -> IoResult<Layer> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| IoError::at(path, e))?;
    let layer = parse_layer(&json)?;
    info!(
        path = %path.display(),
        features = layer.features.len(),
        "Layer loaded"
    );
    Ok(layer)
}

pub fn layer_to_json(set: &PolygonSet) -> IoResult<String> {
    Ok(serde_json::to_string_pretty(&LayerRecord::from_polygon_set(set))?)
}

pub fn write_layer(path: impl AsRef<Path>, set: &PolygonSet) -> IoResult<()> {
    let path = path.as_ref();
    fs::write(path, layer_to_json(set)?).map_err(|e| IoError::at(path, e))
}
