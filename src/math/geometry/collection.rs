// src/math/geometry/collection.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::polygon::Ring,
    types::Point2D,
};
use tracing::debug;

/// Eingabegeometrie nach der Reparatur: genau ein Polygon oder mehrere.
/// Wird an der Pipeline-Grenze einmal in eine flache Ring-Liste zerlegt.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Single(Ring),
    Multi(Vec<Ring>),
}

impl Geometry {
    /// Zugriff auf die Ringe ohne Kopie
    pub fn rings(&self) -> &[Ring] {
        match self {
            Geometry::Single(ring) => std::slice::from_ref(ring),
            Geometry::Multi(rings) => rings,
        }
    }

    pub fn into_rings(self) -> Vec<Ring> {
        match self {
            Geometry::Single(ring) => vec![ring],
            Geometry::Multi(rings) => rings,
        }
    }

    pub fn part_count(&self) -> usize {
        self.rings().len()
    }
}

/// Name des Geometrietyps für Fehlermeldungen
fn geo_type_name(geometry: &geo::Geometry<f64>) -> &'static str {
    match geometry {
        geo::Geometry::Point(_) => "Point",
        geo::Geometry::Line(_) => "Line",
        geo::Geometry::LineString(_) => "LineString",
        geo::Geometry::Polygon(_) => "Polygon",
        geo::Geometry::MultiPoint(_) => "MultiPoint",
        geo::Geometry::MultiLineString(_) => "MultiLineString",
        geo::Geometry::MultiPolygon(_) => "MultiPolygon",
        geo::Geometry::GeometryCollection(_) => "GeometryCollection",
        geo::Geometry::Rect(_) => "Rect",
        geo::Geometry::Triangle(_) => "Triangle",
    }
}

/// Exterior eines geo-Polygons als Ring. Löcher gehören nicht zum generalisierten Rand.
fn exterior_ring(polygon: &geo::Polygon<f64>) -> MathResult<Ring> {
    if !polygon.interiors().is_empty() {
        debug!(
            holes = polygon.interiors().len(),
            "Dropping interior rings; only the exterior boundary is generalized"
        );
    }
    if polygon.exterior().0.is_empty() {
        return Err(MathError::EmptyPolygon);
    }
    Ring::closed(polygon.exterior().coords().map(|c| Point2D::from(*c)).collect())
}

impl TryFrom<&geo::Geometry<f64>> for Geometry {
    type Error = MathError;

    fn try_from(geometry: &geo::Geometry<f64>) -> Result<Self, Self::Error> {
        match geometry {
            geo::Geometry::Polygon(polygon) => Ok(Geometry::Single(exterior_ring(polygon)?)),
            geo::Geometry::MultiPolygon(multi) => Ok(Geometry::Multi(
                multi
                    .0
                    .iter()
                    .map(exterior_ring)
                    .collect::<MathResult<Vec<_>>>()?,
            )),
            other => Err(MathError::UnsupportedGeometryType {
                found: geo_type_name(other).to_string(),
            }),
        }
    }
}

impl From<&Ring> for geo::Polygon<f64> {
    fn from(ring: &Ring) -> Self {
        let exterior: geo::LineString<f64> = ring
            .vertices()
            .iter()
            .map(|p| geo::Coord::from(*p))
            .collect();
        geo::Polygon::new(exterior, vec![])
    }
}

/// Ein Eingabe-Feature: Geometrie plus optional vorberechnete Fläche (Attribut "Area").
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub area: Option<f64>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            area: None,
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }
}

/// Eingabeschicht, wie sie der Eingabe-Kollaborator liefert.
/// Das CRS ist für die Pipeline opak und wird nur durchgereicht.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub crs: Option<String>,
    pub features: Vec<Feature>,
}

impl Layer {
    pub fn new(crs: Option<String>, features: Vec<Feature>) -> Self {
        Self { crs, features }
    }

    /// Baut eine Schicht aus geo-Geometrien. Ein einziger nicht unterstützter Typ
    /// bricht den gesamten Lauf ab.
    pub fn from_geo<I>(crs: Option<String>, geometries: I) -> MathResult<Self>
    where
        I: IntoIterator<Item = (geo::Geometry<f64>, Option<f64>)>,
    {
        let features = geometries
            .into_iter()
            .map(|(geometry, area)| {
                Ok(Feature {
                    geometry: Geometry::try_from(&geometry)?,
                    area,
                })
            })
            .collect::<MathResult<Vec<_>>>()?;
        Ok(Self { crs, features })
    }

    /// Zerlegt alle Features in eine flache Menge einfacher Ringe.
    pub fn decompose(&self) -> PolygonSet {
        let rings = self
            .features
            .iter()
            .flat_map(|feature| feature.geometry.rings().iter().cloned())
            .collect();
        PolygonSet::new(self.crs.clone(), rings)
    }
}

/// Menge von Ringen mit gemeinsamem (opakem) Koordinatenbezug.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonSet {
    pub crs: Option<String>,
    pub rings: Vec<Ring>,
}

impl PolygonSet {
    pub fn new(crs: Option<String>, rings: Vec<Ring>) -> Self {
        Self { crs, rings }
    }

    /// Leere Menge mit demselben CRS
    pub fn empty_like(other: &PolygonSet) -> Self {
        Self::new(other.crs.clone(), Vec::new())
    }

    pub fn push(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ring> {
        self.rings.iter()
    }

    /// Konvertierung für Kollaboratoren, die mit geo arbeiten
    pub fn to_geo(&self) -> geo::MultiPolygon<f64> {
        geo::MultiPolygon::new(self.rings.iter().map(geo::Polygon::from).collect())
    }
}
