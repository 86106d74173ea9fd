//! Sketch geometry: the boundary line a user draws on the map surface.
//!
//! These types provide a bridge between the GeoJSON wire format the
//! processing service consumes and the plain coordinate sequences the
//! workflow logic reasons about.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};

use crate::error::{GridsketchError, Result};

/// An ordered sequence of (longitude, latitude) pairs as currently sketched
/// on the drawing surface. Raw until validated by the processing service;
/// processable only with at least 2 points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SketchLine {
    coords: Vec<[f64; 2]>,
}

impl SketchLine {
    pub fn new(coords: Vec<[f64; 2]>) -> Self {
        Self { coords }
    }

    /// The raw coordinate sequence
    pub fn points(&self) -> &[[f64; 2]] {
        &self.coords
    }

    pub fn point_count(&self) -> usize {
        self.coords.len()
    }

    /// Whether the line forms a ring: more than one point and the first
    /// vertex exactly equals the last.
    pub fn is_ring(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => self.coords.len() > 1 && first == last,
            _ => false,
        }
    }

    /// A deep copy with a copy of the first vertex appended, turning an
    /// open line into a ring. Returns an unchanged copy of an empty line.
    pub fn closed(&self) -> Self {
        let mut coords = self.coords.clone();
        if let Some(first) = self.coords.first() {
            coords.push(*first);
        }
        Self { coords }
    }

    /// The wire shape both service endpoints consume: a FeatureCollection
    /// holding exactly one LineString feature.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let positions: Vec<Vec<f64>> = self.coords.iter().map(|c| vec![c[0], c[1]]).collect();
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(positions))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }
    }

    /// Extract the sketched line from a FeatureCollection. Only the first
    /// feature is considered; it must be a LineString.
    pub fn from_feature_collection(collection: &FeatureCollection) -> Result<Self> {
        let feature = collection.features.first().ok_or_else(|| {
            GridsketchError::validation("FeatureCollection has no features")
        })?;
        Self::from_feature(feature)
    }

    /// Extract the sketched line from a single Feature.
    pub fn from_feature(feature: &Feature) -> Result<Self> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GridsketchError::validation("Feature has no geometry"))?;
        Self::from_geometry(geometry)
    }

    /// Extract the sketched line from a bare Geometry.
    pub fn from_geometry(geometry: &Geometry) -> Result<Self> {
        match &geometry.value {
            Value::LineString(positions) => {
                let coords = positions
                    .iter()
                    .map(|p| {
                        if p.len() >= 2 {
                            Ok([p[0], p[1]])
                        } else {
                            Err(GridsketchError::validation(
                                "LineString position has fewer than 2 ordinates",
                            ))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self { coords })
            }
            _ => Err(GridsketchError::validation("Input must be a LineString Feature")),
        }
    }

    /// Accept any of the GeoJSON shapes a sketch file may hold: a
    /// FeatureCollection, a single Feature, or a bare Geometry.
    pub fn from_geojson(geojson: &GeoJson) -> Result<Self> {
        match geojson {
            GeoJson::FeatureCollection(fc) => Self::from_feature_collection(fc),
            GeoJson::Feature(feature) => Self::from_feature(feature),
            GeoJson::Geometry(geometry) => Self::from_geometry(geometry),
        }
    }
}
