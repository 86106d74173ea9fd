//! Server-confirmed AOI statistics.

use serde::{Deserialize, Serialize};

use crate::models::geometry::SketchLine;

/// Centroid returned by the processing service. Both fields are null when
/// the service could not compute one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Centroid {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

impl Centroid {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon: Some(lon), lat: Some(lat) }
    }
}

/// Statistics the processing service computes for a submitted line.
///
/// Closure with fewer than 4 points yields zero area by policy: the loop is
/// closed but cannot bound a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AoiStats {
    pub num_points: usize,
    pub area_sqkm: f64,
    pub is_closed: bool,
    pub centroid: Centroid,
}

impl AoiStats {
    /// Human-readable area, annotating the zero-area policy cases.
    pub fn area_display(&self) -> String {
        if self.area_sqkm > 0.0 {
            format!("{} km²", self.area_sqkm)
        } else if self.is_closed && self.num_points < 4 {
            "0 km² (requires at least 4 points)".to_string()
        } else if !self.is_closed {
            "0 km² (open loop)".to_string()
        } else {
            "0 km²".to_string()
        }
    }
}

/// The last server-confirmed AOI: the exact geometry snapshot that was
/// submitted plus the statistics the service returned for it.
///
/// Valid only while it reflects the current sketch; any edit, delete, or
/// mode change that alters the sketched feature invalidates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedAoi {
    pub line: SketchLine,
    pub stats: AoiStats,
}

impl ProcessedAoi {
    pub fn new(line: SketchLine, stats: AoiStats) -> Self {
        Self { line, stats }
    }

    pub fn is_closed(&self) -> bool {
        self.stats.is_closed
    }

    pub fn point_count(&self) -> usize {
        self.line.point_count()
    }

    /// Closing the loop needs at least 3 points.
    pub fn can_close(&self) -> bool {
        self.point_count() >= 3
    }

    /// Segmentation needs a closed ring with at least 4 points.
    pub fn can_segment(&self) -> bool {
        self.is_closed() && self.point_count() >= 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "num_points": 5,
            "area_sqkm": 12.345,
            "is_closed": true,
            "centroid": {"lon": 115.2, "lat": -8.5}
        }"#;

        let stats: AoiStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.num_points, 5);
        assert_eq!(stats.area_sqkm, 12.345);
        assert!(stats.is_closed);
        assert_eq!(stats.centroid.lon, Some(115.2));
    }

    #[test]
    fn test_null_centroid() {
        let json = r#"{
            "num_points": 2,
            "area_sqkm": 0,
            "is_closed": false,
            "centroid": {"lon": null, "lat": null}
        }"#;

        let stats: AoiStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.centroid.lon, None);
        assert_eq!(stats.centroid.lat, None);
    }

    #[test]
    fn test_area_display_annotations() {
        let mut stats = AoiStats {
            num_points: 2,
            area_sqkm: 0.0,
            is_closed: false,
            centroid: Centroid::default(),
        };
        assert_eq!(stats.area_display(), "0 km² (open loop)");

        stats.is_closed = true;
        stats.num_points = 3;
        assert_eq!(stats.area_display(), "0 km² (requires at least 4 points)");

        stats.num_points = 5;
        stats.area_sqkm = 42.5;
        assert_eq!(stats.area_display(), "42.5 km²");
    }

    #[test]
    fn test_close_and_segment_preconditions() {
        let open_2pt = ProcessedAoi::new(
            SketchLine::new(vec![[0.0, 0.0], [1.0, 1.0]]),
            AoiStats {
                num_points: 2,
                area_sqkm: 0.0,
                is_closed: false,
                centroid: Centroid::default(),
            },
        );
        assert!(!open_2pt.can_close());
        assert!(!open_2pt.can_segment());

        let closed_4pt = ProcessedAoi::new(
            SketchLine::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]),
            AoiStats {
                num_points: 4,
                area_sqkm: 8.0,
                is_closed: true,
                centroid: Centroid::new(0.5, 0.5),
            },
        );
        assert!(closed_4pt.can_close());
        assert!(closed_4pt.can_segment());

        // Closed ring below the polygon minimum
        let closed_3pt = ProcessedAoi::new(
            SketchLine::new(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]),
            AoiStats {
                num_points: 3,
                area_sqkm: 0.0,
                is_closed: true,
                centroid: Centroid::default(),
            },
        );
        assert!(!closed_3pt.can_segment());
    }
}
