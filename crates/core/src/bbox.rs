use crate::{Error, Result};
use geojson::Geometry;
use serde::{Deserialize, Serialize};

/// A bounding box, in either two or three dimensions.
///
/// Coordinate order follows the STAC/GeoJSON convention: `[west, south,
/// east, north]` or, with an elevation axis, `[west, south, min-elevation,
/// east, north, max-elevation]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bbox {
    /// A two-dimensional bounding box.
    TwoDimensional([f64; 4]),
    /// A three-dimensional bounding box.
    ThreeDimensional([f64; 6]),
}

impl Default for Bbox {
    fn default() -> Bbox {
        Bbox::TwoDimensional([-180.0, -90.0, 180.0, 90.0])
    }
}

impl Bbox {
    /// Creates a two-dimensional bbox from west/south/east/north values.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Bbox {
        Bbox::TwoDimensional([west, south, east, north])
    }

    /// Returns the western-most coordinate.
    pub fn west(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[0],
            Bbox::ThreeDimensional(b) => b[0],
        }
    }

    /// Returns the southern-most coordinate.
    pub fn south(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[1],
            Bbox::ThreeDimensional(b) => b[1],
        }
    }

    /// Returns the eastern-most coordinate.
    pub fn east(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[2],
            Bbox::ThreeDimensional(b) => b[3],
        }
    }

    /// Returns the northern-most coordinate.
    pub fn north(&self) -> f64 {
        match self {
            Bbox::TwoDimensional(b) => b[3],
            Bbox::ThreeDimensional(b) => b[4],
        }
    }

    /// Expands this bbox, in place, to also cover `other`.
    ///
    /// A bbox that still holds the default global extent is replaced
    /// outright by the other bbox, matching the behavior expected the first
    /// time a real bbox is unioned into a brand new collection's extent.
    pub fn update(&mut self, other: Bbox) {
        if *self == Bbox::default() {
            *self = other;
            return;
        }
        let west = self.west().min(other.west());
        let south = self.south().min(other.south());
        let east = self.east().max(other.east());
        let north = self.north().max(other.north());
        *self = Bbox::new(west, south, east, north);
    }

    /// Computes the union of a non-empty slice of bboxes.
    pub fn union(bboxes: &[Bbox]) -> Option<Bbox> {
        let mut iter = bboxes.iter().copied();
        let mut union = iter.next()?;
        for bbox in iter {
            union.update(bbox);
        }
        Some(union)
    }

    /// Computes the bounding box of a GeoJSON geometry.
    ///
    /// Returns [Error::InvalidBbox] if the geometry has no coordinates at
    /// all (e.g. an empty `GeometryCollection`).
    pub fn from_geometry(geometry: &Geometry) -> Result<Bbox> {
        let mut min = [f64::INFINITY, f64::INFINITY];
        let mut max = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        let mut found = false;
        collect_bounds(&geometry.value, &mut min, &mut max, &mut found);
        if found {
            Ok(Bbox::new(min[0], min[1], max[0], max[1]))
        } else {
            Err(Error::InvalidBbox(
                Vec::new(),
                "geometry has no coordinates",
            ))
        }
    }
}

fn update_point(point: &[f64], min: &mut [f64; 2], max: &mut [f64; 2], found: &mut bool) {
    if point.len() >= 2 {
        min[0] = min[0].min(point[0]);
        min[1] = min[1].min(point[1]);
        max[0] = max[0].max(point[0]);
        max[1] = max[1].max(point[1]);
        *found = true;
    }
}

fn collect_bounds(value: &geojson::Value, min: &mut [f64; 2], max: &mut [f64; 2], found: &mut bool) {
    use geojson::Value::*;
    match value {
        Point(p) => update_point(p, min, max, found),
        MultiPoint(points) | LineString(points) => {
            for p in points {
                update_point(p, min, max, found);
            }
        }
        MultiLineString(lines) | Polygon(lines) => {
            for line in lines {
                for p in line {
                    update_point(p, min, max, found);
                }
            }
        }
        MultiPolygon(polygons) => {
            for polygon in polygons {
                for line in polygon {
                    for p in line {
                        update_point(p, min, max, found);
                    }
                }
            }
        }
        GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_bounds(&geometry.value, min, max, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Bbox;
    use geojson::{Geometry, Value};

    #[test]
    fn default_is_global() {
        assert_eq!(Bbox::default(), Bbox::new(-180.0, -90.0, 180.0, 90.0));
    }

    #[test]
    fn update_replaces_default() {
        let mut bbox = Bbox::default();
        bbox.update(Bbox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(bbox, Bbox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn update_unions() {
        let mut bbox = Bbox::new(0.0, 0.0, 1.0, 1.0);
        bbox.update(Bbox::new(2.0, -1.0, 3.0, 0.5));
        assert_eq!(bbox, Bbox::new(0.0, -1.0, 3.0, 1.0));
    }

    #[test]
    fn from_point_geometry() {
        let geometry = Geometry::new(Value::Point(vec![1.0, 2.0]));
        let bbox = Bbox::from_geometry(&geometry).unwrap();
        assert_eq!(bbox, Bbox::new(1.0, 2.0, 1.0, 2.0));
    }

    #[test]
    fn from_polygon_geometry() {
        let geometry = Geometry::new(Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]));
        let bbox = Bbox::from_geometry(&geometry).unwrap();
        assert_eq!(bbox, Bbox::new(0.0, 0.0, 1.0, 1.0));
    }
}
