//! Dataset loading.
//!
//! Two JSON layouts are accepted:
//! - a raw point list: `[[x, y, z], ...]`
//! - a convex hull log: `{"Cloud": [[x, y, z], ...], "Index": [[a, b, c], ...]}`
//!   where every `Index` entry is a triangular facet referencing `Cloud`
//!   (other keys, such as `"Normals"`, are ignored)
//!
//! Points are translated so the center of their axis-aligned bounding box
//! sits at the origin.

use std::path::Path;

use serde::Deserialize;

use crate::error::DatasetError;
use crate::math::Vec3;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDataset {
    Points(Vec<[f32; 3]>),
    HullLog {
        #[serde(rename = "Cloud")]
        cloud: Vec<[f32; 3]>,
        #[serde(rename = "Index", default)]
        index: Vec<[usize; 3]>,
    },
}

/// Centered point cloud with optional triangular facets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<Vec3>,
    facets: Vec<[usize; 3]>,
    center: Vec3,
    extent: f32,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json_str(&text)?;
        log::info!(
            "loaded {} points and {} facets from {} (extent {})",
            dataset.points.len(),
            dataset.facets.len(),
            path.display(),
            dataset.extent
        );
        Ok(dataset)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DatasetError> {
        match serde_json::from_str::<RawDataset>(text)? {
            RawDataset::Points(cloud) => Self::new(cloud.into_iter().map(Vec3::from).collect(), Vec::new()),
            RawDataset::HullLog { cloud, index } => {
                Self::new(cloud.into_iter().map(Vec3::from).collect(), index)
            }
        }
    }

    /// Validates facet indices and centers `points` on their bounding box.
    pub fn new(mut points: Vec<Vec3>, facets: Vec<[usize; 3]>) -> Result<Self, DatasetError> {
        let Some((min, max)) = bounds(&points) else {
            return Err(DatasetError::Empty);
        };

        for (facet, corners) in facets.iter().enumerate() {
            if let Some(&index) = corners.iter().find(|&&i| i >= points.len()) {
                return Err(DatasetError::IndexOutOfRange {
                    facet,
                    index,
                    len: points.len(),
                });
            }
        }

        let center = (min + max) * 0.5;
        for p in &mut points {
            *p = *p - center;
        }

        let size = max - min;
        let extent = size.x.max(size.y).max(size.z);

        Ok(Self {
            points,
            facets,
            center,
            extent,
        })
    }

    /// Centered points.
    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn facets(&self) -> &[[usize; 3]] {
        &self.facets
    }

    /// Bounding box center of the input, i.e. the translation that was removed.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Largest side of the bounding box.
    #[inline]
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Facets as a flat triangle list (three vertices per facet).
    ///
    /// With `double_sided`, each facet is emitted a second time with reversed
    /// winding so it survives back-face culling from either side.
    pub fn facet_triangles(&self, double_sided: bool) -> Vec<Vec3> {
        let per_facet = if double_sided { 6 } else { 3 };
        let mut out = Vec::with_capacity(self.facets.len() * per_facet);
        for &[a, b, c] in &self.facets {
            out.extend([self.points[a], self.points[b], self.points[c]]);
            if double_sided {
                out.extend([self.points[a], self.points[c], self.points[b]]);
            }
        }
        out
    }

    /// Facet edges as segment vertex pairs (three segments per facet).
    pub fn facet_edges(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.facets.len() * 6);
        for &[a, b, c] in &self.facets {
            let (pa, pb, pc) = (self.points[a], self.points[b], self.points[c]);
            out.extend([pa, pb, pb, pc, pc, pa]);
        }
        out
    }
}

fn bounds(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| {
        (
            Vec3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
            Vec3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_list_is_centered() {
        let d = Dataset::from_json_str("[[1, 1, 1], [3, 5, 2]]").unwrap();
        assert_eq!(d.center(), Vec3::new(2.0, 3.0, 1.5));
        assert_eq!(d.points()[0], Vec3::new(-1.0, -2.0, -0.5));
        assert_eq!(d.points()[1], Vec3::new(1.0, 2.0, 0.5));
        assert!(d.facets().is_empty());
    }

    #[test]
    fn extent_is_largest_side() {
        let d = Dataset::from_json_str("[[0, 0, 0], [2, 7, -1]]").unwrap();
        assert_eq!(d.extent(), 7.0);
    }

    #[test]
    fn box_away_from_origin_is_not_stretched() {
        let d = Dataset::from_json_str("[[10, 10, 10], [12, 11, 10.5]]").unwrap();
        assert_eq!(d.extent(), 2.0);
        assert_eq!(d.center(), Vec3::new(11.0, 10.5, 10.25));
    }

    #[test]
    fn hull_log_reads_cloud_and_index() {
        let json = r#"{
            "Cloud": [[0,0,0],[1,0,0],[0,1,0],[0,0,1]],
            "Index": [[0,1,2],[0,1,3]],
            "Normals": [[0,0,-1],[0,-1,0]]
        }"#;
        let d = Dataset::from_json_str(json).unwrap();
        assert_eq!(d.points().len(), 4);
        assert_eq!(d.facets(), &[[0, 1, 2], [0, 1, 3]]);
    }

    #[test]
    fn hull_log_without_index() {
        let d = Dataset::from_json_str(r#"{"Cloud": [[1,2,3]]}"#).unwrap();
        assert_eq!(d.points(), &[Vec3::zero()]);
        assert_eq!(d.extent(), 0.0);
    }

    #[test]
    fn facet_geometry_counts() {
        let json = r#"{"Cloud": [[0,0,0],[1,0,0],[0,1,0]], "Index": [[0,1,2]]}"#;
        let d = Dataset::from_json_str(json).unwrap();
        assert_eq!(d.facet_triangles(false).len(), 3);
        assert_eq!(d.facet_triangles(true).len(), 6);

        let edges = d.facet_edges();
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[1], edges[2]);
        assert_eq!(edges[5], edges[0]);
    }

    #[test]
    fn double_sided_reverses_winding() {
        let json = r#"{"Cloud": [[0,0,0],[1,0,0],[0,1,0]], "Index": [[0,1,2]]}"#;
        let tris = Dataset::from_json_str(json).unwrap().facet_triangles(true);
        assert_eq!(tris[4], tris[2]);
        assert_eq!(tris[5], tris[1]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let json = r#"{"Cloud": [[0,0,0],[1,0,0]], "Index": [[0,1,5]]}"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::IndexOutOfRange { facet: 0, index: 5, len: 2 }
        ));
    }

    #[test]
    fn empty_cloud_is_rejected() {
        assert!(matches!(Dataset::from_json_str("[]"), Err(DatasetError::Empty)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            Dataset::from_json_str("[[1, 2]]"),
            Err(DatasetError::Json(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
