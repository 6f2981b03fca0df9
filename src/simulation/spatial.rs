//! Spatial indexing for obstacle queries.
//!
//! Footprints are indexed by centroid in a KD-tree so each vehicle only tests
//! the obstacles it could possibly sense or touch.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};
use log::warn;

use super::geometry::{Point, Polygon};

/// Type alias for 2D spatial KD-tree used for efficient neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// Index over a snapshot of obstacle footprints.
pub struct ObstacleIndex<'a> {
    footprints: &'a [Polygon],
    /// `None` when the tree could not be built; every query then returns all
    /// footprints.
    tree: Option<Tree2D>,
    /// Largest centroid-to-vertex distance of any footprint.
    reach: f32,
}

impl<'a> ObstacleIndex<'a> {
    /// Builds an index over `footprints`.
    pub fn build(footprints: &'a [Polygon]) -> Self {
        let reach = footprints
            .iter()
            .map(Polygon::bounding_radius)
            .fold(0.0, f32::max);

        let tree = match build_tree(footprints) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!("obstacle index unavailable, testing every footprint: {:?}", e);
                None
            }
        };

        Self {
            footprints,
            tree,
            reach,
        }
    }

    /// All footprints in the snapshot.
    pub fn footprints(&self) -> &'a [Polygon] {
        self.footprints
    }

    /// Footprints that may lie within `radius` of `center`.
    ///
    /// Results keep snapshot order so sensor tie-breaking stays deterministic.
    pub fn nearby(&self, center: Point, radius: f32) -> Vec<&'a Polygon> {
        let Some(tree) = &self.tree else {
            return self.footprints.iter().collect();
        };

        let search = radius + self.reach;
        match tree.within(&[center.x, center.y], search.powi(2), &squared_euclidean) {
            Ok(found) => {
                let mut indices: Vec<usize> = found.into_iter().map(|(_, &idx)| idx).collect();
                indices.sort_unstable();
                indices.into_iter().map(|idx| &self.footprints[idx]).collect()
            }
            Err(_) => self.footprints.iter().collect(),
        }
    }
}

/// Helper function to build a KD-tree from footprint centroids.
fn build_tree(footprints: &[Polygon]) -> Result<Tree2D, KdTreeError> {
    let mut tree = KdTree::with_capacity(2, footprints.len().max(1));
    for (i, footprint) in footprints.iter().enumerate() {
        let c = footprint.centroid();
        tree.add(vec![c.x, c.y], i)?;
    }
    Ok(tree)
}
