//! Spatial-Index (KD-Tree) über editierbare Stützpunkte.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::feature::{Feature, FeatureId};

/// Treffer einer Vertex-Abfrage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMatch {
    /// Feature, zu dem der Stützpunkt gehört
    pub feature_id: FeatureId,
    /// Index des Stützpunkts (wie in `Geometry::vertices()`)
    pub vertex_index: usize,
    /// Position des Stützpunkts
    pub position: DVec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

#[derive(Debug, Clone, Copy)]
struct VertexEntry {
    feature_id: FeatureId,
    vertex_index: usize,
    position: DVec2,
}

/// Read-only Index über die Stützpunkte einer Feature-Menge.
///
/// Wird beim Betreten des Modify-Zustands aus der Selektion gebaut und bei
/// jeder Geometrieänderung neu erzeugt.
#[derive(Debug, Clone)]
pub struct VertexIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<VertexEntry>,
}

impl VertexIndex {
    /// Leerer Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            entries: Vec::new(),
        }
    }

    /// Baut den Index über alle Stützpunkte der übergebenen Features.
    pub fn from_features<'a>(features: impl IntoIterator<Item = &'a Feature>) -> Self {
        let entries: Vec<VertexEntry> = features
            .into_iter()
            .flat_map(|feature| {
                feature
                    .geometry
                    .vertices()
                    .into_iter()
                    .enumerate()
                    .map(move |(vertex_index, position)| VertexEntry {
                        feature_id: feature.id,
                        vertex_index,
                        position,
                    })
            })
            .filter(|entry| entry.position.is_finite())
            .collect();

        let points: Vec<[f64; 2]> = entries
            .iter()
            .map(|e| [e.position.x, e.position.y])
            .collect();

        Self {
            tree: (&points).into(),
            entries,
        }
    }

    /// Anzahl indexierter Stützpunkte.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` wenn keine Stützpunkte im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nächster Stützpunkt zur Position.
    pub fn nearest(&self, query: DVec2) -> Option<VertexMatch> {
        if self.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        let entry = self.entries.get(result.item as usize)?;
        Some(VertexMatch {
            feature_id: entry.feature_id,
            vertex_index: entry.vertex_index,
            position: entry.position,
            distance: result.distance.sqrt(),
        })
    }

    /// Nächster Stützpunkt innerhalb des Radius.
    pub fn nearest_within(&self, query: DVec2, radius: f64) -> Option<VertexMatch> {
        self.nearest(query).filter(|m| m.distance <= radius)
    }

    /// Alle Stützpunkte im Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: DVec2, radius: f64) -> Vec<VertexMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }
        let mut results: Vec<VertexMatch> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], radius * radius)
            .into_iter()
            .filter_map(|hit| {
                let entry = self.entries.get(hit.item as usize)?;
                Some(VertexMatch {
                    feature_id: entry.feature_id,
                    vertex_index: entry.vertex_index,
                    position: entry.position,
                    distance: hit.distance.sqrt(),
                })
            })
            .collect();
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }
}

impl Default for VertexIndex {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;

    fn sample() -> Vec<Feature> {
        vec![
            Feature::new(
                1,
                Geometry::LineString(vec![DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]),
            ),
            Feature::new(2, Geometry::rectangle(DVec2::new(20.0, 20.0), DVec2::new(30.0, 30.0))),
        ]
    }

    #[test]
    fn nearest_returns_feature_and_vertex() {
        let features = sample();
        let index = VertexIndex::from_features(&features);
        assert_eq!(index.len(), 6, "Polygon-Schlusspunkt darf nicht indexiert werden");

        let hit = index
            .nearest(DVec2::new(9.5, 0.2))
            .expect("Treffer erwartet");
        assert_eq!(hit.feature_id, 1);
        assert_eq!(hit.vertex_index, 1);
    }

    #[test]
    fn nearest_within_respects_radius() {
        let features = sample();
        let index = VertexIndex::from_features(&features);
        assert!(index.nearest_within(DVec2::new(15.0, 15.0), 1.0).is_none());
        let hits = index.within_radius(DVec2::new(20.0, 20.0), 0.5);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].feature_id, 2);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = VertexIndex::empty();
        assert!(index.is_empty());
        assert!(index.nearest(DVec2::ZERO).is_none());
    }
}
