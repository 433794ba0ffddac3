//! Cluster discovery over the relationship graph

use crate::builder::RelationshipGraphBuilder;
use seedling_domain::{Cluster, Note, NoteId};
use std::collections::HashMap;
use tracing::debug;

/// Strongest edges considered per note
pub const DEFAULT_MAX_EDGES_PER_NOTE: usize = 10;

/// Groups strongly connected notes into clusters
///
/// For every note the strongest relationships (up to `max_edges_per_note`) are
/// taken; those at or above the threshold become undirected edges. Connected
/// components are found with an iterative depth-first traversal and singleton
/// components are dropped.
#[derive(Debug, Clone)]
pub struct ClusterFinder {
    max_edges_per_note: usize,
}

impl Default for ClusterFinder {
    fn default() -> Self {
        Self {
            max_edges_per_note: DEFAULT_MAX_EDGES_PER_NOTE,
        }
    }
}

impl ClusterFinder {
    /// Create a finder considering at most `max_edges_per_note` edges per note
    pub fn new(max_edges_per_note: usize) -> Self {
        Self { max_edges_per_note }
    }

    /// Find clusters of two or more notes connected at or above `min_strength`
    ///
    /// Members are listed in input order; clusters are ordered by their first member.
    pub fn find_clusters(&self, notes: &[Note], min_strength: f64) -> Vec<Cluster> {
        let adjacency = self.adjacency(notes, min_strength);

        let mut visited = vec![false; notes.len()];
        let mut clusters = Vec::new();
        let mut stack = Vec::new();

        for start in 0..notes.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push(start);

            let mut component = Vec::new();
            while let Some(node) = stack.pop() {
                component.push(node);
                for &next in &adjacency[node] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }

            if component.len() < 2 {
                continue;
            }
            component.sort_unstable();
            clusters.push(Cluster {
                notes: component.into_iter().map(|idx| notes[idx].id.clone()).collect(),
            });
        }

        debug!(
            "Found {} clusters among {} notes at threshold {:.2}",
            clusters.len(),
            notes.len(),
            min_strength
        );
        clusters
    }

    /// Undirected adjacency lists indexed like `notes`
    fn adjacency(&self, notes: &[Note], min_strength: f64) -> Vec<Vec<usize>> {
        let builder = RelationshipGraphBuilder::new(notes);
        let mut index: HashMap<&NoteId, usize> = HashMap::new();
        for (idx, note) in notes.iter().enumerate() {
            index.entry(&note.id).or_insert(idx);
        }

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); notes.len()];
        for (from, note) in notes.iter().enumerate() {
            let relationships = builder.relationships_for(note);
            for edge in relationships.strongest(self.max_edges_per_note) {
                if edge.strength < min_strength {
                    continue;
                }
                let Some(&to) = index.get(&edge.target) else {
                    continue;
                };
                if to == from {
                    continue;
                }
                if !adjacency[from].contains(&to) {
                    adjacency[from].push(to);
                }
                if !adjacency[to].contains(&from) {
                    adjacency[to].push(from);
                }
            }
        }
        adjacency
    }
}
