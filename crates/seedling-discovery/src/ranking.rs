//! Ranking and coverage of discovered centers

use seedling_domain::{DiscoveredCenter, NoteId};
use std::collections::{HashMap, HashSet};

/// Sort strongest first; equal strengths keep their reply order
pub fn rank_centers(centers: &mut [DiscoveredCenter]) {
    centers.sort_by_key(|center| center.strength.rank());
}

/// Keep the recommendation only on the first (top-ranked) center
pub fn keep_top_recommendation(centers: &mut [DiscoveredCenter]) {
    for center in centers.iter_mut().skip(1) {
        center.recommendation = None;
    }
}

/// Percentage of `total` notes connected to at least one center, rounded
pub fn coverage(centers: &[DiscoveredCenter], total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let covered: HashSet<&NoteId> = centers
        .iter()
        .flat_map(|center| center.connected_notes.iter())
        .collect();
    (covered.len() as f64 / total as f64 * 100.0).round() as u32
}

/// Replace seq ids with note ids; unknown and repeated seq ids are dropped
pub fn resolve_seq_ids(center: &mut DiscoveredCenter, seq_map: &HashMap<String, NoteId>) {
    let mut seen = HashSet::new();
    center.connected_notes = center
        .connected_notes
        .iter()
        .filter_map(|seq| seq_map.get(seq.as_str().to_lowercase().as_str()))
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();
}
