//! Tag frequency and co-occurrence index

use seedling_domain::{normalize_tag, Note, TagCombination, TagCount, TagFilterMode, TagStats};
use std::collections::{HashMap, HashSet};

/// Tag statistics built in a single pass over a note set
///
/// Tags keep first-seen order, which is also the tie-breaker whenever results
/// are ranked by count.
#[derive(Debug, Clone, Default)]
pub struct TagCoOccurrenceIndex {
    stats: Vec<TagStats>,
    positions: HashMap<String, usize>,
    co_positions: Vec<HashMap<String, usize>>,
}

impl TagCoOccurrenceIndex {
    /// Build the index from notes
    pub fn build(notes: &[Note]) -> Self {
        let mut index = Self::default();

        for note in notes {
            let tags = unique_tags(&note.tags);
            for tag in &tags {
                let pos = index.position_of(tag);
                let stats = &mut index.stats[pos];
                stats.count += 1;
                stats.note_ids.push(note.id.clone());
                stats.earliest_created = stats.earliest_created.min(note.created_at);
                stats.latest_modified = stats.latest_modified.max(note.modified_at);

                for other in &tags {
                    if other == tag {
                        continue;
                    }
                    let existing = index.co_positions[pos].get(other).copied();
                    match existing {
                        Some(slot) => index.stats[pos].co_occurrences[slot].count += 1,
                        None => {
                            let slot = index.stats[pos].co_occurrences.len();
                            index.co_positions[pos].insert(other.clone(), slot);
                            index.stats[pos].co_occurrences.push(TagCount {
                                tag: other.clone(),
                                count: 1,
                            });
                        }
                    }
                }
            }
        }

        index
    }

    fn position_of(&mut self, tag: &str) -> usize {
        if let Some(&pos) = self.positions.get(tag) {
            return pos;
        }
        let pos = self.stats.len();
        self.stats.push(TagStats::new(tag));
        self.co_positions.push(HashMap::new());
        self.positions.insert(tag.to_string(), pos);
        pos
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether no tags were seen
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Statistics for one tag
    pub fn stats(&self, tag: &str) -> Option<&TagStats> {
        self.positions
            .get(&normalize_tag(tag))
            .map(|&pos| &self.stats[pos])
    }

    /// All tags, most frequent first
    pub fn tags_by_frequency(&self) -> Vec<&TagStats> {
        let mut all: Vec<&TagStats> = self.stats.iter().collect();
        all.sort_by(|a, b| b.count.cmp(&a.count));
        all
    }

    /// Tags starting with `prefix`, most frequent first
    pub fn search_tags(&self, prefix: &str) -> Vec<&TagStats> {
        let prefix = normalize_tag(prefix);
        self.tags_by_frequency()
            .into_iter()
            .filter(|stats| stats.tag.starts_with(&prefix))
            .collect()
    }

    /// The `limit` tags most often seen together with `tag`
    ///
    /// Sorted by count, descending; ties keep first-seen order.
    pub fn related_tags(&self, tag: &str, limit: usize) -> Vec<TagCount> {
        let Some(stats) = self.stats(tag) else {
            return Vec::new();
        };
        let mut related = stats.co_occurrences.clone();
        related.sort_by(|a, b| b.count.cmp(&a.count));
        related.truncate(limit);
        related
    }

    /// Tag pairs seen together on at least `min_co_occurrence` notes
    ///
    /// Ranked by the pair's combined individual frequency; each pair appears once.
    pub fn suggested_combinations(&self, min_co_occurrence: usize, limit: usize) -> Vec<TagCombination> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut combinations = Vec::new();

        for stats in &self.stats {
            for co in &stats.co_occurrences {
                if co.count < min_co_occurrence {
                    continue;
                }
                let key = sorted_pair(&stats.tag, &co.tag);
                if !seen.insert(key.clone()) {
                    continue;
                }
                let other_count = self.stats(&co.tag).map(|s| s.count).unwrap_or(0);
                combinations.push(TagCombination {
                    tags: key,
                    co_occurrence: co.count,
                    combined_frequency: stats.count + other_count,
                });
            }
        }

        combinations.sort_by(|a, b| b.combined_frequency.cmp(&a.combined_frequency));
        combinations.truncate(limit);
        combinations
    }

    /// Filter notes by tag membership
    ///
    /// `Any` keeps notes with at least one of `tags` and passes everything through
    /// when `tags` is empty; `All` keeps notes carrying every tag.
    pub fn filter_by_tags<'n>(notes: &'n [Note], tags: &[String], mode: TagFilterMode) -> Vec<&'n Note> {
        let wanted: Vec<String> = unique_tags(tags);
        if wanted.is_empty() {
            return notes.iter().collect();
        }

        notes
            .iter()
            .filter(|note| {
                let has: HashSet<String> = note.tags.iter().map(|t| normalize_tag(t)).collect();
                match mode {
                    TagFilterMode::Any => wanted.iter().any(|t| has.contains(t)),
                    TagFilterMode::All => wanted.iter().all(|t| has.contains(t)),
                }
            })
            .collect()
    }
}

fn unique_tags(tags: &[String]) -> Vec<String> {
    let mut unique = Vec::new();
    for tag in tags {
        let tag = normalize_tag(tag);
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes() -> Vec<Note> {
        vec![
            Note::new("1.md", "").with_tags(["grief", "kitchen", "mother"]).with_timestamps(300, 900),
            Note::new("2.md", "").with_tags(["grief", "mother"]).with_timestamps(100, 400),
            Note::new("3.md", "").with_tags(["travel", "grief"]).with_timestamps(200, 1200),
            Note::new("4.md", "").with_tags(["travel"]).with_timestamps(500, 600),
            Note::new("5.md", ""),
        ]
    }

    #[test]
    fn test_counts_and_dates() {
        let index = TagCoOccurrenceIndex::build(&notes());
        let grief = index.stats("#Grief").unwrap();

        assert_eq!(grief.count, 3);
        assert_eq!(grief.note_ids.len(), 3);
        assert_eq!(grief.earliest_created, 100);
        assert_eq!(grief.latest_modified, 1200);
        assert_eq!(grief.co_occurrence("mother"), 2);
        assert_eq!(grief.co_occurrence("kitchen"), 1);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_related_tags_ties_keep_insertion_order() {
        let index = TagCoOccurrenceIndex::build(&notes());
        let related = index.related_tags("grief", 3);

        let names: Vec<&str> = related.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["mother", "kitchen", "travel"]);
        assert_eq!(index.related_tags("grief", 1).len(), 1);
        assert!(index.related_tags("unknown", 5).is_empty());
    }

    #[test]
    fn test_tags_by_frequency() {
        let index = TagCoOccurrenceIndex::build(&notes());
        let order: Vec<&str> = index.tags_by_frequency().iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(order, vec!["grief", "mother", "travel", "kitchen"]);
    }

    #[test]
    fn test_filter_any_and_all() {
        let notes = notes();
        let tags = vec!["mother".to_string(), "travel".to_string()];

        let any = TagCoOccurrenceIndex::filter_by_tags(&notes, &tags, TagFilterMode::Any);
        assert_eq!(any.len(), 4);

        let both = vec!["grief".to_string(), "Mother".to_string()];
        let all = TagCoOccurrenceIndex::filter_by_tags(&notes, &both, TagFilterMode::All);
        let ids: Vec<&str> = all.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1.md", "2.md"]);
    }

    #[test]
    fn test_filter_any_empty_is_pass_through() {
        let notes = notes();
        let kept = TagCoOccurrenceIndex::filter_by_tags(&notes, &[], TagFilterMode::Any);
        assert_eq!(kept.len(), notes.len());
    }

    #[test]
    fn test_suggested_combinations() {
        let index = TagCoOccurrenceIndex::build(&notes());

        let combos = index.suggested_combinations(2, 10);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].tags, ("grief".to_string(), "mother".to_string()));
        assert_eq!(combos[0].co_occurrence, 2);
        assert_eq!(combos[0].combined_frequency, 5);

        let all = index.suggested_combinations(1, 10);
        // grief-kitchen, grief-mother, kitchen-mother, grief-travel
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].combined_frequency, 5);
    }

    #[test]
    fn test_search_tags() {
        let index = TagCoOccurrenceIndex::build(&notes());
        let found: Vec<&str> = index.search_tags("#m").iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(found, vec!["mother"]);
    }
}
