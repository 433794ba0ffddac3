//! Center discovery coordinator

use crate::config::DiscoveryConfig;
use crate::context::{build_seed_contexts, outline_links, scrub_outline};
use crate::phase::{DiscoveryPhase, PhaseTrail};
use crate::ranking::{coverage, keep_top_recommendation, rank_centers, resolve_seq_ids};
use crate::types::{DiscoveryOptions, DiscoveryOutcome};
use futures::future::join_all;
use seedling_domain::{
    DiscoveredCenter, LinkResolver, Note, NoteId, NoteSource, RelationshipHint, SeedPayload,
};
use seedling_graph::{ClusterFinder, RelationshipGraphBuilder, TagCoOccurrenceIndex};
use seedling_llm::{AiError, OperationKind, SeedCentersResponse};
use seedling_orchestrator::AiOrchestrator;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Notes read for one request
struct ReadNotes {
    notes: Vec<Note>,
    skipped: usize,
}

/// Turns a set of notes into ranked, coverage-scored centers
///
/// Validation always happens before any provider traffic; provider errors are
/// wrapped with the request's source description.
pub struct CenterDiscoveryCoordinator<S, R>
where
    S: NoteSource,
    R: LinkResolver,
{
    source: Arc<S>,
    resolver: Arc<R>,
    orchestrator: Arc<AiOrchestrator>,
    config: DiscoveryConfig,
}

impl<S, R> CenterDiscoveryCoordinator<S, R>
where
    S: NoteSource,
    R: LinkResolver,
{
    /// Create a coordinator
    pub fn new(
        source: Arc<S>,
        resolver: Arc<R>,
        orchestrator: Arc<AiOrchestrator>,
        config: DiscoveryConfig,
    ) -> Self {
        Self {
            source,
            resolver,
            orchestrator,
            config,
        }
    }

    /// The orchestrator in use
    pub fn orchestrator(&self) -> &Arc<AiOrchestrator> {
        &self.orchestrator
    }

    /// Discover centers across hand-picked seed notes
    ///
    /// # Errors
    ///
    /// - [`AiError::InsufficientSeeds`] when fewer than `min_seeds` distinct
    ///   notes are supplied, or remain readable after filtering
    /// - any orchestrator error, provider errors prefixed with the source
    pub async fn discover_from_seeds(
        &self,
        ids: &[NoteId],
        options: &DiscoveryOptions,
    ) -> Result<DiscoveryOutcome, AiError> {
        let request_id = Uuid::now_v7();
        let mut trail = PhaseTrail::new();
        info!(%request_id, seeds = ids.len(), "Starting seed discovery");

        let result = self.run_seeds(request_id, ids, options, &mut trail).await;
        finish(request_id, result, &mut trail)
    }

    /// Discover centers across the notes a map of content links to
    ///
    /// # Errors
    ///
    /// - [`AiError::InvalidMoc`] when the map itself cannot be read
    /// - [`AiError::MocNoValidNotes`], [`AiError::MocTooSmall`],
    ///   [`AiError::MocTooLarge`] for out-of-range readable note counts
    /// - any orchestrator error, provider errors prefixed with the source
    pub async fn discover_from_moc(
        &self,
        moc_id: &NoteId,
        options: &DiscoveryOptions,
    ) -> Result<DiscoveryOutcome, AiError> {
        let request_id = Uuid::now_v7();
        let mut trail = PhaseTrail::new();
        info!(%request_id, "Starting map-of-content discovery");

        let result = self.run_moc(request_id, moc_id, options, &mut trail).await;
        finish(request_id, result, &mut trail)
    }

    async fn run_seeds(
        &self,
        request_id: Uuid,
        ids: &[NoteId],
        options: &DiscoveryOptions,
        trail: &mut PhaseTrail,
    ) -> Result<DiscoveryOutcome, AiError> {
        let ids = unique_ids(ids.iter().cloned());
        self.require_seeds(ids.len())?;

        let read = self.read_all(&ids).await;
        let notes = self.apply_filter(read.notes, options);
        self.require_seeds(notes.len())?;
        let source = format!("seed discovery ({} notes)", notes.len());

        trail.advance(DiscoveryPhase::ContextBuilding);
        let (payload, seq_map) = self.build_payload(&notes, options);

        trail.advance(DiscoveryPhase::AwaitingProvider);
        let cost = self
            .orchestrator
            .estimate_seed_cost(OperationKind::FindCentersFromSeeds, &payload)?;
        let response = self
            .orchestrator
            .find_centers_from_seeds(&payload)
            .await
            .map_err(|e| e.with_context(&source))?;

        trail.advance(DiscoveryPhase::Ranking);
        let centers = finalize_centers(response, &seq_map);
        trail.advance(DiscoveryPhase::Done);

        Ok(DiscoveryOutcome {
            request_id,
            source,
            note_count: notes.len(),
            skipped_notes: read.skipped,
            centers,
            coverage: None,
            cost,
            phases: trail.phases().to_vec(),
        })
    }

    async fn run_moc(
        &self,
        request_id: Uuid,
        moc_id: &NoteId,
        options: &DiscoveryOptions,
        trail: &mut PhaseTrail,
    ) -> Result<DiscoveryOutcome, AiError> {
        let moc = self
            .source
            .read_note(moc_id)
            .await
            .map_err(|e| AiError::InvalidMoc(format!("'{}' could not be read: {}", moc_id, e)))?;

        let linked = unique_ids(
            outline_links(&moc)
                .iter()
                .filter_map(|link| self.resolver.resolve(link, &moc.id))
                .filter(|id| id != &moc.id),
        );
        let read = self.read_all(&linked).await;
        let notes = self.apply_filter(read.notes, options);
        self.check_moc_size(moc_id, notes.len())?;
        let source = format!("map of content '{}' ({} notes)", moc_id, notes.len());

        trail.advance(DiscoveryPhase::ContextBuilding);
        let (mut payload, seq_map) = self.build_payload(&notes, options);
        let seq_by_note: HashMap<NoteId, String> = seq_map
            .iter()
            .map(|(seq, id)| (id.clone(), seq.clone()))
            .collect();
        payload.source_outline = Some(scrub_outline(&moc, self.resolver.as_ref(), &seq_by_note));

        trail.advance(DiscoveryPhase::AwaitingProvider);
        let cost = self
            .orchestrator
            .estimate_seed_cost(OperationKind::DiscoverCentersFromMoc, &payload)?;
        let response = self
            .orchestrator
            .discover_centers_from_moc(&payload)
            .await
            .map_err(|e| e.with_context(&source))?;

        trail.advance(DiscoveryPhase::Ranking);
        let centers = finalize_centers(response, &seq_map);
        let covered = coverage(&centers, notes.len());
        trail.advance(DiscoveryPhase::Done);

        Ok(DiscoveryOutcome {
            request_id,
            source,
            note_count: notes.len(),
            skipped_notes: read.skipped,
            centers,
            coverage: Some(covered),
            cost,
            phases: trail.phases().to_vec(),
        })
    }

    fn require_seeds(&self, provided: usize) -> Result<(), AiError> {
        if provided < self.config.min_seeds {
            return Err(AiError::InsufficientSeeds {
                provided,
                required: self.config.min_seeds,
            });
        }
        Ok(())
    }

    fn check_moc_size(&self, moc_id: &NoteId, count: usize) -> Result<(), AiError> {
        let source_name = moc_id.to_string();
        if count == 0 {
            return Err(AiError::MocNoValidNotes { source_name });
        }
        if count < self.config.moc_min_notes {
            return Err(AiError::MocTooSmall {
                source_name,
                count,
                min: self.config.moc_min_notes,
            });
        }
        if count > self.config.moc_max_notes {
            return Err(AiError::MocTooLarge {
                source_name,
                count,
                max: self.config.moc_max_notes,
            });
        }
        if count > self.config.moc_warn_notes {
            warn!(
                notes = count,
                "Large map of content; discovery may be slow and less focused"
            );
        }
        Ok(())
    }

    /// Read every note concurrently; unreadable notes are skipped
    async fn read_all(&self, ids: &[NoteId]) -> ReadNotes {
        let results = join_all(ids.iter().map(|id| self.source.read_note(id))).await;

        let mut notes = Vec::with_capacity(results.len());
        let mut skipped = 0;
        for result in results {
            match result {
                Ok(note) => notes.push(note),
                Err(e) => {
                    skipped += 1;
                    debug!("Skipping unreadable note: {}", e);
                }
            }
        }
        if skipped > 0 {
            warn!(read = notes.len(), skipped, "Some notes could not be read");
        }
        ReadNotes { notes, skipped }
    }

    fn apply_filter(&self, notes: Vec<Note>, options: &DiscoveryOptions) -> Vec<Note> {
        if options.tags.is_empty() {
            return notes;
        }
        let kept: Vec<Note> = TagCoOccurrenceIndex::filter_by_tags(&notes, &options.tags, options.tag_mode)
            .into_iter()
            .cloned()
            .collect();
        debug!(before = notes.len(), after = kept.len(), "Applied tag filter");
        kept
    }

    fn build_payload(
        &self,
        notes: &[Note],
        options: &DiscoveryOptions,
    ) -> (SeedPayload, HashMap<String, NoteId>) {
        let (seeds, seq_map) = build_seed_contexts(notes);
        let mut payload = SeedPayload::new(seeds);

        let hints = options
            .relationship_hints
            .unwrap_or(self.config.include_relationship_hints);
        if hints {
            let seq_by_note: HashMap<&NoteId, String> = seq_map
                .iter()
                .map(|(seq, id)| (id, seq.clone()))
                .collect();
            payload.relationships = relationship_hints(notes, &seq_by_note);
            payload.clusters = ClusterFinder::default()
                .find_clusters(notes, self.config.cluster_threshold)
                .into_iter()
                .map(|cluster| {
                    cluster
                        .notes
                        .iter()
                        .filter_map(|id| seq_by_note.get(id).cloned())
                        .collect()
                })
                .collect();
            debug!(
                relationships = payload.relationships.len(),
                clusters = payload.clusters.len(),
                "Attached relationship hints"
            );
        }

        (payload, seq_map)
    }
}

/// One hint per note pair, keeping the strongest edge
fn relationship_hints(notes: &[Note], seq_by_note: &HashMap<&NoteId, String>) -> Vec<RelationshipHint> {
    let builder = RelationshipGraphBuilder::new(notes);
    let mut hints: Vec<RelationshipHint> = Vec::new();
    let mut by_pair: HashMap<(String, String), usize> = HashMap::new();

    for note in notes {
        for edge in builder.relationships_for(note).iter() {
            let (Some(from), Some(to)) = (seq_by_note.get(&edge.source), seq_by_note.get(&edge.target)) else {
                continue;
            };
            let pair = if from <= to {
                (from.clone(), to.clone())
            } else {
                (to.clone(), from.clone())
            };
            match by_pair.get(&pair) {
                Some(&idx) if hints[idx].strength >= edge.strength => {}
                Some(&idx) => {
                    hints[idx].kind = edge.kind;
                    hints[idx].strength = edge.strength;
                }
                None => {
                    by_pair.insert(pair, hints.len());
                    hints.push(RelationshipHint {
                        from: from.clone(),
                        to: to.clone(),
                        kind: edge.kind,
                        strength: edge.strength,
                    });
                }
            }
        }
    }
    hints
}

fn finalize_centers(response: SeedCentersResponse, seq_map: &HashMap<String, NoteId>) -> Vec<DiscoveredCenter> {
    let mut centers: Vec<DiscoveredCenter> = response
        .centers
        .into_iter()
        .map(|center| {
            let mut center = center.into_discovered();
            resolve_seq_ids(&mut center, seq_map);
            center
        })
        .collect();
    rank_centers(&mut centers);
    keep_top_recommendation(&mut centers);
    centers
}

fn unique_ids(ids: impl IntoIterator<Item = NoteId>) -> Vec<NoteId> {
    let mut unique: Vec<NoteId> = Vec::new();
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

fn finish(
    request_id: Uuid,
    result: Result<DiscoveryOutcome, AiError>,
    trail: &mut PhaseTrail,
) -> Result<DiscoveryOutcome, AiError> {
    match result {
        Ok(outcome) => {
            info!(
                %request_id,
                centers = outcome.centers.len(),
                notes = outcome.note_count,
                "Discovery complete"
            );
            Ok(outcome)
        }
        Err(e) => {
            let phase = trail.current();
            trail.advance(DiscoveryPhase::Failed);
            warn!(%request_id, ?phase, code = %e.code(), "Discovery failed");
            Err(e)
        }
    }
}
