//! Prompt construction for each orchestrated operation
//!
//! Every operation has a fixed system prompt describing the reply shape and a
//! user payload built from the caller's input. Seed payloads are sent as JSON
//! and already carry only anonymized ids.

use seedling_domain::SeedPayload;
use seedling_llm::{AiError, OperationKind, TextCenter};

const FIND_CENTERS: &str = r#"You help a writer find the "centers" of a draft: the images, ideas or moments that give the piece its life and that other parts organize around.

Read the text and respond with ONLY a JSON object:
{"centers": [{"text": "<short phrase>", "position": <paragraph index, 0-based>, "confidence": <0.0-1.0>, "explanation": "<one sentence>"}]}

List at most 5 centers, strongest first."#;

const SUGGEST_EXPANSIONS: &str = r#"You help a writer grow a draft outward from one of its centers.

Given a center and the surrounding text, propose directions in which the center could be developed. Respond with ONLY a JSON object:
{"expansions": [{"direction": "<short label>", "prompt": "<a question or writing prompt>", "rationale": "<why this strengthens the center>"}]}

Give 3 to 5 expansions."#;

const ANALYZE_WHOLENESS: &str = r#"You assess how well a draft holds together as a whole.

Respond with ONLY a JSON object:
{"score": <0-10>, "paragraphUnity": [<0-10 per paragraph>], "transitions": ["<observation>"], "gaps": ["<missing piece>"], "suggestions": ["<concrete suggestion>"]}"#;

const CHECK_UNITY: &str = r#"You check whether a single paragraph is unified around one idea.

Respond with ONLY a JSON object:
{"hasUnity": <true|false>, "score": <0-10>, "mainIdea": "<the main idea>", "offTopicSentences": ["<sentence>"], "suggestions": ["<suggestion>"]}"#;

const SEED_CENTERS: &str = r#"You help a writer discover what their scattered notes ("seeds") are really about. Each seed has an anonymized id such as "seed-3", its content, tags, creation time and how many other notes link to it. Some seeds mention a photo with a caption. Relationship hints and clusters, when present, describe how seeds already connect.

Find the recurring thematic centers that run across several seeds. For each center judge its strength (strong, medium or weak) and whether it is cross-domain, emotionally resonant, concrete, and a potential structural pivot for a longer piece.

Respond with ONLY a JSON object:
{"centers": [{"name": "<short name>", "explanation": "<why these seeds belong together>", "strength": "strong|medium|weak", "connectedSeeds": ["seed-1", "seed-4"], "whyStartHere": "<advice on starting to write from this center>", "assessment": {"crossDomain": <bool>, "emotionalResonance": <bool>, "concrete": <bool>, "structuralPivot": <bool>}}]}

Only reference seed ids that appear in the input."#;

const MOC_CENTERS: &str = r#"You help a writer discover the thematic centers inside a map of content: an index note that links to a set of related notes. The index outline is given with links removed, followed by the linked notes as anonymized seeds ("seed-1", "seed-2", ...).

Find the centers that the collection organizes around, including ones the outline does not name. For each center judge its strength (strong, medium or weak) and whether it is cross-domain, emotionally resonant, concrete, and a potential structural pivot.

Respond with ONLY a JSON object:
{"centers": [{"name": "<short name>", "explanation": "<why these notes belong together>", "strength": "strong|medium|weak", "connectedSeeds": ["seed-1", "seed-4"], "whyStartHere": "<advice on starting to write from this center>", "assessment": {"crossDomain": <bool>, "emotionalResonance": <bool>, "concrete": <bool>, "structuralPivot": <bool>}}]}

Only reference seed ids that appear in the input."#;

/// System prompt for `operation`
pub fn system_prompt(operation: OperationKind) -> &'static str {
    match operation {
        OperationKind::FindCenters => FIND_CENTERS,
        OperationKind::SuggestExpansions => SUGGEST_EXPANSIONS,
        OperationKind::AnalyzeWholeness => ANALYZE_WHOLENESS,
        OperationKind::CheckUnity => CHECK_UNITY,
        OperationKind::FindCentersFromSeeds => SEED_CENTERS,
        OperationKind::DiscoverCentersFromMoc => MOC_CENTERS,
    }
}

/// User payload for a whole text
pub fn text_payload(label: &str, text: &str) -> String {
    format!("{}:\n---\n{}\n---", label, text.trim())
}

/// User payload for expanding `center` within `context`
pub fn expansion_payload(center: &TextCenter, context: &str) -> String {
    let mut prompt = format!("Center: {}\n", center.text.trim());
    if let Some(explanation) = &center.explanation {
        prompt.push_str(&format!("Why it is a center: {}\n", explanation.trim()));
    }
    if !context.trim().is_empty() {
        prompt.push('\n');
        prompt.push_str(&text_payload("Surrounding text", context));
    }
    prompt
}

/// User payload for seed or MOC discovery
pub fn seed_payload(payload: &SeedPayload) -> Result<String, AiError> {
    let json = serde_json::to_string_pretty(payload)
        .map_err(|e| AiError::InvalidRequest(format!("Seed payload is not serializable: {}", e)))?;

    let mut prompt = String::new();
    if let Some(outline) = &payload.source_outline {
        prompt.push_str(&text_payload("Map of content outline", outline));
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!("Seeds ({}):\n", payload.len()));
    prompt.push_str(&json);
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_domain::SeedContext;

    fn seed(id: &str) -> SeedContext {
        SeedContext {
            seq_id: id.to_string(),
            content: "The kettle whistles.".to_string(),
            tags: vec!["home".to_string()],
            created_at: 0,
            backlink_count: 1,
            photo: None,
        }
    }

    #[test]
    fn test_every_operation_has_a_prompt() {
        for op in [
            OperationKind::FindCenters,
            OperationKind::SuggestExpansions,
            OperationKind::AnalyzeWholeness,
            OperationKind::CheckUnity,
            OperationKind::FindCentersFromSeeds,
            OperationKind::DiscoverCentersFromMoc,
        ] {
            assert!(system_prompt(op).contains("JSON"));
        }
    }

    #[test]
    fn test_seed_payload_uses_seq_ids() {
        let payload = SeedPayload::new(vec![seed("seed-1"), seed("seed-2")]);
        let prompt = seed_payload(&payload).unwrap();
        assert!(prompt.starts_with("Seeds (2):"));
        assert!(prompt.contains("\"seqId\": \"seed-2\""));
        assert!(!prompt.contains("outline"));
    }

    #[test]
    fn test_moc_payload_includes_outline() {
        let mut payload = SeedPayload::new(vec![seed("seed-1")]);
        payload.source_outline = Some("# Childhood\n- kitchen".to_string());
        let prompt = seed_payload(&payload).unwrap();
        assert!(prompt.starts_with("Map of content outline:"));
        assert!(prompt.contains("- kitchen"));
    }

    #[test]
    fn test_expansion_payload() {
        let center = TextCenter {
            text: "the kettle".to_string(),
            position: Some(0),
            confidence: None,
            explanation: Some("Recurs in every scene".to_string()),
        };
        let prompt = expansion_payload(&center, "");
        assert!(prompt.contains("Center: the kettle"));
        assert!(prompt.contains("Recurs in every scene"));
        assert!(!prompt.contains("Surrounding text"));
    }
}
