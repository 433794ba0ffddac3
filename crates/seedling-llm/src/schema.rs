//! Typed provider replies and their validation
//!
//! Each reply type is validated in one pass over the parsed JSON: required
//! fields first, then per-field type and range checks. The first violation is
//! returned as a [`ValidationError`] naming the field.

use seedling_domain::{CenterAssessment, CenterStrength, DiscoveredCenter, NoteId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Upper bound of 0-10 quality scores
pub const MAX_SCORE: f64 = 10.0;

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path of the offending field, e.g. `centers[1].strength`
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// A reply shape that can be validated from raw JSON
pub trait ValidatedResponse: Sized + Serialize + DeserializeOwned {
    /// Top-level fields that must be present
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Build the typed value once required fields are known to exist
    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError>;

    /// Validate `value` and build the typed reply
    fn validate(value: &Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::new("$", "expected a JSON object"))?;
        for field in Self::REQUIRED_FIELDS {
            if !object.contains_key(*field) {
                return Err(ValidationError::new(*field, "missing required field"));
            }
        }
        Self::from_object(object)
    }
}

/// A center found inside a single text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCenter {
    /// The center's wording
    pub text: String,
    /// Paragraph index where it appears
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    /// Model confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Why this is a center
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Reply to `find-centers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentersResponse {
    /// Centers in reply order
    pub centers: Vec<TextCenter>,
}

impl ValidatedResponse for CentersResponse {
    const REQUIRED_FIELDS: &'static [&'static str] = &["centers"];

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut centers = Vec::new();
        for (idx, item) in array(object, "centers")?.iter().enumerate() {
            let path = format!("centers[{}]", idx);
            let center = item_object(item, &path)?;
            centers.push(TextCenter {
                text: text_or_name(center, &path)?,
                position: opt_u64(center, "position", &path)?,
                confidence: opt_unit_interval(center, "confidence", &path)?,
                explanation: opt_string(center, "explanation", &path)?,
            });
        }
        Ok(Self { centers })
    }
}

/// A center found across seeds, before seq ids are mapped back to notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedCenter {
    /// Short name
    pub name: String,
    /// Explanation
    pub explanation: String,
    /// Strength category
    pub strength: CenterStrength,
    /// Seq ids of connected seeds (`seed-N`)
    pub connected_seeds: Vec<String>,
    /// "Why start here" advice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Assessment flags
    #[serde(default)]
    pub assessment: CenterAssessment,
}

impl SeedCenter {
    /// Convert to a domain center; connected ids stay in seq-id form
    pub fn into_discovered(self) -> DiscoveredCenter {
        let mut center = DiscoveredCenter::new(self.name, self.explanation, self.strength)
            .with_connected_notes(self.connected_seeds.into_iter().map(NoteId::new).collect())
            .with_assessment(self.assessment);
        center.recommendation = self.recommendation;
        center
    }
}

/// Reply to `find-centers-from-seeds` and `discover-centers-from-moc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCentersResponse {
    /// Centers in reply order
    pub centers: Vec<SeedCenter>,
}

impl ValidatedResponse for SeedCentersResponse {
    const REQUIRED_FIELDS: &'static [&'static str] = &["centers"];

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut centers = Vec::new();
        for (idx, item) in array(object, "centers")?.iter().enumerate() {
            let path = format!("centers[{}]", idx);
            let center = item_object(item, &path)?;

            let strength = match center.get("strength") {
                None | Some(Value::Null) => CenterStrength::Medium,
                Some(Value::String(s)) => CenterStrength::parse(s).ok_or_else(|| {
                    ValidationError::new(
                        format!("{}.strength", path),
                        format!("'{}' is not one of strong, medium, weak", s),
                    )
                })?,
                Some(_) => {
                    return Err(ValidationError::new(
                        format!("{}.strength", path),
                        "expected a string",
                    ))
                }
            };
            // Range-checked even though the final confidence comes from strength
            opt_unit_interval(center, "confidence", &path)?;

            let recommendation = match opt_string(center, "whyStartHere", &path)? {
                Some(r) => Some(r),
                None => opt_string(center, "recommendation", &path)?,
            };

            centers.push(SeedCenter {
                name: text_or_name(center, &path)?,
                explanation: opt_string(center, "explanation", &path)?.unwrap_or_default(),
                strength,
                connected_seeds: seed_refs(center, &path)?,
                recommendation,
                assessment: assessment(center, &path)?,
            });
        }
        Ok(Self { centers })
    }
}

/// One expansion direction for a center
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expansion {
    /// Direction to grow in
    pub direction: String,
    /// Writing prompt
    pub prompt: String,
    /// Why this direction fits
    pub rationale: String,
}

/// Reply to `suggest-expansions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionsResponse {
    /// Suggested expansions
    pub expansions: Vec<Expansion>,
}

impl ValidatedResponse for ExpansionsResponse {
    const REQUIRED_FIELDS: &'static [&'static str] = &["expansions"];

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut expansions = Vec::new();
        for (idx, item) in array(object, "expansions")?.iter().enumerate() {
            let path = format!("expansions[{}]", idx);
            let expansion = item_object(item, &path)?;
            expansions.push(Expansion {
                direction: req_string(expansion, "direction", &path)?,
                prompt: req_string(expansion, "prompt", &path)?,
                rationale: req_string(expansion, "rationale", &path)?,
            });
        }
        Ok(Self { expansions })
    }
}

/// Reply to `analyze-wholeness`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WholenessAnalysis {
    /// Overall wholeness, 0-10
    pub score: f64,
    /// Per-paragraph unity scores, 0-10
    pub paragraph_unity: Vec<f64>,
    /// Notes on transitions between paragraphs
    pub transitions: Vec<String>,
    /// Missing pieces
    pub gaps: Vec<String>,
    /// Improvement suggestions
    pub suggestions: Vec<String>,
}

impl ValidatedResponse for WholenessAnalysis {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["score", "paragraphUnity", "transitions", "gaps", "suggestions"];

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let score = score(object, "score", "")?;
        let mut paragraph_unity = Vec::new();
        for (idx, item) in array(object, "paragraphUnity")?.iter().enumerate() {
            let field = format!("paragraphUnity[{}]", idx);
            paragraph_unity.push(in_range(item, &field, 0.0, MAX_SCORE)?);
        }
        Ok(Self {
            score,
            paragraph_unity,
            transitions: string_list(object, "transitions")?,
            gaps: string_list(object, "gaps")?,
            suggestions: string_list(object, "suggestions")?,
        })
    }
}

/// Reply to `check-unity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnityCheck {
    /// Whether the paragraph holds together
    pub has_unity: bool,
    /// Unity score, 0-10
    pub score: f64,
    /// The main idea
    pub main_idea: String,
    /// Sentences that drift off topic
    pub off_topic_sentences: Vec<String>,
    /// Improvement suggestions
    pub suggestions: Vec<String>,
}

impl ValidatedResponse for UnityCheck {
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["hasUnity", "score", "mainIdea", "offTopicSentences", "suggestions"];

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let has_unity = object
            .get("hasUnity")
            .and_then(Value::as_bool)
            .ok_or_else(|| ValidationError::new("hasUnity", "expected a boolean"))?;
        Ok(Self {
            has_unity,
            score: score(object, "score", "")?,
            main_idea: req_string(object, "mainIdea", "")?,
            off_topic_sentences: string_list(object, "offTopicSentences")?,
            suggestions: string_list(object, "suggestions")?,
        })
    }
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn array<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::new(field, "expected an array"))
}

fn item_object<'a>(item: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ValidationError> {
    item.as_object()
        .ok_or_else(|| ValidationError::new(path, "expected an object"))
}

fn req_string(object: &Map<String, Value>, field: &str, path: &str) -> Result<String, ValidationError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::new(join(path, field), "expected a string")),
        None => Err(ValidationError::new(join(path, field), "missing required field")),
    }
}

fn opt_string(object: &Map<String, Value>, field: &str, path: &str) -> Result<Option<String>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(join(path, field), "expected a string")),
    }
}

fn text_or_name(object: &Map<String, Value>, path: &str) -> Result<String, ValidationError> {
    let value = match opt_string(object, "text", path)? {
        Some(text) => text,
        None => opt_string(object, "name", path)?
            .ok_or_else(|| ValidationError::new(join(path, "text"), "missing 'text' or 'name'"))?,
    };
    if value.trim().is_empty() {
        return Err(ValidationError::new(join(path, "text"), "must not be empty"));
    }
    Ok(value)
}

fn opt_u64(object: &Map<String, Value>, field: &str, path: &str) -> Result<Option<u64>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| ValidationError::new(join(path, field), "expected a non-negative integer")),
    }
}

fn in_range(value: &Value, field: &str, min: f64, max: f64) -> Result<f64, ValidationError> {
    let number = value
        .as_f64()
        .ok_or_else(|| ValidationError::new(field, "expected a number"))?;
    if !(min..=max).contains(&number) {
        return Err(ValidationError::new(
            field,
            format!("{} out of range [{}, {}]", number, min, max),
        ));
    }
    Ok(number)
}

fn opt_unit_interval(object: &Map<String, Value>, field: &str, path: &str) -> Result<Option<f64>, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => in_range(value, &join(path, field), 0.0, 1.0).map(Some),
    }
}

fn score(object: &Map<String, Value>, field: &str, path: &str) -> Result<f64, ValidationError> {
    let value = object
        .get(field)
        .ok_or_else(|| ValidationError::new(join(path, field), "missing required field"))?;
    in_range(value, &join(path, field), 0.0, MAX_SCORE)
}

fn string_list(object: &Map<String, Value>, field: &str) -> Result<Vec<String>, ValidationError> {
    array(object, field)?
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationError::new(format!("{}[{}]", field, idx), "expected a string"))
        })
        .collect()
}

/// `connectedSeeds` entries as `seed-N`; bare numbers are accepted
fn seed_refs(object: &Map<String, Value>, path: &str) -> Result<Vec<String>, ValidationError> {
    let Some(value) = object.get("connectedSeeds") else {
        return Ok(Vec::new());
    };
    let items = value
        .as_array()
        .ok_or_else(|| ValidationError::new(join(path, "connectedSeeds"), "expected an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) if n.is_u64() => Ok(format!("seed-{}", n)),
            _ => Err(ValidationError::new(
                format!("{}.connectedSeeds[{}]", path, idx),
                "expected a seed id",
            )),
        })
        .collect()
}

fn assessment(object: &Map<String, Value>, path: &str) -> Result<CenterAssessment, ValidationError> {
    let (source, base) = match object.get("assessment") {
        Some(Value::Object(nested)) => (nested, join(path, "assessment")),
        Some(Value::Null) | None => (object, path.to_string()),
        Some(_) => {
            return Err(ValidationError::new(
                join(path, "assessment"),
                "expected an object",
            ))
        }
    };

    let flag = |field: &str| -> Result<bool, ValidationError> {
        match source.get(field) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(ValidationError::new(join(&base, field), "expected a boolean")),
        }
    };

    Ok(CenterAssessment {
        cross_domain: flag("crossDomain")?,
        emotional_resonance: flag("emotionalResonance")?,
        concrete: flag("concrete")?,
        structural_pivot: flag("structuralPivot")?,
    })
}
