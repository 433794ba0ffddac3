//! End-to-end command flow over a note export, with a scripted provider

use seedling_cli::cli::FilterArgs;
use seedling_cli::commands::{build_coordinator, discover::options};
use seedling_cli::notes::load_vault;
use seedling_cli::{CliError, Formatter, OutputFormat, SeedlingConfig};
use seedling_discovery::{CenterDiscoveryCoordinator, DiscoveryConfig};
use seedling_domain::{ManualClock, NoteId};
use seedling_llm::{AnthropicAdapter, ErrorCode, MockTransport, ProviderClient, ProviderKind};
use seedling_orchestrator::{AiOrchestrator, OrchestratorConfig};
use std::fs;
use std::sync::Arc;

const EXPORT: &str = r#"[
    {"id": "journal/kettle.md", "content": "The kettle ticked as it cooled. [[stove]]",
     "tags": ["home", "kitchen"], "links": ["stove"], "created_at": 1700000000000},
    {"id": "journal/stove.md", "content": "She never let anyone else light the stove.",
     "tags": ["home", "kitchen"]},
    {"id": "journal/garden.md", "content": "Tomatoes split after the rain.", "tags": ["garden"]}
]"#;

const REPLY: &str = r#"{"centers": [{
    "name": "Who tends the fire",
    "explanation": "Both notes are about keeping the kitchen alive",
    "strength": "medium",
    "connectedSeeds": ["seed-1", "seed-2"]
}]}"#;

fn no_filter() -> FilterArgs {
    FilterArgs {
        tags: Vec::new(),
        match_all: false,
        no_hints: false,
        stats: false,
    }
}

#[tokio::test]
async fn discover_over_exported_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, EXPORT).unwrap();
    let vault = load_vault(&path).unwrap();

    let transport = MockTransport::replying(REPLY);
    let adapter = Arc::new(AnthropicAdapter::new("http://mock", "claude-sonnet-4-5", "sk-test"));
    let orchestrator = AiOrchestrator::new(
        ProviderClient::new(adapter, Arc::new(transport.clone())),
        OrchestratorConfig::default(),
    )
    .with_clock(Arc::new(ManualClock::new(0)));
    let vault = Arc::new(vault);
    let coordinator =
        CenterDiscoveryCoordinator::new(vault.clone(), vault, Arc::new(orchestrator), DiscoveryConfig::default());

    let ids = [NoteId::from("journal/kettle.md"), NoteId::from("journal/stove.md")];
    let outcome = coordinator.discover_from_seeds(&ids, &options(&no_filter())).await.unwrap();

    let rendered = Formatter::new(OutputFormat::Json, false).format_outcome(&outcome).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["centers"][0]["name"], "Who tends the fire");
    assert_eq!(value["centers"][0]["connectedNotes"][0], "journal/kettle.md");
    assert_eq!(value["centers"][0]["confidence"], 0.7);

    let body = serde_json::to_string(&transport.requests()[0].body).unwrap();
    assert!(!body.contains("journal/"));
}

#[tokio::test]
async fn tag_filter_from_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, EXPORT).unwrap();
    let vault = Arc::new(load_vault(&path).unwrap());

    let transport = MockTransport::replying(REPLY);
    let adapter = Arc::new(AnthropicAdapter::new("http://mock", "claude-sonnet-4-5", "sk-test"));
    let orchestrator = AiOrchestrator::new(
        ProviderClient::new(adapter, Arc::new(transport.clone())),
        OrchestratorConfig::default(),
    );
    let coordinator =
        CenterDiscoveryCoordinator::new(vault.clone(), vault, Arc::new(orchestrator), DiscoveryConfig::default());

    let filter = FilterArgs {
        tags: vec!["kitchen".into()],
        ..no_filter()
    };
    let ids = [
        NoteId::from("journal/kettle.md"),
        NoteId::from("journal/garden.md"),
    ];
    let err = coordinator.discover_from_seeds(&ids, &options(&filter)).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientSeeds);
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn coordinator_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.json");
    fs::write(&path, EXPORT).unwrap();

    let mut config = SeedlingConfig::default();
    config.provider.kind = ProviderKind::Ollama;
    config.provider.model = "llama3.1".into();
    assert!(build_coordinator(load_vault(&path).unwrap(), &config).is_ok());

    config.provider.kind = ProviderKind::Anthropic;
    config.provider.api_key_env = "SEEDLING_TEST_KEY_THAT_IS_NEVER_SET".into();
    let err = build_coordinator(load_vault(&path).unwrap(), &config).err().unwrap();
    assert!(matches!(err, CliError::Ai(ref e) if e.code() == ErrorCode::InvalidApiKey));
}
