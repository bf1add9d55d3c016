//! End-to-end tests: configuration, capability assembly, persona document
//! and gated tool calls working together

use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use swarm_agent_core::prelude::*;

const BATCH: &str = "3b3881ac37f936a4023a4562c69f1f138df8c1c24994f7b047514fbcbe9388fa";

/// Channel that counts calls and answers with a fixed reference
#[derive(Default)]
struct CountingDispatcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ToolDispatcher for CountingDispatcher {
    async fn dispatch(&self, call: &ApprovedCall) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "tool": call.tool, "reference": BATCH }))
    }
}

#[test]
fn test_config_flags_reach_character_plugins() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[flags]\nignore_bootstrap = true\n\n[mcp]\nbee_api_url = \"http://localhost:1633\"").unwrap();

    let config = AgentConfig::from_file(file.path()).unwrap();
    let credentials = CredentialSet::from_pairs([
        ("OLLAMA_API_ENDPOINT", "http://localhost:11434"),
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
    ]);
    let capabilities = assemble(&credentials, &config.static_flags());

    assert_eq!(capabilities.ids(), vec!["sql", "mcp", "ollama", "telegram"]);

    let character = Character::build(&config, &capabilities, &ToolCatalog::swarm());
    assert_eq!(
        character.plugins,
        vec![
            "@elizaos/plugin-sql",
            "@elizaos/plugin-mcp",
            "@elizaos/plugin-ollama",
            "@elizaos/plugin-telegram",
        ]
    );
    assert_eq!(
        character.settings.mcp.servers["swarm-mcp"].env["BEE_API_URL"],
        "http://localhost:1633"
    );
}

#[test]
fn test_model_provider_disables_fallback() {
    let credentials = CredentialSet::from_pairs([
        ("OPENROUTER_API_KEY", "or-key"),
        ("OLLAMA_API_ENDPOINT", "http://localhost:11434"),
    ]);
    let capabilities = assemble(&credentials, &StaticFlags::new());

    assert!(capabilities.contains("openrouter"));
    assert!(!capabilities.contains("ollama"));
    assert!(capabilities.has_model());
}

#[tokio::test]
async fn test_clarification_then_approval() {
    let gated = GatedDispatcher::new(ToolCatalog::swarm(), CountingDispatcher::default());

    // "Extend my stamp to 5 days" without saying which stamp
    let first = CandidateArguments::new().with("duration", "5d");
    let outcome = gated.invoke("extend_postage_stamp", &first).await.unwrap();

    let rejection = outcome.rejection().unwrap();
    assert_eq!(rejection.kind, RejectionKind::MissingParameter);
    assert!(rejection.reason.contains("postageBatchId"));
    assert_eq!(gated.dispatcher().calls.load(Ordering::SeqCst), 0);

    // The user answers with the batch id; a fresh candidate is built
    let second = CandidateArguments::new()
        .with("duration", "5d")
        .with("postageBatchId", BATCH);
    let outcome = gated.invoke("extend_postage_stamp", &second).await.unwrap();

    assert!(outcome.is_completed());
    assert_eq!(gated.dispatcher().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_mcp_listing_catalog_gates_calls() {
    let listing = json!({
        "tools": [{
            "name": "get_postage_stamp",
            "description": "Get a postage stamp batch",
            "inputSchema": {
                "type": "object",
                "properties": { "postageBatchId": { "type": "string" } },
                "required": ["postageBatchId"]
            }
        }]
    });
    let catalog = ToolCatalog::from_mcp_listing(&listing).unwrap();
    let gated = GatedDispatcher::new(catalog, CountingDispatcher::default());

    let upper = CandidateArguments::new().with("postageBatchId", BATCH.to_uppercase());
    assert!(gated.invoke("get_postage_stamp", &upper).await.unwrap().is_completed());

    let short = CandidateArguments::new().with("postageBatchId", &BATCH[..40]);
    let outcome = gated.invoke("get_postage_stamp", &short).await.unwrap();
    assert_eq!(
        outcome.rejection().map(|r| r.kind),
        Some(RejectionKind::MalformedParameter)
    );

    assert!(matches!(
        gated.invoke("upload_data", &CandidateArguments::new()).await,
        Err(AgentError::UnknownTool(_))
    ));
    assert_eq!(gated.dispatcher().calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_character_yaml_document() {
    let capabilities = assemble(&CredentialSet::new(), &StaticFlags::new());
    let character = Character::build(&AgentConfig::default(), &capabilities, &ToolCatalog::swarm());
    let yaml = character.to_yaml().unwrap();

    assert!(yaml.contains("name: Swarm Agent"));
    assert!(yaml.contains("messageExamples:"));
    assert!(yaml.contains("@elizaos/plugin-bootstrap"));
}
