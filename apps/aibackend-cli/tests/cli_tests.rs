use std::fs;

use aibackend_cli::{run, CheckArgs};
use tempfile::TempDir;

const SETTINGS: &str = r#"
[chat]
class = "echo"

[chat.config]
MODEL_ID = "gpt-4"
TOKEN_LIMIT = "8000"

[embedding]
class = "hash"

[embedding.config]
MODEL_ID = "text-embed-1"
EMBEDDING_OUTPUT_DIMENSIONS = 1536
TOKEN_LIMIT = 16
LENGTH_CALCULATOR = "characters"
CHUNK_OVERLAP_CHARACTERS = 0
"#;

fn args(items: &[&str]) -> Vec<String> { items.iter().map(|s| (*s).to_string()).collect() }

#[test]
fn parses_repeated_flags() {
    let parsed = CheckArgs::parse(args(&["--chat", "hi", "--chat", "there", "--embed", "x", "--config", "a.toml"]))
        .expect("parse");
    assert_eq!(parsed.chat, vec!["hi", "there"]);
    assert_eq!(parsed.embed, vec!["x"]);
    assert_eq!(parsed.config.as_deref(), Some(std::path::Path::new("a.toml")));
}

#[test]
fn rejects_unknown_and_incomplete_flags() {
    assert!(CheckArgs::parse(args(&["--verbose"])).is_err());
    assert!(CheckArgs::parse(args(&["--chat"])).is_err());
}

#[test]
fn reports_resolved_backends() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("aibackend.toml");
    fs::write(&path, SETTINGS).unwrap();

    let check = CheckArgs {
        config: Some(path),
        chat: vec!["ping".to_string()],
        embed: vec!["hello world".to_string()],
        split: Some("alpha beta gamma delta epsilon".to_string()),
    };
    let report = run(&check).expect("run");

    assert!(report.contains("chat: model_id=gpt-4"), "{report}");
    assert!(report.contains("token_limit: 8000"), "{report}");
    assert!(report.contains("response: ping"), "{report}");
    assert!(report.contains("embedding_output_dimensions: 1536"), "{report}");
    assert!(report.contains("(1536 dims)"), "{report}");
    assert!(report.contains("split into 2 chunk(s):"), "{report}");
    assert!(report.contains("1. alpha beta gamma"), "{report}");
}

#[test]
fn misconfiguration_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("aibackend.toml");
    fs::write(&path, "[chat]\nclass = \"echo\"\n\n[chat.config]\nMODEL_ID = \"unknown-model\"\n").unwrap();

    let err = run(&CheckArgs { config: Some(path), ..CheckArgs::default() }).expect_err("fails");
    let msg = format!("{err:#}");
    assert!(msg.contains("TOKEN_LIMIT") && msg.contains("unknown-model"), "{msg}");
}
