//! Integration tests for Crumb
//!
//! These drive the `crumb` binary end to end with an isolated home directory.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_CRUMB: &str = "# 🍞 CRUMB FILE\n\
*Compressed by Crumb*\n\
\n\
## 🎯 MISSION\n\
- [Goal] Ship the billing service by Friday\n\
\n\
## 📍 CURRENT STATE\n\
- Stripe webhooks wired up\n\
\n\
## ✅ DECISIONS MADE\n\
- [Decision] Use Postgres over MySQL\n\
\n\
## ❌ DEAD ENDS\n\
- Tried SQLite, hit write-lock contention\n\
\n\
## 🧠 KEY CONTEXT\n\
- [Constraint] Must run on a single VM\n\
- [Code] `cargo run --release`\n\
\n\
## ❓ OPEN QUESTIONS\n\
\n\
## 🚀 NEXT STEP\n\
- Add retry logic to the webhook handler\n\
\n\
```json\n\
{\"confidence\": 82, \"breakdown\": {\"goals_captured\": 90, \"decisions_preserved\": 85, \
\"technical_context\": 75, \"constraints_noted\": 80}, \"sections_filled\": 6, \"key_topics_found\": 9}\n\
```\n";

/// Helper to create a crumb Command isolated from the user's environment
fn crumb(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("crumb");
    cmd.current_dir(home.path())
        .env("CRUMB_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("GEMINI_API_KEY_2")
        .env_remove("GEMINI_API_KEY_3")
        .env_remove("CRUMB_GEMINI_BASE_URL")
        .env_remove("CRUMB_GEMINI_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn create_home() -> TempDir {
    TempDir::new().unwrap()
}

fn vault_file(home: &TempDir) -> std::path::PathBuf {
    home.path().join("vault").join("crumb_vault.json")
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_crumb_help() {
        let home = create_home();
        crumb(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("compress"))
            .stdout(predicate::str::contains("vault"));
    }

    #[test]
    fn test_crumb_version() {
        let home = create_home();
        crumb(&home).arg("--version").assert().success();
    }

    #[test]
    fn test_unknown_depth_rejected_by_parser() {
        let home = create_home();
        crumb(&home)
            .args(["compress", "--depth", "huge", "-"])
            .write_stdin("hello")
            .assert()
            .failure()
            .stderr(predicate::str::contains("snapshot, memory, full"));
    }
}

// =============================================================================
// Compress Tests
// =============================================================================

mod compress {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_empty_conversation_is_rejected() {
        let home = create_home();
        crumb(&home)
            .args(["compress", "-"])
            .write_stdin("   \n  ")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Conversation is required"));

        assert!(!vault_file(&home).exists());
    }

    #[test]
    fn test_oversized_conversation_is_rejected() {
        let home = create_home();
        let conversation = home.path().join("long.txt");
        fs::write(&conversation, "a".repeat(50_001)).unwrap();

        crumb(&home)
            .env("GEMINI_API_KEY", "unused")
            .arg("compress")
            .arg(&conversation)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Max 50,000 characters"));
    }

    #[test]
    fn test_missing_key_fails_without_saving() {
        let home = create_home();
        crumb(&home)
            .args(["compress", "-"])
            .write_stdin("User: hi\nAI: hello")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No API key configured for server 1"));

        assert!(!vault_file(&home).exists());
    }

    #[test]
    fn test_requested_server_does_not_fall_back() {
        let home = create_home();
        crumb(&home)
            .env("GEMINI_API_KEY", "key-one")
            .args(["compress", "--server", "2", "-"])
            .write_stdin("User: hi\nAI: hello")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No API key configured for server 2"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_compress_end_to_end_saves_to_vault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "maxOutputTokens": 1500 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": SAMPLE_CRUMB }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let home = create_home();
        let conversation = home.path().join("chat.txt");
        fs::write(&conversation, "User: should we use Postgres?\nAI: yes").unwrap();

        crumb(&home)
            .env("GEMINI_API_KEY", "test-key")
            .env("CRUMB_GEMINI_BASE_URL", server.uri())
            .args(["compress", "--depth", "snapshot"])
            .arg(&conversation)
            .assert()
            .success()
            .stdout(predicate::str::contains("## 🎯 MISSION"))
            .stdout(predicate::str::contains("```json").not())
            .stderr(predicate::str::contains("Confidence:"))
            .stderr(predicate::str::contains("82%"))
            .stderr(predicate::str::contains("Saved to vault"));

        crumb(&home)
            .args(["vault", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Ship the billing service by Friday"))
            .stdout(predicate::str::contains("snapshot"));

        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(vault_file(&home)).unwrap()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["confidence"], 82.0);
        assert_eq!(entries[0]["depth"], "snapshot");

        let id = entries[0]["id"].as_str().unwrap().to_string();
        let created_at = entries[0]["createdAt"].as_i64().unwrap();
        let out_dir = home.path().join("exports");

        crumb(&home)
            .args(["vault", "export", id.as_str(), "--dir"])
            .arg(&out_dir)
            .assert()
            .success();

        let exported = fs::read_to_string(out_dir.join(format!("crumb-{}.md", created_at))).unwrap();
        assert!(exported.starts_with("# 🍞 CRUMB FILE"));
        assert!(!exported.contains("\"confidence\""));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upstream_error_message_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "code": 429, "message": "Resource has been exhausted" }
            })))
            .mount(&server)
            .await;

        let home = create_home();
        crumb(&home)
            .env("GEMINI_API_KEY", "test-key")
            .env("CRUMB_GEMINI_BASE_URL", server.uri())
            .args(["compress", "-"])
            .write_stdin("User: hi\nAI: hello")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Resource has been exhausted"));

        assert!(!vault_file(&home).exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_no_save_and_output_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "# 🍞 CRUMB FILE\n## 🎯 MISSION\n- x" }] } }]
            })))
            .mount(&server)
            .await;

        let home = create_home();
        let output = home.path().join("out.md");
        crumb(&home)
            .env("GEMINI_API_KEY", "test-key")
            .env("CRUMB_GEMINI_BASE_URL", server.uri())
            .args(["compress", "--no-save", "--output"])
            .arg(&output)
            .arg("-")
            .write_stdin("User: hi")
            .assert()
            .success()
            .stderr(predicate::str::contains("unavailable"));

        assert_eq!(fs::read_to_string(&output).unwrap(), "# 🍞 CRUMB FILE\n## 🎯 MISSION\n- x");
        assert!(!vault_file(&home).exists());
    }
}

// =============================================================================
// Inspect and Stats Tests
// =============================================================================

mod inspect {
    use super::*;

    #[test]
    fn test_inspect_shows_sections_tags_and_confidence() {
        let home = create_home();
        let file = home.path().join("crumb.md");
        fs::write(&file, SAMPLE_CRUMB).unwrap();

        crumb(&home)
            .arg("inspect")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("## ❓ OPEN QUESTIONS"))
            .stdout(predicate::str::contains("No content extracted."))
            .stdout(predicate::str::contains("Use Postgres over MySQL"))
            .stdout(predicate::str::contains("[Constraint]"))
            .stdout(predicate::str::contains("82% (high)"));
    }

    #[test]
    fn test_inspect_single_section() {
        let home = create_home();
        let file = home.path().join("crumb.md");
        fs::write(&file, SAMPLE_CRUMB).unwrap();

        crumb(&home)
            .arg("inspect")
            .arg(&file)
            .args(["--section", "dead-ends"])
            .assert()
            .success()
            .stdout("- Tried SQLite, hit write-lock contention\n");
    }

    #[test]
    fn test_inspect_missing_file() {
        let home = create_home();
        crumb(&home)
            .args(["inspect", "nope.md"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read crumb file"));
    }
}

mod stats {
    use super::*;

    #[test]
    fn test_stats_from_stdin() {
        let home = create_home();
        crumb(&home)
            .arg("stats")
            .write_stdin("User: we decided to use https://example.com\nAI: ```rust\nfn main() {}\n```")
            .assert()
            .success()
            .stdout(predicate::str::contains("user messages    1"))
            .stdout(predicate::str::contains("ai messages      1"))
            .stdout(predicate::str::contains("CODE, URLS, DECISIONS"))
            .stdout(predicate::str::contains("snapshot   1500"));
    }

    #[test]
    fn test_stats_empty_input() {
        let home = create_home();
        crumb(&home)
            .arg("stats")
            .write_stdin("")
            .assert()
            .success()
            .stdout(predicate::str::contains("Conversation is empty."));
    }
}

// =============================================================================
// Vault and Config Tests
// =============================================================================

mod vault {
    use super::*;

    #[test]
    fn test_empty_vault_list() {
        let home = create_home();
        crumb(&home)
            .args(["vault", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Vault is empty."));
    }

    #[test]
    fn test_show_unknown_id_fails() {
        let home = create_home();
        crumb(&home)
            .args(["vault", "show", "12345abc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No vault entry with id 12345abc"));
    }

    #[test]
    fn test_delete_existing_entry() {
        let home = create_home();
        fs::create_dir_all(home.path().join("vault")).unwrap();
        fs::write(
            vault_file(&home),
            serde_json::json!([{
                "id": "1700000000000abcdefghijk",
                "createdAt": 1_700_000_000_000i64,
                "title": "Old session",
                "content": "# 🍞 CRUMB FILE",
                "crumbWordCount": 3,
                "confidence": null,
                "confidenceData": null,
                "depth": "memory"
            }])
            .to_string(),
        )
        .unwrap();

        crumb(&home)
            .args(["vault", "show", "1700000000000abcdefghijk"])
            .assert()
            .success()
            .stdout("# 🍞 CRUMB FILE\n");

        crumb(&home)
            .args(["vault", "delete", "1700000000000abcdefghijk"])
            .assert()
            .success();

        crumb(&home)
            .args(["vault", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Vault is empty."));
    }
}

mod config {
    use super::*;

    #[test]
    fn test_config_init_then_show() {
        let home = create_home();
        crumb(&home)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created crumb.toml"));

        assert!(home.path().join("crumb.toml").exists());

        crumb(&home)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));

        crumb(&home)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[gemini]"))
            .stdout(predicate::str::contains("gemini-1.5-flash"))
            .stdout(predicate::str::contains("server 1 (GEMINI_API_KEY) not set"))
            .stdout(predicate::str::contains(
                home.path().join("vault").display().to_string(),
            ))
            .stdout(predicate::str::contains("# 0 saved entries"));
    }

    #[test]
    fn test_config_file_sets_default_depth() {
        let home = create_home();
        fs::write(home.path().join("crumb.toml"), "[defaults]\ndepth = \"full\"\n").unwrap();

        crumb(&home)
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("depth = \"full\""));
    }
}
