//! CLI integration tests for the api-field-finder binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SWAGGER_FIXTURE: &str = "tests/fixtures/orders_swagger2.json";
const OPENAPI_FIXTURE: &str = "tests/fixtures/pets_openapi3.json";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("api-field-finder"))
}

// Helper to create a temp document file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const USERS_DOC: &str = r##"{
    "swagger": "2.0",
    "info": {"title": "Users"},
    "paths": {
        "/users": {
            "get": {
                "summary": "List users",
                "parameters": [{"name": "start_time", "in": "query", "type": "string"}],
                "responses": {"200": {"schema": {"$ref": "#/definitions/User"}}}
            }
        }
    },
    "definitions": {
        "User": {
            "type": "object",
            "properties": {
                "id": {"type": "string"},
                "created_time": {"type": "string", "description": "creation time"}
            }
        }
    }
}"##;

mod markdown_output {
    use super::*;

    #[test]
    fn rows_for_parameter_and_response() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .arg(doc.to_str().unwrap())
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "| Dialect | Service | API | Method | Description | Matching field |",
            ))
            .stdout(predicate::str::contains(
                "| Swagger 2.0 | Users | /users | GET | List users | query parameter start_time string |",
            ))
            .stdout(predicate::str::contains(
                "| Swagger 2.0 | Users | /users | GET | List users | response(200) User.created_time string creation time |",
            ))
            .stdout(predicate::str::contains("User.id").not());
    }

    #[test]
    fn summary_lines() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .arg(doc.to_str().unwrap())
            .assert()
            .success()
            .stdout(predicate::str::contains("Search patterns: time"))
            .stdout(predicate::str::contains("Detected format: Swagger 2.0"))
            .stdout(predicate::str::contains(
                "Found 1 API(s) with matching fields (1 operations scanned)",
            ));
    }

    #[test]
    fn quiet_omits_summary() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .args([doc.to_str().unwrap(), "-q"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("| Dialect |"))
            .stdout(predicate::str::contains("Search patterns").not());
    }

    #[test]
    fn no_matches_message() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(
            &dir,
            "plain.json",
            r#"{"openapi": "3.0.0", "paths": {"/ping": {"get": {"responses": {}}}}}"#,
        );

        cmd()
            .args([doc.to_str().unwrap(), "-q"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No APIs with matching fields found."))
            .stdout(predicate::str::contains("| Dialect |").not());
    }

    #[test]
    fn self_referential_schema_terminates() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(
            &dir,
            "nodes.json",
            r##"{
                "swagger": "2.0",
                "paths": {
                    "/nodes": {
                        "get": {"responses": {"200": {"schema": {"$ref": "#/definitions/Node"}}}}
                    }
                },
                "definitions": {
                    "Node": {
                        "properties": {
                            "visit_time": {"type": "string"},
                            "next": {"$ref": "#/definitions/Node"}
                        }
                    }
                }
            }"##,
        );

        cmd()
            .args([doc.to_str().unwrap(), "-q"])
            .timeout(std::time::Duration::from_secs(10))
            .assert()
            .success()
            .stdout(predicate::str::contains("response(200) Node.visit_time string"))
            .stdout(predicate::str::contains("Node.next.Node").not());
    }
}

mod patterns {
    use super::*;

    #[test]
    fn custom_pattern_replaces_default() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .args([doc.to_str().unwrap(), "-p", "^id$"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Search patterns: ^id$"))
            .stdout(predicate::str::contains("response(200) User.id string"))
            .stdout(predicate::str::contains("created_time").not());
    }

    #[test]
    fn repeated_patterns_are_unioned() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .args([doc.to_str().unwrap(), "-p", "^ID$", "--pattern", "created"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Search patterns: ^ID$, created"))
            .stdout(predicate::str::contains("User.id"))
            .stdout(predicate::str::contains("User.created_time"))
            .stdout(predicate::str::contains("start_time").not());
    }

    #[test]
    fn invalid_pattern_fails_before_loading() {
        cmd()
            .args(["/nonexistent/api.json", "-p", "("])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid pattern"))
            .stderr(predicate::str::contains("not found").not());
    }
}

mod json_output {
    use super::*;

    #[test]
    fn report_is_json() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        let output = cmd()
            .args([doc.to_str().unwrap(), "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["dialect"], "swagger2");
        assert_eq!(report["service_name"], "Users");
        assert_eq!(report["operations_scanned"], 1);
        assert_eq!(report["records"][0]["method"], "GET");
        assert_eq!(
            report["records"][0]["matches"][1]["field_path"],
            "User.created_time"
        );
    }

    #[test]
    fn unknown_format_rejected() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .args([doc.to_str().unwrap(), "--format", "yaml"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown format"));
    }
}

mod output_file {
    use super::*;

    #[test]
    fn writes_report_to_file() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);
        let out = dir.path().join("report.md");

        cmd()
            .args([
                doc.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&out).unwrap();
        assert!(content.starts_with("| Dialect |"));
        assert!(content.contains("User.created_time"));
        assert!(!content.contains("Search patterns"));
    }

    #[test]
    fn unwritable_output_path() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);
        let out = dir.path().join("missing-dir").join("report.md");

        cmd()
            .args([
                doc.to_str().unwrap(),
                "--output",
                out.to_str().unwrap(),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Error writing"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .arg("/nonexistent/api.json")
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "bad.json", "{ not valid json");

        cmd()
            .arg(doc.to_str().unwrap())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn unrecognized_format() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "other.json", r#"{"info": {"title": "x"}}"#);

        cmd()
            .arg(doc.to_str().unwrap())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unrecognized API description format"));
    }

    #[test]
    fn unsupported_version() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "old.json", r#"{"swagger": "1.2", "paths": {}}"#);

        cmd()
            .arg(doc.to_str().unwrap())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unsupported swagger version: 1.2"));
    }

    #[test]
    fn missing_spec_argument() {
        cmd().assert().failure();
    }
}

mod logging {
    use super::*;

    #[test]
    fn debug_logs_go_to_stderr() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .args([doc.to_str().unwrap(), "-q", "--log-level", "debug"])
            .env_remove("RUST_LOG")
            .assert()
            .success()
            .stderr(predicate::str::contains("scan complete"))
            .stdout(predicate::str::contains("scan complete").not());
    }

    #[test]
    fn quiet_by_default() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "users.json", USERS_DOC);

        cmd()
            .arg(doc.to_str().unwrap())
            .env_remove("RUST_LOG")
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Find fields matching name patterns"))
            .stdout(predicate::str::contains("--pattern"))
            .stdout(predicate::str::contains("--format"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("api-field-finder"));
    }
}

mod fixtures {
    use super::*;

    #[test]
    fn swagger2_orders() {
        cmd()
            .arg(SWAGGER_FIXTURE)
            .assert()
            .success()
            .stdout(predicate::str::contains("Detected format: Swagger 2.0"))
            .stdout(predicate::str::contains(
                "Found 2 API(s) with matching fields (3 operations scanned)",
            ))
            .stdout(predicate::str::contains(
                "| Swagger 2.0 | Order Service | /api/v1/orders | GET | List orders | query parameter created_after_time string lower bound |",
            ))
            // array items, then allOf member through two refs
            .stdout(predicate::str::contains(
                "response(200) Order.items.OrderItem.Audit.modified_time string",
            ))
            .stdout(predicate::str::contains(
                "| POST | Create an order | body parameter body.OrderRequest.deliver_by_time string |",
            ))
            .stdout(predicate::str::contains("/health").not())
            .stdout(predicate::str::contains("Order.parent").not());
    }

    #[test]
    fn openapi3_pets() {
        cmd()
            .arg(OPENAPI_FIXTURE)
            .assert()
            .success()
            .stdout(predicate::str::contains("Detected format: OpenAPI 3.x"))
            .stdout(predicate::str::contains(
                "| OpenAPI 3.x | Pet Store | https://pets.example.com/v2/pets/{petId} | GET | Get a pet | header parameter If-Modified-Since-Time string |",
            ))
            .stdout(predicate::str::contains(
                "response(200,application/json) Pet.last_fed_time string|null feeding log",
            ))
            .stdout(predicate::str::contains(
                "requestBody(application/json) Cat.nap_time integer",
            ))
            .stdout(predicate::str::contains(
                "requestBody(application/json) Dog.walk_time integer",
            ))
            .stdout(predicate::str::contains("birth_date").not());
    }

    #[test]
    fn openapi3_pets_json_counts() {
        let output = cmd()
            .args([OPENAPI_FIXTURE, "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["dialect"], "openapi3");
        assert_eq!(report["base_url"], "https://pets.example.com/v2");
        assert_eq!(report["operations_scanned"], 2);
        assert_eq!(report["records"].as_array().unwrap().len(), 2);
        assert_eq!(report["records"][1]["method"], "PATCH");
    }
}

/// Remote document loading against a local mock server.
#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn scan_from_url() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/swagger.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(USERS_DOC)
            .create();

        cmd()
            .args([&format!("{}/swagger.json", server.url()), "-q"])
            .assert()
            .success()
            .stdout(predicate::str::contains("User.created_time"));
    }

    #[test]
    fn url_404() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/missing.json").with_status(404).create();

        cmd()
            .arg(format!("{}/missing.json", server.url()))
            .assert()
            .code(3) // Network errors are exit code 3
            .stderr(
                predicate::str::contains("failed to fetch").or(predicate::str::contains("404")),
            );
    }

    #[test]
    fn url_invalid_host() {
        cmd()
            .arg("https://this-domain-does-not-exist-12345.invalid/openapi.json")
            .assert()
            .code(3);
    }
}
