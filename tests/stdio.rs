use assert_cmd::Command;
use httpmock::{Method::GET, MockServer};
use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;

fn run_lines(lines: &[Value], envs: &[(&str, &str)]) -> anyhow::Result<Vec<Value>> {
    let mut cmd = Command::cargo_bin("github-tools")?;
    cmd.env_remove("GH_TOKEN");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let mut input = Vec::new();
    for line in lines {
        writeln!(input, "{}", serde_json::to_string(line)?)?;
    }
    let assert = cmd
        .arg("--log-level")
        .arg("warn")
        .write_stdin(input)
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone())?;
    output
        .lines()
        .map(|l| serde_json::from_str(l).map_err(Into::into))
        .collect()
}

#[test]
fn replies_keep_request_order_and_ids() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/o/r");
        then.status(200).json_body(serde_json::json!({ "full_name": "o/r" }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/o/gone");
        then.status(404).json_body(serde_json::json!({ "message": "Not Found" }));
    });

    let replies = run_lines(
        &[
            serde_json::json!({ "id": 1, "method": "github_get_repository", "params": { "owner": "o", "repo": "r" } }),
            serde_json::json!({ "id": "two", "method": "github_get_repository", "params": { "owner": "o", "repo": "gone" } }),
            serde_json::json!({ "id": 3, "method": "github_teleport" }),
        ],
        &[
            ("GITHUB_TOKEN", "t"),
            ("GITHUB_API_URL", server.base_url().as_str()),
        ],
    )?;

    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[0]["success"], true);
    assert_eq!(replies[0]["data"]["full_name"], "o/r");

    assert_eq!(replies[1]["id"], "two");
    assert_eq!(replies[1]["success"], false);
    assert_eq!(replies[1]["error"]["code"], "HTTP_404");
    assert_eq!(replies[1]["error"]["message"], "Not Found");

    assert_eq!(replies[2]["id"], 3);
    assert_eq!(replies[2]["error"]["code"], "METHOD_NOT_FOUND");
    assert_eq!(replies[2]["error"]["message"], "Method 'github_teleport' not found");
    Ok(())
}

#[test]
fn garbage_line_gets_parse_error_and_loop_continues() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("github-tools")?;
    let output = cmd
        .env("GITHUB_TOKEN", "t")
        .env("GITHUB_API_URL", "http://127.0.0.1:9")
        .arg("--log-level")
        .arg("off")
        .write_stdin("not json\n\n{\"id\":2,\"method\":\"nope\"}\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output)?;
    let replies: Vec<Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], "PARSE_ERROR");
    assert_eq!(replies[1]["id"], 2);
    Ok(())
}

#[test]
fn list_tools_needs_no_token() -> anyhow::Result<()> {
    Command::cargo_bin("github-tools")?
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .arg("--list-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"github_get_repository\""))
        .stdout(predicate::str::contains("\"required\""));
    Ok(())
}

#[test]
fn missing_token_fails_at_startup() -> anyhow::Result<()> {
    Command::cargo_bin("github-tools")?
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing GITHUB_TOKEN or GH_TOKEN"));
    Ok(())
}

#[test]
fn version_flag_prints_name() -> anyhow::Result<()> {
    Command::cargo_bin("github-tools")?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("github-tools "));
    Ok(())
}
