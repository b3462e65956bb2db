use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradebookd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradebookd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    if value.get("ok").and_then(|v| v.as_bool()) == Some(false) {
        let code = value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        assert_ne!(
            code, "not_implemented",
            "unexpected unknown method for {}",
            method
        );
    }
    value
}

#[test]
fn router_dispatch_smoke_covers_handler_families() {
    let workspace = temp_dir("gradebook-router-smoke");
    let bundle_out = workspace.join("smoke-backup.gbbackup.zip");
    let csv_out = workspace.join("smoke-export.csv");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request(&mut stdin, &mut reader, "1", "health", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let added = request(
        &mut stdin,
        &mut reader,
        "3",
        "roster.addStudent",
        json!({ "name": "Smoke Student" }),
    );
    let index = added
        .get("result")
        .and_then(|v| v.get("index"))
        .and_then(|v| v.as_u64())
        .expect("index");
    assert_eq!(index, 0);

    let _ = request(&mut stdin, &mut reader, "4", "roster.list", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "5",
        "marks.adjust",
        json!({ "index": 0, "category": "presence", "delta": 1 }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "6",
        "marks.set",
        json!({ "index": 0, "category": "teamwork", "value": 2.5 }),
    );
    let _ = request(&mut stdin, &mut reader, "7", "marks.clearAll", json!({}));
    let _ = request(&mut stdin, &mut reader, "8", "history.status", json!({}));
    let _ = request(&mut stdin, &mut reader, "9", "history.undo", json!({}));
    let _ = request(&mut stdin, &mut reader, "10", "history.redo", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "11",
        "export.tableModel",
        json!({}),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "12",
        "export.writeCsv",
        json!({ "outPath": csv_out.to_string_lossy() }),
    );
    let _ = request(&mut stdin, &mut reader, "13", "workspace.save", json!({}));
    let _ = request(
        &mut stdin,
        &mut reader,
        "14",
        "backup.exportWorkspaceBundle",
        json!({
            "workspacePath": workspace.to_string_lossy(),
            "outPath": bundle_out.to_string_lossy()
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "15",
        "backup.importWorkspaceBundle",
        json!({
            "workspacePath": workspace.to_string_lossy(),
            "inPath": bundle_out.to_string_lossy()
        }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "16",
        "roster.removeStudent",
        json!({ "index": 0 }),
    );

    let listed = request(&mut stdin, &mut reader, "17", "roster.list", json!({}));
    assert_eq!(listed.get("ok").and_then(|v| v.as_bool()), Some(true));

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn unknown_method_reports_not_implemented() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let payload = json!({ "id": "x", "method": "nope.nothing", "params": {} });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_implemented")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn mutations_require_a_selected_workspace() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    for (id, method, params) in [
        ("1", "roster.addStudent", json!({ "name": "Nobody" })),
        ("2", "marks.clearAll", json!({})),
        ("3", "history.undo", json!({})),
        ("4", "export.tableModel", json!({})),
        ("5", "workspace.save", json!({})),
    ] {
        let payload = json!({ "id": id, "method": method, "params": params });
        writeln!(stdin, "{}", payload).expect("write request");
        stdin.flush().expect("flush request");

        let mut line = String::new();
        reader.read_line(&mut line).expect("read response line");
        let value: serde_json::Value =
            serde_json::from_str(line.trim()).expect("parse response json");
        assert_eq!(
            value
                .get("error")
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str()),
            Some("no_workspace"),
            "method {} should demand a workspace",
            method
        );
    }

    drop(stdin);
    let _ = child.wait();
}
