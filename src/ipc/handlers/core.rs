use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(path) = param_str(&req.params, "path").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    // Unsaved edits in the previous workspace flush before switching.
    if state.dirty {
        let _ = state.flush_snapshot();
    }

    let conn = match db::open_db(&path) {
        Ok(conn) => conn,
        Err(e) => return err(&req.id, "db_open_failed", format!("{e:?}"), None),
    };

    let snapshot = match db::load_roster(&conn) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", format!("{e:?}"), None),
    };
    let student_count = snapshot.len();

    state.session.hydrate(snapshot);
    state.workspace = Some(path.clone());
    state.db = Some(conn);
    state.dirty = false;

    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "studentCount": student_count
        }),
    )
}

fn handle_workspace_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    match state.flush_snapshot() {
        Ok(count) => ok(&req.id, json!({ "savedCount": count })),
        Err(e) => err(&req.id, "db_insert_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "workspace.save" => Some(handle_workspace_save(state, req)),
        _ => None,
    }
}
