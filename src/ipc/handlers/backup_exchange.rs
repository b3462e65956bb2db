use crate::backup;
use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace_path) = param_str(&req.params, "workspacePath").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.workspacePath", None);
    };
    let Some(out_path) = param_str(&req.params, "outPath").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.outPath", None);
    };

    // Bundling the open workspace must capture unsaved edits too.
    if state.dirty && state.workspace.as_deref() == Some(workspace_path.as_path()) {
        let _ = state.flush_snapshot();
    }

    match backup::export_workspace_bundle(&workspace_path, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count
            }),
        ),
        Err(e) => err(&req.id, "backup_export_failed", format!("{e:?}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(in_path) = param_str(&req.params, "inPath").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.inPath", None);
    };
    let Some(workspace_path) = param_str(&req.params, "workspacePath").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.workspacePath", None);
    };

    let summary = match backup::import_workspace_bundle(&in_path, &workspace_path) {
        Ok(s) => s,
        Err(e) => return err(&req.id, "backup_import_failed", format!("{e:?}"), None),
    };

    // Importing over the open workspace invalidates the in-memory session:
    // reopen and rehydrate so stale state cannot overwrite the import.
    if state.workspace.as_deref() == Some(workspace_path.as_path()) {
        let conn = match db::open_db(&workspace_path) {
            Ok(c) => c,
            Err(e) => return err(&req.id, "db_open_failed", format!("{e:?}"), None),
        };
        let snapshot = match db::load_roster(&conn) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "db_query_failed", format!("{e:?}"), None),
        };
        state.session.hydrate(snapshot);
        state.db = Some(conn);
        state.dirty = false;
    }

    ok(
        &req.id,
        json!({ "bundleFormatDetected": summary.bundle_format_detected }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportWorkspaceBundle" => Some(handle_backup_export(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
