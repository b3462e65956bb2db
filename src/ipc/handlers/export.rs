use crate::export;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_export_table_model(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let (header, rows) = export::table_model(state.session.students());
    ok(&req.id, json!({ "header": header, "rows": rows }))
}

fn handle_export_write_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let Some(out_path) = param_str(&req.params, "outPath").map(PathBuf::from) else {
        return err(&req.id, "bad_params", "missing params.outPath", None);
    };

    match export::write_csv(&out_path, state.session.students()) {
        Ok(rows) => ok(&req.id, json!({ "rows": rows })),
        Err(e) => err(&req.id, "io_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.tableModel" => Some(handle_export_table_model(state, req)),
        "export.writeCsv" => Some(handle_export_write_csv(state, req)),
        _ => None,
    }
}
