use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_str, param_usize, roster_view};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    ok(
        &req.id,
        json!({ "students": roster_view(state.session.students()) }),
    )
}

fn handle_roster_add_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let Some(name) = param_str(&req.params, "name") else {
        return err(&req.id, "bad_params", "missing params.name", None);
    };

    match state.session.add_student(name) {
        Ok(index) => {
            state.mark_dirty();
            ok(
                &req.id,
                json!({
                    "index": index,
                    "student": state.session.get(index),
                    "students": roster_view(state.session.students())
                }),
            )
        }
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

fn handle_roster_remove_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let Some(index) = param_usize(&req.params, "index") else {
        return err(&req.id, "bad_params", "missing/invalid index", None);
    };

    match state.session.remove_student(index) {
        Ok(removed) => {
            state.mark_dirty();
            ok(
                &req.id,
                json!({
                    "student": removed,
                    "students": roster_view(state.session.students())
                }),
            )
        }
        Err(e) => err(
            &req.id,
            "not_found",
            e.to_string(),
            Some(json!({ "index": index })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.list" => Some(handle_roster_list(state, req)),
        "roster.addStudent" => Some(handle_roster_add_student(state, req)),
        "roster.removeStudent" => Some(handle_roster_remove_student(state, req)),
        _ => None,
    }
}
