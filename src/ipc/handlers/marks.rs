use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{param_f64, param_str, param_usize, roster_view};
use crate::ipc::types::{AppState, Request};
use crate::session::Category;
use serde_json::json;

fn parse_category(params: &serde_json::Value) -> Result<Category, serde_json::Value> {
    let raw = param_str(params, "category").unwrap_or("");
    Category::parse(raw).ok_or_else(|| {
        json!({
            "category": raw,
            "accepted": Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
        })
    })
}

fn handle_marks_adjust(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let Some(index) = param_usize(&req.params, "index") else {
        return err(&req.id, "bad_params", "missing/invalid index", None);
    };
    let category = match parse_category(&req.params) {
        Ok(c) => c,
        Err(detail) => {
            return err(
                &req.id,
                "bad_params",
                "category must be one of: presence, discipline, teamwork, participation",
                Some(detail),
            )
        }
    };
    let Some(delta) = param_f64(&req.params, "delta") else {
        return err(&req.id, "bad_params", "missing/invalid delta", None);
    };

    match state.session.adjust_mark(index, category, delta) {
        Ok(()) => {
            state.mark_dirty();
            ok(
                &req.id,
                json!({
                    "student": state.session.get(index),
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

fn handle_marks_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let Some(index) = param_usize(&req.params, "index") else {
        return err(&req.id, "bad_params", "missing/invalid index", None);
    };
    let category = match parse_category(&req.params) {
        Ok(c) => c,
        Err(detail) => {
            return err(
                &req.id,
                "bad_params",
                "category must be one of: presence, discipline, teamwork, participation",
                Some(detail),
            )
        }
    };
    // Non-numeric direct edits are rejected here with no state change.
    let Some(value) = param_f64(&req.params, "value") else {
        return err(&req.id, "bad_params", "missing/invalid value", None);
    };

    match state.session.set_mark(index, category, value) {
        Ok(()) => {
            state.mark_dirty();
            ok(
                &req.id,
                json!({
                    "student": state.session.get(index),
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

fn handle_marks_clear_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    state.session.clear_all_marks();
    state.mark_dirty();
    ok(
        &req.id,
        json!({ "students": roster_view(state.session.students()) }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.adjust" => Some(handle_marks_adjust(state, req)),
        "marks.set" => Some(handle_marks_set(state, req)),
        "marks.clearAll" => Some(handle_marks_clear_all(state, req)),
        _ => None,
    }
}
