use crate::ipc::error::{err, ok};
use crate::ipc::helpers::roster_view;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_history_undo(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    // Underflow is a no-op, never an error.
    let applied = state.session.undo();
    if applied {
        state.mark_dirty();
    }
    ok(
        &req.id,
        json!({
            "applied": applied,
            "students": roster_view(state.session.students())
        }),
    )
}

fn handle_history_redo(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    let applied = state.session.redo();
    if applied {
        state.mark_dirty();
    }
    ok(
        &req.id,
        json!({
            "applied": applied,
            "students": roster_view(state.session.students())
        }),
    )
}

fn handle_history_status(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }
    ok(
        &req.id,
        json!({
            "canUndo": state.session.can_undo(),
            "canRedo": state.session.can_redo()
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "history.undo" => Some(handle_history_undo(state, req)),
        "history.redo" => Some(handle_history_redo(state, req)),
        "history.status" => Some(handle_history_status(state, req)),
        _ => None,
    }
}
