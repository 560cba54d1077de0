#![no_main]

//! Fuzz target for request decoding and the storage paths behind it.
//!
//! Arbitrary bodies and query pairs are decoded the way the handlers decode
//! them, then replayed against a scratch database. Nothing here may panic,
//! and reads must stay ordered newest first.

use arbitrary::Arbitrary;
use chrono::Utc;
use libfuzzer_sys::fuzz_target;
use tempfile::tempdir;

use todo_stations::db::Database;
use todo_stations::models::{
    CreateTodoRequest, DeleteTodoRequest, Page, ReadTodoRequest, UpdateTodoRequest,
};

#[derive(Arbitrary, Debug)]
struct RequestInput {
    create_body: Vec<u8>,
    update_body: Vec<u8>,
    delete_body: Vec<u8>,
    /// Raw query pairs, possibly repeated or unparsable
    query: Vec<(String, String)>,
}

fuzz_target!(|input: RequestInput| {
    let dir = match tempdir() {
        Ok(d) => d,
        Err(_) => return,
    };
    let db = match Database::open(&dir.path().join("todos.db")) {
        Ok(d) => d,
        Err(_) => return,
    };

    if let Ok(req) = serde_json::from_slice::<CreateTodoRequest>(&input.create_body) {
        let result = db.insert_todo(&req.subject, &req.description, Utc::now());
        // The schema refuses empty subjects on its own.
        assert!(!req.subject.is_empty() || result.is_err());
    }

    if let Ok(req) = serde_json::from_slice::<UpdateTodoRequest>(&input.update_body) {
        if !req.subject.is_empty() {
            let _ = db.update_todo(req.id, &req.subject, &req.description, Utc::now());
        }
    }

    let read = ReadTodoRequest::from_query_pairs(&input.query);
    if let Ok(todos) = db.list_todos(Page::from(read)) {
        assert!(todos.windows(2).all(|w| w[0].id > w[1].id));
        if let Page::Before { prev_id, size } = Page::from(read) {
            assert!(todos.len() as i64 <= size);
            assert!(todos.iter().all(|t| t.id < prev_id));
        }
    }

    if let Ok(req) = serde_json::from_slice::<DeleteTodoRequest>(&input.delete_body) {
        let _ = db.delete_todos(&req.ids.unwrap_or_default());
    }
});
