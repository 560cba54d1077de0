use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadTodoRequest {
    pub prev_id: i64,
    pub size: i64,
}

impl ReadTodoRequest {
    /// Builds a request from decoded query pairs. Only the first `prev_id` and
    /// `size` count; anything missing or not an integer reads as 0.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let first_int = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<i64>().ok())
                .unwrap_or(0)
        };

        ReadTodoRequest {
            prev_id: first_int("prev_id"),
            size: first_int("size"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

/// `ids` is `None` when the field is missing or `null`, which is distinct
/// from an explicit empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteTodoRequest {
    #[serde(default)]
    pub ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub todo: Todo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadTodoResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodoResponse {
    pub todo: Todo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteTodoResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthzResponse {
    pub message: String,
}

/// Which slice of the table a read returns. Rows always come newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Every row.
    All,
    /// The `size` most recent rows.
    Latest { size: i64 },
    /// Up to `size` rows with `id < prev_id`.
    Before { prev_id: i64, size: i64 },
}

impl Page {
    pub fn from_cursor(prev_id: i64, size: i64) -> Self {
        let size = size.max(0);
        match (prev_id, size) {
            (0, 0) => Page::All,
            (0, size) => Page::Latest { size },
            (prev_id, size) => Page::Before { prev_id, size },
        }
    }
}

impl From<ReadTodoRequest> for Page {
    fn from(req: ReadTodoRequest) -> Self {
        Page::from_cursor(req.prev_id, req.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_todo_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let todo = Todo {
            id: 7,
            subject: "buy milk".to_string(),
            description: String::new(),
            created_at: at,
            updated_at: at,
        };

        let json = serde_json::to_value(&todo).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            ["created_at", "description", "id", "subject", "updated_at"]
        );
        assert_eq!(json["id"], 7);
        assert_eq!(json["created_at"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_delete_response_is_empty_object() {
        let json = serde_json::to_string(&DeleteTodoResponse {}).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_create_request_defaults_missing_fields() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"unknown":true}"#).unwrap();
        assert_eq!(req.subject, "");
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_update_request_defaults_id() {
        let req: UpdateTodoRequest = serde_json::from_str(r#"{"subject":"x"}"#).unwrap();
        assert_eq!(req.id, 0);
        assert_eq!(req.subject, "x");
    }

    #[test]
    fn test_delete_request_missing_or_null_ids_is_none() {
        let req: DeleteTodoRequest = serde_json::from_str("{}").unwrap();
        assert!(req.ids.is_none());

        let req: DeleteTodoRequest = serde_json::from_str(r#"{"ids":null}"#).unwrap();
        assert!(req.ids.is_none());

        let req: DeleteTodoRequest = serde_json::from_str(r#"{"ids":[]}"#).unwrap();
        assert_eq!(req.ids, Some(vec![]));
    }

    #[test]
    fn test_query_pairs_parse() {
        let req = ReadTodoRequest::from_query_pairs(&pairs(&[("prev_id", "10"), ("size", "3")]));
        assert_eq!(req, ReadTodoRequest { prev_id: 10, size: 3 });
    }

    #[test]
    fn test_query_pairs_unparsable_is_zero() {
        let req = ReadTodoRequest::from_query_pairs(&pairs(&[("prev_id", "abc"), ("size", "")]));
        assert_eq!(req, ReadTodoRequest::default());
    }

    #[test]
    fn test_query_pairs_first_value_wins() {
        let req = ReadTodoRequest::from_query_pairs(&pairs(&[("size", "2"), ("size", "9")]));
        assert_eq!(req.size, 2);
        assert_eq!(req.prev_id, 0);
    }

    #[test]
    fn test_page_from_cursor() {
        assert_eq!(Page::from_cursor(0, 0), Page::All);
        assert_eq!(Page::from_cursor(0, 5), Page::Latest { size: 5 });
        assert_eq!(
            Page::from_cursor(4, 2),
            Page::Before { prev_id: 4, size: 2 }
        );
        assert_eq!(
            Page::from_cursor(4, 0),
            Page::Before { prev_id: 4, size: 0 }
        );
    }

    #[test]
    fn test_page_negative_size_clamps_to_zero() {
        assert_eq!(Page::from_cursor(0, -1), Page::All);
        assert_eq!(
            Page::from_cursor(3, -1),
            Page::Before { prev_id: 3, size: 0 }
        );
    }
}
