use application::{ApplicationError, DocumentService};
use domain::{Document, SearchRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// One line of input.
#[derive(Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Save { document: Document },
    FindById { id: String },
    Search {
        #[serde(default)]
        request: SearchRequest,
    },
    Count,
}

/// One response, written as a single JSON value.
#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Ok(Payload),
    NotFound { id: String },
    Error { message: String },
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Payload {
    Document { document: Document },
    Documents { documents: Vec<Document>, total: usize },
    Count { total: usize },
}

/// Parses and executes one input line. Returns `None` for blank lines.
pub async fn handle_line(service: &DocumentService, line: &str) -> Option<Response> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let response = match serde_json::from_str::<Command>(line) {
        Ok(command) => execute(service, command).await,
        Err(e) => {
            warn!("Rejected malformed command: {}", e);
            map_application_error_to_response(ApplicationError::InvalidInput(e.to_string()))
        }
    };
    Some(response)
}

pub async fn execute(service: &DocumentService, command: Command) -> Response {
    match command {
        Command::Save { document } => match service.save(document).await {
            Ok(document) => Response::Ok(Payload::Document { document }),
            Err(e) => map_application_error_to_response(e),
        },
        Command::FindById { id } => match service.get_by_id(&id).await {
            Ok(document) => Response::Ok(Payload::Document { document }),
            Err(e) => map_application_error_to_response(e),
        },
        Command::Search { request } => match service.search(&request).await {
            Ok(documents) => {
                info!(hits = documents.len(), "Search command completed");
                Response::Ok(Payload::Documents {
                    total: documents.len(),
                    documents,
                })
            }
            Err(e) => map_application_error_to_response(e),
        },
        Command::Count => match service.count().await {
            Ok(total) => Response::Ok(Payload::Count { total }),
            Err(e) => map_application_error_to_response(e),
        },
    }
}

/// Serializes a response. A serialization failure still yields an error response,
/// so every input line gets exactly one output.
pub fn render_response(response: &Response, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    rendered.unwrap_or_else(|e| {
        error!("Failed to serialize response: {}", e);
        render_serialization_failure(&e.to_string())
    })
}

fn render_serialization_failure(reason: &str) -> String {
    let fallback = Response::Error {
        message: format!("Failed to serialize response: {}", reason),
    };
    serde_json::to_string(&fallback).unwrap_or_else(|_| {
        r#"{"status":"error","message":"Failed to serialize response"}"#.to_string()
    })
}

/// Maps ApplicationError to the response written back to the caller.
fn map_application_error_to_response(err: ApplicationError) -> Response {
    match err {
        ApplicationError::NotFound(id) => Response::NotFound { id },
        ApplicationError::InvalidInput(msg) => Response::Error {
            message: format!("Invalid input: {}", msg),
        },
        ApplicationError::InfrastructureError(msg) => {
            error!("Underlying infrastructure error: {}", msg);
            Response::Error {
                message: "An internal error occurred".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::InMemoryDocumentRepository;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(InMemoryDocumentRepository::new()))
    }

    async fn run(service: &DocumentService, line: Value) -> Value {
        let response = handle_line(service, &line.to_string())
            .await
            .expect("non-blank line yields a response");
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn save_then_find_by_id() {
        let service = service();
        let saved = run(
            &service,
            json!({"op": "save", "document": {"title": "Document Title"}}),
        )
        .await;
        assert_eq!(saved["status"], "ok");
        let id = saved["document"]["id"].as_str().unwrap().to_string();
        assert!(saved["document"]["created"].is_string());

        let found = run(&service, json!({"op": "find_by_id", "id": id})).await;
        assert_eq!(found["status"], "ok");
        assert_eq!(found["document"], saved["document"]);
    }

    #[tokio::test]
    async fn find_by_id_miss_reports_not_found() {
        let response = run(&service(), json!({"op": "find_by_id", "id": "nonexistent"})).await;
        assert_eq!(response, json!({"status": "not_found", "id": "nonexistent"}));
    }

    #[tokio::test]
    async fn search_command_filters_documents() {
        let service = service();
        for title in ["Document A", "report B"] {
            run(&service, json!({"op": "save", "document": {"title": title}})).await;
        }

        let response = run(
            &service,
            json!({"op": "search", "request": {"titlePrefixes": ["Document"]}}),
        )
        .await;
        assert_eq!(response["status"], "ok");
        assert_eq!(response["total"], 1);
        assert_eq!(response["documents"][0]["title"], "Document A");

        let everything = run(&service, json!({"op": "search"})).await;
        assert_eq!(everything["total"], 2);

        let count = run(&service, json!({"op": "count"})).await;
        assert_eq!(count, json!({"status": "ok", "total": 2}));
    }

    #[tokio::test]
    async fn malformed_line_is_an_error_response() {
        let service = service();
        let response = handle_line(&service, "{not json").await.unwrap();
        assert!(matches!(response, Response::Error { message } if message.starts_with("Invalid input")));

        let unknown = run(&service, json!({"op": "delete", "id": "x"})).await;
        assert_eq!(unknown["status"], "error");
    }

    #[tokio::test]
    async fn compact_rendering_is_one_line() {
        let service = service();
        let response = handle_line(&service, r#"{"op":"count"}"#).await.unwrap();

        let rendered = render_response(&response, false);
        assert!(!rendered.contains('\n'));
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value, json!({"status": "ok", "total": 0}));

        let pretty: Value = serde_json::from_str(&render_response(&response, true)).unwrap();
        assert_eq!(pretty, value);
    }

    #[test]
    fn serialization_failure_renders_error_line() {
        let rendered = render_serialization_failure("boom");
        assert!(!rendered.contains('\n'));
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Failed to serialize response: boom");
    }

    #[tokio::test]
    async fn blank_line_is_skipped() {
        assert!(handle_line(&service(), "   ").await.is_none());
    }
}
