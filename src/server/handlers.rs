//! GET and POST dispatch onto the file store.

use crate::http::mime::{Category, ContentType};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::storage::{FileStore, StorageError};

/// Runs the handler for one request and produces its response.
///
/// Handler failures map to 404/500 responses here; nothing below this
/// point terminates the connection.
pub async fn handle(req: &Request, store: &FileStore) -> Response {
    match req.method {
        Method::GET => get(req, store).await,
        Method::POST => post(req, store).await,
    }
}

/// Serves a file download.
///
/// The content type resolves from the path extension and overrides
/// whatever the client declared: GET responses are typed by what the
/// store says the file is, not by client input.
async fn get(req: &Request, store: &FileStore) -> Response {
    let content_type = ContentType::from_extension(req.extension());

    match store.read(&req.path, content_type.transfer_mode()).await {
        Ok(bytes) => Response::ok(content_type, bytes),
        Err(StorageError::NotFound) => Response::not_found(),
        Err(e) => {
            tracing::warn!(path = %req.path, error = %e, "GET failed reading file");
            Response::internal_error()
        }
    }
}

/// Stores an upload.
///
/// The declared content type is trusted; a missing or malformed header
/// falls back to `text/html`. The stored extension is the subtype with
/// `plain` mapped back to `txt`. Success echoes the type with an empty
/// body.
async fn post(req: &Request, store: &FileStore) -> Response {
    let content_type = ContentType::parse(&req.content_type).unwrap_or(ContentType {
        category: Category::Text,
        subtype: "html".to_string(),
    });

    match store
        .write(
            &req.path,
            content_type.storage_extension(),
            content_type.transfer_mode(),
            &req.body,
        )
        .await
    {
        Ok(()) => Response::ok(content_type, Vec::new()),
        Err(e) => {
            tracing::warn!(path = %req.path, error = %e, "POST failed writing file");
            Response::internal_error()
        }
    }
}
