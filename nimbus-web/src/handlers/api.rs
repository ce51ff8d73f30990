//! JSON API handlers for torrent management.
//!
//! Every response uses the `{success, message, data}` envelope; domain
//! failures stay HTTP 200 with `success: false` so scripted callers only
//! branch on the envelope. Mutating endpoints check credentials first.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use nimbus_core::torrent::{TorrentId, TorrentStatus};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::{self, Credentials};
use crate::server::AppState;

/// Query parameters for listing torrents.
#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Query parameters for adding a magnet link.
#[derive(Deserialize)]
pub struct AddMagnetQuery {
    pub username: String,
    pub password: String,
    pub magnet: String,
}

/// Query parameters for uploading a torrent descriptor.
#[derive(Deserialize)]
pub struct AddDescriptorQuery {
    pub username: String,
    pub password: String,
    pub filename: String,
}

/// Query parameters for deleting a torrent.
#[derive(Deserialize)]
pub struct DeleteTorrentQuery {
    pub username: String,
    pub password: String,
    pub remove_files: Option<bool>,
}

fn envelope(success: bool, message: impl Into<String>, data: Option<Value>) -> Json<Value> {
    let mut response = json!({
        "success": success,
        "message": message.into(),
    });
    if let Some(data) = data {
        response["data"] = data;
    }
    Json(response)
}

fn auth_failure() -> Json<Value> {
    envelope(false, "Authentication failed", None)
}

fn parse_id(raw: &str) -> Result<TorrentId, Json<Value>> {
    raw.parse()
        .map_err(|e: nimbus_core::torrent::TorrentError| envelope(false, e.to_string(), None))
}

/// Lists all torrents, optionally filtered by status.
pub async fn api_list_torrents(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Json<Value> {
    let filter = match params.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => match raw.parse::<TorrentStatus>() {
            Ok(status) => Some(status),
            Err(e) => return envelope(false, e.to_string(), None),
        },
    };

    let mut views = match state.manager.list().await {
        Ok(views) => views,
        Err(e) => return envelope(false, e.to_string(), None),
    };

    if let Some(status) = filter {
        views.retain(|view| view.status == status);
    }
    views.sort_by(|a, b| a.added_at.cmp(&b.added_at));

    let count = views.len();
    envelope(
        true,
        format!("Found {count} torrents"),
        Some(json!({ "torrents": views })),
    )
}

/// Fetches a single torrent by id.
pub async fn api_get_torrent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.record(id).await {
        Ok(Some(view)) => {
            let message = format!("Found: {}", view.name);
            envelope(true, message, Some(json!({ "torrent": view })))
        }
        Ok(None) => envelope(false, format!("Torrent {id} not found"), None),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Adds a torrent from a magnet link.
pub async fn api_add_magnet(
    State(state): State<AppState>,
    Query(params): Query<AddMagnetQuery>,
) -> Json<Value> {
    if !auth::verify(&params.username, &params.password, &state.auth) {
        return auth_failure();
    }

    match state.manager.add_magnet(&params.magnet).await {
        Ok(id) => {
            let name = match state.manager.record(id).await {
                Ok(Some(view)) => view.name,
                _ => id.to_string(),
            };
            envelope(
                true,
                format!("Added torrent: {name}"),
                Some(json!({ "torrent_id": id.to_string() })),
            )
        }
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Adds a torrent from descriptor bytes carried in the request body.
pub async fn api_add_descriptor(
    State(state): State<AppState>,
    Query(params): Query<AddDescriptorQuery>,
    body: Bytes,
) -> Json<Value> {
    if !auth::verify(&params.username, &params.password, &state.auth) {
        return auth_failure();
    }

    match state
        .manager
        .add_descriptor(&params.filename, body.to_vec())
        .await
    {
        Ok(id) => envelope(
            true,
            format!("Added torrent: {}", params.filename),
            Some(json!({ "torrent_id": id.to_string() })),
        ),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Pauses a downloading torrent.
pub async fn api_pause_torrent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(credentials): Query<Credentials>,
) -> Json<Value> {
    if !credentials.verify(&state.auth) {
        return auth_failure();
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.pause(id).await {
        Ok(name) => envelope(true, format!("Paused: {name}"), None),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Resumes a paused torrent.
pub async fn api_resume_torrent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(credentials): Query<Credentials>,
) -> Json<Value> {
    if !credentials.verify(&state.auth) {
        return auth_failure();
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.resume(id).await {
        Ok(name) => envelope(true, format!("Resumed: {name}"), None),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Deletes a torrent, removing its files unless `remove_files=false`.
pub async fn api_delete_torrent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteTorrentQuery>,
) -> Json<Value> {
    if !auth::verify(&params.username, &params.password, &state.auth) {
        return auth_failure();
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let remove_files = params.remove_files.unwrap_or(true);
    match state.manager.remove(id, remove_files).await {
        Ok(name) => envelope(true, format!("Deleted: {name}"), None),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Lists the materialized files of a torrent.
pub async fn api_list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Value> {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.files(id).await {
        Ok(files) => envelope(
            true,
            format!("Found {} files", files.len()),
            Some(json!({ "files": files })),
        ),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Deletes one materialized file from a torrent.
pub async fn api_delete_file(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Query(credentials): Query<Credentials>,
) -> Json<Value> {
    if !credentials.verify(&state.auth) {
        return auth_failure();
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.manager.remove_file(id, &name).await {
        Ok(()) => envelope(true, format!("Deleted file: {name}"), None),
        Err(e) => envelope(false, e.to_string(), None),
    }
}

/// Streams a zip archive of a torrent's files.
pub async fn api_download_archive(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(response) => return response.into_response(),
    };

    let name = match state.manager.record(id).await {
        Ok(Some(view)) => view.name,
        Ok(None) => {
            return envelope(false, format!("Torrent {id} not found"), None).into_response();
        }
        Err(e) => return envelope(false, e.to_string(), None).into_response(),
    };

    match state.manager.pack_archive(id).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{name}.zip\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => envelope(false, e.to_string(), None).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_carries_data_only_when_present() {
        let with_data = envelope(true, "ok", Some(json!({"k": 1})));
        assert_eq!(with_data.0["success"], true);
        assert_eq!(with_data.0["message"], "ok");
        assert_eq!(with_data.0["data"]["k"], 1);

        let without_data = envelope(false, "nope", None);
        assert_eq!(without_data.0["success"], false);
        assert!(without_data.0.get("data").is_none());
    }

    #[test]
    fn test_parse_id_round_trip_and_rejection() {
        let id = TorrentId::from_origin("magnet:?xt=urn:btih:ABC");
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);

        let rejected = parse_id("zz-not-hex").unwrap_err();
        assert_eq!(rejected.0["success"], false);
    }
}
