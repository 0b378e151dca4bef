// src/handlers/media.rs
// DOCUMENTATION: Shared media links
// PURPOSE: Serve files and folder listings that were shared with anyone holding the link

use crate::errors::BookingError;
use crate::services::{LocalMediaStore, STORED_MIME_TYPE};
use actix_web::{web, HttpResponse};
use serde_json::json;

/// GET /media/{path}
/// A shared file returns its bytes; a shared folder returns the links inside it
pub async fn get_media(
    store: web::Data<LocalMediaStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, BookingError> {
    let relative = path.into_inner();

    let Some(full_path) = store.resolve(&relative) else {
        return Ok(HttpResponse::NotFound().finish());
    };
    if !store.is_shared(&relative).await {
        return Ok(HttpResponse::NotFound().finish());
    }

    let metadata = match tokio::fs::metadata(&full_path).await {
        Ok(metadata) => metadata,
        Err(_) => return Ok(HttpResponse::NotFound().finish()),
    };

    if metadata.is_dir() {
        let files = store.shared_entries(&relative).await?;
        return Ok(HttpResponse::Ok().json(json!({
            "folder": relative,
            "files": files
        })));
    }

    let bytes = tokio::fs::read(&full_path).await?;
    Ok(HttpResponse::Ok().content_type(STORED_MIME_TYPE).body(bytes))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/media/{path:.*}", web::get().to(get_media));
}
