//! Loopback file server
//!
//! Serves the image directory over plain GET. Request paths are
//! percent-decoded and then resolved strictly within the served directory:
//! empty, `.` and `..` segments are dropped before joining, so traversal
//! attempts can never escape it.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use actix_web::dev::Server;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

struct ServerState {
    images_dir: PathBuf,
}

/// Map a raw request path onto a file under `root`. Query and fragment are
/// stripped, percent-escapes are decoded (so `a%20b.jpg` finds `a b.jpg`),
/// and unsafe segments are discarded rather than rejected. Segment filtering
/// runs after decoding, so escaped dot-dots are caught too.
pub fn resolve_request_path(root: &Path, raw_path: &str) -> PathBuf {
    let clean = raw_path
        .split(['?', '#'])
        .next()
        .unwrap_or("");
    let decoded = urlencoding::decode(clean).unwrap_or(Cow::Borrowed(clean));

    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        resolved.push(segment);
    }
    resolved
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn serve_file(req: HttpRequest, state: web::Data<ServerState>) -> HttpResponse {
    let path = resolve_request_path(&state.images_dir, req.path());
    if !path.is_file() {
        return HttpResponse::NotFound().finish();
    }
    match std::fs::read(&path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "served file");
            HttpResponse::Ok()
                .content_type(content_type_for(&path))
                .body(bytes)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read file");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Bind the listener and return the server future; the caller decides which
/// thread drives it.
pub fn start_server(
    images_dir: PathBuf,
    bind_host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(ServerState { images_dir });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/{filename:.*}", web::get().to(serve_file))
    })
    .workers(1)
    .bind((bind_host, port))?
    .run();

    Ok(server)
}
