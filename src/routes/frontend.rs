//! Tableau de bord embarqué.
//!
//! Les fichiers de `frontend/dist/` sont inclus au binaire par rust-embed ;
//! toute route inconnue hors `/api` renvoie `index.html` (fallback SPA).
//! Un dossier `frontend-custom/` local, s'il existe, a la priorité.

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::models::{ApiResponse, ErrorCode};

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        _ => "application/octet-stream",
    }
}

/// Ressources versionnées par le bundler : cache long
fn should_cache(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    matches!(
        ext,
        "js" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp"
    )
}

fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

fn get_file(path: &str) -> Option<Vec<u8>> {
    // refuse de sortir du dossier personnalisé
    let custom = if path.split('/').any(|part| part == "..") {
        None
    } else {
        std::fs::read(format!("./frontend-custom/{path}")).ok()
    };
    custom.or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Route inconnue",
        )));
    }

    let (content, file_path) = match (path.is_empty(), get_file(path)) {
        (false, Some(content)) => (Some(content), path),
        _ => (get_file("index.html"), "index.html"),
    };

    let Some(data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="utf-8">
    <title>École Portal</title>
</head>
<body>
    <h1>Interface introuvable</h1>
    <p>Le tableau de bord n'a pas été construit ni embarqué.</p>
    <pre>cd frontend && bun install && bun run build</pre>
</body>
</html>"#,
            ));
    };

    let mime = get_mime_type(file_path);
    let mut response = HttpResponse::Ok();
    response.content_type(mime);
    if should_cache(file_path) {
        response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
    } else {
        response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
    }

    Ok(response.body(data))
}

pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("assets/app.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(get_mime_type("logo.png"), "image/png");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("assets/app.js"));
        assert!(should_cache("style.css"));
        assert!(!should_cache("index.html"));
        assert!(!should_cache("manifest.json"));
    }

    #[test]
    fn test_api_paths_are_not_spa_routes() {
        assert!(is_api_path("api/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("apiculture"));
        assert!(!is_api_path("devoirs/12"));
    }
}
