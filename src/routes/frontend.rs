//! 前端单页应用
//!
//! 构建产物通过 rust-embed 编译进二进制；`./frontend-custom/` 下的同名文件优先，
//! 便于不重新编译就替换页面。未命中的路径回退到 index.html。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header, web};
use rust_embed::Embed;
use std::borrow::Cow;
use std::path::Path;

#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const INDEX: &str = "index.html";
const OVERRIDE_DIR: &str = "./frontend-custom";

fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" | "webmanifest" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Vite 输出到 assets/ 的文件名带 hash，可以长期缓存
fn is_immutable(path: &str) -> bool {
    path.starts_with("assets/")
}

fn load(path: &str) -> Option<Cow<'static, [u8]>> {
    // 拒绝越出覆盖目录的路径
    if path.split('/').any(|seg| seg == "..") {
        return None;
    }
    std::fs::read(Path::new(OVERRIDE_DIR).join(path))
        .ok()
        .map(Cow::Owned)
        .or_else(|| FrontendAssets::get(path).map(|f| f.data))
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let requested = req.match_info().query("tail").trim_start_matches('/');
    let path = if requested.is_empty() { INDEX } else { requested };

    let (path, data) = match load(path) {
        Some(data) => (path, data),
        None => match load(INDEX) {
            Some(data) => (INDEX, data),
            None => {
                return Ok(HttpResponse::NotFound()
                    .content_type("text/plain; charset=utf-8")
                    .body("Frontend assets are not embedded. Run `npm run build` in frontend/."));
            }
        },
    };

    let cache_control = if is_immutable(path) {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    };
    Ok(HttpResponse::Ok()
        .content_type(content_type(path))
        .insert_header((header::CACHE_CONTROL, cache_control))
        .body(data.into_owned()))
}

/// 必须最后注册，兜底所有非 API 路径
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_and_caching() {
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("assets/app-3f2a.js"), "application/javascript; charset=utf-8");
        assert_eq!(content_type("report.xyz"), "application/octet-stream");
        assert!(is_immutable("assets/app-3f2a.js"));
        assert!(!is_immutable("index.html"));
    }

    #[test]
    fn test_parent_segments_rejected() {
        assert!(load("../Cargo.toml").is_none());
    }
}
