//! Panel HTTP server.
//!
//! A lightweight single-threaded server on `tiny_http`:
//!
//! - `GET /` - the browser panel page (one tab per ordered page)
//! - `GET /sd_extra_networks/thumb?filename=...&mtime=...` - preview
//!   bytes, gated by the path guard; `mtime` is a client-side
//!   cache-buster the server ignores
//! - `POST /sd_extra_networks/refresh` - refresh every page, respond
//!   with the re-rendered panel HTML as a JSON array
//! - `POST /sd_extra_networks/save-preview` - save a gallery image as an
//!   asset preview, respond like refresh
//!
//! Requests are handled one at a time; page listing is a synchronous
//! filesystem scan, so a slow disk degrades responsiveness directly.

use crate::{config::cfg, log, pathsafe, registry, ui::UiController};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    io::Cursor,
    net::SocketAddr,
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Panel page HTML template (embedded at compile time)
const PANEL_TEMPLATE: &str = include_str!("embed/panel.html");

/// Element-id prefix for the served panel
const TABNAME: &str = "txt2img";

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the panel server.
///
/// Binds to the configured interface and port (with auto-retry on port
/// conflict), sets up Ctrl+C for graceful shutdown, then blocks in the
/// request loop.
pub fn serve_panels() -> Result<()> {
    let c = cfg();
    let interface: std::net::IpAddr = c.serve.interface.parse()?;
    let base_port = c.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let ui = UiController::from_registry(TABNAME);

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &ui) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < max_retries => {
                continue;
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    max_retries,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(mut request: Request, ui: &UiController) -> Result<()> {
    let url = request.url().to_owned();
    let (path, query) = url.split_once('?').unwrap_or((&url, ""));

    match (request.method().clone(), path) {
        (Method::Get, "/") => serve_html(request, panel_page(ui)?),
        (Method::Get, "/sd_extra_networks/thumb") => serve_thumb(request, query),
        (Method::Post, "/sd_extra_networks/refresh") => match ui.refresh() {
            Ok(panels) => serve_json(request, &panels),
            Err(e) => serve_error(request, 500, &format!("refresh failed: {e}")),
        },
        (Method::Post, "/sd_extra_networks/save-preview") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            match handle_save_preview(ui, &body) {
                Ok(panels) => serve_json(request, &panels),
                Err(e) => serve_error(request, 400, &format!("{e}")),
            }
        }
        _ => serve_not_found(request),
    }
}

/// Serve preview file bytes, gated by the path guard.
///
/// The guard failure is a client-facing rejection; the file is never
/// silently served.
fn serve_thumb(request: Request, query: &str) -> Result<()> {
    let Some(filename) = query_param(query, "filename") else {
        return serve_error(request, 400, "missing filename parameter");
    };

    let allowed_dirs = registry::allowed_preview_dirs();
    let path = match pathsafe::resolve(&filename, &allowed_dirs) {
        Ok(path) => path,
        Err(e) => {
            log!("serve"; "{e}");
            return serve_error(request, 403, &format!("{e}"));
        }
    };

    let content = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", image_content_type(&path)).unwrap())
        .with_header(Header::from_bytes("Accept-Ranges", "bytes").unwrap());

    request.respond(response)?;
    Ok(())
}

/// Save-preview request body.
#[derive(Deserialize)]
struct SavePreviewBody {
    index: i64,
    /// Gallery images as `data:image/...;base64,` URLs
    images: Vec<String>,
    filename: String,
}

fn handle_save_preview(ui: &UiController, body: &str) -> Result<Vec<String>> {
    let body: SavePreviewBody = serde_json::from_str(body).context("invalid request body")?;
    ui.save_preview(body.index, &body.images, &body.filename)
}

// ============================================================================
// Panel Page
// ============================================================================

/// Assemble the full panel page from every tab's rendered HTML.
fn panel_page(ui: &UiController) -> Result<String> {
    let tabs = ui.create_tabs()?;

    let tabs_nav: String = tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let selected = if i == 0 { " selected" } else { "" };
            format!(
                "<button class='{selected}' data-tab='tab{i}' onclick='selectTab(\"tab{i}\")'>{}</button>\n",
                crate::pages::html::escape(&tab.title)
            )
        })
        .collect();

    let tabs_content: String = tabs
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let selected = if i == 0 { " selected" } else { "" };
            format!(
                "<div class='tab-panel{selected}' data-tab='tab{i}'>\n{}\n</div>\n",
                tab.html
            )
        })
        .collect();

    Ok(PANEL_TEMPLATE
        .replace("{tabname}", ui.tabname())
        .replace("{tabs_nav}", &tabs_nav)
        .replace("{tabs_content}", &tabs_content))
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Serve HTML content.
fn serve_html(request: Request, content: String) -> Result<()> {
    let response = Response::from_string(content)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)?;
    Ok(())
}

/// Serve a JSON response.
fn serve_json(request: Request, value: &impl serde::Serialize) -> Result<()> {
    let response = Response::from_string(serde_json::to_string(value)?)
        .with_header(Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap());
    request.respond(response)?;
    Ok(())
}

/// Serve a plain-text error with the given status code.
fn serve_error(request: Request, status: u16, message: &str) -> Result<()> {
    let response = Response::from_string(message)
        .with_header(Header::from_bytes("Content-Type", "text/plain; charset=utf-8").unwrap())
        .with_status_code(StatusCode(status));
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract and URL-decode one query parameter.
fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == key)
            .then(|| urlencoding::decode(value).map(std::borrow::Cow::into_owned).ok())
            .flatten()
    })
}

/// Content type for a guard-approved preview file.
fn image_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
        Some(ext) if ext.eq_ignore_ascii_case("jpg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
