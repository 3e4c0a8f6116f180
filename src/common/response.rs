use crate::error::Result;
use axum::{
    body::Bytes,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{self, HeaderName},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::Path;

/// A fully materialized HTTP response.
///
/// Controllers hand one of these to `send_response`. It is cheap to clone, so the
/// controller keeps the last response it sent while the exit signal carries another
/// handle to the same body out of the lifecycle.
///
/// # Example
/// ```
/// use allo_controller::common::response::{json_response, text_response};
///
/// let text = text_response("Default");
/// assert_eq!(text.body_text(), Some("Default"));
///
/// let json = json_response(&serde_json::json!({ "message": "4" }), true).unwrap();
/// assert!(json.body_text().unwrap().contains('\n'));
/// ```
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as UTF-8, if it is valid UTF-8.
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// A file loaded into memory, ready to be sent.
#[derive(Debug, Clone)]
pub struct NamedFile {
    name: String,
    content_type: &'static str,
    content: Bytes,
}

impl NamedFile {
    /// Read a file from disk. The content type is guessed from the extension.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_bytes(name, content))
    }

    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let name = name.into();
        Self {
            content_type: content_type_for(&name),
            name,
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

pub fn json_response<T: Serialize + ?Sized>(data: &T, pretty: bool) -> Result<HttpResponse> {
    let body = if pretty {
        serde_json::to_vec_pretty(data)?
    } else {
        serde_json::to_vec(data)?
    };
    Ok(HttpResponse::new(StatusCode::OK, body).with_header(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    ))
}

pub fn text_response(text: impl Into<String>) -> HttpResponse {
    HttpResponse::new(StatusCode::OK, text.into()).with_header(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    )
}

pub fn file_response(file: NamedFile) -> HttpResponse {
    HttpResponse::new(StatusCode::OK, file.content).with_header(
        header::CONTENT_TYPE,
        HeaderValue::from_static(file.content_type),
    )
}

/// Like [`file_response`], but asks the client to save the body as `download_name`.
pub fn download_response(file: NamedFile, download_name: &str) -> Result<HttpResponse> {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        download_name.replace('"', "")
    ))?;
    Ok(file_response(file).with_header(header::CONTENT_DISPOSITION, disposition))
}

/// `302 Found` pointing at `url`.
pub fn redirect_response(url: &str) -> Result<HttpResponse> {
    Ok(HttpResponse::new(StatusCode::FOUND, Bytes::new())
        .with_header(header::LOCATION, HeaderValue::from_str(url)?))
}
