// HTTP response utilities for JSON and HTML bodies
use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use serde::Serialize;

/// Serialize a value to JSON and wrap it in a response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Result<Response<Body>, StatusCode> {
    let bytes = serde_json::to_vec(data).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    build_response(status, "application/json", bytes)
}

pub fn html_response(status: StatusCode, page: String) -> Result<Response<Body>, StatusCode> {
    build_response(status, "text/html; charset=utf-8", page.into_bytes())
}

fn build_response(
    status: StatusCode,
    content_type: &'static str,
    bytes: Vec<u8>,
) -> Result<Response<Body>, StatusCode> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
        .header(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()))
        .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
        .body(Body::from(bytes))
        .map_err(|e| {
            tracing::error!("Response build error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
