// ----- standard library imports
use std::io::Write;
// ----- extra library imports
use arh_webapi::{echo as web_echo, people as web_people};
use axum::body::Bytes;
use axum::extract::{Json, Path, Query};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use flate2::{write::GzEncoder, Compression};
// ----- local imports
use crate::error::Result;

// ----- end imports

///--------------------------- Echo request
#[utoipa::path(
    post,
    path = "/v1/echo",
    request_body(content = String, description = "any payload, any method"),
    responses (
        (status = 200, description = "What the service received", body = web_echo::EchoReply, content_type = "application/json"),
    )
)]
pub async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<web_echo::EchoReply> {
    tracing::debug!("Received {} echo request, {} bytes", method, body.len());

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());
    let headers = headers
        .iter()
        .map(|(name, value)| web_echo::HeaderEntry {
            name: name.to_string(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        })
        .collect();
    Json(web_echo::EchoReply {
        method: method.to_string(),
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
        headers,
    })
}

///--------------------------- Canned response
#[utoipa::path(
    post,
    path = "/v1/raw",
    params(
        ("status" = Option<u16>, Query, description = "response status, 200 when missing"),
        ("body" = Option<String>, Query, description = "response body, sent verbatim"),
        ("content_type" = Option<String>, Query, description = "response content type"),
    ),
    responses (
        (status = 200, description = "The requested body with the requested status"),
        (status = 400, description = "Invalid status or content type"),
    )
)]
pub async fn raw(Query(params): Query<web_echo::RawParams>) -> Result<Response> {
    tracing::debug!("Received raw request: {:?}", params);

    let web_echo::RawParams {
        status,
        body,
        content_type,
    } = params;
    let status = StatusCode::from_u16(status.unwrap_or(200))?;
    let content_type = HeaderValue::from_str(content_type.as_deref().unwrap_or("text/plain"))?;
    let response = (
        status,
        [(header::CONTENT_TYPE, content_type)],
        body.unwrap_or_default(),
    );
    Ok(response.into_response())
}

///--------------------------- Look up person
#[utoipa::path(
    get,
    path = "/v1/people/{name}",
    params(
        ("name" = String, Path, description = "The person name")
    ),
    responses (
        (status = 200, description = "Successful response", body = web_people::Person, content_type = "application/json"),
    )
)]
pub async fn lookup_person(Path(name): Path<String>) -> Json<web_people::Person> {
    tracing::debug!("Received person lookup request for: {}", name);
    Json(web_people::Person { name })
}

///--------------------------- Compressed response
#[utoipa::path(
    get,
    path = "/v1/gzip",
    params(
        ("body" = String, Query, description = "payload to compress")
    ),
    responses (
        (status = 200, description = "Gzip encoded payload"),
    )
)]
pub async fn gzip(Query(params): Query<web_echo::GzipParams>) -> Result<Response> {
    tracing::debug!("Received gzip request, {} bytes", params.body.len());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(params.body.as_bytes())?;
    let compressed = encoder.finish()?;
    let response = (
        [
            (header::CONTENT_ENCODING, "gzip"),
            (header::CONTENT_TYPE, "application/json"),
        ],
        compressed,
    );
    Ok(response.into_response())
}

///--------------------------- Delayed response
#[utoipa::path(
    get,
    path = "/v1/slow",
    params(
        ("millis" = u64, Query, description = "delay before replying")
    ),
    responses (
        (status = 200, description = "Replies after the delay"),
    )
)]
pub async fn slow(Query(params): Query<web_echo::SlowParams>) -> &'static str {
    tracing::debug!("Received slow request, sleeping {} ms", params.millis);
    tokio::time::sleep(std::time::Duration::from_millis(params.millis)).await;
    "done"
}
