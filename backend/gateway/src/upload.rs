//! The upload endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderMap, Method, StatusCode},
};
use futures::StreamExt;
use tracing::{debug, info};

use exfil_sink_core::{IncomingUpload, SinkError, UploadStore, FILENAME_HEADER};

use crate::error::ApiError;

pub const SUCCESS_MESSAGE: &str = "File received successfully.";
pub const MISSING_LENGTH_MESSAGE: &str = "Missing Content-Length header.";

/// State shared by every request: where uploads go and what they are called
/// when the caller does not say.
#[derive(Clone)]
pub struct GatewayState {
    pub store: UploadStore,
    pub default_filename: Arc<str>,
}

impl GatewayState {
    pub fn new(store: UploadStore, default_filename: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            default_filename: default_filename.into(),
        }
    }
}

/// Handler for `POST <any path>`.
///
/// Reads exactly `Content-Length` bytes of the body and writes them to the
/// file named by the `filename` header. Bytes past the declared length are
/// left unread.
pub async fn receive_upload(
    State(state): State<GatewayState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, &'static str), ApiError> {
    if method != Method::POST {
        return Err(ApiError::UnsupportedMethod(method));
    }

    let mut upload = IncomingUpload::from_headers(
        headers.get(CONTENT_LENGTH).map(|v| v.as_bytes()),
        headers.get(FILENAME_HEADER).map(|v| v.as_bytes()),
        &state.default_filename,
    )?;

    let mut stream = body.into_data_stream();
    while !upload.is_complete() {
        match stream.next().await {
            Some(Ok(chunk)) => {
                upload.extend_body(&chunk);
            }
            // A broken stream is treated like a body that ended early.
            Some(Err(err)) => {
                debug!(error = %err, filename = %upload.filename(), "Upload body stream failed");
                break;
            }
            None => break,
        }
    }

    if let Err(err) = upload.ensure_complete() {
        if let SinkError::IncompleteBody { expected, received } = &err {
            tracing::warn!(expected, received, filename = %upload.filename(), "Upload body ended early");
        }
        return Err(err.into());
    }

    state.store.store(&upload).await?;

    info!(
        filename = %upload.filename(),
        bytes = upload.content_length(),
        "Received file: {}",
        upload.filename()
    );

    Ok((StatusCode::OK, SUCCESS_MESSAGE))
}
