use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, StatusCode, Uri, header::CONTENT_TYPE},
    response::IntoResponse,
};
use tokio::fs::File;
use tracing::debug;

use crate::constants::UPLOAD_OK_BODY;
use crate::error::ApiError;
use crate::file_utils::{
    chunked_reader,
    decode_request_path,
    open_for_upload,
    stream_to_file,
    upload_path,
};
use crate::state::AppState;

type TextPlain = [(HeaderName, HeaderValue); 1];

fn text_plain() -> TextPlain {
    [(CONTENT_TYPE, HeaderValue::from_static("text/plain"))]
}

// PUT /*
pub async fn upload(
    State(ctx): State<AppState>,
    uri: Uri,
    body: Body,
) -> Result<(StatusCode, TextPlain, &'static str), ApiError> {
    let request_path = decode_request_path(uri.path())?;
    let path = upload_path(&ctx.uploads_root, &request_path);

    let mut file = open_for_upload(&path).await?;
    let size = stream_to_file(body.into_data_stream(), &mut file).await?;
    debug!("stored {size} bytes at {}", path.display());

    Ok((StatusCode::OK, text_plain(), UPLOAD_OK_BODY))
}

// GET /chunked/*
pub async fn chunked_download(
    Path(raw_path): Path<String>,
    State(ctx): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let path = upload_path(&ctx.uploads_root, &raw_path);

    let file = File::open(&path).await?;
    // Opening a directory succeeds on unix, reading it does not
    if !file.metadata().await?.is_file() {
        return Err(ApiError::NotFound);
    }

    let body = Body::from_stream(chunked_reader(file, ctx.chunk_size));

    Ok((StatusCode::OK, text_plain(), body))
}

// GET /get/500
pub async fn server_error() -> (StatusCode, TextPlain, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, text_plain(), "KO: 500")
}

// GET /get/400
pub async fn bad_request() -> (StatusCode, TextPlain, &'static str) {
    (StatusCode::BAD_REQUEST, text_plain(), "KO: 400")
}
