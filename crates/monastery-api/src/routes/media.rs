//! Media upload and retrieval.
//!
//! Multipart uploads land in the configured upload directory under a
//! generated name (field, timestamp, counter, original extension). The
//! extension allow-list is the gate; anything else is rejected before a
//! byte is written. Filenames in serve/delete paths must be bare names,
//! so traversal never reaches the filesystem.

use std::path::Path as FsPath;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::pagination::DataEnvelope;
use crate::state::SharedState;

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 11] = [
    "jpeg", "jpg", "png", "gif", "webp", "mp4", "webm", "ogg", "pdf", "doc", "docx",
];

/// Most files accepted in one multi-upload request.
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Disambiguates files stored within the same millisecond.
static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub mimetype: String,
    pub url: String,
}

fn extension_of(filename: &str) -> Option<&str> {
    FsPath::new(filename).extension()?.to_str()
}

fn allowed(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename)
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpeg") | Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg") => "audio/ogg",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Generated storage name: `field-timestamp-seq.ext`.
fn stored_name(field: &str, original: &str) -> String {
    let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
    let timestamp = Utc::now().timestamp_millis();
    match extension_of(original) {
        Some(ext) => format!("{field}-{timestamp}-{seq}.{}", ext.to_lowercase()),
        None => format!("{field}-{timestamp}-{seq}"),
    }
}

/// Path parameters must be bare file names.
fn sanitize(filename: &str) -> Result<&str, ApiError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ApiError::Validation("Invalid file name".to_string()));
    }
    Ok(filename)
}

struct IncomingFile {
    field: String,
    original_name: String,
    bytes: Vec<u8>,
}

async fn collect_files(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> ApiResult<Vec<IncomingFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed upload: {e}")))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or("file").to_string();

        if !allowed(&original_name) {
            return Err(ApiError::Validation("Invalid file type".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Upload failed: {e}")))?;
        if bytes.len() > max_bytes {
            return Err(ApiError::Validation("File too large".to_string()));
        }

        files.push(IncomingFile {
            field: field_name,
            original_name,
            bytes: bytes.to_vec(),
        });
    }
    Ok(files)
}

async fn persist(state: &SharedState, file: IncomingFile) -> ApiResult<UploadedFile> {
    let filename = stored_name(&file.field, &file.original_name);
    tokio::fs::create_dir_all(&state.media.upload_dir)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("cannot create upload dir: {e}")))?;
    let path = state.media.upload_dir.join(&filename);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("cannot write upload: {e}")))?;

    tracing::info!(file = %filename, size = file.bytes.len(), "media stored");
    Ok(UploadedFile {
        url: format!("/api/v1/media/files/{filename}"),
        mimetype: content_type_for(&file.original_name).to_string(),
        size: file.bytes.len(),
        original_name: file.original_name,
        filename,
    })
}

pub async fn upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> ApiResult<Json<DataEnvelope<UploadedFile>>> {
    let mut files = collect_files(&mut multipart, state.media.max_upload_bytes).await?;
    let Some(file) = files.pop() else {
        return Err(ApiError::Validation("No file uploaded".to_string()));
    };

    let uploaded = persist(&state, file).await?;
    Ok(Json(DataEnvelope::with_message(
        uploaded,
        "File uploaded successfully",
    )))
}

pub async fn upload_multiple(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> ApiResult<Json<DataEnvelope<Vec<UploadedFile>>>> {
    let files = collect_files(&mut multipart, state.media.max_upload_bytes).await?;
    if files.is_empty() {
        return Err(ApiError::Validation("No files uploaded".to_string()));
    }
    if files.len() > MAX_FILES_PER_REQUEST {
        return Err(ApiError::Validation(format!(
            "At most {MAX_FILES_PER_REQUEST} files per request"
        )));
    }

    let mut uploaded = Vec::with_capacity(files.len());
    for file in files {
        uploaded.push(persist(&state, file).await?);
    }
    Ok(Json(DataEnvelope::with_message(
        uploaded,
        "Files uploaded successfully",
    )))
}

pub async fn serve_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let filename = sanitize(&filename)?;
    let path = state.media.upload_dir.join(filename);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("File not found".to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(filename))],
        bytes,
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub message: String,
}

pub async fn delete_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<Deleted>> {
    let filename = sanitize(&filename)?;
    let path = state.media.upload_dir.join(filename);

    tokio::fs::remove_file(&path)
        .await
        .map_err(|_| ApiError::NotFound("File not found".to_string()))?;

    tracing::info!(file = %filename, "media deleted");
    Ok(Json(Deleted {
        success: true,
        message: "File deleted successfully".to_string(),
    }))
}
