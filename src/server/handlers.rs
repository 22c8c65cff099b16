use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::{debug, error, info, warn};
use serde::Serialize;

use super::AppState;
use crate::pipeline::UploadedImage;
use crate::spreadsheet::XLSX_CONTENT_TYPE;
use crate::ImportError;

/// Multipart field carrying the label image
pub const IMAGE_FIELD: &str = "image";

/// Name offered to the browser for the produced workbook
pub const DOWNLOAD_FILENAME: &str = "output.xlsx";

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_json(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error_json(status, self.to_string())
    }
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_handler() -> &'static str {
    "OK"
}

/// `POST /upload`: label image in, workbook out
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let upload = match multipart {
        Ok(multipart) => match read_image_field(multipart).await {
            Ok(upload) => upload,
            Err(response) => return response,
        },
        Err(rejection) => {
            // Not a multipart body at all, so there is no file
            debug!("Upload without multipart body: {}", rejection);
            None
        }
    };

    let filename = upload
        .as_ref()
        .map(|u| u.filename.clone())
        .unwrap_or_default();

    match state.importer.import(upload.as_ref()).await {
        Ok(result) => {
            info!(
                "Converted '{}' into a {} byte workbook",
                filename,
                result.workbook.len()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME),
                    ),
                ],
                result.workbook,
            )
                .into_response()
        }
        Err(e) if e.is_client_error() => {
            warn!("Rejected upload '{}': {}", filename, e);
            e.into_response()
        }
        Err(e) => {
            error!("Failed to convert '{}': {}", filename, e);
            e.into_response()
        }
    }
}

/// Find the image field; other fields are skipped
async fn read_image_field(mut multipart: Multipart) -> Result<Option<UploadedImage>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Failed to read multipart: {}", e);
                return Err(error_json(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                ));
            }
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        // a part without a filename is a plain form value, not a file
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Skipping non-file '{}' field", IMAGE_FIELD);
            continue;
        };
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read file bytes: {}", e);
            error_json(e.status(), format!("Failed to read file: {}", e.body_text()))
        })?;

        debug!("Received '{}' ({} bytes)", filename, bytes.len());
        return Ok(Some(UploadedImage {
            filename,
            bytes: bytes.to_vec(),
        }));
    }
}
