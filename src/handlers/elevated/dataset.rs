use axum::{
    extract::{multipart::MultipartError, Multipart},
    Extension,
};

use crate::dataset::{DatasetError, DatasetSummary};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

/// Multipart field carrying the workbook
const UPLOAD_FIELD: &str = "file";

/// GET /api/dataset - Load diagnostics for the live booking dataset
pub async fn dataset_get(Extension(state): Extension<AppState>) -> ApiResult<DatasetSummary> {
    let dataset = state.datasets.snapshot().await?;
    Ok(ApiResponse::success(dataset.summary()))
}

/// POST /api/upload - Replace the booking workbook
///
/// The upload must be an `.xlsx` with every required column. A rejected upload
/// leaves both the file on disk and the in-memory dataset untouched.
pub async fn upload_post(
    Extension(state): Extension<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> ApiResult<DatasetSummary> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.to_ascii_lowercase().ends_with(".xlsx") {
            return Err(ApiError::field_error(UPLOAD_FIELD, "Invalid file type, expected an .xlsx workbook"));
        }
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::field_error(UPLOAD_FIELD, "Missing multipart field 'file'"));
    };

    let _guard = state.write_lock.lock().await;
    let dataset = state
        .datasets
        .replace(bytes.to_vec())
        .await
        .map_err(upload_error)?;

    tracing::info!(
        "Dataset replaced by '{}' from upload '{}' ({} rows)",
        user.email,
        file_name,
        dataset.records.len()
    );
    Ok(ApiResponse::success(dataset.summary()))
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::bad_request(e.body_text())
}

fn upload_error(err: DatasetError) -> ApiError {
    if !err.is_invalid_input() {
        return err.into();
    }

    tracing::warn!("Rejected upload: {}", err);
    match err {
        DatasetError::MissingColumn(column) => {
            ApiError::field_error(UPLOAD_FIELD, format!("Workbook is missing required column '{}'", column))
        }
        _ => ApiError::field_error(UPLOAD_FIELD, "File is not a readable .xlsx workbook"),
    }
}
