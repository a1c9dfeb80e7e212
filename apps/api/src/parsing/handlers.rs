use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::parsing::extractor::DocumentKind;
use crate::parsing::pipeline::{ExtractionProfile, PipelineVariant, RawDocument, ResultEnvelope};
use crate::state::AppState;

/// Multipart field carrying the uploaded résumé.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
pub struct ParseQuery {
    #[serde(default)]
    pub profile: ExtractionProfile,
}

/// POST /api/parse-resume
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    query: Result<Query<ParseQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<Json<ResultEnvelope>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let document = read_upload(multipart).await?;
    let envelope = state
        .pipeline
        .run(PipelineVariant::Extraction(query.profile), document)
        .await?;
    Ok(Json(envelope))
}

/// POST /api/resume-advice
pub async fn handle_resume_advice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResultEnvelope>, AppError> {
    let document = read_upload(multipart).await?;
    let envelope = state.pipeline.run(PipelineVariant::Advice, document).await?;
    Ok(Json(envelope))
}

/// Pulls the `file` part out of the form. The extension is checked before the
/// body is buffered so unsupported uploads are rejected without reading them.
async fn read_upload(mut multipart: Multipart) -> Result<RawDocument, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        DocumentKind::from_filename(&filename)?;

        let bytes = field.bytes().await?;
        return Ok(RawDocument { filename, bytes });
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}
