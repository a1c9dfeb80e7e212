//! Résumé Parsing Pipeline: orchestrates one upload end to end.
//!
//! Flow: Received → Extracted → Preprocessed → ModelCalled → Parsed → Enveloped.
//! Any stage error ends the run in `Failed(kind)`; there are no back-edges and
//! no partial results.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, error, info, warn};

use crate::llm_client::ChatCompletion;
use crate::parsing::error::ParseError;
use crate::parsing::extractor::extract;
use crate::parsing::lenient_json::{parse_json_lenient, ParsedResult};
use crate::parsing::preprocess::preprocess;
use crate::parsing::prompts::{
    ADVICE_SYSTEM, ADVICE_USER_TEMPLATE, DETAILED_EDUCATION_FIELDS, DETAILED_PERSONAL_INFO_FIELDS,
    EXTRACTION_SYSTEM_TEMPLATE, EXTRACTION_USER_TEMPLATE, STANDARD_EDUCATION_FIELDS,
    STANDARD_PERSONAL_INFO_FIELDS,
};

const MAX_TOKENS: u32 = 4096;
const EXTRACTION_TEMPERATURE: f32 = 0.1;
const ADVICE_TEMPERATURE: f32 = 0.3;

// ────────────────────────────────────────────────────────────────────────────
// Variants and prompts
// ────────────────────────────────────────────────────────────────────────────

/// Which résumé-fields schema the extraction prompt asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionProfile {
    #[default]
    Standard,
    /// Adds gender, hometown and GPA.
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineVariant {
    Extraction(ExtractionProfile),
    Advice,
}

impl PipelineVariant {
    /// Key under which the model output sits in the envelope.
    pub fn envelope_key(&self) -> &'static str {
        match self {
            PipelineVariant::Extraction(_) => "parsed_data",
            PipelineVariant::Advice => "advice",
        }
    }

    pub fn prompt(&self) -> ParsePrompt {
        match self {
            PipelineVariant::Extraction(profile) => {
                let (personal_info, education) = match profile {
                    ExtractionProfile::Standard => {
                        (STANDARD_PERSONAL_INFO_FIELDS, STANDARD_EDUCATION_FIELDS)
                    }
                    ExtractionProfile::Detailed => {
                        (DETAILED_PERSONAL_INFO_FIELDS, DETAILED_EDUCATION_FIELDS)
                    }
                };
                ParsePrompt {
                    system: EXTRACTION_SYSTEM_TEMPLATE
                        .replace("{personal_info_fields}", personal_info)
                        .replace("{education_fields}", education),
                    user_template: EXTRACTION_USER_TEMPLATE,
                    temperature: EXTRACTION_TEMPERATURE,
                    max_tokens: MAX_TOKENS,
                }
            }
            PipelineVariant::Advice => ParsePrompt {
                system: ADVICE_SYSTEM.to_string(),
                user_template: ADVICE_USER_TEMPLATE,
                temperature: ADVICE_TEMPERATURE,
                max_tokens: MAX_TOKENS,
            },
        }
    }
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineVariant::Extraction(ExtractionProfile::Standard) => f.write_str("extraction"),
            PipelineVariant::Extraction(ExtractionProfile::Detailed) => {
                f.write_str("extraction/detailed")
            }
            PipelineVariant::Advice => f.write_str("advice"),
        }
    }
}

/// Immutable instruction set for one variant.
#[derive(Debug, Clone)]
pub struct ParsePrompt {
    pub system: String,
    user_template: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ParsePrompt {
    pub fn user_message(&self, resume_text: &str) -> String {
        self.user_template.replace("{resume_text}", resume_text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// Uploaded bytes and their declared filename. Lives for one request only.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub filename: String,
    pub bytes: Bytes,
}

/// `{status, source_file, <parsed_data|advice>}` returned on success.
#[derive(Debug, Clone)]
pub struct ResultEnvelope {
    pub source_file: String,
    pub variant: PipelineVariant,
    pub payload: ParsedResult,
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("status", "success")?;
        map.serialize_entry("source_file", &self.source_file)?;
        map.serialize_entry(self.variant.envelope_key(), &self.payload)?;
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Extracted,
    Preprocessed,
    ModelCalled,
    Parsed,
    Enveloped,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Stateless across calls; cloned into every request handler.
#[derive(Clone)]
pub struct ResumePipeline {
    llm: Arc<dyn ChatCompletion>,
    scratch_dir: PathBuf,
}

impl ResumePipeline {
    pub fn new(llm: Arc<dyn ChatCompletion>, scratch_dir: PathBuf) -> Self {
        Self { llm, scratch_dir }
    }

    pub async fn run(
        &self,
        variant: PipelineVariant,
        document: RawDocument,
    ) -> Result<ResultEnvelope, ParseError> {
        let source_file = display_name(&document.filename);
        info!(
            "Pipeline [{variant}] started for '{source_file}' ({} bytes)",
            document.bytes.len()
        );

        let mut stage = Stage::Received;
        match self.run_stages(variant, document, &mut stage).await {
            Ok(payload) => {
                advance(&mut stage, Stage::Enveloped);
                info!("Pipeline [{variant}] succeeded for '{source_file}'");
                Ok(ResultEnvelope {
                    source_file,
                    variant,
                    payload,
                })
            }
            Err(e) => {
                log_failure(variant, &source_file, stage, &e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        variant: PipelineVariant,
        document: RawDocument,
        stage: &mut Stage,
    ) -> Result<ParsedResult, ParseError> {
        let scratch_dir = self.scratch_dir.clone();
        let RawDocument { filename, bytes } = document;
        let text = tokio::task::spawn_blocking(move || extract(&bytes, &filename, &scratch_dir))
            .await
            .map_err(|e| ParseError::ExtractionFailed(format!("extraction aborted: {e}")))??;
        advance(stage, Stage::Extracted);
        debug!("Extracted {} characters", text.chars().count());

        let text = preprocess(&text);
        if text.is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        advance(stage, Stage::Preprocessed);

        let prompt = variant.prompt();
        let raw_output = self
            .llm
            .complete(
                &prompt.system,
                &prompt.user_message(&text),
                prompt.temperature,
                prompt.max_tokens,
            )
            .await?;
        advance(stage, Stage::ModelCalled);

        let parsed = parse_json_lenient(&raw_output)?;
        advance(stage, Stage::Parsed);
        Ok(parsed)
    }

    #[cfg(test)]
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("Pipeline stage {stage:?} → {next:?}");
    *stage = next;
}

fn log_failure(variant: PipelineVariant, source_file: &str, stage: Stage, e: &ParseError) {
    match e {
        ParseError::UpstreamMalformedResponse { body } => {
            error!("Pipeline [{variant}] failed after {stage:?} for '{source_file}': {e}; body: {body}")
        }
        ParseError::MalformedModelOutput { raw, .. } => {
            error!("Pipeline [{variant}] failed after {stage:?} for '{source_file}': {e}; raw output: {raw}")
        }
        _ if e.is_client_error() => {
            warn!("Pipeline [{variant}] rejected '{source_file}' after {stage:?}: {e}")
        }
        _ => error!("Pipeline [{variant}] failed after {stage:?} for '{source_file}': {e}"),
    }
}

/// Final path component of an uploaded filename.
fn display_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
