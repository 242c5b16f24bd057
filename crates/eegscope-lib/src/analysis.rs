//! Payloads exchanged with the remote analysis service. Only their shape lives
//! here; sending them is up to the caller.

use crate::signal::Sample;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// Re-serialize the selected channels as CSV: `timestamp` first, then the
/// channels in selection order. Missing values become empty fields.
pub fn processed_csv<S: AsRef<str>>(samples: &[Sample], selected: &[S]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    let mut header = vec!["timestamp".to_string()];
    header.extend(selected.iter().map(|name| name.as_ref().to_string()));
    writer.write_record(&header)?;
    for sample in samples {
        let mut row = vec![sample.timestamp.to_string()];
        row.extend(selected.iter().map(|name| {
            sample
                .value(name.as_ref())
                .map(|value| value.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("flushing processed csv: {}", err))?;
    String::from_utf8(bytes).context("processed csv is not UTF-8")
}

/// JSON body for analysing a preset recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetAnalysisRequest {
    pub filename: String,
    pub preset_file: String,
    pub selected_channels: Vec<String>,
}

impl PresetAnalysisRequest {
    /// Path the JSON body is posted to.
    pub const ENDPOINT: &'static str = "/analyze-eeg";

    pub fn new(preset_file: &str, selected_channels: &[String]) -> Self {
        Self {
            filename: preset_file.to_string(),
            preset_file: preset_file.to_string(),
            selected_channels: selected_channels.to_vec(),
        }
    }
}

/// One part of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub field: &'static str,
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Multipart upload of the original file plus the processed CSV.
#[derive(Debug, Clone)]
pub struct UploadAnalysisRequest {
    pub file_name: String,
    pub content_type: String,
    pub original: Vec<u8>,
    pub processed_csv: String,
}

impl UploadAnalysisRequest {
    /// Path the multipart form is posted to.
    pub const ENDPOINT: &'static str = "/upload-and-analyze-eeg";

    pub fn new<S: AsRef<str>>(
        file_name: &str,
        content_type: &str,
        original: Vec<u8>,
        samples: &[Sample],
        selected: &[S],
    ) -> Result<Self> {
        Ok(Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            original,
            processed_csv: processed_csv(samples, selected)?,
        })
    }

    pub fn parts(&self) -> Vec<FormPart> {
        vec![
            FormPart {
                field: "file",
                file_name: self.file_name.clone(),
                content_type: self.content_type.clone(),
                body: self.original.clone(),
            },
            FormPart {
                field: "processed_file",
                file_name: self.file_name.clone(),
                content_type: "text/csv".into(),
                body: self.processed_csv.clone().into_bytes(),
            },
        ]
    }
}

/// Response body: artifact name to URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl AnalysisResponse {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing analysis response")
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.files
            .iter()
            .map(|(name, url)| Artifact {
                name: name.clone(),
                url: url.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Image,
    Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub url: String,
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        if self.name.ends_with(".pdf") {
            ArtifactKind::Document
        } else {
            ArtifactKind::Image
        }
    }

    /// URL the report page should load: Google Drive share links become direct
    /// view links, anything that is not http(s) becomes the placeholder.
    pub fn resolved_url(&self) -> String {
        if self.url.contains("drive.google.com") {
            if let Some(id) = drive_file_id(&self.url) {
                return format!("https://drive.google.com/uc?export=view&id={}", id);
            }
        }
        if self.url.starts_with("http") {
            self.url.clone()
        } else {
            PLACEHOLDER_IMAGE.to_string()
        }
    }
}

fn drive_file_id(url: &str) -> Option<&str> {
    url.match_indices("id=").find_map(|(pos, _)| {
        let rest = &url[pos + 3..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        (len > 0).then(|| &rest[..len])
    })
}
