//! Project document and its JSON interchange form.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DEFAULT_FRAME_DURATION, ExportConfig, Frame, Grid, new_id};

/// Name given to imported documents that carry none.
pub const IMPORTED_PROJECT_NAME: &str = "Imported Project";

/// An animation project: frames plus export settings and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
    /// Last modification time, Unix milliseconds.
    pub updated_at: i64,
    pub frames: Vec<Frame>,
    pub export_config: ExportConfig,
    /// Duration in milliseconds given to newly added frames.
    pub playback_speed: u32,
}

impl Project {
    /// New project holding a single empty frame.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            frames: vec![Frame::empty(DEFAULT_FRAME_DURATION)],
            export_config: ExportConfig::default(),
            playback_speed: DEFAULT_FRAME_DURATION,
        }
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a project document.
    ///
    /// The document is rejected as a whole when the frame list is missing,
    /// empty or malformed; nothing partial is ever returned. Missing metadata
    /// is filled in: a fresh id, a default name, `createdAt` = now,
    /// default playback speed (also for a speed of zero) and default export
    /// settings. `updatedAt` is always set to now. Export limits are not
    /// checked here; see [`ExportConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let doc: Value = serde_json::from_str(json)?;

        let frames = match doc.get("frames") {
            None | Some(Value::Null) => return Err(ProjectError::MissingFrames),
            Some(Value::Array(frames)) => frames,
            Some(_) => return Err(ProjectError::FramesNotArray),
        };
        if frames.is_empty() {
            return Err(ProjectError::EmptyFrames);
        }

        let playback_speed = match doc.get("playbackSpeed") {
            Some(v) if !v.is_null() => u32::deserialize(v).map_err(ProjectError::Field)?,
            _ => 0,
        };
        // Zero means unset.
        let playback_speed = match playback_speed {
            0 => DEFAULT_FRAME_DURATION,
            speed => speed,
        };

        let frames = frames
            .iter()
            .enumerate()
            .map(|(index, value)| {
                FrameDocument::deserialize(value)
                    .map(|frame| frame.into_frame(playback_speed))
                    .map_err(|source| ProjectError::InvalidFrame { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let export_config = match doc.get("exportConfig") {
            Some(v) if !v.is_null() => ExportConfig::deserialize(v).map_err(ProjectError::Field)?,
            _ => ExportConfig::default(),
        };

        let now = now_millis();
        let text = |key: &str| doc.get(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            id: text("id").filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            name: text("name")
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| IMPORTED_PROJECT_NAME.to_string()),
            created_at: doc.get("createdAt").and_then(Value::as_i64).unwrap_or(now),
            updated_at: now,
            frames,
            export_config,
            playback_speed,
        })
    }

    /// Load a project document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the project document to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProjectError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Sum of all frame durations in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration as u64).sum()
    }
}

/// Lenient view of one imported frame.
#[derive(Deserialize)]
struct FrameDocument {
    #[serde(default)]
    id: Option<String>,
    grid: Grid,
    #[serde(default)]
    duration: Option<u32>,
}

impl FrameDocument {
    fn into_frame(self, default_duration: u32) -> Frame {
        Frame {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(new_id),
            grid: self.grid,
            duration: self.duration.unwrap_or(default_duration),
        }
    }
}

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Project import/export errors.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project document has no frame list")]
    MissingFrames,
    #[error("Project frame list is not an array")]
    FramesNotArray,
    #[error("Project frame list is empty")]
    EmptyFrames,
    #[error("Frame {index} is malformed: {source}")]
    InvalidFrame {
        index: usize,
        source: serde_json::Error,
    },
    #[error("Invalid project field: {0}")]
    Field(serde_json::Error),
    #[error("Project I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
