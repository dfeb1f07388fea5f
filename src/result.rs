//! Uniform envelope returned by every public operation.

use crate::error::{AnalyzerError, ErrorType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_hint: Option<String>,
}

impl ErrorInfo {
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }
}

impl From<&AnalyzerError> for ErrorInfo {
    fn from(error: &AnalyzerError) -> Self {
        Self {
            message: error.to_string(),
            error_type: error.error_type(),
            details: None,
            recovery_hint: Some(error.recovery_hint()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub cache_hit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_persisted: Option<bool>,
}

/// Success/failure envelope. Branch on `success` before reading `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ResultMetadata::default(),
        }
    }

    pub fn failure(error: ErrorInfo) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            metadata: ResultMetadata::default(),
        }
    }

    pub fn from_error(error: &AnalyzerError) -> Self {
        Self::failure(ErrorInfo::from(error))
    }

    pub fn with_metadata(mut self, metadata: ResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Transforms the payload, keeping error and metadata.
    pub fn map_data<U, F: FnOnce(T) -> U>(self, f: F) -> OperationResult<U> {
        OperationResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            metadata: self.metadata,
        }
    }

    /// Converts into a plain `Result`, for callers that prefer `?`.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match (self.data, self.error) {
            (Some(data), None) if self.success => Ok(data),
            (_, Some(error)) => Err(error),
            _ => Err(ErrorInfo {
                message: "Operation returned no data".to_string(),
                error_type: ErrorType::ProcessingError,
                details: None,
                recovery_hint: None,
            }),
        }
    }
}
