use thiserror::Error;

use crate::id_generator::ShapeId;

/// Errors that can occur during tool state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// Tool is busy and cannot transition
    #[error("Tool busy: {0}")]
    ToolBusy(String),
}

/// Errors produced when a mutation cannot be applied to the shape model
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Shape {0} not found")]
    ShapeNotFound(ShapeId),

    #[error("Shape {0} already exists")]
    DuplicateId(ShapeId),

    #[error("Shape {0} is not selected")]
    NotSelected(ShapeId),

    #[error("Shape {0} cannot be dragged with the current tool")]
    NotDraggable(ShapeId),

    #[error("Transform rejected: {width}x{height} is below the minimum size of {min}")]
    TransformRejected { width: f32, height: f32, min: f32 },
}

/// Result type for model mutations
pub type CommandResult = Result<(), CommandError>;

/// Errors raised while decoding or encoding bitmaps
#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors raised while loading or writing image files
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a supported image file")]
    UnsupportedType { path: String },

    #[error(transparent)]
    Bitmap(#[from] BitmapError),
}

/// Errors talking to the image edit service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid service URL '{0}'")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Edit request failed ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from service: {0}")]
    InvalidResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Request was cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }
}

/// Errors of an AI edit round trip, from submission guards to applying the result
#[derive(Debug, Error)]
pub enum AiEditError {
    #[error("Edit service is not available")]
    Unavailable,

    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("An edit is already in progress")]
    Busy,

    #[error("Failed to export canvas image: {0}")]
    Serialize(#[source] BitmapError),

    #[error(transparent)]
    Service(#[from] ApiError),

    #[error("Failed to load the edited image: {0}")]
    Decode(#[source] BitmapError),
}

/// Errors raised while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Errors that prevent the application shell from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_rejection_message() {
        let err = CommandError::TransformRejected {
            width: 2.0,
            height: 40.0,
            min: 5.0,
        };
        assert!(err.to_string().contains("below the minimum size of 5"));
    }

    #[test]
    fn test_status_error_carries_server_text() {
        let err = AiEditError::from(ApiError::Status {
            status: 500,
            message: "CUDA out of memory".to_owned(),
        });
        assert_eq!(err.to_string(), "Edit request failed (500): CUDA out of memory");
    }

    #[test]
    fn test_missing_shape_message() {
        let err = CommandError::ShapeNotFound(ShapeId::from("abc"));
        assert_eq!(err.to_string(), "Shape abc not found");
    }
}
