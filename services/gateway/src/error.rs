use serde::Serialize;
use thiserror::Error;
use types::errors::SessionError;

/// Central error type for the Gateway application
///
/// Every variant is reported only to the socket that sent the offending
/// frame; the connection stays open.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Join a room first")]
    NotInRoom,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AppError {
    /// Stable code sent in error frames
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotInRoom => "NOT_IN_ROOM",
            AppError::RateLimitExceeded(_) => "RATE_LIMIT_EXCEEDED",
            AppError::Session(err) => err.code(),
        }
    }

    pub fn to_frame(&self) -> ErrorFrame {
        let message = self.to_string();
        ErrorFrame {
            event: "error",
            code: self.code(),
            message,
        }
    }
}

/// `{"event":"error","code":..,"message":..}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrame {
    pub event: &'static str,
    pub code: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_keeps_its_code() {
        let err: AppError = SessionError::RoomNotJoinable {
            room_id: "4821".to_string(),
        }
        .into();
        let frame = err.to_frame();
        assert_eq!(frame.code, "ROOM_NOT_JOINABLE");
        assert!(frame.message.contains("4821"));
    }

    #[test]
    fn test_frame_wire_shape() {
        let json = serde_json::to_value(AppError::NotInRoom.to_frame()).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["code"], "NOT_IN_ROOM");
    }
}
