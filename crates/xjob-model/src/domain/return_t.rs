use serde::{Deserialize, Serialize};

/// Code reported for an accepted command or a successful job.
pub const SUCCESS_CODE: i32 = 200;
/// Code reported for a rejected command or a failed job.
pub const FAIL_CODE: i32 = 500;

/// Response envelope used in both directions of the protocol.
///
/// `code == 200` means success; anything else is a failure described by `msg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnT<T> {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T> ReturnT<T> {
    /// Generic success without payload.
    pub fn success() -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: None,
            content: None,
        }
    }

    /// Success carrying `content`.
    pub fn with_content(content: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: None,
            content: Some(content),
        }
    }

    /// Failure with a human-readable message.
    pub fn fail(msg: impl Into<String>) -> Self {
        Self {
            code: FAIL_CODE,
            msg: Some(msg.into()),
            content: None,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
