use serde::{Deserialize, Serialize};

use crate::{FAIL_CODE, JobId, SUCCESS_CODE};

/// Completion report sent to the scheduler once per admitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleCallback {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    /// `200` on success, anything else on failure.
    pub handle_code: i32,
    pub handle_msg: String,
}

impl HandleCallback {
    pub fn success(job_id: JobId, msg: impl Into<String>) -> Self {
        Self {
            job_id,
            handle_code: SUCCESS_CODE,
            handle_msg: msg.into(),
        }
    }

    pub fn fail(job_id: JobId, msg: impl Into<String>) -> Self {
        Self {
            job_id,
            handle_code: FAIL_CODE,
            handle_msg: msg.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.handle_code == SUCCESS_CODE
    }
}
