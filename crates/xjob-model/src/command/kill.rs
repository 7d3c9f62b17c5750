use serde::{Deserialize, Serialize};

use crate::JobId;

/// Body of `POST /kill`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillRequest {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
}
