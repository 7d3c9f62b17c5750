use serde::{Deserialize, Serialize};

use crate::JobId;

/// Body of `POST /log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRequest {
    #[serde(rename = "jobID")]
    pub job_id: JobId,
    /// Trigger time of the run whose log is requested (epoch millis).
    #[serde(default)]
    pub log_date_tim: i64,
    /// First line to return, 1-based.
    #[serde(default = "first_line")]
    pub from_line_num: u32,
}

fn first_line() -> u32 {
    1
}

/// One page of job log lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResult {
    pub log_content: String,
    pub from_line_num: u32,
    /// Last line included in `log_content`; continue from `to_line_num + 1`.
    pub to_line_num: u32,
    /// `true` once the run finished and no more lines will appear.
    pub is_end: bool,
}

impl LogResult {
    /// Page with no lines at `from`.
    pub fn empty(from: u32, is_end: bool) -> Self {
        Self {
            log_content: String::new(),
            from_line_num: from,
            to_line_num: from.saturating_sub(1),
            is_end,
        }
    }
}
