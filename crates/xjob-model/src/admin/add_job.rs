use serde::{Deserialize, Serialize};

use crate::{BlockStrategy, RouteStrategy};

/// What the scheduler does with triggers missed while it was down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MisfireStrategy {
    #[default]
    DoNothing,
    FireOnceNow,
}

/// Job definition forwarded to the scheduler's `add` endpoint.
///
/// The agent never interprets these fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddJobInfo {
    #[serde(rename = "jobGroup")]
    pub job_group_id: i64,
    pub job_desc: String,
    pub author: String,
    #[serde(default)]
    pub alarm_email: String,

    pub schedule_type: String,
    pub schedule_conf: String,
    #[serde(rename = "cronGen_display")]
    pub cron_gen_display: String,
    pub job_cron: String,
    #[serde(default)]
    pub misfire_strategy: MisfireStrategy,

    pub executor_route_strategy: RouteStrategy,
    pub executor_handler: String,
    #[serde(rename = "executorParam")]
    pub executor_params: String,
    pub executor_block_strategy: BlockStrategy,
    /// Seconds; effective when `> 0`.
    pub executor_timeout: i64,
    pub executor_fail_retry_count: i64,
    #[serde(default)]
    pub child_job_id: String,

    pub glue_type: String,
    #[serde(default)]
    pub glue_source: String,
    #[serde(default)]
    pub glue_remark: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_scheduler_field_names() {
        let info = AddJobInfo {
            job_group_id: 45,
            job_desc: "nightly export".into(),
            executor_route_strategy: RouteStrategy::First,
            executor_handler: "export".into(),
            executor_params: r#"{"id":99}"#.into(),
            executor_block_strategy: BlockStrategy::SerialExecution,
            glue_type: "BEAN".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["jobGroup"], 45);
        assert_eq!(json["executorParam"], r#"{"id":99}"#);
        assert_eq!(json["executorRouteStrategy"], "FIRST");
        assert_eq!(json["executorBlockStrategy"], "SERIAL_EXECUTION");
        assert_eq!(json["misfireStrategy"], "DO_NOTHING");
        assert!(json.get("cronGen_display").is_some());
    }
}
