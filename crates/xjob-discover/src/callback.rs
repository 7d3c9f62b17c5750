use async_trait::async_trait;
use tracing::{debug, warn};
use xjob_core::CompletionSink;
use xjob_model::HandleCallback;

use crate::client::SchedulerClient;

#[async_trait]
impl CompletionSink for SchedulerClient {
    async fn report(&self, callback: HandleCallback) {
        match self.callback(&callback).await {
            Ok(()) => debug!(
                job_id = callback.job_id,
                code = callback.handle_code,
                "completion reported"
            ),
            Err(e) => warn!(
                job_id = callback.job_id,
                code = callback.handle_code,
                "completion callback failed: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::DiscoverConfig;

    #[tokio::test]
    async fn report_posts_callback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/callback"))
            .and(body_json(json!({"jobID": 7, "handleCode": 200, "handleMsg": "success"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .expect(1)
            .mount(&server)
            .await;

        let client = SchedulerClient::new(DiscoverConfig {
            scheduler_addr: server.uri(),
            ..Default::default()
        })
        .unwrap();
        client.report(HandleCallback::success(7, "success")).await;
    }

    #[tokio::test]
    async fn report_swallows_transport_errors() {
        let client = SchedulerClient::new(DiscoverConfig {
            scheduler_addr: "http://127.0.0.1:1".into(),
            request_timeout: Duration::from_millis(300),
            ..Default::default()
        })
        .unwrap();

        // Must return normally.
        client.report(HandleCallback::fail(7, "job killed")).await;
    }
}
