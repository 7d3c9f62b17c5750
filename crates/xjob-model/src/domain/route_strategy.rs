use serde::{Deserialize, Serialize};

/// Executor routing strategy of a job definition.
///
/// The scheduler evaluates it when picking an agent; the agent only forwards
/// it when creating job definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStrategy {
    #[default]
    First,
    Last,
    Round,
    Random,
    ConsistentHash,
    LeastFrequentlyUsed,
    LeastRecentlyUsed,
    Failover,
    Busyover,
    ShardingBroadcast,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_scheduler_names() {
        let cases = [
            (RouteStrategy::ConsistentHash, r#""CONSISTENT_HASH""#),
            (RouteStrategy::LeastRecentlyUsed, r#""LEAST_RECENTLY_USED""#),
            (RouteStrategy::Failover, r#""FAILOVER""#),
            (RouteStrategy::Busyover, r#""BUSYOVER""#),
            (RouteStrategy::ShardingBroadcast, r#""SHARDING_BROADCAST""#),
        ];
        for (strategy, tag) in cases {
            assert_eq!(serde_json::to_string(&strategy).unwrap(), tag);
        }
    }
}
