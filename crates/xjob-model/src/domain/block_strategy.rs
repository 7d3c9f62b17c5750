use std::fmt;

use serde::{Deserialize, Serialize};

/// Policy for a trigger that arrives while the same job is still running.
///
/// Only [`BlockStrategy::CoverEarly`] is acted upon by the agent: it preempts
/// the running execution. Every other tag, including ones this crate does not
/// know, makes the agent reject the new trigger and leaves the reaction to the
/// scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockStrategy {
    /// Run triggers of one job one after another.
    #[default]
    SerialExecution,
    /// Drop triggers that arrive while the job runs.
    DiscardLater,
    /// Cancel the running execution and start the new one.
    CoverEarly,
    /// Any tag not listed above, kept verbatim.
    Other(String),
}

impl BlockStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            BlockStrategy::SerialExecution => "SERIAL_EXECUTION",
            BlockStrategy::DiscardLater => "DISCARD_LATER",
            BlockStrategy::CoverEarly => "COVER_EARLY",
            BlockStrategy::Other(tag) => tag,
        }
    }

    /// Returns `true` if a new trigger may replace a running one.
    #[inline]
    pub fn preempts(&self) -> bool {
        matches!(self, BlockStrategy::CoverEarly)
    }
}

impl From<String> for BlockStrategy {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "SERIAL_EXECUTION" => BlockStrategy::SerialExecution,
            "DISCARD_LATER" => BlockStrategy::DiscardLater,
            "COVER_EARLY" => BlockStrategy::CoverEarly,
            _ => BlockStrategy::Other(tag),
        }
    }
}

impl From<BlockStrategy> for String {
    fn from(strategy: BlockStrategy) -> Self {
        match strategy {
            BlockStrategy::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_parse() {
        let s: BlockStrategy = serde_json::from_str(r#""COVER_EARLY""#).unwrap();
        assert_eq!(s, BlockStrategy::CoverEarly);
        assert!(s.preempts());

        let s: BlockStrategy = serde_json::from_str(r#""DISCARD_LATER""#).unwrap();
        assert_eq!(s, BlockStrategy::DiscardLater);
        assert!(!s.preempts());
    }

    #[test]
    fn unknown_tag_is_kept_and_does_not_preempt() {
        let s: BlockStrategy = serde_json::from_str(r#""QUEUE_FOREVER""#).unwrap();
        assert_eq!(s, BlockStrategy::Other("QUEUE_FOREVER".into()));
        assert!(!s.preempts());
        assert_eq!(serde_json::to_string(&s).unwrap(), r#""QUEUE_FOREVER""#);
    }

    #[test]
    fn serializes_as_tag() {
        let json = serde_json::to_string(&BlockStrategy::SerialExecution).unwrap();
        assert_eq!(json, r#""SERIAL_EXECUTION""#);
    }
}
