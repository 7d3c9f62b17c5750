mod return_t;
pub use return_t::{FAIL_CODE, ReturnT, SUCCESS_CODE};

mod block_strategy;
pub use block_strategy::BlockStrategy;

mod route_strategy;
pub use route_strategy::RouteStrategy;

mod registry;
pub use registry::{REGISTRY_GROUP_EXECUTOR, RegistryParam};

mod callback;
pub use callback::HandleCallback;

/// Scheduler-assigned job identifier.
///
/// Unique among concurrently running jobs on one agent; the same identifier
/// is reused by every trigger of the same job definition.
pub type JobId = i64;

/// Header carrying the shared access token on every scheduler call.
pub const ACCESS_TOKEN_HEADER: &str = "XXL-JOB-ACCESS-TOKEN";
