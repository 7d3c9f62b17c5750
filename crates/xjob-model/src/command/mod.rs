mod run;
pub use run::RunRequest;

mod kill;
pub use kill::KillRequest;

mod log;
pub use log::{LogRequest, LogResult};
