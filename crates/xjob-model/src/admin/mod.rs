mod add_job;
pub use add_job::{AddJobInfo, MisfireStrategy};

mod cron;
pub use cron::cron_at;
