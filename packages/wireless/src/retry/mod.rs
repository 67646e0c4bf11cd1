mod engine;
mod machine;
mod types;

pub use engine::{ConnectionRetryPolicy, RetryOutcome};
pub use types::{RetryEvent, RetryNotice, RetryPhase};
