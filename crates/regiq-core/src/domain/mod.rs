mod alert;
mod timestamp;

pub use alert::{Alert, Urgency};
pub use timestamp::UtcDateTime;
