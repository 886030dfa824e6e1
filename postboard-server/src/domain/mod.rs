pub mod error;
pub mod post;
pub mod session;
pub mod user;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the microsecond precision PostgreSQL stores.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
