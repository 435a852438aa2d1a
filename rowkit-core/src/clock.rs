use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Zone in which audit timestamps are generated.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZone {
    #[default]
    Utc,
    Local,
}

impl TimeZone {
    /// Current wall clock time in this zone, truncated to microseconds so that
    /// it survives a round trip through a `DATETIME(6)` column.
    pub fn now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc();
        let now = match self {
            TimeZone::Utc => now,
            TimeZone::Local => match UtcOffset::current_local_offset() {
                Ok(offset) => now.to_offset(offset),
                Err(e) => {
                    log::warn!("Cannot determine the local offset, using UTC: {e}");
                    now
                }
            },
        };
        let now = PrimitiveDateTime::new(now.date(), now.time());
        now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap_or(now)
    }
}
