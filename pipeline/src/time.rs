pub trait TimeSource {
    // Seconds since the Unix epoch
    fn unix_now(&self) -> i64;
}

#[derive(Clone)]
pub struct SystemTime {}

impl TimeSource for SystemTime {
    fn unix_now(&self) -> i64 {
        time::OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// Frozen clock for deterministic generation in tests.
#[derive(Clone)]
pub struct FixedTime(pub i64);

impl TimeSource for FixedTime {
    fn unix_now(&self) -> i64 {
        self.0
    }
}
