use recipe_book_application::Clock;

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    /// Seconds since the Unix epoch.
    fn now_timestamp_string(&self) -> String {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or_default();
        secs.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_numeric() {
        let now = SystemClock.now_timestamp_string();
        assert!(now.parse::<u64>().expect("numeric timestamp") > 0);
    }
}
