use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt::Display;

/// Format a greeting for `name` stamped with `now`.
pub fn greeting<Tz>(name: &str, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "[{}] Hello, {name}!",
        now.to_rfc3339_opts(SecondsFormat::Micros, false)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn greeting_is_stamped() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(
            greeting("Ada", now),
            "[2024-03-09T14:05:00.000000+00:00] Hello, Ada!"
        );
    }
}
