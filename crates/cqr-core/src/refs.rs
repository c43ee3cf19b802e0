//! Unique reference numbers: `YYYY-MM-DD-<serial>`
use chrono::NaiveDate;
use std::collections::HashSet;

/// Next reference for `today`, counting the refs already issued that day.
///
/// The serial is `count + 1`; if that key is already taken (a gap left by an
/// imported or renamed report) it is bumped until free.
pub fn next_unique_ref<'a, I>(existing: I, today: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = today.format("%Y-%m-%d").to_string();
    let todays: HashSet<&str> = existing
        .into_iter()
        .filter(|r| r.starts_with(&prefix))
        .collect();

    let mut serial = todays.len() + 1;
    loop {
        let candidate = format!("{}-{}", prefix, serial);
        if !todays.contains(candidate.as_str()) {
            return candidate;
        }
        serial += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    #[test]
    fn test_first_of_the_day() {
        assert_eq!(next_unique_ref(Vec::<&str>::new(), day()), "2024-08-01-1");
    }

    #[test]
    fn test_counts_same_day_only() {
        let existing = ["2024-08-01-1", "2024-07-31-1", "2024-08-01-2", "TK-77"];
        assert_eq!(next_unique_ref(existing, day()), "2024-08-01-3");
    }

    #[test]
    fn test_skips_taken_serial() {
        let existing = ["2024-08-01-2"];
        assert_eq!(next_unique_ref(existing, day()), "2024-08-01-3");
    }
}
