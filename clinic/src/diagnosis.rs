use chrono::{Duration, NaiveDateTime};

/// Grace period after the appointment ends
pub fn grace_period() -> Duration {
    Duration::hours(1) + Duration::minutes(5)
}

/// A diagnosis may be written from the start of the appointment until the
/// grace period after its end, both bounds included.
pub fn can_create_diagnosis(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> bool {
    now >= start && now <= end + grace_period()
}

/// Same check for appointments whose dates failed to parse.
pub fn can_create_diagnosis_opt(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => can_create_diagnosis(start, end, now),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_window() {
        let start = at(10, 0);
        let end = at(10, 15);
        assert!(!can_create_diagnosis(start, end, at(9, 59)));
        assert!(can_create_diagnosis(start, end, at(10, 0)));
        assert!(can_create_diagnosis(start, end, at(10, 30)));
        assert!(can_create_diagnosis(start, end, at(11, 20)));
        assert!(!can_create_diagnosis(start, end, at(11, 21)));
    }

    #[test]
    fn test_missing_dates() {
        assert!(!can_create_diagnosis_opt(None, Some(at(10, 15)), at(10, 5)));
        assert!(can_create_diagnosis_opt(Some(at(10, 0)), Some(at(10, 15)), at(10, 5)));
    }
}
