use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const WEEKDAYS: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

/// A month shown in the booking calendar. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        match month {
            1..=12 => Some(Self { year, month }),
            _ => None,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Month is kept in range by the constructors
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    /// Weekday of the first day, Sunday = 0
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn previous(&self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            m => Self {
                year: self.year,
                month: m - 1,
            },
        }
    }

    pub fn next(&self) -> Self {
        match self.month {
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            m => Self {
                year: self.year,
                month: m + 1,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(|d| self.day(d))
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `YYYY-MM-DD`, the format the backend expects for days
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `HH:mm`
pub fn format_time(datetime: NaiveDateTime) -> String {
    datetime.format("%H:%M").to_string()
}

/// `Lunes, 3 de Marzo de 2025`
pub fn format_long_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
    format!(
        "{}, {} de {} de {}",
        weekday,
        date.day(),
        month_name(date.month()),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(CalendarMonth::new(2025, 1).unwrap().days_in_month(), 31);
        assert_eq!(CalendarMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2025, 12).unwrap().days_in_month(), 31);
        assert_eq!(CalendarMonth::new(2025, 12).unwrap().days().count(), 31);
    }

    #[test]
    fn test_first_weekday() {
        // 1 March 2025 was a Saturday
        assert_eq!(CalendarMonth::new(2025, 3).unwrap().first_weekday(), 6);
        // 1 June 2025 was a Sunday
        assert_eq!(CalendarMonth::new(2025, 6).unwrap().first_weekday(), 0);
    }

    #[test]
    fn test_rollover() {
        let jan = CalendarMonth::new(2025, 1).unwrap();
        assert_eq!(jan.previous(), CalendarMonth::new(2024, 12).unwrap());
        assert_eq!(jan.previous().next(), jan);
        let dec = CalendarMonth::new(2025, 12).unwrap();
        assert_eq!(dec.next(), CalendarMonth::new(2026, 1).unwrap());
    }

    #[test]
    fn test_invalid_month() {
        assert!(CalendarMonth::new(2025, 0).is_none());
        assert!(CalendarMonth::new(2025, 13).is_none());
        assert_eq!(month_name(0), "");
    }

    #[test]
    fn test_formatting() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(format_long_date(date), "Lunes, 3 de Marzo de 2025");
        assert_eq!(format_date(date), "2025-03-03");
        assert_eq!(format_time(date.and_hms_opt(9, 5, 0).unwrap()), "09:05");
        assert_eq!(CalendarMonth::of(date).name(), "Marzo");
    }
}
