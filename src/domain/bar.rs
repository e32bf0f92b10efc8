//! Daily bar representation.

use chrono::NaiveDate;

/// One trading day's closing price. Series are ordered by date ascending;
/// non-trading days are simply absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Bar { date, close }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fields() {
        let bar = Bar::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 105.0);
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!((bar.close - 105.0).abs() < f64::EPSILON);
    }
}
