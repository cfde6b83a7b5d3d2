use crate::model::{Record, Settings};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Days counted by [`Summary::last_seven_days`], today included.
/// Records dated after today are never counted.
const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapStatus {
    NoCap,
    /// Amount left under the cap (may be zero).
    Remaining(f64),
    /// Amount spent beyond the cap.
    Over(f64),
}

/// Dashboard figures over the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_records: usize,
    pub total_amount: f64,
    /// Category with the most records; ties go to the one seen first.
    pub top_category: Option<String>,
    pub last_seven_days: f64,
    pub cap: CapStatus,
}

pub fn summarize(records: &[Record], settings: &Settings, today: NaiveDate) -> Summary {
    let total_amount: f64 = records.iter().map(|r| r.amount).sum();

    let last_seven_days = records
        .iter()
        .filter(|r| {
            r.calendar_date().is_some_and(|date| {
                let age = (today - date).num_days();
                (0..RECENT_WINDOW_DAYS).contains(&age)
            })
        })
        .map(|r| r.amount)
        .sum();

    let cap = match settings.cap() {
        None => CapStatus::NoCap,
        Some(cap) if total_amount <= cap => CapStatus::Remaining(cap - total_amount),
        Some(cap) => CapStatus::Over(total_amount - cap),
    };

    Summary {
        total_records: records.len(),
        total_amount,
        top_category: top_category(records),
        last_seven_days,
        cap,
    }
}

fn top_category(records: &[Record]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        let count = counts.entry(record.category.as_str()).or_insert(0);
        if *count == 0 {
            order.push(record.category.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for category in order {
        let count = counts[category];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordDraft;

    fn record(amount: f64, category: &str, date: &str) -> Record {
        Record::new(RecordDraft::new("Item", amount, category, date))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn empty_collection() {
        let summary = summarize(&[], &Settings::default(), today());
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.total_amount, 0.0);
        assert_eq!(summary.top_category, None);
        assert_eq!(summary.cap, CapStatus::NoCap);
    }

    #[test]
    fn totals_and_top_category() {
        let records = vec![
            record(10.0, "Food", "2024-03-01"),
            record(20.0, "Rent", "2024-03-02"),
            record(5.0, "Food", "2024-03-03"),
        ];
        let summary = summarize(&records, &Settings::default(), today());
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.total_amount, 35.0);
        assert_eq!(summary.top_category.as_deref(), Some("Food"));
    }

    #[test]
    fn top_category_tie_goes_to_first_seen() {
        let records = vec![
            record(1.0, "Travel", "2024-03-01"),
            record(1.0, "Food", "2024-03-02"),
        ];
        let summary = summarize(&records, &Settings::default(), today());
        assert_eq!(summary.top_category.as_deref(), Some("Travel"));
    }

    #[test]
    fn last_seven_days_window() {
        let records = vec![
            record(1.0, "Food", "2024-03-10"),
            record(2.0, "Food", "2024-03-04"),
            record(4.0, "Food", "2024-03-03"),
            record(8.0, "Food", "2024-03-11"),
        ];
        let summary = summarize(&records, &Settings::default(), today());
        assert_eq!(summary.last_seven_days, 3.0);
    }

    #[test]
    fn cap_status() {
        let records = vec![record(60.0, "Food", "2024-03-01")];
        let mut settings = Settings {
            spending_cap: 100.0,
            ..Default::default()
        };
        assert_eq!(
            summarize(&records, &settings, today()).cap,
            CapStatus::Remaining(40.0)
        );

        settings.spending_cap = 50.0;
        assert_eq!(
            summarize(&records, &settings, today()).cap,
            CapStatus::Over(10.0)
        );
    }
}
