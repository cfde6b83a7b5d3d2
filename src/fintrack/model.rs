use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "USD";

/// A single financial transaction.
///
/// Field names serialize in camelCase so documents exported here can be
/// imported by (and from) other tools that use the same record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn new(draft: RecordDraft) -> Self {
        let now = Utc::now();
        Self {
            id: new_record_id(),
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
            created_at: now,
            updated_at: now,
        }
    }

    /// The calendar day this record falls on, if `date` can be read as one.
    ///
    /// Days past the end of a month roll into the next one ("2024-02-30" is
    /// March 1st), so every date the validator accepts has a position.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u64 = parts.next()?.parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(day - 1))
}

/// Generates an opaque record identifier: `rec_<millis>_<random>`.
pub fn new_record_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("rec_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}

/// User-entered fields of a record that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl RecordDraft {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }
}

/// Partial update of a record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Merges the patch into `record`. Timestamps are the caller's concern.
    pub fn apply(&self, record: &mut Record) {
        if let Some(description) = &self.description {
            record.description = description.trim().to_string();
        }
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(category) = &self.category {
            record.category = category.clone();
        }
        if let Some(date) = &self.date {
            record.date = date.clone();
        }
    }
}

impl From<RecordDraft> for RecordPatch {
    fn from(draft: RecordDraft) -> Self {
        Self {
            description: Some(draft.description),
            amount: Some(draft.amount),
            category: Some(draft.category),
            date: Some(draft.date),
        }
    }
}

/// Process-wide display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_currency")]
    pub base_currency: String,

    #[serde(default = "default_rate")]
    pub currency_rate1: f64,

    #[serde(default = "default_rate")]
    pub currency_rate2: f64,

    /// Zero means no cap.
    #[serde(default)]
    pub spending_cap: f64,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_rate() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: default_currency(),
            currency_rate1: default_rate(),
            currency_rate2: default_rate(),
            spending_cap: 0.0,
        }
    }
}

impl Settings {
    /// The spending cap, or `None` when no cap is set.
    pub fn cap(&self) -> Option<f64> {
        (self.spending_cap > 0.0).then_some(self.spending_cap)
    }

    /// Shallow-merges `patch`, replacing unusable values with their defaults.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(currency) = &patch.base_currency {
            let currency = currency.trim();
            self.base_currency = if currency.is_empty() {
                default_currency()
            } else {
                currency.to_string()
            };
        }
        if let Some(rate) = patch.currency_rate1 {
            self.currency_rate1 = positive_or_default(rate);
        }
        if let Some(rate) = patch.currency_rate2 {
            self.currency_rate2 = positive_or_default(rate);
        }
        if let Some(cap) = patch.spending_cap {
            self.spending_cap = if cap.is_finite() && cap >= 0.0 {
                cap
            } else {
                0.0
            };
        }
    }
}

fn positive_or_default(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        default_rate()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub base_currency: Option<String>,
    pub currency_rate1: Option<f64>,
    pub currency_rate2: Option<f64>,
    pub spending_cap: Option<f64>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.base_currency.is_none()
            && self.currency_rate1.is_none()
            && self.currency_rate2.is_none()
            && self.spending_cap.is_none()
    }
}
