//! Daily, weekly and monthly grouping for list views.

use crate::model::record::LedgerRecord;
use chrono::{DateTime, Datelike, Days, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Bucket size for `group_by_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Keyed `yyyy-MM-dd`.
    Daily,
    /// Keyed by the Monday starting the ISO week, `yyyy-MM-dd`.
    Weekly,
    /// Keyed `yyyy-MM`.
    Monthly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPeriod(pub String);

impl Display for UnknownPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown period `{}`; expected daily|weekly|monthly",
            self.0
        )
    }
}

impl Error for UnknownPeriod {}

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(UnknownPeriod(value.to_string())),
        }
    }
}

/// Records sharing one period key.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodGroup<'a, R> {
    pub key: String,
    pub total: f64,
    /// In collection order.
    pub records: Vec<&'a R>,
}

/// Bucket key of `date` for `period`.
pub fn period_key(date: DateTime<Utc>, period: Period) -> String {
    let day = date.date_naive();
    match period {
        Period::Daily => day.format("%Y-%m-%d").to_string(),
        Period::Weekly => {
            let offset = u64::from(day.weekday().num_days_from_monday());
            day.checked_sub_days(Days::new(offset))
                .unwrap_or(day)
                .format("%Y-%m-%d")
                .to_string()
        }
        Period::Monthly => day.format("%Y-%m").to_string(),
    }
}

/// Groups records by period key, most recent group first.
pub fn group_by_period<R: LedgerRecord>(records: &[R], period: Period) -> Vec<PeriodGroup<'_, R>> {
    let mut groups: BTreeMap<String, PeriodGroup<'_, R>> = BTreeMap::new();
    for record in records {
        let key = period_key(record.date(), period);
        let group = groups
            .entry(key.clone())
            .or_insert_with(|| PeriodGroup {
                key,
                total: 0.0,
                records: Vec::new(),
            });
        group.total += record.amount();
        group.records.push(record);
    }
    groups.into_values().rev().collect()
}
