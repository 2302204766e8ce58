use crate::clock::Clock;
use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};

const MONTH_ABBREVS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// A record in a daily series, labelled with a display date such as "Mar 07".
pub trait DailyPoint {
    fn date_label(&self) -> &str;
}

/// Numbers arrive either as JSON numbers or as decimal strings ("12.50").
fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Null(()),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n,
        Raw::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Raw::Null(()) => 0.0,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DailyRevenue {
    pub date: String,
    #[serde(default, deserialize_with = "de_number")]
    pub milk_revenue: f64,
    #[serde(default, deserialize_with = "de_number")]
    pub feed_cost: f64,
}

impl DailyPoint for DailyRevenue {
    fn date_label(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DailyProduction {
    pub date: String,
    #[serde(default, deserialize_with = "de_number")]
    pub total_milk_yield: f64,
    #[serde(default, deserialize_with = "de_number")]
    pub total_feed_consumption: f64,
}

impl DailyPoint for DailyProduction {
    fn date_label(&self) -> &str {
        &self.date
    }
}

/// Zero-based month (Jan = 0) from the label's leading three letters.
pub fn parse_month_abbrev(label: &str) -> Option<u32> {
    let prefix = label.trim().get(..3)?.to_ascii_lowercase();
    MONTH_ABBREVS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32)
}

/// Trailing four-digit year, if the label carries one ("Mar 07 2025").
pub fn parse_label_year(label: &str) -> Option<i32> {
    label
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| tok.len() == 4 && tok.chars().all(|c| c.is_ascii_digit()))
        .last()
        .and_then(|tok| tok.parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter {
    pub month0: u32,
    pub year: i32,
    /// Exclude records whose label names a different year.
    /// Labels without a year are always kept.
    pub enforce_year: bool,
}

impl MonthFilter {
    pub fn current(clock: &dyn Clock, enforce_year: bool) -> Self {
        let today = clock.today();
        Self {
            month0: today.month0(),
            year: today.year(),
            enforce_year,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        if parse_month_abbrev(label) != Some(self.month0) {
            return false;
        }
        if self.enforce_year {
            if let Some(year) = parse_label_year(label) {
                return year == self.year;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub total: f64,
    pub count: usize,
    pub average: f64,
}

impl PeriodTotals {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let (total, count) = values.fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
        let average = if count == 0 { 0.0 } else { total / count as f64 };
        Self {
            total,
            count,
            average,
        }
    }
}

/// Sum and average one field over the records that fall in the filter's month.
pub fn period_totals<T, F>(records: &[T], filter: &MonthFilter, field: F) -> PeriodTotals
where
    T: DailyPoint,
    F: Fn(&T) -> f64,
{
    PeriodTotals::from_values(
        records
            .iter()
            .filter(|r| filter.matches(r.date_label()))
            .map(field),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub values: Vec<f64>,
}

/// Same-shape series for charting, one value per requested field, in input order.
pub fn chart_series<T: DailyPoint>(records: &[T], fields: &[fn(&T) -> f64]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|r| ChartPoint {
            label: r.date_label().to_string(),
            values: fields.iter().map(|f| f(r)).collect(),
        })
        .collect()
}
