//! Monthly totals over daily series.

use chrono::NaiveDate;
use farm_dash::clock::FixedClock;
use farm_dash::production::{
    period_totals, DailyProduction, DailyRevenue, MonthFilter, MonthlyOverview,
};

fn clock(y: i32, m: u32, d: u32) -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn production(date: &str, milk: f64, feed: f64) -> DailyProduction {
    DailyProduction {
        date: date.to_string(),
        total_milk_yield: milk,
        total_feed_consumption: feed,
    }
}

#[test]
fn test_no_matching_month_gives_zero_totals() {
    let records = vec![production("Jan 03", 120.0, 40.0), production("Feb 11", 90.0, 35.0)];
    let filter = MonthFilter::current(&clock(2025, 7, 15), true);
    let totals = period_totals(&records, &filter, |r| r.total_milk_yield);
    assert_eq!(totals.count, 0);
    assert_eq!(totals.total, 0.0);
    assert_eq!(totals.average, 0.0);
}

#[test]
fn test_empty_series_gives_zero_average() {
    let filter = MonthFilter::current(&clock(2025, 7, 15), false);
    let totals = period_totals(&Vec::<DailyProduction>::new(), &filter, |r| r.total_milk_yield);
    assert_eq!(totals.average, 0.0);
}

#[test]
fn test_average_times_count_matches_total() {
    let records: Vec<DailyProduction> = (1..=23)
        .map(|d| production(&format!("Mar {:02}", d), 100.0 + d as f64 * 0.37, d as f64 / 3.0))
        .chain([production("Apr 01", 999.0, 999.0)])
        .collect();
    let filter = MonthFilter::current(&clock(2025, 3, 24), true);

    for totals in [
        period_totals(&records, &filter, |r| r.total_milk_yield),
        period_totals(&records, &filter, |r| r.total_feed_consumption),
    ] {
        assert_eq!(totals.count, 23);
        assert!((totals.average * totals.count as f64 - totals.total).abs() < 1e-9);
    }
}

#[test]
fn test_year_labels_respect_enforcement_setting() {
    let records = vec![
        production("Mar 01 2024", 50.0, 0.0),
        production("Mar 01 2025", 70.0, 0.0),
        production("Mar 02", 30.0, 0.0),
    ];
    let now = clock(2025, 3, 10);

    let strict = period_totals(&records, &MonthFilter::current(&now, true), |r| r.total_milk_yield);
    assert_eq!(strict.total, 100.0);

    let loose = period_totals(&records, &MonthFilter::current(&now, false), |r| r.total_milk_yield);
    assert_eq!(loose.total, 150.0);
}

#[test]
fn test_monthly_overview_from_backend_json() {
    let revenue: Vec<DailyRevenue> = serde_json::from_str(
        r#"[
            {"date": "Oct 01", "milk_revenue": "820.00", "feed_cost": "310.50"},
            {"date": "Oct 02", "milk_revenue": 790, "feed_cost": 305.5},
            {"date": "Sep 30", "milk_revenue": 900, "feed_cost": 100}
        ]"#,
    )
    .unwrap();
    let production = vec![production("Oct 01", 410.0, 150.0), production("Oct 02", 395.0, 148.0)];
    let filter = MonthFilter::current(&clock(2025, 10, 2), true);

    let overview = MonthlyOverview::build(&production, &revenue, &filter);
    assert_eq!(overview.milk_yield.total, 805.0);
    assert_eq!(overview.milk_yield.average, 402.5);
    assert_eq!(overview.milk_revenue.count, 2);
    assert!((overview.net_margin() - (1610.0 - 616.0)).abs() < 1e-9);
}
