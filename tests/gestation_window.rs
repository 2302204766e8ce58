//! Pregnancy and dry-period derivation from lactation and breeding history.

use chrono::NaiveDate;
use farm_dash::livestock::gestation::{current_lactation, dry_period_window, is_pregnant};
use farm_dash::livestock::{
    GestationStatus, LactationPeriod, ReproductiveEvent, ReproductiveEventType,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn lactation(calving: &str, expected: Option<&str>) -> LactationPeriod {
    LactationPeriod {
        calving_date: Some(calving.to_string()),
        expected_calving_date: expected.map(str::to_string),
        milking: true,
        ..Default::default()
    }
}

fn event(kind: ReproductiveEventType, date: &str) -> ReproductiveEvent {
    ReproductiveEvent {
        id: None,
        date: Some(date.to_string()),
        event_type: kind,
    }
}

#[test]
fn test_latest_calving_is_current_lactation() {
    let periods = vec![lactation("2024-01-01", None), lactation("2024-06-01", None)];
    let current = current_lactation(&periods).unwrap();
    assert_eq!(current.calving(), Some(day(2024, 6, 1)));

    let reversed: Vec<_> = periods.into_iter().rev().collect();
    assert_eq!(current_lactation(&reversed).unwrap().calving(), Some(day(2024, 6, 1)));
}

#[test]
fn test_breeding_after_calving_without_new_calving_is_pregnant() {
    let events = vec![event(ReproductiveEventType::ArtificialInsemination, "2024-07-01")];
    assert!(is_pregnant(day(2024, 6, 1), &events));
}

#[test]
fn test_dry_period_is_sixty_days_before_expected_calving() {
    assert_eq!(
        dry_period_window(day(2025, 3, 1)),
        (day(2024, 12, 31), day(2025, 3, 1))
    );
}

#[test]
fn test_full_status_derivation() {
    let periods = vec![
        lactation("2024-01-01", None),
        lactation("2024-06-01", Some("2025-03-01")),
    ];
    let events = vec![
        event(ReproductiveEventType::Calving, "2024-06-01"),
        event(ReproductiveEventType::ArtificialInsemination, "2024-07-01"),
    ];

    let status = GestationStatus::derive(&periods, &events, day(2025, 1, 15));
    assert_eq!(status.last_calving, Some(day(2024, 6, 1)));
    assert!(status.pregnant);
    assert_eq!(status.dry_period, Some((day(2024, 12, 31), day(2025, 3, 1))));
    assert!(status.in_dry_period);
    assert_eq!(status.summary_label(), "Dry");

    let earlier = GestationStatus::derive(&periods, &events, day(2024, 10, 1));
    assert!(!earlier.in_dry_period);
    assert_eq!(earlier.summary_label(), "Pregnant");
}

#[test]
fn test_unparsable_calving_dates_are_skipped() {
    let periods = vec![lactation("sometime in May", None), lactation("2023-05-10", None)];
    let status = GestationStatus::derive(&periods, &[], day(2023, 6, 9));
    assert_eq!(status.last_calving, Some(day(2023, 5, 10)));
    assert_eq!(status.days_in_milk, 30);
}

#[test]
fn test_only_unparsable_history_reads_as_none_yet() {
    let periods = vec![lactation("??", Some("2025-03-01"))];
    let status = GestationStatus::derive(&periods, &[], day(2025, 2, 1));
    assert!(!status.has_history());
    assert!(!status.in_dry_period);
    assert_eq!(status.summary_label(), "None yet");
}
