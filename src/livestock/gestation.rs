use super::types::{Category, LactationPeriod, ReproductiveEvent, ReproductiveEventType};
use chrono::{Duration, NaiveDate};

/// Length of the dry-off window before the expected calving date.
pub const DRY_PERIOD_DAYS: i64 = 60;

const EARLY_LACTATION_MAX_DIM: i64 = 100;
const MID_LACTATION_MAX_DIM: i64 = 200;

/// The lactation with the most recent calving date. Ties keep the first one listed.
pub fn current_lactation(periods: &[LactationPeriod]) -> Option<&LactationPeriod> {
    periods
        .iter()
        .filter_map(|p| p.calving().map(|d| (d, p)))
        .fold(None, |best: Option<(NaiveDate, &LactationPeriod)>, (d, p)| match best {
            Some((bd, _)) if bd >= d => best,
            _ => Some((d, p)),
        })
        .map(|(_, p)| p)
}

/// Pregnant when a breeding event follows the last calving and no calving follows that breeding.
pub fn is_pregnant(last_calving: NaiveDate, events: &[ReproductiveEvent]) -> bool {
    let latest_breeding = events
        .iter()
        .filter(|e| e.event_type.is_breeding())
        .filter_map(|e| e.on())
        .filter(|d| *d > last_calving)
        .max();

    let Some(bred_on) = latest_breeding else {
        return false;
    };

    !events
        .iter()
        .filter(|e| e.event_type == ReproductiveEventType::Calving)
        .filter_map(|e| e.on())
        .any(|d| d > bred_on)
}

/// Inclusive `[expected - 60 days, expected]`.
pub fn dry_period_window(expected_calving: NaiveDate) -> (NaiveDate, NaiveDate) {
    (expected_calving - Duration::days(DRY_PERIOD_DAYS), expected_calving)
}

pub fn days_in_milk(calving: NaiveDate, today: NaiveDate) -> i64 {
    (today - calving).num_days().max(0)
}

pub fn lactation_stage(dim: i64) -> Category {
    if dim <= EARLY_LACTATION_MAX_DIM {
        Category::EarlyLactating
    } else if dim <= MID_LACTATION_MAX_DIM {
        Category::MidLactating
    } else {
        Category::LateLactating
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestationStatus {
    pub last_calving: Option<NaiveDate>,
    pub days_in_milk: i64,
    pub milking: bool,
    pub pregnant: bool,
    pub expected_calving: Option<NaiveDate>,
    pub dry_period: Option<(NaiveDate, NaiveDate)>,
    pub in_dry_period: bool,
}

impl GestationStatus {
    pub fn derive(
        periods: &[LactationPeriod],
        events: &[ReproductiveEvent],
        today: NaiveDate,
    ) -> Self {
        let Some(current) = current_lactation(periods) else {
            return Self::default();
        };
        // current_lactation only yields entries with a parsable calving date
        let Some(calved) = current.calving() else {
            return Self::default();
        };

        let expected_calving = current.expected_calving();
        let dry_period = expected_calving.map(dry_period_window);
        let in_dry_period = dry_period.is_some_and(|(start, end)| start <= today && today <= end);

        Self {
            last_calving: Some(calved),
            days_in_milk: days_in_milk(calved, today),
            milking: current.milking,
            pregnant: is_pregnant(calved, events),
            expected_calving,
            dry_period,
            in_dry_period,
        }
    }

    pub fn has_history(&self) -> bool {
        self.last_calving.is_some()
    }

    /// Short label for tables: "None yet", "Dry", "Pregnant", "DIM 123".
    pub fn summary_label(&self) -> String {
        if !self.has_history() {
            return "None yet".to_string();
        }
        if self.in_dry_period {
            return "Dry".to_string();
        }
        if self.pregnant {
            return "Pregnant".to_string();
        }
        format!("DIM {}", self.days_in_milk)
    }

    pub fn stage(&self) -> Option<Category> {
        (self.has_history() && self.milking).then(|| lactation_stage(self.days_in_milk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_same_calving_date_keeps_first_entry() {
        let mut first = lactation("2024-06-01", None);
        first.id = Some(1);
        let mut second = lactation("2024-06-01", None);
        second.id = Some(2);
        let older = lactation("2023-01-01", None);
        let periods = vec![older, first, second];
        assert_eq!(current_lactation(&periods).and_then(|p| p.id), Some(1));
    }

    #[test]
    fn test_breeding_before_calving_is_not_pregnancy() {
        let events = vec![event(ReproductiveEventType::ArtificialInsemination, "2024-05-01")];
        assert!(!is_pregnant(day(2024, 6, 1), &events));
    }

    #[test]
    fn test_calving_after_breeding_clears_pregnancy() {
        let events = vec![
            event(ReproductiveEventType::NaturalService, "2024-07-01"),
            event(ReproductiveEventType::Calving, "2025-04-10"),
        ];
        assert!(!is_pregnant(day(2024, 6, 1), &events));
    }

    #[test]
    fn test_rebreeding_after_calving_is_pregnant() {
        let events = vec![
            event(ReproductiveEventType::ArtificialInsemination, "2024-07-01"),
            event(ReproductiveEventType::Calving, "2024-07-20"),
            event(ReproductiveEventType::ArtificialInsemination, "2024-09-01"),
        ];
        assert!(is_pregnant(day(2024, 6, 1), &events));
    }

    #[test]
    fn test_no_history_is_none_yet() {
        let status = GestationStatus::derive(&[], &[], day(2024, 6, 1));
        assert_eq!(status, GestationStatus::default());
        assert_eq!(status.summary_label(), "None yet");
        assert_eq!(status.stage(), None);
    }

    #[test]
    fn test_in_dry_period_inclusive_bounds() {
        let periods = vec![lactation("2024-06-01", Some("2025-03-01"))];
        let start = GestationStatus::derive(&periods, &[], day(2024, 12, 31));
        assert!(start.in_dry_period);
        let before = GestationStatus::derive(&periods, &[], day(2024, 12, 30));
        assert!(!before.in_dry_period);
        let end = GestationStatus::derive(&periods, &[], day(2025, 3, 1));
        assert!(end.in_dry_period);
    }

    #[test]
    fn test_missing_expected_calving_has_no_window() {
        let periods = vec![lactation("2024-06-01", None)];
        let status = GestationStatus::derive(&periods, &[], day(2024, 8, 1));
        assert_eq!(status.dry_period, None);
        assert!(!status.in_dry_period);
        assert_eq!(status.days_in_milk, 61);
        assert_eq!(status.summary_label(), "DIM 61");
    }

    #[test]
    fn test_lactation_stage_thresholds() {
        assert_eq!(lactation_stage(0), Category::EarlyLactating);
        assert_eq!(lactation_stage(100), Category::EarlyLactating);
        assert_eq!(lactation_stage(101), Category::MidLactating);
        assert_eq!(lactation_stage(200), Category::MidLactating);
        assert_eq!(lactation_stage(305), Category::LateLactating);
    }
}
