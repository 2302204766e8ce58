use super::types::{Animal, Category, Gender};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Where an animal lands in the herd tally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HerdBucket {
    Bulls,
    Newborns,
    Category(Category),
    Uncategorized,
}

impl HerdBucket {
    pub fn label(&self) -> &str {
        match self {
            HerdBucket::Bulls => "Bulls",
            HerdBucket::Newborns => "Newborns",
            HerdBucket::Category(c) => c.label(),
            HerdBucket::Uncategorized => "Default",
        }
    }
}

impl fmt::Display for HerdBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole months since birth, counted as 30-day blocks.
///
/// `None` when the date of birth is unknown or lies after `today`.
pub fn age_in_months(dob: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    let days = (today - dob?).num_days();
    // A birth date after today is a data-entry error, not a newborn.
    if days < 0 {
        return None;
    }
    Some(days / 30)
}

/// Bucket precedence: male, then under one month old, then stated category.
pub fn classify(animal: &Animal, today: NaiveDate) -> HerdBucket {
    if animal.gender == Gender::Male {
        return HerdBucket::Bulls;
    }
    if age_in_months(animal.birth_date(), today).is_some_and(|m| m < 1) {
        return HerdBucket::Newborns;
    }
    match &animal.category {
        Some(cat) => HerdBucket::Category(cat.clone()),
        None => HerdBucket::Uncategorized,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HerdSummary {
    pub counts: BTreeMap<HerdBucket, u32>,
    pub total: u32,
    pub pregnant: u32,
    pub sick: u32,
}

impl Default for HerdSummary {
    fn default() -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(HerdBucket::Bulls, 0);
        counts.insert(HerdBucket::Newborns, 0);
        for cat in Category::FIXED.iter() {
            counts.insert(HerdBucket::Category(cat.clone()), 0);
        }
        Self {
            counts,
            total: 0,
            pregnant: 0,
            sick: 0,
        }
    }
}

impl HerdSummary {
    /// Rebuild the tally from a freshly fetched animal list.
    pub fn tally(animals: &[Animal], today: NaiveDate) -> Self {
        let mut summary = Self::default();
        for animal in animals {
            *summary.counts.entry(classify(animal, today)).or_insert(0) += 1;
            summary.total += 1;
            if animal.is_pregnant {
                summary.pregnant += 1;
            }
            if animal.is_sick() {
                summary.sick += 1;
            }
        }
        tracing::debug!(
            total = summary.total,
            pregnant = summary.pregnant,
            sick = summary.sick,
            "herd tally rebuilt"
        );
        summary
    }

    pub fn count(&self, bucket: &HerdBucket) -> u32 {
        self.counts.get(bucket).copied().unwrap_or(0)
    }

    /// Count by display label ("Bulls", "Heifer", "Milking", ...).
    pub fn count_label(&self, label: &str) -> u32 {
        self.counts
            .iter()
            .filter(|(b, _)| b.label() == label)
            .map(|(_, n)| *n)
            .sum()
    }

    /// Buckets with at least one animal, largest first.
    pub fn occupied(&self) -> Vec<(&HerdBucket, u32)> {
        let mut rows: Vec<(&HerdBucket, u32)> = self
            .counts
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(b, n)| (b, *n))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn animal(gender: Gender, dob: Option<&str>, category: Option<&str>) -> Animal {
        Animal {
            id: 1,
            gender,
            date_of_birth: dob.map(str::to_string),
            category: category.and_then(Category::parse),
            ..Default::default()
        }
    }

    #[test]
    fn test_age_in_months_floors_thirty_day_blocks() {
        let today = day(2024, 6, 30);
        assert_eq!(age_in_months(Some(day(2024, 6, 1)), today), Some(0));
        assert_eq!(age_in_months(Some(day(2024, 5, 31)), today), Some(1));
        assert_eq!(age_in_months(None, today), None);
        assert_eq!(age_in_months(Some(day(2024, 7, 1)), today), None);
    }

    #[test]
    fn test_male_overrides_category_and_age() {
        let today = day(2024, 6, 30);
        let young_bull = animal(Gender::Male, Some("2024-06-25"), Some("Calf"));
        assert_eq!(classify(&young_bull, today), HerdBucket::Bulls);
    }

    #[test]
    fn test_newborn_overrides_category() {
        let today = day(2024, 6, 30);
        let calf = animal(Gender::Female, Some("2024-06-25"), Some("Heifer"));
        assert_eq!(classify(&calf, today), HerdBucket::Newborns);
    }

    #[test]
    fn test_future_dob_is_not_newborn() {
        let today = day(2024, 6, 30);
        let heifer = animal(Gender::Female, Some("2024-09-01"), Some("Heifer"));
        assert_eq!(classify(&heifer, today), HerdBucket::Category(Category::Heifer));
    }

    #[test]
    fn test_malformed_dob_uses_stated_category() {
        let today = day(2024, 6, 30);
        let cow = animal(Gender::Female, Some("31/02/2020"), Some("Dry"));
        assert_eq!(classify(&cow, today), HerdBucket::Category(Category::Dry));
        let unknown = animal(Gender::Unknown, None, None);
        assert_eq!(classify(&unknown, today), HerdBucket::Uncategorized);
    }

    #[test]
    fn test_empty_tally_has_zeroed_fixed_keys() {
        let summary = HerdSummary::tally(&[], day(2024, 6, 30));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.count(&HerdBucket::Bulls), 0);
        assert_eq!(summary.count(&HerdBucket::Newborns), 0);
        for cat in Category::FIXED.iter() {
            assert_eq!(summary.counts.get(&HerdBucket::Category(cat.clone())), Some(&0));
        }
        assert!(summary.occupied().is_empty());
    }

    #[test]
    fn test_occupied_sorted_by_count() {
        let today = day(2024, 6, 30);
        let animals = vec![
            animal(Gender::Female, Some("2020-01-01"), Some("Dry")),
            animal(Gender::Female, Some("2020-01-01"), Some("Heifer")),
            animal(Gender::Female, Some("2020-01-01"), Some("Heifer")),
        ];
        let summary = HerdSummary::tally(&animals, today);
        let occupied = summary.occupied();
        assert_eq!(occupied.len(), 2);
        assert_eq!(occupied[0].0.label(), "Heifer");
        assert_eq!(occupied[0].1, 2);
    }
}
