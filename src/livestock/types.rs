use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Parse a backend date field. Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            // Naive timestamps without an offset ("2024-06-01T08:30:00")
            raw.get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl From<Option<String>> for Gender {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "male" || s == "m" => Gender::Male,
            Some(s) if s == "female" || s == "f" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
        .to_string()
    }
}

/// Herd category as recorded by the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub enum Category {
    Calf,
    WeanerStage1,
    WeanerStage2,
    Yearling,
    Bulling,
    Heifer,
    InCalf,
    Steaming,
    EarlyLactating,
    MidLactating,
    LateLactating,
    Dry,
    Bull,
    Other(String),
}

impl Category {
    /// Every category of the fixed enumeration, in display order.
    pub const FIXED: [Category; 13] = [
        Category::Calf,
        Category::WeanerStage1,
        Category::WeanerStage2,
        Category::Yearling,
        Category::Bulling,
        Category::Heifer,
        Category::InCalf,
        Category::Steaming,
        Category::EarlyLactating,
        Category::MidLactating,
        Category::LateLactating,
        Category::Dry,
        Category::Bull,
    ];

    /// Parse a display label. Blank labels carry no category.
    pub fn parse(raw: &str) -> Option<Category> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        let cat = match key.as_str() {
            "calf" => Category::Calf,
            "weanerstage1" | "weaner1" => Category::WeanerStage1,
            "weanerstage2" | "weaner2" => Category::WeanerStage2,
            "yearling" => Category::Yearling,
            "bulling" => Category::Bulling,
            "heifer" => Category::Heifer,
            "incalf" => Category::InCalf,
            "steaming" => Category::Steaming,
            "earlylactating" => Category::EarlyLactating,
            "midlactating" => Category::MidLactating,
            "latelactating" => Category::LateLactating,
            "dry" => Category::Dry,
            "bull" => Category::Bull,
            _ => Category::Other(trimmed.to_string()),
        };
        Some(cat)
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Calf => "Calf",
            Category::WeanerStage1 => "Weaner Stage 1",
            Category::WeanerStage2 => "Weaner Stage 2",
            Category::Yearling => "Yearling",
            Category::Bulling => "Bulling",
            Category::Heifer => "Heifer",
            Category::InCalf => "In-Calf",
            Category::Steaming => "Steaming",
            Category::EarlyLactating => "Early Lactating",
            Category::MidLactating => "Mid Lactating",
            Category::LateLactating => "Late Lactating",
            Category::Dry => "Dry",
            Category::Bull => "Bull",
            Category::Other(label) => label,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.label().to_string()
    }
}

fn de_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::parse))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HealthRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub is_sick: bool,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LactationPeriod {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "last_calving_date")]
    pub calving_date: Option<String>,
    #[serde(default)]
    pub days_in_milk: u32,
    #[serde(default, alias = "is_milking")]
    pub milking: bool,
    #[serde(default, alias = "expected_next_calving_date")]
    pub expected_calving_date: Option<String>,
}

impl LactationPeriod {
    pub fn calving(&self) -> Option<NaiveDate> {
        self.calving_date.as_deref().and_then(parse_date)
    }

    pub fn expected_calving(&self) -> Option<NaiveDate> {
        self.expected_calving_date.as_deref().and_then(parse_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ReproductiveEventType {
    ArtificialInsemination,
    NaturalService,
    Calving,
    PregnancyCheck,
    Other,
}

impl ReproductiveEventType {
    pub fn is_breeding(self) -> bool {
        matches!(
            self,
            ReproductiveEventType::ArtificialInsemination | ReproductiveEventType::NaturalService
        )
    }
}

impl From<String> for ReproductiveEventType {
    fn from(raw: String) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "ai" | "artificialinsemination" => ReproductiveEventType::ArtificialInsemination,
            "natural" | "naturalservice" | "naturalbreeding" => {
                ReproductiveEventType::NaturalService
            }
            "calving" => ReproductiveEventType::Calving,
            "pregnancycheck" | "pd" => ReproductiveEventType::PregnancyCheck,
            _ => ReproductiveEventType::Other,
        }
    }
}

impl From<ReproductiveEventType> for String {
    fn from(t: ReproductiveEventType) -> Self {
        match t {
            ReproductiveEventType::ArtificialInsemination => "AI",
            ReproductiveEventType::NaturalService => "Natural",
            ReproductiveEventType::Calving => "Calving",
            ReproductiveEventType::PregnancyCheck => "Pregnancy Check",
            ReproductiveEventType::Other => "Other",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReproductiveEvent {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(alias = "type")]
    pub event_type: ReproductiveEventType,
}

impl ReproductiveEvent {
    pub fn on(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Animal {
    pub id: i64,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default, alias = "dob")]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "de_category")]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub health_records: Vec<HealthRecord>,
    #[serde(default)]
    pub lactation_periods: Vec<LactationPeriod>,
    #[serde(default, alias = "farm_id")]
    pub farm: Option<i64>,
}

impl Animal {
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.date_of_birth.as_deref().and_then(parse_date)
    }

    pub fn is_sick(&self) -> bool {
        self.health_records.iter().any(|r| r.is_sick)
    }
}

/// Form payload for registering an animal.
#[derive(Debug, Clone, Serialize)]
pub struct NewAnimal {
    pub tag: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub farm: i64,
}
