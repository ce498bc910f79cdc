use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Chabad,
    Restaurant,
    Grocery,
    Mikveh,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Restaurant,
        Category::Grocery,
        Category::Chabad,
        Category::Mikveh,
    ];
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category '{0}' (expected chabad, restaurant, grocery or mikveh)")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chabad" => Ok(Category::Chabad),
            "restaurant" => Ok(Category::Restaurant),
            "grocery" => Ok(Category::Grocery),
            "mikveh" => Ok(Category::Mikveh),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Draft,
    #[default]
    Published,
    Hidden,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub id: String,
    pub city_id: String,
    pub name: String,
    pub category: Category,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_rank: Option<i32>,
    #[serde(default)]
    pub status: PublicationStatus,
}

impl PlaceRecord {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlace {
    #[serde(flatten)]
    pub place: PlaceRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Filters applied by [`rank_places`](super::rank_places).
///
/// `restrict_to_radius` mirrors the Shabbat-mode toggle: origin and radius may
/// stay set while the mode is off, in which case distances are still attached
/// but nothing is dropped.
#[derive(Debug, Clone, Default)]
pub struct RankOptions {
    pub origin: Option<GeoPoint>,
    pub radius_km: Option<f64>,
    pub restrict_to_radius: bool,
    pub categories: Vec<Category>,
}

impl RankOptions {
    pub fn matches_category(&self, category: Category) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }

    pub fn active_radius_km(&self) -> Option<f64> {
        if !self.restrict_to_radius || self.origin.is_none() {
            return None;
        }
        self.radius_km
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifestyle {
    #[serde(alias = "Basic")]
    Basic,
    #[serde(alias = "Standard")]
    Standard,
    #[serde(alias = "Comfortable")]
    Comfortable,
}

impl Lifestyle {
    pub fn multiplier(self) -> f64 {
        match self {
            Lifestyle::Basic => 0.9,
            Lifestyle::Standard => 1.0,
            Lifestyle::Comfortable => 1.2,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CostProfileError {
    #[error("{city}: {field} must be a finite value >= 0")]
    NegativeComponent { city: String, field: &'static str },
    #[error("{city}: tax rate must be between 0 and 1")]
    TaxRateOutOfRange { city: String },
    #[error("city name must not be empty")]
    MissingName,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCostProfile {
    pub city: String,
    pub country: String,
    pub rent: f64,
    pub food: f64,
    pub transport: f64,
    pub insurance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coworking: Option<f64>,
    pub tax_rate: f64,
    pub visa_income_requirement: f64,
    pub risk_level: RiskLevel,
}

impl CityCostProfile {
    pub fn base_monthly_cost(&self) -> f64 {
        self.rent + self.food + self.transport + self.insurance + self.coworking.unwrap_or(0.0)
    }

    pub fn is_same_city(&self, other: &CityCostProfile) -> bool {
        self.city == other.city && self.country == other.country
    }

    pub fn validate(&self) -> Result<(), CostProfileError> {
        if self.city.trim().is_empty() {
            return Err(CostProfileError::MissingName);
        }

        let mut components = vec![
            ("rent", self.rent),
            ("food", self.food),
            ("transport", self.transport),
            ("insurance", self.insurance),
            ("visa income requirement", self.visa_income_requirement),
        ];
        if let Some(coworking) = self.coworking {
            components.push(("coworking", coworking));
        }
        for (field, value) in components {
            if !value.is_finite() || value < 0.0 {
                return Err(CostProfileError::NegativeComponent {
                    city: self.city.clone(),
                    field,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(CostProfileError::TaxRateOutOfRange {
                city: self.city.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioInputs {
    pub income: f64,
    pub savings: f64,
    pub lifestyle_multiplier: f64,
    pub extra_multipliers: Vec<f64>,
    pub alternative_limit: Option<usize>,
}

impl ScenarioInputs {
    pub fn cost_multiplier(&self) -> f64 {
        self.lifestyle_multiplier * self.extra_multipliers.iter().product::<f64>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerdictBands {
    pub sustainable_margin: f64,
    pub tight_margin: f64,
}

impl Default for VerdictBands {
    fn default() -> Self {
        Self {
            sustainable_margin: 0.10,
            tight_margin: 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressFactors {
    pub income_shock: f64,
    pub rent_shock: f64,
}

impl Default for StressFactors {
    fn default() -> Self {
        Self {
            income_shock: 0.8,
            rent_shock: 1.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadinessWeights {
    pub margin: f64,
    pub savings: f64,
    pub threshold: f64,
    pub risk: f64,
    pub savings_target_months: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            margin: 40.0,
            savings: 30.0,
            threshold: 20.0,
            risk: 10.0,
            savings_target_months: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScenarioConfig {
    pub verdict_bands: VerdictBands,
    pub stress: StressFactors,
    pub readiness: ReadinessWeights,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "months", rename_all = "lowercase")]
pub enum Runway {
    Stable,
    Months(f64),
}

impl Runway {
    pub fn from_net(net: f64, savings: f64) -> Self {
        if net >= 0.0 {
            Runway::Stable
        } else {
            Runway::Months(savings / net.abs())
        }
    }

    pub fn months(self) -> Option<f64> {
        match self {
            Runway::Stable => None,
            Runway::Months(months) => Some(months),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    NotRealistic,
    Tight,
    Sustainable,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Sustainable => "Sustainable",
            Verdict::Tight => "Tight",
            Verdict::NotRealistic => "Not Realistic",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StressKind {
    IncomeDrop,
    RentIncrease,
    Combined,
}

impl StressKind {
    pub const ALL: [StressKind; 3] = [
        StressKind::IncomeDrop,
        StressKind::RentIncrease,
        StressKind::Combined,
    ];

    pub fn shocks_income(self) -> bool {
        matches!(self, StressKind::IncomeDrop | StressKind::Combined)
    }

    pub fn shocks_rent(self) -> bool {
        matches!(self, StressKind::RentIncrease | StressKind::Combined)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StressScenario {
    pub kind: StressKind,
    pub income: f64,
    pub adjusted_cost: f64,
    pub tax: f64,
    pub net: f64,
    pub runway: Runway,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeCity {
    pub city: String,
    pub country: String,
    pub adjusted_cost: f64,
    pub monthly_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub city: String,
    pub country: String,
    pub risk_level: RiskLevel,
    pub base_cost: f64,
    pub adjusted_cost: f64,
    pub tax: f64,
    pub required_outlay: f64,
    pub net: f64,
    pub runway: Runway,
    pub meets_income_threshold: bool,
    pub verdict: Verdict,
    pub readiness_score: u32,
    pub stress: Vec<StressScenario>,
    pub alternatives: Vec<AlternativeCity>,
}
