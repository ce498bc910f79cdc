mod cities;
mod geo;
mod scenario;
mod types;

pub use cities::{find_city, reference_cities, sorted_for_display};
pub use geo::{
    EARTH_RADIUS_KM, UNRANKED_FEATURED_RANK, compare_listing_priority, compare_names, haversine_km,
    rank_places,
};
pub use scenario::{cheaper_alternatives, classify_verdict, evaluate};
pub use types::{
    AlternativeCity, Category, CityCostProfile, CostProfileError, GeoPoint, Lifestyle,
    ParseCategoryError, PlaceRecord, PublicationStatus, RankOptions, RankedPlace,
    ReadinessWeights, RiskLevel, Runway, ScenarioConfig, ScenarioInputs, ScenarioResult,
    StressFactors, StressKind, StressScenario, Verdict, VerdictBands,
};
