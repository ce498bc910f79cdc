use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::core::{CityCostProfile, GeoPoint, PlaceRecord, PublicationStatus, reference_cities};

const FINDER_CITIES_JSON: &str = include_str!("../../data/finder_cities.json");
const PLACES_JSON: &str = include_str!("../../data/places.json");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinderCity {
    pub id: String,
    pub name: String,
    pub country: Option<String>,
    pub center_lat: f64,
    pub center_lng: f64,
    pub default_zoom: u8,
}

impl FinderCity {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub finder_cities: Vec<FinderCity>,
    pub places: Vec<PlaceRecord>,
    pub cost_cities: Vec<CityCostProfile>,
}

impl Dataset {
    pub fn embedded() -> Result<Self, ApiError> {
        let finder_cities = serde_json::from_str::<Vec<FinderCity>>(FINDER_CITIES_JSON)
            .map_err(|e| ApiError::Dataset(format!("finder cities: {e}")))?;
        let places = serde_json::from_str::<Vec<PlaceRecord>>(PLACES_JSON)
            .map_err(|e| ApiError::Dataset(format!("places: {e}")))?;
        Self::new(finder_cities, places, reference_cities())
    }

    pub fn new(
        finder_cities: Vec<FinderCity>,
        places: Vec<PlaceRecord>,
        cost_cities: Vec<CityCostProfile>,
    ) -> Result<Self, ApiError> {
        if let Some(city) = finder_cities.iter().find(|c| !c.center().is_valid()) {
            return Err(ApiError::Dataset(format!(
                "city {} has an out-of-range center",
                city.id
            )));
        }
        if let Some(place) = places.iter().find(|p| !p.location().is_valid()) {
            return Err(ApiError::Dataset(format!(
                "place {} has out-of-range coordinates",
                place.id
            )));
        }
        for city in &cost_cities {
            city.validate()?;
        }

        Ok(Self {
            finder_cities,
            places,
            cost_cities,
        })
    }

    pub fn finder_city(&self, id: &str) -> Option<&FinderCity> {
        self.finder_cities
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(id.trim()))
    }
}

/// Published places of one city, the scope the finder's data source serves.
pub fn scope_places(places: &[PlaceRecord], city_id: &str) -> Vec<PlaceRecord> {
    places
        .iter()
        .filter(|p| p.city_id == city_id && p.status == PublicationStatus::Published)
        .cloned()
        .collect()
}
