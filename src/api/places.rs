use serde::{Deserialize, Serialize};

use super::dataset::{Dataset, FinderCity, scope_places};
use super::{ApiError, ListOrCsv};
use crate::core::{Category, GeoPoint, PlaceRecord, RankOptions, RankedPlace, rank_places};

pub const DEFAULT_RADIUS_KM: f64 = 1.2;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct PlacesPayload {
    city: Option<String>,
    categories: Option<ListOrCsv<Category>>,
    shabbat_mode: Option<bool>,
    radius_km: Option<f64>,
    origin_lat: Option<f64>,
    origin_lng: Option<f64>,
    use_city_center: Option<bool>,
    places: Option<Vec<PlaceRecord>>,
}

#[derive(Debug)]
pub(crate) struct PlacesRequest {
    pub city: FinderCity,
    pub options: RankOptions,
    pub places_override: Option<Vec<PlaceRecord>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaceView {
    #[serde(flatten)]
    pub ranked: RankedPlace,
    pub directions_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlacesResponse {
    pub city: FinderCity,
    pub shabbat_mode: bool,
    pub origin: Option<GeoPoint>,
    pub origin_required: bool,
    pub radius_km: f64,
    pub count: usize,
    pub places: Vec<PlaceView>,
}

pub(crate) fn places_request_from_payload(
    payload: PlacesPayload,
    dataset: &Dataset,
) -> Result<PlacesRequest, ApiError> {
    let city_id = payload
        .city
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::invalid("city is required"))?;
    let city = dataset
        .finder_city(city_id)
        .cloned()
        .ok_or_else(|| ApiError::UnknownCity(city_id.to_string()))?;

    let categories = match payload.categories {
        Some(filter) => filter.into_vec()?,
        None => Vec::new(),
    };

    let radius_km = payload.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(ApiError::invalid("radiusKm must be > 0"));
    }

    let explicit_origin = match (payload.origin_lat, payload.origin_lng) {
        (Some(lat), Some(lng)) => {
            let origin = GeoPoint::new(lat, lng);
            if !origin.is_valid() {
                return Err(ApiError::invalid(
                    "originLat must be within [-90, 90] and originLng within [-180, 180]",
                ));
            }
            Some(origin)
        }
        (None, None) => None,
        _ => {
            return Err(ApiError::invalid(
                "originLat and originLng must be provided together",
            ));
        }
    };
    let origin = if payload.use_city_center.unwrap_or(false) {
        Some(city.center())
    } else {
        explicit_origin
    };

    if let Some(places) = &payload.places {
        if let Some(bad) = places.iter().find(|p| !p.location().is_valid()) {
            return Err(ApiError::invalid(format!(
                "place {} has coordinates outside [-90, 90] / [-180, 180]",
                bad.id
            )));
        }
    }

    Ok(PlacesRequest {
        city,
        options: RankOptions {
            origin,
            radius_km: Some(radius_km),
            restrict_to_radius: payload.shabbat_mode.unwrap_or(false),
            categories,
        },
        places_override: payload.places,
    })
}

pub(crate) fn build_places_response(request: PlacesRequest, dataset: &Dataset) -> PlacesResponse {
    let source = request
        .places_override
        .as_deref()
        .unwrap_or(dataset.places.as_slice());
    let scoped = scope_places(source, &request.city.id);
    let origin = request.options.origin;

    let places = rank_places(&scoped, &request.options)
        .into_iter()
        .map(|ranked| PlaceView {
            directions_url: directions_url(&ranked.place, origin),
            ranked,
        })
        .collect::<Vec<_>>();

    PlacesResponse {
        shabbat_mode: request.options.restrict_to_radius,
        origin_required: request.options.restrict_to_radius && origin.is_none(),
        radius_km: request.options.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
        count: places.len(),
        city: request.city,
        origin,
        places,
    }
}

/// Walking directions from `origin` when set, otherwise a map search for the place.
pub fn directions_url(place: &PlaceRecord, origin: Option<GeoPoint>) -> String {
    let destination = format!("{},{}", place.lat, place.lng);
    match origin {
        Some(origin) => format!(
            "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={destination}&travelmode=walking",
            origin.lat, origin.lng
        ),
        None => format!("https://www.google.com/maps/search/?api=1&query={destination}"),
    }
}
