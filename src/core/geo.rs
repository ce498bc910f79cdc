use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::types::{GeoPoint, PlaceRecord, RankOptions, RankedPlace};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const UNRANKED_FEATURED_RANK: i32 = 9999;

pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let half_lat = (d_lat / 2.0).sin();
    let half_lng = (d_lng / 2.0).sin();
    let a = half_lat * half_lat
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * half_lng * half_lng;
    // Rounding can push `a` just past 1 for antipodal points.
    let a = a.min(1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn rank_places(places: &[PlaceRecord], options: &RankOptions) -> Vec<RankedPlace> {
    let radius_km = options.active_radius_km();

    let mut ranked = places
        .iter()
        .filter(|place| options.matches_category(place.category))
        .map(|place| RankedPlace {
            distance_km: options
                .origin
                .map(|origin| haversine_km(origin, place.location())),
            place: place.clone(),
        })
        .filter(|ranked| match (radius_km, ranked.distance_km) {
            (Some(radius), Some(distance)) => distance <= radius,
            _ => true,
        })
        .collect::<Vec<_>>();

    ranked.sort_by(|a, b| compare_listing_priority(&a.place, &b.place));
    ranked
}

pub fn compare_listing_priority(a: &PlaceRecord, b: &PlaceRecord) -> Ordering {
    b.is_featured
        .cmp(&a.is_featured)
        .then_with(|| effective_rank(a).cmp(&effective_rank(b)))
        .then_with(|| b.is_verified.cmp(&a.is_verified))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Locale-style name order: base letters first, then accents, then case with
/// lowercase ahead of uppercase. Raw bytes break any remaining tie.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| folded(a).cmp(&folded(b)))
        .then_with(|| case_pattern(a).cmp(&case_pattern(b)))
        .then_with(|| a.cmp(b))
}

fn base_letters(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn folded(name: &str) -> String {
    name.nfd().flat_map(char::to_lowercase).collect()
}

fn case_pattern(name: &str) -> Vec<bool> {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

fn effective_rank(place: &PlaceRecord) -> i32 {
    place.featured_rank.unwrap_or(UNRANKED_FEATURED_RANK)
}
