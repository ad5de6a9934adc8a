//! Dealer network and proximity search.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::FieldViolation;
use super::DealerId;

/// Mean earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Radius used when the caller does not supply one.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
/// Largest radius a caller may request.
pub const MAX_RADIUS_KM: f64 = 500.0;
/// Cap on nearby results.
pub const NEARBY_LIMIT: usize = 20;

/// Geographic coordinate rejected.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// Latitude outside -90..=90.
    #[error("latitude must be between -90 and 90")]
    Latitude,
    /// Longitude outside -180..=180.
    #[error("longitude must be between -180 and 180")]
    Longitude,
    /// Radius not positive or above the maximum.
    #[error("radius must be greater than 0 and at most {MAX_RADIUS_KM} km")]
    Radius,
}

impl FieldViolation for GeoError {
    fn code(&self) -> &'static str {
        "out_of_range"
    }
}

/// WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "RawPoint", into = "RawPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Serialize, Deserialize)]
struct RawPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawPoint) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for RawPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

impl GeoPoint {
    /// Validate a coordinate pair. NaN is rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// Haversine distance in kilometres.
    ///
    /// # Examples
    /// ```
    /// use site_backend::domain::GeoPoint;
    ///
    /// let mumbai = GeoPoint::new(19.0760, 72.8777).unwrap();
    /// let pune = GeoPoint::new(18.5204, 73.8567).unwrap();
    /// let km = mumbai.distance_km(pune);
    /// assert!((115.0..125.0).contains(&km));
    /// ```
    #[must_use]
    pub fn distance_km(self, other: Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

/// Showroom or service centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dealer {
    pub id: DealerId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub location: Option<GeoPoint>,
    pub opening_hours: Option<String>,
}

/// City/state filter; both are case-insensitive exact matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerFilter {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl DealerFilter {
    /// Build a filter, treating blank values as absent.
    #[must_use]
    pub fn new(city: Option<String>, state: Option<String>) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty())
        };
        Self {
            city: clean(city),
            state: clean(state),
        }
    }

    /// Whether `dealer` satisfies every supplied criterion.
    #[must_use]
    pub fn matches(&self, dealer: &Dealer) -> bool {
        let city_ok = self
            .city
            .as_ref()
            .is_none_or(|city| dealer.city.eq_ignore_ascii_case(city));
        let state_ok = self
            .state
            .as_ref()
            .is_none_or(|state| dealer.state.eq_ignore_ascii_case(state));
        city_ok && state_ok
    }
}

/// Proximity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    origin: GeoPoint,
    radius_km: f64,
}

impl NearbyQuery {
    /// Build a query, defaulting the radius.
    pub fn new(origin: GeoPoint, radius_km: Option<f64>) -> Result<Self, GeoError> {
        let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);
        if !(radius_km > 0.0 && radius_km <= MAX_RADIUS_KM) {
            return Err(GeoError::Radius);
        }
        Ok(Self { origin, radius_km })
    }

    /// Search origin.
    #[must_use]
    pub const fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Search radius.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

/// A dealer with its distance from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDealer {
    #[serde(flatten)]
    pub dealer: Dealer,
    pub distance_km: f64,
}

/// Dealers within the radius, nearest first, capped at [`NEARBY_LIMIT`].
#[must_use]
pub fn nearest_dealers(dealers: Vec<Dealer>, query: &NearbyQuery) -> Vec<NearbyDealer> {
    let mut hits: Vec<NearbyDealer> = dealers
        .into_iter()
        .filter_map(|dealer| {
            let distance_km = dealer.location?.distance_km(query.origin);
            (distance_km <= query.radius_km).then_some(NearbyDealer {
                dealer,
                distance_km: (distance_km * 10.0).round() / 10.0,
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    hits.truncate(NEARBY_LIMIT);
    hits
}
