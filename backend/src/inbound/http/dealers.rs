//! Dealer locator endpoints.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{
    Dealer, DealerFilter, Error, GeoError, GeoPoint, NearbyDealer, NearbyQuery, ValidationReport,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::public_short_cache_header;
use crate::inbound::http::state::HttpState;

/// Region filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct DealerSearchQuery {
    /// Case-insensitive city name.
    pub city: Option<String>,
    /// Case-insensitive state name.
    pub state: Option<String>,
}

/// Proximity search parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct NearbyParams {
    /// Latitude of the visitor.
    pub lat: Option<f64>,
    /// Longitude of the visitor.
    pub lng: Option<f64>,
    /// Search radius in kilometres (default 50, max 500).
    pub radius_km: Option<f64>,
}

impl NearbyParams {
    fn into_query(self) -> Result<NearbyQuery, Error> {
        let mut report = ValidationReport::default();
        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            if self.lat.is_none() {
                report.push("lat", "required", "lat is required");
            }
            if self.lng.is_none() {
                report.push("lng", "required", "lng is required");
            }
            return Err(report.into_error());
        };
        let origin = match GeoPoint::new(lat, lng) {
            Ok(origin) => origin,
            Err(err) => {
                let field = if err == GeoError::Latitude { "lat" } else { "lng" };
                report.check::<(), _>(field, Err(err));
                return Err(report.into_error());
            }
        };
        NearbyQuery::new(origin, self.radius_km).map_err(|err| {
            report.check::<(), _>("radiusKm", Err(err));
            report.into_error()
        })
    }
}

/// Dealers by city and/or state.
#[utoipa::path(
    get,
    path = "/api/dealers",
    params(DealerSearchQuery),
    responses(
        (status = 200, description = "Matching dealers", body = [Dealer]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dealers"],
    operation_id = "listDealers",
    security([])
)]
#[get("/dealers")]
pub async fn list_dealers(
    state: web::Data<HttpState>,
    query: web::Query<DealerSearchQuery>,
) -> ApiResult<HttpResponse> {
    let DealerSearchQuery { city, state: region } = query.into_inner();
    let dealers = state.dealers.search(&DealerFilter::new(city, region)).await?;
    Ok(HttpResponse::Ok()
        .insert_header(public_short_cache_header())
        .json(dealers))
}

/// Dealers near a point, nearest first.
#[utoipa::path(
    get,
    path = "/api/dealers/nearby",
    params(NearbyParams),
    responses(
        (status = 200, description = "Dealers within the radius", body = [NearbyDealer]),
        (status = 400, description = "Missing or out-of-range coordinates", body = Error)
    ),
    tags = ["dealers"],
    operation_id = "nearbyDealers",
    security([])
)]
#[get("/dealers/nearby")]
pub async fn nearby_dealers(
    state: web::Data<HttpState>,
    params: web::Query<NearbyParams>,
) -> ApiResult<HttpResponse> {
    let query = params.into_inner().into_query()?;
    let dealers = state.dealers.nearby(&query).await?;
    Ok(HttpResponse::Ok().json(dealers))
}
