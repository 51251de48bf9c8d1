use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{search, ALL_CITIES, MAX_SUGGESTIONS, POPULAR_CITIES};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Partial city name
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CityList {
    pub popular: Vec<&'static str>,
    pub all: Vec<&'static str>,
}

/// List the known cities
///
/// GET /cities
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "cities",
    responses((status = 200, description = "Popular and all cities", body = CityList))
)]
pub async fn list_cities() -> Json<CityList> {
    Json(CityList {
        popular: POPULAR_CITIES.to_vec(),
        all: ALL_CITIES.to_vec(),
    })
}

/// Search suggestions for a partial city name
///
/// GET /cities/search?q=гом
#[utoipa::path(
    get,
    path = "/api/v1/cities/search",
    tag = "cities",
    params(("q" = Option<String>, Query, description = "Partial city name")),
    responses((status = 200, description = "Up to 7 matching cities", body = Vec<String>))
)]
pub async fn search_cities(Query(query): Query<SearchQuery>) -> Json<Vec<&'static str>> {
    let term = query.q.unwrap_or_default();
    Json(search(&term, MAX_SUGGESTIONS))
}
