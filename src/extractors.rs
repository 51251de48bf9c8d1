use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::Deserialize;

/// Query parameters accepted by weather and forecast endpoints
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// City name from query string
    pub city: Option<String>,
}

/// City taken from the path, then from `?city=`.
///
/// Blank values count as absent, so the handler falls back to the
/// configured default city.
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

impl CityParam {
    fn from_raw(raw: Option<String>) -> Self {
        Self(
            raw.map(|city| city.trim().to_string())
                .filter(|city| !city.is_empty()),
        )
    }

    /// Get the city value or use a default
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            let param = Self::from_raw(Some(city));
            if param.0.is_some() {
                return Ok(param);
            }
        }

        if let Ok(Query(query)) = Query::<CityQuery>::from_request_parts(parts, state).await {
            return Ok(Self::from_raw(query.city));
        }

        // No city provided - the handler uses its default
        Ok(CityParam(None))
    }
}
