use crate::store::{Route, Stop, TransitStore};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::sync::Arc;

/// Shared state for the stop/route query API
pub struct QueryAppState {
    pub store: Arc<TransitStore>,
}

/// Query parameters for stop search
#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Query parameters for routes between two stops.
///
/// Kept as strings so malformed ids produce our own 400 message.
#[derive(Deserialize)]
pub struct BetweenParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

/// Create query API router
pub fn create_query_router(state: Arc<QueryAppState>) -> Router {
    Router::new()
        .route("/api/stops", get(list_stops))
        .route("/api/stops/search", get(search_stops))
        .route("/api/routes", get(list_routes))
        .route("/api/routes/by-stop/:stop_id", get(routes_by_stop))
        .route("/api/routes/between", get(routes_between))
        .with_state(state)
}

/// GET /api/stops - List all stops
async fn list_stops(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Stop>> {
    Json(state.store.list_stops())
}

/// GET /api/routes - List all routes
async fn list_routes(State(state): State<Arc<QueryAppState>>) -> Json<Vec<Route>> {
    Json(state.store.list_routes())
}

/// GET /api/stops/search?q=fisk - Case-insensitive name search
async fn search_stops(
    State(state): State<Arc<QueryAppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Stop>>, QueryError> {
    let query = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or(QueryError::BadRequest("Search query required"))?;

    Ok(Json(state.store.search_stops(&query)))
}

/// GET /api/routes/by-stop/:stop_id - Routes starting or ending at a stop
async fn routes_by_stop(
    State(state): State<Arc<QueryAppState>>,
    Path(stop_id): Path<String>,
) -> Result<Json<Vec<Route>>, QueryError> {
    let stop_id = parse_id(&stop_id).map_err(|_| QueryError::BadRequest("Invalid stop ID"))?;
    let routes = stop_id
        .map(|id| state.store.routes_by_stop(id))
        .unwrap_or_default();
    Ok(Json(routes))
}

/// GET /api/routes/between?start=1&end=2 - Routes running from start to end
///
/// Direction matters: `start=2&end=1` does not match a route from 1 to 2.
async fn routes_between(
    State(state): State<Arc<QueryAppState>>,
    Query(params): Query<BetweenParams>,
) -> Result<Json<Vec<Route>>, QueryError> {
    let parse = |raw: Option<&str>| {
        raw.ok_or(QueryError::BadRequest("Invalid stop IDs"))
            .and_then(|raw| parse_id(raw).map_err(|_| QueryError::BadRequest("Invalid stop IDs")))
    };
    let start = parse(params.start.as_deref())?;
    let end = parse(params.end.as_deref())?;

    let routes = match (start, end) {
        (Some(start), Some(end)) => state.store.routes_between(start, end),
        _ => Vec::new(),
    };
    Ok(Json(routes))
}

/// Parse a numeric id parameter.
///
/// Text that is not an integer is an error. Integers no record can carry
/// (negative, or past `u32::MAX`) parse to `None` and match nothing.
pub(crate) fn parse_id(raw: &str) -> Result<Option<u32>, ParseIntError> {
    let id: i64 = raw.trim().parse()?;
    Ok(u32::try_from(id).ok())
}

/// Query error types
#[derive(Debug)]
enum QueryError {
    BadRequest(&'static str),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse {
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewRoute, NewStop};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn create_test_state() -> Arc<QueryAppState> {
        let store = TransitStore::new();
        for name in ["Downtown Transit Center", "Fisk University"] {
            store.insert_stop(NewStop {
                name: name.to_string(),
                latitude: 36.16,
                longitude: -86.78,
            });
        }
        store
            .insert_route(NewRoute {
                name: "Route 1".to_string(),
                description: "Downtown to Fisk".to_string(),
                start_stop_id: 1,
                end_stop_id: 2,
                duration: 12,
                next_departure: Utc::now(),
                token_cost: Decimal::new(100, 2),
            })
            .unwrap();

        Arc::new(QueryAppState {
            store: Arc::new(store),
        })
    }

    #[tokio::test]
    async fn test_search_stops() {
        let state = create_test_state();
        let params = SearchParams {
            q: Some("fisk".to_string()),
        };

        let result = search_stops(State(state), Query(params)).await.unwrap();

        assert_eq!(result.0.len(), 1);
        assert_eq!(result.0[0].id, 2);
    }

    #[tokio::test]
    async fn test_search_stops_requires_query() {
        let state = create_test_state();

        for q in [None, Some(String::new())] {
            let result = search_stops(State(Arc::clone(&state)), Query(SearchParams { q })).await;
            assert!(matches!(
                result,
                Err(QueryError::BadRequest("Search query required"))
            ));
        }
    }

    #[tokio::test]
    async fn test_routes_by_stop() {
        let state = create_test_state();

        let result = routes_by_stop(State(Arc::clone(&state)), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(result.0.len(), 1);

        let unknown = routes_by_stop(State(Arc::clone(&state)), Path("99".to_string()))
            .await
            .unwrap();
        assert!(unknown.0.is_empty());

        let negative = routes_by_stop(State(Arc::clone(&state)), Path("-1".to_string()))
            .await
            .unwrap();
        assert!(negative.0.is_empty());

        let invalid = routes_by_stop(State(state), Path("abc".to_string())).await;
        assert!(matches!(invalid, Err(QueryError::BadRequest("Invalid stop ID"))));
    }

    #[tokio::test]
    async fn test_routes_between() {
        let state = create_test_state();

        let forward = routes_between(
            State(Arc::clone(&state)),
            Query(BetweenParams {
                start: Some("1".to_string()),
                end: Some("2".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(forward.0.len(), 1);
        assert_eq!(forward.0[0].id, 1);

        let reverse = routes_between(
            State(Arc::clone(&state)),
            Query(BetweenParams {
                start: Some("2".to_string()),
                end: Some("1".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(reverse.0.is_empty());
    }

    #[tokio::test]
    async fn test_routes_between_invalid_ids() {
        let state = create_test_state();

        let missing_end = routes_between(
            State(Arc::clone(&state)),
            Query(BetweenParams {
                start: Some("1".to_string()),
                end: None,
            }),
        )
        .await;
        assert!(matches!(missing_end, Err(QueryError::BadRequest("Invalid stop IDs"))));

        let bad_start = routes_between(
            State(state),
            Query(BetweenParams {
                start: Some("one".to_string()),
                end: Some("2".to_string()),
            }),
        )
        .await;
        assert!(bad_start.is_err());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7"), Ok(Some(7)));
        assert_eq!(parse_id(" 7 "), Ok(Some(7)));
        assert_eq!(parse_id("-1"), Ok(None));
        assert_eq!(parse_id("4294967296"), Ok(None));
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("12abc").is_err());
        assert!(parse_id("").is_err());
    }
}
