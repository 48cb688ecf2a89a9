use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::{Instrument, instrument};

use crate::{
    api::{
        rest::{MeasurementElement, StationDataQuery, StationElement, UniqueMatricesQuery, UniquePollutantsQuery},
        state::AppState,
    },
    model::{
        apperror::ApplicationError,
        models::{StationDataInputType, UniqueMatricesInputType, UniquePollutantsInputType},
    },
};

/**
 * Endpoint to retrieve all monitoring stations.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStations", trace_id = get_trace_id(&http_request)))]
#[get("/stations")]
pub async fn list_stations(http_request: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let stations = app_state.stations_service.get_stations_list().instrument(span).await?;
    Ok(HttpResponse::Ok().json(stations.into_iter().map(StationElement::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to retrieve the measurements of a station for a pollutant and matrix.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listStationData", trace_id = get_trace_id(&http_request)))]
#[get("/station-data")]
pub async fn list_station_data(http_request: HttpRequest, query: web::Query<StationDataQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let input = StationDataInputType::try_from(query.into_inner())?;
    let measurements = app_state.stations_service.get_station_data(input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(measurements.into_iter().map(MeasurementElement::from).collect::<Vec<_>>()))
}

/**
 * Endpoint to retrieve the distinct pollutants of a station and matrix.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listUniquePollutants", trace_id = get_trace_id(&http_request)))]
#[get("/unique-pollutants")]
pub async fn list_unique_pollutants(http_request: HttpRequest, query: web::Query<UniquePollutantsQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let input = UniquePollutantsInputType::try_from(query.into_inner())?;
    let pollutants = app_state.stations_service.get_unique_pollutants(input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(pollutants))
}

/**
 * Endpoint to retrieve the distinct matrices of a station.
 */
#[instrument(level = "info", skip(http_request, app_state), fields(service = "listUniqueMatrices", trace_id = get_trace_id(&http_request)))]
#[get("/unique-matrices")]
pub async fn list_unique_matrices(http_request: HttpRequest, query: web::Query<UniqueMatricesQuery>, app_state: web::Data<AppState>) -> Result<HttpResponse, ApplicationError> {
    let span = tracing::Span::current();
    let input = UniqueMatricesInputType::try_from(query.into_inner())?;
    let matrices = app_state.stations_service.get_unique_matrices(input).instrument(span).await?;
    Ok(HttpResponse::Ok().json(matrices))
}

/**
 * Retrieves the trace ID from the HTTP request headers.
 * If the trace ID is not present, a new UUID is generated.
 */
fn get_trace_id(http_request: &HttpRequest) -> String {
    http_request.headers().get("X-Trace-ID").and_then(|v| v.to_str().ok().map(std::string::ToString::to_string)).unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use actix_files::Files;
    use actix_web::{
        App,
        http::{StatusCode, header::CONTENT_TYPE},
        middleware::from_fn,
        test::{self, TestRequest},
    };
    use serde_json::{Value, json};
    use sqlx::{Pool, Sqlite};

    use super::*;
    use crate::{
        api::{middleware::timing_middleware, rest::query_config},
        dao::{
            fixtures::{init_db, init_empty_db},
            stations::StationsDao,
        },
        service::stations::StationsService,
    };

    fn app_state(pool: Pool<Sqlite>, require_coordinates: bool) -> web::Data<AppState> {
        web::Data::new(AppState::new(StationsService::new(StationsDao::new(), pool, require_coordinates)))
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .wrap(from_fn(timing_middleware))
                    .app_data($state)
                    .app_data(query_config())
                    .service(list_stations)
                    .service(list_station_data)
                    .service(list_unique_pollutants)
                    .service(list_unique_matrices),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_trace_id_exists() {
        let request = TestRequest::default().insert_header(("X-Trace-ID", "test")).to_http_request();
        let trace_id = get_trace_id(&request);
        assert_eq!(trace_id, "test");
    }

    #[actix_web::test]
    async fn test_get_trace_id_not_exists() {
        let request = TestRequest::default().to_http_request();
        let trace_id = get_trace_id(&request);
        assert!(!trace_id.is_empty());
    }

    #[actix_web::test]
    async fn test_list_stations() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/stations").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        let body: Value = test::read_body_json(response).await;
        assert_eq!(
            body,
            json!([
                {"code": "S1", "latitude": 45.0, "longitude": -122.0},
                {"code": "S2", "latitude": null, "longitude": null},
                {"code": "S3", "latitude": 40.5, "longitude": -120.25}
            ])
        );
    }

    #[actix_web::test]
    async fn test_list_stations_require_coordinates() {
        let app = test_app!(app_state(init_db().await, true));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/stations").to_request()).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_list_stations_empty() {
        let app = test_app!(app_state(init_empty_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/stations").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = test::read_body(response).await;
        assert_eq!(body, "[]".as_bytes());
    }

    #[actix_web::test]
    async fn test_list_station_data_defaults() {
        let app = test_app!(app_state(init_db().await, false));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/station-data?code=S1").to_request()).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row["pollutant"] == "lead" && row["matrix"] == "samplewater"));
        assert_eq!(
            rows[1],
            json!({"id": 2, "matrix": "samplewater", "project": "River Survey", "code": "S1", "pollutant": "lead", "date": "2023-02-05", "time": "10:00", "result": 2.25, "unit": "ug/L"})
        );
    }

    #[actix_web::test]
    async fn test_list_station_data_explicit() {
        let app = test_app!(app_state(init_db().await, false));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/station-data?code=S1&pollutant=zinc&matrix=sediment").to_request()).await;
        assert_eq!(body, json!([{"id": 5, "matrix": "sediment", "project": "Bed Study", "code": "S1", "pollutant": "zinc", "date": "2023-04-01", "time": "08:00", "result": 140.0, "unit": "mg/kg"}]));
    }

    #[actix_web::test]
    async fn test_list_station_data_missing_code() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/station-data?pollutant=lead").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(response).await, "Missing station code".as_bytes());
    }

    #[actix_web::test]
    async fn test_list_station_data_repeated_parameter() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/station-data?code=S1&code=S2").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(response).await, "Invalid query parameters".as_bytes());
    }

    #[actix_web::test]
    async fn test_list_station_data_null_columns() {
        let app = test_app!(app_state(init_db().await, false));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/station-data?code=S2&pollutant=nitrate&matrix=groundwater").to_request()).await;
        assert_eq!(
            body,
            json!([{"id": 10, "matrix": "groundwater", "project": null, "code": "S2", "pollutant": "nitrate", "date": null, "time": null, "result": null, "unit": null}])
        );
    }

    #[actix_web::test]
    async fn test_list_station_data_without_results_is_server_error() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/station-data?code=S3").to_request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(response).await, "Internal server error".as_bytes());
    }

    #[actix_web::test]
    async fn test_list_unique_pollutants() {
        let app = test_app!(app_state(init_db().await, false));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/unique-pollutants?code=S1&matrix=sediment").to_request()).await;
        assert_eq!(body, json!(["zinc"]));
    }

    #[actix_web::test]
    async fn test_list_unique_pollutants_missing_parameters() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/unique-pollutants?code=S1").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let response = test::call_service(&app, TestRequest::get().uri("/unique-pollutants?matrix=samplewater").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_unique_matrices() {
        let app = test_app!(app_state(init_db().await, false));
        let body: Value = test::call_and_read_body_json(&app, TestRequest::get().uri("/unique-matrices?code=S1").to_request()).await;
        assert_eq!(body, json!(["samplewater", "sediment"]));
    }

    #[actix_web::test]
    async fn test_list_unique_matrices_missing_code() {
        let app = test_app!(app_state(init_db().await, false));
        let response = test::call_service(&app, TestRequest::get().uri("/unique-matrices").to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_static_files_after_api_routes() {
        let static_dir = std::env::temp_dir().join(format!("water_quality_api_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<html>map</html>").unwrap();
        let app = test::init_service(App::new().app_data(app_state(init_db().await, false)).service(list_stations).service(Files::new("/", &static_dir).index_file("index.html"))).await;
        let index = test::call_and_read_body(&app, TestRequest::get().uri("/").to_request()).await;
        assert_eq!(index, "<html>map</html>".as_bytes());
        let response = test::call_service(&app, TestRequest::get().uri("/stations").to_request()).await;
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        std::fs::remove_dir_all(&static_dir).unwrap();
    }
}
