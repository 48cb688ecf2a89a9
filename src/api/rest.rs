use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{MeasurementType, StationDataInputType, StationType, UniqueMatricesInputType, UniquePollutantsInputType},
};

/***************** Stations models *********************/

/**
 * Station element in the stations list response.
 */
#[derive(Debug, Serialize)]
pub struct StationElement {
    code: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<StationType> for StationElement {
    fn from(station: StationType) -> Self {
        StationElement { code: station.code, latitude: station.latitude, longitude: station.longitude }
    }
}

/***************** Station data models *********************/

/**
 * Query parameters for the station data endpoint.
 */
#[derive(Debug, Deserialize)]
pub struct StationDataQuery {
    pub code: Option<String>,
    pub pollutant: Option<String>,
    pub matrix: Option<String>,
}

/**
 * Measurement element in the station data response.
 *
 * Field names match the columns of the results table.
 */
#[derive(Debug, Serialize)]
pub struct MeasurementElement {
    id: i64,
    matrix: String,
    project: Option<String>,
    code: String,
    pollutant: String,
    date: Option<String>,
    time: Option<String>,
    result: Option<f64>,
    unit: Option<String>,
}

impl From<MeasurementType> for MeasurementElement {
    fn from(measurement: MeasurementType) -> Self {
        MeasurementElement {
            id: measurement.id,
            matrix: measurement.matrix,
            project: measurement.project,
            code: measurement.code,
            pollutant: measurement.pollutant,
            date: measurement.date,
            time: measurement.time,
            result: measurement.result,
            unit: measurement.unit,
        }
    }
}

impl TryFrom<StationDataQuery> for StationDataInputType {
    type Error = ApplicationError;

    fn try_from(query: StationDataQuery) -> Result<Self, Self::Error> {
        let code = required(query.code, "Missing station code")?;
        Ok(StationDataInputType { code, pollutant: non_empty(query.pollutant), matrix: non_empty(query.matrix) })
    }
}

/***************** Unique values models *********************/

/**
 * Query parameters for the unique pollutants endpoint.
 */
#[derive(Debug, Deserialize)]
pub struct UniquePollutantsQuery {
    pub code: Option<String>,
    pub matrix: Option<String>,
}

impl TryFrom<UniquePollutantsQuery> for UniquePollutantsInputType {
    type Error = ApplicationError;

    fn try_from(query: UniquePollutantsQuery) -> Result<Self, Self::Error> {
        let code = required(query.code, "Missing station code")?;
        let matrix = required(query.matrix, "Missing matrix")?;
        Ok(UniquePollutantsInputType { code, matrix })
    }
}

/**
 * Query parameters for the unique matrices endpoint.
 */
#[derive(Debug, Deserialize)]
pub struct UniqueMatricesQuery {
    pub code: Option<String>,
}

impl TryFrom<UniqueMatricesQuery> for UniqueMatricesInputType {
    type Error = ApplicationError;

    fn try_from(query: UniqueMatricesQuery) -> Result<Self, Self::Error> {
        let code = required(query.code, "Missing station code")?;
        Ok(UniqueMatricesInputType { code })
    }
}

/**
 * An empty query parameter counts as absent.
 */
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn required(value: Option<String>, message: &str) -> Result<String, ApplicationError> {
    non_empty(value).ok_or_else(|| ApplicationError::new(ErrorType::Validation, message.to_string()))
}

/**
 * Query extractor configuration. Malformed query strings, e.g. a repeated parameter,
 * are answered with a fixed message instead of the deserializer text.
 */
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _http_request| {
        tracing::debug!("Rejected query string: {}", err);
        ApplicationError::new(ErrorType::Validation, INVALID_QUERY_MESSAGE.to_string()).into()
    })
}

/***************** Error models *********************/

/**
 * Message returned when the query string cannot be parsed.
 */
const INVALID_QUERY_MESSAGE: &str = "Invalid query parameters";

/**
 * Message returned for all server side failures. Details are only logged.
 */
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        get_statuscode(&self.error_type)
    }

    /**
     * Generates a plain text error response for the application error.
     */
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = if status_code.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.message.clone()
        };
        HttpResponse::build(status_code).content_type("text/plain; charset=utf-8").body(message)
    }
}

/**
* Maps application errors to HTTP status codes.
*
* # Arguments
* `application_error`: The type of error that occurred.
*
* # Returns
* The corresponding HTTP status code.
*/
fn get_statuscode(application_error: &ErrorType) -> StatusCode {
    match application_error {
        ErrorType::Validation => StatusCode::BAD_REQUEST,
        ErrorType::Initialization | ErrorType::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
