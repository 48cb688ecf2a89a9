use sqlx::SqliteConnection;
use tracing::{Instrument, instrument};

use crate::model::{
    apperror::{ApplicationError, ErrorType},
    models::{MeasurementType, StationType},
};

/**
 * Database response type for querying the station list.
 */
pub type QueryStationListDbResp = (String, Option<f64>, Option<f64>);

/**
 * Database response type for querying the measurements of a station.
 */
pub type QueryStationDataDbResp = (i64, String, Option<String>, String, String, Option<String>, Option<String>, Option<f64>, Option<String>);

/**
 * SQL query to retrieve all stations.
 */
const QUERY_STATIONS_LIST: &str = "SELECT code, CAST(latitude AS REAL), CAST(longitude AS REAL) FROM stations";

/**
 * SQL query to retrieve the stations that have coordinates.
 */
const QUERY_STATIONS_WITH_COORDINATES_LIST: &str =
    "SELECT code, CAST(latitude AS REAL), CAST(longitude AS REAL) FROM stations WHERE latitude IS NOT NULL AND longitude IS NOT NULL";

/**
 * SQL query to find the pollutant with the most results for a station. Ties go to the lowest name.
 */
const QUERY_MOST_MEASURED_POLLUTANT: &str = "SELECT pollutant FROM results WHERE code = ? GROUP BY pollutant ORDER BY COUNT(*) DESC, pollutant ASC LIMIT 1";

/**
 * SQL query to retrieve the measurements of a station for one pollutant and matrix.
 */
const QUERY_STATION_DATA: &str = "SELECT id, matrix, project, code, pollutant, date, time, CAST(result AS REAL), unit
                                  FROM results
                                  WHERE code = ? AND pollutant = ? AND matrix = ?
                                  ORDER BY id";

/**
 * SQL query to retrieve the distinct pollutants of a station and matrix.
 */
const QUERY_UNIQUE_POLLUTANTS: &str = "SELECT DISTINCT pollutant FROM results WHERE code = ? AND matrix = ?";

/**
 * SQL query to retrieve the distinct matrices of a station.
 */
const QUERY_UNIQUE_MATRICES: &str = "SELECT DISTINCT matrix FROM results WHERE code = ? ORDER BY matrix ASC";

/**
 * DAO for station and measurement queries.
 */
pub struct StationsDao {}

impl StationsDao {
    /**
     * Creates a new instance of `StationsDao`.
     *
     * # Returns
     * A new instance of `StationsDao`.
     */
    pub fn new() -> Self {
        StationsDao {}
    }

    /**
     * Retrieves the list of stations.
     *
     * # Arguments
     * `connection`: The database connection.
     * `require_coordinates`: Skip stations missing latitude or longitude.
     *
     * # Returns
     * A Result containing the stations in database order or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_stations_list(&self, connection: &mut SqliteConnection, require_coordinates: bool) -> Result<Vec<StationType>, ApplicationError> {
        let span = tracing::Span::current();
        let query = if require_coordinates { QUERY_STATIONS_WITH_COORDINATES_LIST } else { QUERY_STATIONS_LIST };
        let results: Vec<QueryStationListDbResp> = sqlx::query_as(query)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get station list: {err}")))?;
        Ok(results.into_iter().map(StationType::from).collect())
    }

    /**
     * Finds the pollutant with the highest number of results for a station.
     *
     * # Arguments
     * `connection`: The database connection.
     * `code`: The station code.
     *
     * # Returns
     * A Result containing the pollutant, `None` if the station has no results, or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_most_measured_pollutant(&self, connection: &mut SqliteConnection, code: &str) -> Result<Option<String>, ApplicationError> {
        let span = tracing::Span::current();
        let result: Option<(String,)> = sqlx::query_as(QUERY_MOST_MEASURED_POLLUTANT)
            .bind(code)
            .fetch_optional(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get most measured pollutant: {err}")))?;
        Ok(result.map(|(pollutant,)| pollutant))
    }

    /**
     * Retrieves the measurements matching a station, pollutant and matrix.
     *
     * # Arguments
     * `connection`: The database connection.
     * `code`: The station code.
     * `pollutant`: The pollutant name.
     * `matrix`: The sample matrix.
     *
     * # Returns
     * A Result containing the measurements or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_station_data(&self, connection: &mut SqliteConnection, code: &str, pollutant: &str, matrix: &str) -> Result<Vec<MeasurementType>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<QueryStationDataDbResp> = sqlx::query_as(QUERY_STATION_DATA)
            .bind(code)
            .bind(pollutant)
            .bind(matrix)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get station data: {err}")))?;
        Ok(results.into_iter().map(MeasurementType::from).collect())
    }

    /**
     * Retrieves the distinct pollutants measured at a station in a matrix.
     *
     * # Arguments
     * `connection`: The database connection.
     * `code`: The station code.
     * `matrix`: The sample matrix.
     *
     * # Returns
     * A Result containing the pollutants or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_unique_pollutants(&self, connection: &mut SqliteConnection, code: &str, matrix: &str) -> Result<Vec<String>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<(String,)> = sqlx::query_as(QUERY_UNIQUE_POLLUTANTS)
            .bind(code)
            .bind(matrix)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get unique pollutants: {err}")))?;
        Ok(results.into_iter().map(|(pollutant,)| pollutant).collect())
    }

    /**
     * Retrieves the distinct matrices sampled at a station, sorted ascending.
     *
     * # Arguments
     * `connection`: The database connection.
     * `code`: The station code.
     *
     * # Returns
     * A Result containing the matrices or an `ApplicationError`.
     */
    #[instrument(skip(self, connection), fields(result))]
    pub async fn get_unique_matrices(&self, connection: &mut SqliteConnection, code: &str) -> Result<Vec<String>, ApplicationError> {
        let span = tracing::Span::current();
        let results: Vec<(String,)> = sqlx::query_as(QUERY_UNIQUE_MATRICES)
            .bind(code)
            .fetch_all(connection)
            .instrument(span)
            .await
            .map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to execute query to get unique matrices: {err}")))?;
        Ok(results.into_iter().map(|(matrix,)| matrix).collect())
    }
}

impl From<QueryStationListDbResp> for StationType {
    fn from(row: QueryStationListDbResp) -> Self {
        StationType::new(row.0, row.1, row.2)
    }
}

impl From<QueryStationDataDbResp> for MeasurementType {
    fn from(row: QueryStationDataDbResp) -> Self {
        MeasurementType::new(row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7, row.8)
    }
}
