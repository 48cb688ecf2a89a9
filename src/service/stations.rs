use sqlx::{Pool, Sqlite, SqliteConnection, pool::PoolConnection};

use crate::{
    dao::stations::StationsDao,
    model::{
        apperror::{ApplicationError, ErrorType},
        models::{MeasurementType, StationDataInputType, StationType, UniqueMatricesInputType, UniquePollutantsInputType},
    },
};

/**
 * Matrix used when the caller does not ask for one.
 */
pub const DEFAULT_MATRIX: &str = "samplewater";

/**
 * Represents the service for querying stations and their measurements.
 */
pub struct StationsService {
    /**
     * The DAO for station queries.
     */
    stations_dao: StationsDao,
    /**
     * Connection pool for the read-only database.
     */
    connection_pool: Pool<Sqlite>,
    /**
     * Only list stations that have coordinates.
     */
    require_coordinates: bool,
}

impl StationsService {
    /**
     * Creates a new instance of `StationsService`.
     *
     * # Arguments
     * `stations_dao`: The DAO for station queries.
     * `connection_pool`: Connection pool for database operations.
     * `require_coordinates`: Only list stations that have coordinates.
     *
     * # Returns
     * A new instance of `StationsService`.
     */
    pub fn new(stations_dao: StationsDao, connection_pool: Pool<Sqlite>, require_coordinates: bool) -> Self {
        StationsService { stations_dao, connection_pool, require_coordinates }
    }

    /**
     * Retrieves all stations.
     *
     * # Returns
     * A Result containing the stations or an `ApplicationError`.
     */
    pub async fn get_stations_list(&self) -> Result<Vec<StationType>, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.stations_dao.get_stations_list(&mut connection, self.require_coordinates).await
    }

    /**
     * Retrieves the measurements of a station.
     *
     * A missing pollutant resolves to the pollutant with the most results at the station,
     * a missing matrix resolves to `DEFAULT_MATRIX`.
     *
     * # Arguments
     * `input`: The station code with optional pollutant and matrix.
     *
     * # Returns
     * A Result containing the measurements or an `ApplicationError`.
     */
    pub async fn get_station_data(&self, input: StationDataInputType) -> Result<Vec<MeasurementType>, ApplicationError> {
        let mut connection = self.acquire().await?;
        let pollutant = match input.pollutant {
            Some(pollutant) => pollutant,
            None => self.resolve_pollutant(&mut connection, &input.code).await?,
        };
        let matrix = input.matrix.unwrap_or_else(|| DEFAULT_MATRIX.to_string());
        self.stations_dao.get_station_data(&mut connection, &input.code, &pollutant, &matrix).await
    }

    /**
     * Retrieves the distinct pollutants of a station and matrix.
     *
     * # Arguments
     * `input`: The station code and matrix.
     *
     * # Returns
     * A Result containing the pollutants or an `ApplicationError`.
     */
    pub async fn get_unique_pollutants(&self, input: UniquePollutantsInputType) -> Result<Vec<String>, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.stations_dao.get_unique_pollutants(&mut connection, &input.code, &input.matrix).await
    }

    /**
     * Retrieves the distinct matrices of a station.
     *
     * # Arguments
     * `input`: The station code.
     *
     * # Returns
     * A Result containing the matrices sorted ascending or an `ApplicationError`.
     */
    pub async fn get_unique_matrices(&self, input: UniqueMatricesInputType) -> Result<Vec<String>, ApplicationError> {
        let mut connection = self.acquire().await?;
        self.stations_dao.get_unique_matrices(&mut connection, &input.code).await
    }

    async fn resolve_pollutant(&self, connection: &mut SqliteConnection, code: &str) -> Result<String, ApplicationError> {
        let pollutant = self.stations_dao.get_most_measured_pollutant(connection, code).await?;
        let Some(pollutant) = pollutant else {
            return Err(ApplicationError::new(ErrorType::DatabaseError, format!("No pollutant found for station {code}")));
        };
        tracing::debug!("Resolved default pollutant {} for station {}", pollutant, code);
        Ok(pollutant)
    }

    /**
     * Acquires a connection for the duration of one request. It returns to the pool when dropped.
     */
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, ApplicationError> {
        self.connection_pool.acquire().await.map_err(|err| ApplicationError::new(ErrorType::DatabaseError, format!("Failed to acquire database connection: {err}")))
    }
}
