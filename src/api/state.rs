use crate::service::stations::StationsService;

/**
* Represents the application state shared across the Actix web application.
*/
pub struct AppState {
    /**
     * The stations service for handling station and measurement queries.
     */
    pub stations_service: StationsService,
}

/**
 * Creates a new instance of `AppState`.
 *
 * # Arguments
 * `stations_service`: The stations service for handling station and measurement queries.
 */
impl AppState {
    pub fn new(stations_service: StationsService) -> Self {
        AppState { stations_service }
    }
}
