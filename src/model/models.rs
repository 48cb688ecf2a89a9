/**
 * Monitoring station as read from the stations table.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct StationType {
    pub code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StationType {
    pub fn new(code: String, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        StationType { code, latitude, longitude }
    }
}

/**
 * A single measurement result as read from the results table.
 *
 * Matrix, code and pollutant are always set since rows are selected on them,
 * the remaining columns may be NULL in the source data.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementType {
    pub id: i64,
    pub matrix: String,
    pub project: Option<String>,
    pub code: String,
    pub pollutant: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub result: Option<f64>,
    pub unit: Option<String>,
}

impl MeasurementType {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        matrix: String,
        project: Option<String>,
        code: String,
        pollutant: String,
        date: Option<String>,
        time: Option<String>,
        result: Option<f64>,
        unit: Option<String>,
    ) -> Self {
        MeasurementType { id, matrix, project, code, pollutant, date, time, result, unit }
    }
}

/**
 * Input for listing the measurements of a station.
 *
 * Pollutant and matrix are optional, the service resolves defaults for them.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct StationDataInputType {
    pub code: String,
    pub pollutant: Option<String>,
    pub matrix: Option<String>,
}

/**
 * Input for listing distinct pollutants of a station and matrix.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct UniquePollutantsInputType {
    pub code: String,
    pub matrix: String,
}

/**
 * Input for listing distinct matrices of a station.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueMatricesInputType {
    pub code: String,
}
