use sqlx::{Pool, Sqlite, sqlite::SqlitePoolOptions};

const SCHEMA: [&str; 2] = [
    "CREATE TABLE stations (code TEXT PRIMARY KEY, latitude REAL, longitude REAL)",
    "CREATE TABLE results (id INTEGER PRIMARY KEY, matrix TEXT, project TEXT, code TEXT, pollutant TEXT, date TEXT, time TEXT, result REAL, unit TEXT)",
];

const STATIONS: [(&str, Option<f64>, Option<f64>); 3] = [("S1", Some(45.0), Some(-122.0)), ("S2", None, None), ("S3", Some(40.5), Some(-120.25))];

const RESULTS: [(i64, &str, &str, &str, &str, &str, &str, f64, &str); 9] = [
    (1, "samplewater", "River Survey", "S1", "lead", "2023-01-05", "09:30", 1.5, "ug/L"),
    (2, "samplewater", "River Survey", "S1", "lead", "2023-02-05", "10:00", 2.25, "ug/L"),
    (3, "samplewater", "River Survey", "S1", "lead", "2023-03-05", "11:15", 0.75, "ug/L"),
    (4, "samplewater", "River Survey", "S1", "copper", "2023-01-05", "09:30", 12.0, "ug/L"),
    (5, "sediment", "Bed Study", "S1", "zinc", "2023-04-01", "08:00", 140.0, "mg/kg"),
    (6, "samplewater", "Lake Watch", "S2", "cadmium", "2022-06-10", "14:00", 0.1, "ug/L"),
    (7, "samplewater", "Lake Watch", "S2", "arsenic", "2022-06-10", "14:00", 3.2, "ug/L"),
    (8, "samplewater", "Lake Watch", "S2", "cadmium", "2022-07-10", "14:00", 0.2, "ug/L"),
    (9, "samplewater", "Lake Watch", "S2", "arsenic", "2022-07-10", "14:00", 2.9, "ug/L"),
];

/**
 * Creates an in-memory database holding a small set of stations and results.
 */
pub async fn init_db() -> Pool<Sqlite> {
    let pool = init_empty_db().await;
    for (code, latitude, longitude) in STATIONS {
        sqlx::query("INSERT INTO stations (code, latitude, longitude) VALUES (?, ?, ?)").bind(code).bind(latitude).bind(longitude).execute(&pool).await.unwrap();
    }
    for (id, matrix, project, code, pollutant, date, time, result, unit) in RESULTS {
        sqlx::query("INSERT INTO results (id, matrix, project, code, pollutant, date, time, result, unit) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(matrix)
            .bind(project)
            .bind(code)
            .bind(pollutant)
            .bind(date)
            .bind(time)
            .bind(result)
            .bind(unit)
            .execute(&pool)
            .await
            .unwrap();
    }
    // Row with every optional column left NULL.
    sqlx::query("INSERT INTO results (id, matrix, code, pollutant) VALUES (10, 'groundwater', 'S2', 'nitrate')").execute(&pool).await.unwrap();
    pool
}

/**
 * Creates an in-memory database with empty tables.
 *
 * The pool is limited to a single connection that never expires, each new
 * connection to `sqlite::memory:` would otherwise see an empty database.
 */
pub async fn init_empty_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new().max_connections(1).min_connections(1).idle_timeout(None).max_lifetime(None).connect("sqlite::memory:").await.unwrap();
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await.unwrap();
    }
    pool
}
