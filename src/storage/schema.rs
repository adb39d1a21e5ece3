//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Kniss-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track harvest runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    category_slug TEXT NOT NULL,
    status TEXT NOT NULL,
    pages_processed INTEGER NOT NULL DEFAULT 0,
    records_emitted INTEGER NOT NULL DEFAULT 0,
    stop_reason TEXT
);

-- One row per emitted listing record. Listing and city value columns hold
-- the JSON text of the value the server sent; NULL when it was absent.
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    page INTEGER NOT NULL,
    position INTEGER NOT NULL,
    listing_id TEXT,
    title TEXT,
    description TEXT,
    price TEXT,
    price_preview TEXT,
    price_unit TEXT,
    created_at TEXT,
    store_id TEXT,
    store_name TEXT,
    store_slug TEXT,
    default_media TEXT,
    UNIQUE(run_id, page, position)
);

CREATE INDEX IF NOT EXISTS idx_listings_run ON listings(run_id);
CREATE INDEX IF NOT EXISTS idx_listings_listing_id ON listings(listing_id);

-- Cities of each listing, in server order
CREATE TABLE IF NOT EXISTS listing_cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    listing_row_id INTEGER NOT NULL REFERENCES listings(id),
    position INTEGER NOT NULL,
    city_id TEXT,
    name TEXT,
    region TEXT,
    UNIQUE(listing_row_id, position)
);

CREATE INDEX IF NOT EXISTS idx_listing_cities_listing ON listing_cities(listing_row_id);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
