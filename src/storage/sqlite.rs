//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::listing::{CityRecord, ListingRecord, StoreRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RunTotals, Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::HarvestError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, category_slug, status,
     pages_processed, records_emitted, stop_reason";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path` and applies the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn load_cities(&self, listing_row_id: i64) -> StorageResult<Vec<CityRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT city_id, name, region FROM listing_cities
             WHERE listing_row_id = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![listing_row_id], |row| {
            Ok(CityRecord {
                id: decode_value(row, 0)?,
                name: decode_value(row, 1)?,
                region: decode_value(row, 2)?,
            })
        })?;

        let mut cities = Vec::new();
        for row in rows {
            cities.push(row?);
        }
        Ok(cities)
    }
}

/// JSON text of a record scalar; `null` is stored as SQL NULL
fn encode_value(value: &Value) -> Option<String> {
    if value.is_null() {
        None
    } else {
        Some(value.to_string())
    }
}

fn decode_value(row: &Row<'_>, index: usize) -> rusqlite::Result<Value> {
    match row.get::<_, Option<String>>(index)? {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))),
        None => Ok(Value::Null),
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        category_slug: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
        pages_processed: row.get(6)?,
        records_emitted: row.get::<_, i64>(7)? as u64,
        stop_reason: row.get(8)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, category_slug: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, category_slug, status) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, category_slug, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM runs ORDER BY id DESC", RUN_COLUMNS))?;
        let rows = stmt.query_map([], run_from_row)?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(row?);
        }
        Ok(runs)
    }

    fn finish_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_processed = ?3,
             records_emitted = ?4, stop_reason = ?5 WHERE id = ?6",
            params![
                totals.status.to_db_string(),
                now,
                totals.pages_processed,
                totals.records_emitted as i64,
                totals.stop_reason,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Listings =====

    fn insert_listings(
        &mut self,
        run_id: i64,
        page: u32,
        records: &[ListingRecord],
    ) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;

        {
            let mut insert_listing = tx.prepare(
                "INSERT INTO listings (run_id, page, position, listing_id, title, description,
                 price, price_preview, price_unit, created_at, store_id, store_name, store_slug,
                 default_media)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            let mut insert_city = tx.prepare(
                "INSERT INTO listing_cities (listing_row_id, position, city_id, name, region)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for (position, record) in records.iter().enumerate() {
                let listing_row_id = insert_listing.insert(params![
                    run_id,
                    page,
                    position as i64,
                    encode_value(&record.id),
                    encode_value(&record.title),
                    encode_value(&record.description),
                    encode_value(&record.price),
                    encode_value(&record.price_preview),
                    encode_value(&record.price_unit),
                    encode_value(&record.created_at),
                    encode_value(&record.store.id),
                    encode_value(&record.store.name),
                    encode_value(&record.store.slug),
                    encode_value(&record.default_media),
                ])?;

                for (city_position, city) in record.cities.iter().enumerate() {
                    insert_city.execute(params![
                        listing_row_id,
                        city_position as i64,
                        encode_value(&city.id),
                        encode_value(&city.name),
                        encode_value(&city.region)
                    ])?;
                }
            }
        }

        tx.commit()?;
        Ok(records.len())
    }

    fn load_listings_for_run(&self, run_id: i64) -> StorageResult<Vec<ListingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, page, listing_id, title, description, price, price_preview, price_unit,
             created_at, store_id, store_name, store_slug, default_media
             FROM listings WHERE run_id = ?1 ORDER BY page, position",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            let row_id: i64 = row.get(0)?;
            Ok((
                row_id,
                ListingRecord {
                    id: decode_value(row, 2)?,
                    title: decode_value(row, 3)?,
                    description: decode_value(row, 4)?,
                    price: decode_value(row, 5)?,
                    cities: Vec::new(),
                    store: StoreRecord {
                        id: decode_value(row, 9)?,
                        name: decode_value(row, 10)?,
                        slug: decode_value(row, 11)?,
                    },
                    default_media: decode_value(row, 12)?,
                    created_at: decode_value(row, 8)?,
                    price_preview: decode_value(row, 6)?,
                    price_unit: decode_value(row, 7)?,
                    page: row.get(1)?,
                },
            ))
        })?;

        let mut listings = Vec::new();
        for row in rows {
            let (row_id, mut record) = row?;
            record.cities = self.load_cities(row_id)?;
            listings.push(record);
        }
        Ok(listings)
    }

    // ===== Statistics =====

    fn count_listings(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_listings_for_run(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM listings WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_distinct_listings(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT listing_id) FROM listings WHERE listing_id IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, page: u32) -> ListingRecord {
        ListingRecord {
            id: json!(id),
            title: json!(format!("Listing {}", id)),
            description: Value::Null,
            price: json!(1_250_000),
            cities: vec![
                CityRecord {
                    id: json!("31"),
                    name: json!("Oran"),
                    region: json!("Oran"),
                },
                CityRecord::default(),
            ],
            store: StoreRecord::default(),
            default_media: json!("https://cdn.example.com/a.jpg"),
            created_at: json!("2024-01-01T00:00:00Z"),
            price_preview: json!("125 Millions"),
            price_unit: json!("MILLION"),
            page,
        }
    }

    fn totals(status: RunStatus) -> RunTotals {
        RunTotals {
            status,
            pages_processed: 2,
            records_emitted: 3,
            stop_reason: "last_page_reached".to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStorage::new_in_memory().is_ok());
    }

    #[test]
    fn test_create_and_get_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash", "automobiles_vehicules").unwrap();
        assert!(run_id > 0);

        let run = storage.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(run.category_slug, "automobiles_vehicules");
        assert!(run.finished_at.is_none());
    }

    #[test]
    fn test_get_missing_run() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.get_run(99),
            Err(StorageError::RunNotFound(99))
        ));
    }

    #[test]
    fn test_finish_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash", "motos").unwrap();

        storage
            .finish_run(run_id, &totals(RunStatus::Completed))
            .unwrap();

        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.pages_processed, 2);
        assert_eq!(run.records_emitted, 3);
        assert_eq!(run.stop_reason.as_deref(), Some("last_page_reached"));
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_finish_missing_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(storage
            .finish_run(7, &totals(RunStatus::Completed))
            .is_err());
    }

    #[test]
    fn test_insert_and_load_listings() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash", "automobiles_vehicules").unwrap();

        let page1 = vec![record("b", 1), record("a", 1)];
        let page2 = vec![record("c", 2)];
        assert_eq!(storage.insert_listings(run_id, 1, &page1).unwrap(), 2);
        assert_eq!(storage.insert_listings(run_id, 2, &page2).unwrap(), 1);

        let loaded = storage.load_listings_for_run(run_id).unwrap();
        let mut expected = page1.clone();
        expected.extend(page2);
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_counts() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_run("hash", "automobiles_vehicules").unwrap();
        let second = storage.create_run("hash", "automobiles_vehicules").unwrap();

        storage
            .insert_listings(first, 1, &[record("a", 1), record("b", 1)])
            .unwrap();
        storage.insert_listings(second, 1, &[record("a", 1)]).unwrap();

        assert_eq!(storage.count_listings().unwrap(), 3);
        assert_eq!(storage.count_listings_for_run(first).unwrap(), 2);
        assert_eq!(storage.count_distinct_listings().unwrap(), 2);
        assert_eq!(storage.list_runs().unwrap().len(), 2);
        assert_eq!(storage.list_runs().unwrap()[0].id, second);
    }

    #[test]
    fn test_scalar_types_survive_storage() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash", "automobiles_vehicules").unwrap();

        let original = ListingRecord {
            id: json!(38211459),
            title: json!(true),
            description: json!({"fr": "Bon état"}),
            price: json!("Négociable"),
            cities: vec![CityRecord {
                id: json!(16),
                name: json!("175"),
                region: Value::Null,
            }],
            store: StoreRecord {
                id: json!(77),
                name: json!("Auto Plus"),
                slug: Value::Null,
            },
            default_media: Value::Null,
            created_at: json!(1709374500),
            price_preview: json!(12.5),
            price_unit: json!(["MILLION"]),
            page: 1,
        };
        storage
            .insert_listings(run_id, 1, std::slice::from_ref(&original))
            .unwrap();

        let loaded = storage.load_listings_for_run(run_id).unwrap();
        assert_eq!(loaded, vec![original]);
    }

    #[test]
    fn test_corrupt_value_column_is_an_error() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("hash", "automobiles_vehicules").unwrap();
        storage.insert_listings(run_id, 1, &[record("a", 1)]).unwrap();

        storage
            .conn
            .execute("UPDATE listings SET title = 'not json'", [])
            .unwrap();

        assert!(storage.load_listings_for_run(run_id).is_err());
    }
}
