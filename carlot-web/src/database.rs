//! SQLite-backed listing storage
//!
//! One `cars` table, created and seeded on first open. Every user-supplied
//! value reaches SQLite as a bound parameter.

use async_trait::async_trait;
use carlot_core::{seed_listings, CarlotError, CarlotResult, Listing, ListingStore, NewListing};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row, SqlitePool,
};
use std::path::Path;

const SEARCH_ALL: &str = "SELECT id, make, model, year, price, description FROM cars ORDER BY id";

const SEARCH_MATCHING: &str = r"SELECT id, make, model, year, price, description FROM cars
    WHERE make LIKE ? ESCAPE '\'
       OR model LIKE ? ESCAPE '\'
       OR CAST(year AS TEXT) LIKE ? ESCAPE '\'
       OR CAST(price AS TEXT) LIKE ? ESCAPE '\'
       OR description LIKE ? ESCAPE '\'
    ORDER BY id";

/// Placeholders in [`SEARCH_MATCHING`]
const SEARCH_COLUMNS: usize = 5;

/// Listing store over a SQLite connection pool
pub struct SqliteListingStore {
    pool: SqlitePool,
}

impl SqliteListingStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn open(path: &Path) -> CarlotResult<Self> {
        tracing::info!("Opening listings database: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::info!("Creating parent directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| CarlotError::storage("connect", e))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating and seeding the table when needed
    pub async fn from_pool(pool: SqlitePool) -> CarlotResult<Self> {
        Self::create_tables(&pool).await?;
        Self::seed_if_empty(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> CarlotResult<()> {
        tracing::debug!("Creating cars table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cars (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                make TEXT,
                model TEXT,
                year INTEGER,
                price INTEGER,
                description TEXT
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| CarlotError::storage("create_cars_table", e))?;

        Ok(())
    }

    async fn seed_if_empty(pool: &SqlitePool) -> CarlotResult<()> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| CarlotError::storage("seed_listings", e))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| CarlotError::storage("seed_listings", e))?;

        if count > 0 {
            return Ok(());
        }

        let seed = seed_listings();
        for listing in &seed {
            insert_query(listing)
                .execute(&mut *tx)
                .await
                .map_err(|e| CarlotError::storage("seed_listings", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| CarlotError::storage("seed_listings", e))?;

        tracing::info!(count = seed.len(), "Seeded listings table");
        Ok(())
    }
}

fn insert_query(
    listing: &NewListing,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query("INSERT INTO cars (make, model, year, price, description) VALUES (?, ?, ?, ?, ?)")
        .bind(&listing.make)
        .bind(&listing.model)
        .bind(listing.year)
        .bind(listing.price)
        .bind(&listing.description)
}

/// `%term%` with LIKE metacharacters escaped by `\`
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn listing_from_row(row: &SqliteRow) -> Result<Listing, sqlx::Error> {
    Ok(Listing {
        id: row.try_get("id")?,
        make: row.try_get::<Option<String>, _>("make")?.unwrap_or_default(),
        model: row.try_get::<Option<String>, _>("model")?.unwrap_or_default(),
        year: row.try_get::<Option<i64>, _>("year")?.unwrap_or_default(),
        price: row.try_get::<Option<i64>, _>("price")?.unwrap_or_default(),
        description: row
            .try_get::<Option<String>, _>("description")?
            .unwrap_or_default(),
    })
}

#[async_trait]
impl ListingStore for SqliteListingStore {
    async fn search(&self, term: &str) -> CarlotResult<Vec<Listing>> {
        // Blank terms list everything; others match as typed, spaces included
        let query = if term.trim().is_empty() {
            sqlx::query(SEARCH_ALL)
        } else {
            let pattern = like_pattern(term);
            (0..SEARCH_COLUMNS).fold(sqlx::query(SEARCH_MATCHING), |query, _| {
                query.bind(pattern.clone())
            })
        };

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CarlotError::storage("search_listings", e))?;

        let listings = rows
            .iter()
            .map(listing_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CarlotError::storage("search_listings", e))?;

        tracing::debug!(term = %term, results = listings.len(), "Listing search completed");
        Ok(listings)
    }

    async fn insert(&self, listing: &NewListing) -> CarlotResult<i64> {
        let result = insert_query(listing)
            .execute(&self.pool)
            .await
            .map_err(|e| CarlotError::storage("insert_listing", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn count(&self) -> CarlotResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CarlotError::storage("count_listings", e))
    }
}
