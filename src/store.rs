// src/store.rs
//! SQLite-backed draw history.
//!
//! One row per draw in `results`, keyed by the canonical date. The ingestion
//! core only ever reads the latest date and appends; the read service only
//! queries.

use std::path::Path;

use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::draw::DrawRecord;
use crate::error::PersistenceError;
use crate::ingest::dates::parse_canonical;

const CREATE_RESULTS: &str = "CREATE TABLE IF NOT EXISTS results (
    date     TEXT PRIMARY KEY NOT NULL,
    number_1 INTEGER NOT NULL,
    number_2 INTEGER NOT NULL,
    number_3 INTEGER NOT NULL,
    number_4 INTEGER NOT NULL,
    number_5 INTEGER NOT NULL,
    star_1   INTEGER NOT NULL,
    star_2   INTEGER NOT NULL
)";

const SELECT_COLUMNS: &str =
    "SELECT date, number_1, number_2, number_3, number_4, number_5, star_1, star_2 FROM results";

/// What the ingestion coordinator needs from storage.
pub trait PersistenceGateway: Send + Sync {
    /// Most recent stored draw date, `None` on an empty store.
    fn latest_date(&self) -> Result<Option<NaiveDate>, PersistenceError>;

    /// Append one draw. A second draw for an already stored date is
    /// [`PersistenceError::DuplicateDate`].
    fn insert_draw(&self, record: &DrawRecord) -> Result<(), PersistenceError>;
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for &T {
    fn latest_date(&self) -> Result<Option<NaiveDate>, PersistenceError> {
        (**self).latest_date()
    }

    fn insert_draw(&self, record: &DrawRecord) -> Result<(), PersistenceError> {
        (**self).insert_draw(record)
    }
}

impl<T: PersistenceGateway + ?Sized> PersistenceGateway for std::sync::Arc<T> {
    fn latest_date(&self) -> Result<Option<NaiveDate>, PersistenceError> {
        (**self).latest_date()
    }

    fn insert_draw(&self, record: &DrawRecord) -> Result<(), PersistenceError> {
        (**self).insert_draw(record)
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database for writing, creating the table if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute(CREATE_RESULTS, [])?;
        Ok(Self::from_connection(conn))
    }

    /// Open an existing database for serving; the file and a compatible
    /// `results` table must already exist.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PersistenceError::MissingDatabase(path.to_path_buf()));
        }
        let conn = Connection::open(path)?;

        let has_table: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'results'",
                [],
                |r| r.get(0),
            )
            .optional()?;
        if has_table.is_none() {
            return Err(PersistenceError::Schema("table 'results' not found".into()));
        }
        conn.prepare(&format!("{SELECT_COLUMNS} LIMIT 1"))
            .map_err(|e| PersistenceError::Schema(format!("results columns do not match: {e}")))?;

        // WAL for concurrent readers next to the updater; NORMAL sync is enough for it.
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        tracing::debug!(%mode, "sqlite journal mode");
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(CREATE_RESULTS, [])?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn latest(&self) -> Result<Option<DrawRecord>, PersistenceError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} ORDER BY date DESC LIMIT 1"),
                [],
                raw_row,
            )
            .optional()?;
        row.map(RawRow::into_record).transpose()
    }

    /// Every draw, newest first.
    pub fn all(&self) -> Result<Vec<DrawRecord>, PersistenceError> {
        self.query_many(&format!("{SELECT_COLUMNS} ORDER BY date DESC"), &[])
    }

    pub fn by_date(&self, date: NaiveDate) -> Result<Option<DrawRecord>, PersistenceError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE date = ?1"),
                params![canonical(date)],
                raw_row,
            )
            .optional()?;
        row.map(RawRow::into_record).transpose()
    }

    /// Draws of one calendar year, newest first.
    pub fn by_year(&self, year: i32) -> Result<Vec<DrawRecord>, PersistenceError> {
        self.query_many(
            &format!("{SELECT_COLUMNS} WHERE strftime('%Y', date) = ?1 ORDER BY date DESC"),
            &[&format!("{year:04}")],
        )
    }

    /// Draws of one month, newest first.
    pub fn by_month(&self, year: i32, month: u32) -> Result<Vec<DrawRecord>, PersistenceError> {
        self.query_many(
            &format!(
                "{SELECT_COLUMNS} WHERE strftime('%Y', date) = ?1 AND strftime('%m', date) = ?2 \
                 ORDER BY date DESC"
            ),
            &[&format!("{year:04}"), &format!("{month:02}")],
        )
    }

    fn query_many(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<DrawRecord>, PersistenceError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, raw_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_record()?);
        }
        Ok(out)
    }
}

impl PersistenceGateway for SqliteStore {
    fn latest_date(&self) -> Result<Option<NaiveDate>, PersistenceError> {
        let conn = self.conn.lock();
        let raw: Option<String> = conn
            .query_row(
                "SELECT date FROM results ORDER BY date DESC LIMIT 1",
                [],
                |r| r.get(0),
            )
            .optional()?;
        raw.map(|s| parse_stored_date(&s)).transpose()
    }

    fn insert_draw(&self, record: &DrawRecord) -> Result<(), PersistenceError> {
        let [n1, n2, n3, n4, n5] = *record.main_numbers();
        let [s1, s2] = *record.star_numbers();
        let conn = self.conn.lock();
        let res = conn.execute(
            "INSERT INTO results (date, number_1, number_2, number_3, number_4, number_5, star_1, star_2) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![record.canonical_date(), n1, n2, n3, n4, n5, s1, s2],
        );
        match res {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(PersistenceError::DuplicateDate(record.date()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn canonical(date: NaiveDate) -> String {
    date.format(crate::draw::CANONICAL_DATE_FORMAT).to_string()
}

fn parse_stored_date(s: &str) -> Result<NaiveDate, PersistenceError> {
    parse_canonical(s).map_err(|_| PersistenceError::CorruptDate(s.to_string()))
}

struct RawRow {
    date: String,
    main: [u32; 5],
    stars: [u32; 2],
}

impl RawRow {
    fn into_record(self) -> Result<DrawRecord, PersistenceError> {
        Ok(DrawRecord::new(
            parse_stored_date(&self.date)?,
            self.main,
            self.stars,
        ))
    }
}

fn raw_row(r: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        date: r.get(0)?,
        main: [r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?],
        stars: [r.get(6)?, r.get(7)?],
    })
}
