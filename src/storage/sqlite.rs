//! SQLite-backed store shared by the exam and candidate workflows.
//!
//! Exam windows are stored column by column. Candidate records keep their lookup keys
//! (id, email, status, creation time) in columns and the full record as a JSON document, so the
//! profile can grow without migrations. Insertion order doubles as registration order.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::workflows::candidates::{CandidateId, CandidateRecord, CandidateRepository};
use crate::workflows::exams::{ExamForm, ExamFormId, ExamFormRepository, HeldDate};
use crate::workflows::RepositoryError;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS exam_forms (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        exam_name TEXT NOT NULL,
        held_date TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        exam_count INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS candidates (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        body TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_exam_forms_created
        ON exam_forms(created_at DESC);
";

/// Single-connection store guarded by a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path).map_err(unavailable)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA).map_err(unavailable)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Liveness check used by the readiness endpoint.
    pub fn ping(&self) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(unavailable)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sqlite connection poisoned".to_string()))
    }
}

fn unavailable(err: rusqlite::Error) -> RepositoryError {
    RepositoryError::Unavailable(err.to_string())
}

fn write_error(err: rusqlite::Error) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RepositoryError::Conflict,
        _ => unavailable(err),
    }
}

fn corrupt(column: &str, raw: &str) -> RepositoryError {
    RepositoryError::Unavailable(format!("stored {column} '{raw}' is unreadable"))
}

struct ExamFormRow {
    id: String,
    exam_name: String,
    held_date: String,
    start_date: String,
    end_date: String,
    exam_count: i64,
    created_at: String,
}

impl ExamFormRow {
    const COLUMNS: &'static str =
        "id, exam_name, held_date, start_date, end_date, exam_count, created_at";

    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            exam_name: row.get(1)?,
            held_date: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            exam_count: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_form(self) -> Result<ExamForm, RepositoryError> {
        let held_date =
            HeldDate::parse(&self.held_date).ok_or_else(|| corrupt("held_date", &self.held_date))?;
        let start_date = NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
            .map_err(|_| corrupt("start_date", &self.start_date))?;
        let end_date = NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d")
            .map_err(|_| corrupt("end_date", &self.end_date))?;
        let exam_count =
            u32::try_from(self.exam_count).map_err(|_| corrupt("exam_count", &self.exam_count.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|stamp| stamp.with_timezone(&Utc))
            .map_err(|_| corrupt("created_at", &self.created_at))?;

        Ok(ExamForm {
            id: ExamFormId(self.id),
            exam_name: self.exam_name,
            held_date,
            start_date,
            end_date,
            exam_count,
            created_at,
        })
    }
}

impl ExamFormRepository for SqliteStore {
    fn insert(&self, form: ExamForm) -> Result<ExamForm, RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO exam_forms (id, exam_name, held_date, start_date, end_date, exam_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                form.id.0,
                form.exam_name,
                form.held_date.to_string(),
                form.start_date.format("%Y-%m-%d").to_string(),
                form.end_date.format("%Y-%m-%d").to_string(),
                i64::from(form.exam_count),
                form.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )
        .map_err(write_error)?;

        tracing::debug!(form_id = %form.id.0, "exam form stored");
        Ok(form)
    }

    fn latest(&self) -> Result<Option<ExamForm>, RepositoryError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM exam_forms ORDER BY created_at DESC, seq DESC LIMIT 1",
                    ExamFormRow::COLUMNS
                ),
                [],
                ExamFormRow::read,
            )
            .optional()
            .map_err(unavailable)?;

        row.map(ExamFormRow::into_form).transpose()
    }

    fn list(&self) -> Result<Vec<ExamForm>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM exam_forms ORDER BY created_at DESC, seq DESC",
                ExamFormRow::COLUMNS
            ))
            .map_err(unavailable)?;

        let rows = stmt
            .query_map([], ExamFormRow::read)
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        rows.into_iter().map(ExamFormRow::into_form).collect()
    }
}

fn decode_candidate(body: String) -> Result<CandidateRecord, RepositoryError> {
    serde_json::from_str(&body)
        .map_err(|err| RepositoryError::Unavailable(format!("stored candidate is unreadable: {err}")))
}

fn encode_candidate(record: &CandidateRecord) -> Result<String, RepositoryError> {
    serde_json::to_string(record)
        .map_err(|err| RepositoryError::Unavailable(format!("candidate could not be encoded: {err}")))
}

impl CandidateRepository for SqliteStore {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let body = encode_candidate(&record)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO candidates (id, email, status, created_at, body)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id.0,
                record.email,
                record.status.label(),
                record.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
                body
            ],
        )
        .map_err(write_error)?;

        Ok(record)
    }

    fn update(&self, record: CandidateRecord) -> Result<(), RepositoryError> {
        let body = encode_candidate(&record)?;
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE candidates SET email = ?2, status = ?3, body = ?4 WHERE id = ?1",
                params![record.id.0, record.email, record.status.label(), body],
            )
            .map_err(write_error)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM candidates WHERE id = ?1",
                params![id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable)?;

        body.map(decode_candidate).transpose()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM candidates WHERE email = ?1",
                params![email],
                |row| row.get(0),
            )
            .optional()
            .map_err(unavailable)?;

        body.map(decode_candidate).transpose()
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT body FROM candidates ORDER BY seq ASC")
            .map_err(unavailable)?;

        let bodies = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(unavailable)?;

        bodies.into_iter().map(decode_candidate).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::candidates::{CandidateProfile, CandidateStatus, ExamSnapshot};
    use chrono::{Duration, TimeZone};

    fn form(id: &str, created_at: DateTime<Utc>) -> ExamForm {
        ExamForm {
            id: ExamFormId(id.to_string()),
            exam_name: "CCAT".to_string(),
            held_date: HeldDate::new(4, 2025).expect("valid held date"),
            start_date: NaiveDate::from_ymd_opt(2025, 4, 5).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 4, 7).expect("valid date"),
            exam_count: 3,
            created_at,
        }
    }

    fn candidate(id: &str, email: &str) -> CandidateRecord {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).single().expect("valid time");
        CandidateRecord {
            id: CandidateId(id.to_string()),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            status: CandidateStatus::Pending,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            exam: None,
            profile: CandidateProfile {
                name: "Asha Verma".to_string(),
                ..CandidateProfile::default()
            },
        }
    }

    #[test]
    fn exam_forms_come_back_newest_first() {
        let store = SqliteStore::in_memory().expect("store opens");
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().expect("valid time");
        assert_eq!(ExamFormRepository::latest(&store).expect("query runs"), None);

        ExamFormRepository::insert(&store, form("older", base)).expect("insert older");
        ExamFormRepository::insert(&store, form("newer", base + Duration::days(2)))
            .expect("insert newer");

        let latest = ExamFormRepository::latest(&store)
            .expect("query runs")
            .expect("a form exists");
        assert_eq!(latest.id.0, "newer");
        assert_eq!(latest, form("newer", base + Duration::days(2)));

        let ids: Vec<_> = ExamFormRepository::list(&store)
            .expect("query runs")
            .into_iter()
            .map(|form| form.id.0)
            .collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = SqliteStore::in_memory().expect("store opens");
        CandidateRepository::insert(&store, candidate("c-1", "asha@example.com"))
            .expect("first insert");

        let err = CandidateRepository::insert(&store, candidate("c-2", "asha@example.com"))
            .expect_err("email is unique");
        assert!(matches!(err, RepositoryError::Conflict));
    }

    #[test]
    fn candidate_records_survive_a_round_trip() {
        let store = SqliteStore::in_memory().expect("store opens");
        let mut record = candidate("c-1", "asha@example.com");
        CandidateRepository::insert(&store, record.clone()).expect("insert");

        record.status = CandidateStatus::Approved;
        record.profile.personal.phone = "9876543210".to_string();
        record.exam = Some(ExamSnapshot::from(&form("f-1", record.created_at)));
        record.submitted_at = Some(record.created_at + Duration::hours(1));
        store.update(record.clone()).expect("update");

        let fetched = store
            .fetch(&CandidateId("c-1".to_string()))
            .expect("query runs")
            .expect("record exists");
        assert_eq!(fetched, record);

        let by_email = store
            .find_by_email("asha@example.com")
            .expect("query runs")
            .expect("record exists");
        assert_eq!(by_email.id, record.id);
        assert_eq!(store.find_by_email("nobody@example.com").expect("query runs"), None);
    }

    #[test]
    fn updating_unknown_candidate_is_not_found() {
        let store = SqliteStore::in_memory().expect("store opens");
        let err = store
            .update(candidate("ghost", "ghost@example.com"))
            .expect_err("nothing to update");
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[test]
    fn all_keeps_registration_order() {
        let store = SqliteStore::in_memory().expect("store opens");
        for (id, email) in [("b", "b@example.com"), ("a", "a@example.com"), ("c", "c@example.com")] {
            CandidateRepository::insert(&store, candidate(id, email)).expect("insert");
        }

        let ids: Vec<_> = store
            .all()
            .expect("query runs")
            .into_iter()
            .map(|record| record.id.0)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        store.ping().expect("store answers");
    }
}
