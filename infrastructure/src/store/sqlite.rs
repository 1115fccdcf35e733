//! SQLite-backed question store.
//!
//! One `questions` table holds every domain, keyed by an autoincrement id and
//! unique on `(domain, question)`. Each answer is written by a single
//! `UPDATE ... WHERE id = ? AND domain = ?`, so writes are atomic per row.

use async_trait::async_trait;
use quizbench_application::ports::question_store::{AnswerFilter, QuestionStore, StoreError};
use quizbench_domain::{AnsweredRecord, Domain, NewQuestion, Question, QuestionId, RecordedAnswer};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL,
    question TEXT NOT NULL,
    option_a TEXT NOT NULL,
    option_b TEXT NOT NULL,
    option_c TEXT NOT NULL,
    option_d TEXT NOT NULL,
    expected_answer TEXT NOT NULL,
    model_response TEXT,
    response_time_ms REAL,
    is_answered INTEGER NOT NULL DEFAULT 0,
    UNIQUE(domain, question)
);
CREATE INDEX IF NOT EXISTS idx_questions_domain_answered ON questions(domain, is_answered);
";

const QUESTION_COLUMNS: &str = "id, question, option_a, option_b, option_c, option_d, \
     expected_answer, model_response, response_time_ms, is_answered";

/// [`QuestionStore`] over a single SQLite connection
#[derive(Clone)]
pub struct SqliteQuestionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteQuestionStore {
    /// Open (or create) the database file and its schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Other(format!(
                    "failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Other(format!("failed to open {}: {}", path.display(), e)))?;
        let store = Self::init(conn)?;
        info!("Question store opened at {}", path.display());
        Ok(store)
    }

    /// Private database for tests and dry runs
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Other(format!("failed to open in-memory database: {}", e)))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Other(format!("failed to create schema: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` with the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Other("connection lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Other(format!("store task failed: {}", e)))?
    }
}

fn read_err(e: rusqlite::Error) -> StoreError {
    StoreError::Read(e.to_string())
}

fn write_err(e: rusqlite::Error) -> StoreError {
    StoreError::Write(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn row_to_question(domain: Domain, row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: QuestionId::new(row.get(0)?),
        domain,
        prompt_text: row.get(1)?,
        options: [row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?],
        expected_answer: row.get(6)?,
        model_response: row.get(7)?,
        response_time_ms: row.get(8)?,
        is_answered: row.get(9)?,
    })
}

#[async_trait]
impl QuestionStore for SqliteQuestionStore {
    async fn list(
        &self,
        domain: Domain,
        filter: AnswerFilter,
    ) -> Result<Vec<Question>, StoreError> {
        self.with_conn(move |conn| {
            let condition = match filter {
                AnswerFilter::All => "",
                AnswerFilter::Answered => " AND is_answered = 1",
                AnswerFilter::Unanswered => " AND is_answered = 0",
            };
            let sql = format!(
                "SELECT {} FROM questions WHERE domain = ?1{} ORDER BY id",
                QUESTION_COLUMNS, condition
            );
            let mut stmt = conn.prepare(&sql).map_err(read_err)?;
            let rows = stmt
                .query_map(params![domain.as_str()], |row| row_to_question(domain, row))
                .map_err(read_err)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_err)
        })
        .await
    }

    async fn list_answered(&self, domain: Domain) -> Result<Vec<AnsweredRecord>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT expected_answer, model_response, response_time_ms FROM questions \
                     WHERE domain = ?1 AND is_answered = 1 ORDER BY id",
                )
                .map_err(read_err)?;
            let rows = stmt
                .query_map(params![domain.as_str()], |row| {
                    Ok(AnsweredRecord {
                        expected_answer: row.get(0)?,
                        model_response: row.get(1)?,
                        response_time_ms: row.get(2)?,
                    })
                })
                .map_err(read_err)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_err)
        })
        .await
    }

    async fn record_answer(
        &self,
        domain: Domain,
        id: QuestionId,
        answer: &RecordedAnswer,
    ) -> Result<Question, StoreError> {
        let answer = answer.clone();
        self.with_conn(move |conn| {
            // The row comes back from the UPDATE itself; any failure rolls it back.
            let tx = conn.transaction().map_err(write_err)?;
            let updated = tx
                .query_row(
                    &format!(
                        "UPDATE questions SET model_response = ?1, response_time_ms = ?2, is_answered = 1 \
                         WHERE id = ?3 AND domain = ?4 RETURNING {}",
                        QUESTION_COLUMNS
                    ),
                    params![
                        answer.model_response.as_str(),
                        answer.response_time_ms,
                        id.value(),
                        domain.as_str()
                    ],
                    |row| row_to_question(domain, row),
                )
                .optional()
                .map_err(write_err)?
                .ok_or(StoreError::NotFound { domain, id })?;
            tx.commit().map_err(write_err)?;
            debug!("{}: stored answer for question {}", domain, id);
            Ok(updated)
        })
        .await
    }

    async fn count(&self, domain: Domain) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let n: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM questions WHERE domain = ?1",
                    params![domain.as_str()],
                    |row| row.get(0),
                )
                .map_err(read_err)?;
            Ok(n.max(0) as usize)
        })
        .await
    }

    async fn insert_many(
        &self,
        domain: Domain,
        questions: Vec<NewQuestion>,
    ) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(write_err)?;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO questions \
                         (domain, question, option_a, option_b, option_c, option_d, expected_answer) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    )
                    .map_err(write_err)?;
                for q in &questions {
                    let [a, b, c, d] = &q.options;
                    stmt.execute(params![
                        domain.as_str(),
                        q.prompt_text,
                        a,
                        b,
                        c,
                        d,
                        q.expected_answer
                    ])
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            StoreError::Duplicate {
                                domain,
                                text: q.prompt_text.clone(),
                            }
                        } else {
                            write_err(e)
                        }
                    })?;
                }
            }
            tx.commit().map_err(write_err)?;
            Ok(questions.len())
        })
        .await
    }
}
