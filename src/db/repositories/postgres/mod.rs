//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres database.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::task;

use crate::api::{
    FeaturePrecondition, PreconditionId, Questionnaire, QuestionnaireId, Validation,
    ValidationAnswer, ValidationCombination, ValidationCombinationResult, ValidationSummary,
    ValidationValue,
};
use crate::db::repository::{
    ErrorContext, PreconditionRepository, QuestionnaireRepository, RepositoryError,
    RepositoryResult, ValidationAnswerRepository, ValidationReferenceRepository,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Requires `DATABASE_URL` or `PG_DATABASE_URL`; every other setting
    /// falls back to its default.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total successful queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
    /// Total retried operations
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    // Metrics counters
    total_queries: std::sync::Arc<AtomicU64>,
    failed_queries: std::sync::Arc<AtomicU64>,
    retried_operations: std::sync::Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: std::sync::Arc::new(AtomicU64::new(0)),
            failed_queries: std::sync::Arc::new(AtomicU64::new(0)),
            retried_operations: std::sync::Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient failures.
    ///
    /// Retries the operation up to `max_retries` times when a retryable
    /// error occurs (connection errors, serialization failures), with
    /// exponential backoff between attempts.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    /// Check if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn load_answers_for_questionnaires(
    conn: &mut PgConnection,
    questionnaire_ids: &[i32],
) -> RepositoryResult<Vec<ValidationAnswerRow>> {
    validation_answers::table
        .filter(validation_answers::questionnaire_id.eq_any(questionnaire_ids))
        .order(validation_answers::id.asc())
        .select(ValidationAnswerRow::as_select())
        .load::<ValidationAnswerRow>(conn)
        .map_err(map_diesel_error)
}

#[async_trait]
impl PreconditionRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn save_precondition(
        &self,
        precondition: &FeaturePrecondition,
    ) -> RepositoryResult<FeaturePrecondition> {
        let precondition = precondition.clone();
        self.with_conn(move |conn| {
            let row: PreconditionRow = match precondition.id {
                Some(id) => diesel::update(feature_preconditions::table.find(id.value()))
                    .set(feature_preconditions::answer.eq(&precondition.answer))
                    .returning(PreconditionRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        map_diesel_error(e).with_operation("save_precondition")
                    })?,
                None => diesel::insert_into(feature_preconditions::table)
                    .values(NewPreconditionRow {
                        answer: precondition.answer.clone(),
                    })
                    .returning(PreconditionRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)?,
            };
            Ok(row.into())
        })
        .await
    }

    async fn find_precondition(
        &self,
        id: PreconditionId,
    ) -> RepositoryResult<Option<FeaturePrecondition>> {
        self.with_conn(move |conn| {
            feature_preconditions::table
                .find(id.value())
                .select(PreconditionRow::as_select())
                .first::<PreconditionRow>(conn)
                .optional()
                .map_err(map_diesel_error)
                .map(|row| row.map(Into::into))
        })
        .await
    }
}

#[async_trait]
impl QuestionnaireRepository for PostgresRepository {
    async fn save_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> RepositoryResult<Questionnaire> {
        let questionnaire = questionnaire.clone();
        self.with_conn(move |conn| {
            let row: QuestionnaireRow = match questionnaire.id {
                Some(id) => diesel::update(questionnaires::table.find(id.value()))
                    .set(questionnaires::name.eq(&questionnaire.name))
                    .returning(QuestionnaireRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        map_diesel_error(e).with_operation("save_questionnaire")
                    })?,
                None => diesel::insert_into(questionnaires::table)
                    .values(NewQuestionnaireRow {
                        name: questionnaire.name.clone(),
                    })
                    .returning(QuestionnaireRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)?,
            };

            let answers = load_answers_for_questionnaires(conn, &[row.id])?
                .into_iter()
                .map(Into::into)
                .collect();
            Ok(row.into_questionnaire(answers))
        })
        .await
    }

    async fn find_questionnaire(
        &self,
        id: QuestionnaireId,
    ) -> RepositoryResult<Option<Questionnaire>> {
        self.with_conn(move |conn| {
            let row = questionnaires::table
                .find(id.value())
                .select(QuestionnaireRow::as_select())
                .first::<QuestionnaireRow>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            match row {
                Some(row) => {
                    let answers = load_answers_for_questionnaires(conn, &[row.id])?
                        .into_iter()
                        .map(Into::into)
                        .collect();
                    Ok(Some(row.into_questionnaire(answers)))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn list_questionnaires(&self) -> RepositoryResult<Vec<Questionnaire>> {
        self.with_conn(|conn| {
            let rows = questionnaires::table
                .order(questionnaires::id.asc())
                .select(QuestionnaireRow::as_select())
                .load::<QuestionnaireRow>(conn)
                .map_err(map_diesel_error)?;

            let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
            let answer_rows = load_answers_for_questionnaires(conn, &ids)?;

            Ok(rows
                .into_iter()
                .map(|row| {
                    let answers = answer_rows
                        .iter()
                        .filter(|a| a.questionnaire_id == row.id)
                        .cloned()
                        .map(Into::into)
                        .collect();
                    row.into_questionnaire(answers)
                })
                .collect())
        })
        .await
    }

    async fn delete_questionnaire(&self, id: QuestionnaireId) -> RepositoryResult<u64> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let answers_removed = diesel::delete(
                    validation_answers::table
                        .filter(validation_answers::questionnaire_id.eq(id.value())),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;

                let removed = diesel::delete(questionnaires::table.find(id.value()))
                    .execute(tx)
                    .map_err(map_diesel_error)?;

                if removed == 0 {
                    return Err(RepositoryError::not_found_with_context(
                        format!("No questionnaire with id {}", id),
                        ErrorContext::new("delete_questionnaire")
                            .with_entity("questionnaire")
                            .with_entity_id(id),
                    ));
                }

                Ok((answers_removed + removed) as u64)
            })
        })
        .await
    }
}

#[async_trait]
impl ValidationAnswerRepository for PostgresRepository {
    async fn save_validation_answer(
        &self,
        answer: &ValidationAnswer,
    ) -> RepositoryResult<ValidationAnswer> {
        let answer = answer.clone();
        self.with_conn(move |conn| {
            let row: ValidationAnswerRow = match answer.id {
                Some(id) => diesel::update(validation_answers::table.find(id.value()))
                    .set((
                        validation_answers::row_id.eq(answer.row_id),
                        validation_answers::answer.eq(&answer.answer),
                        validation_answers::answer_type.eq(&answer.answer_type),
                        validation_answers::questionnaire_id.eq(answer.questionnaire_id.value()),
                        validation_answers::validation_id.eq(answer.validation_id.value()),
                    ))
                    .returning(ValidationAnswerRow::as_returning())
                    .get_result(conn)
                    .map_err(|e| {
                        map_diesel_error(e).with_operation("save_validation_answer")
                    })?,
                None => diesel::insert_into(validation_answers::table)
                    .values(NewValidationAnswerRow {
                        row_id: answer.row_id,
                        answer: answer.answer.clone(),
                        answer_type: answer.answer_type.clone(),
                        questionnaire_id: answer.questionnaire_id.value(),
                        validation_id: answer.validation_id.value(),
                    })
                    .returning(ValidationAnswerRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)?,
            };
            Ok(row.into())
        })
        .await
    }

    async fn find_answers_by_questionnaire(
        &self,
        questionnaire_id: QuestionnaireId,
    ) -> RepositoryResult<Vec<ValidationAnswer>> {
        self.with_conn(move |conn| {
            load_answers_for_questionnaires(conn, &[questionnaire_id.value()])
                .map(|rows| rows.into_iter().map(Into::into).collect())
        })
        .await
    }

    async fn delete_answers_by_questionnaire_and_row(
        &self,
        questionnaire_id: QuestionnaireId,
        row_id: i32,
    ) -> RepositoryResult<u64> {
        self.with_conn(move |conn| {
            diesel::delete(
                validation_answers::table
                    .filter(validation_answers::questionnaire_id.eq(questionnaire_id.value()))
                    .filter(validation_answers::row_id.eq(row_id)),
            )
            .execute(conn)
            .map(|n| n as u64)
            .map_err(map_diesel_error)
        })
        .await
    }
}

#[async_trait]
impl ValidationReferenceRepository for PostgresRepository {
    async fn list_validations(&self) -> RepositoryResult<Vec<Validation>> {
        self.with_conn(|conn| {
            validations::table
                .order(validations::id.asc())
                .select(ValidationRow::as_select())
                .load::<ValidationRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_validation_summaries(&self) -> RepositoryResult<Vec<ValidationSummary>> {
        self.with_conn(|conn| {
            validation_summaries::table
                .order(validation_summaries::id.asc())
                .select(ValidationSummaryRow::as_select())
                .load::<ValidationSummaryRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_validation_values(&self) -> RepositoryResult<Vec<ValidationValue>> {
        self.with_conn(|conn| {
            validation_values::table
                .order(validation_values::id.asc())
                .select(ValidationValueRow::as_select())
                .load::<ValidationValueRow>(conn)
                .map(|rows| rows.into_iter().map(Into::into).collect())
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_validation_combination_results(
        &self,
    ) -> RepositoryResult<Vec<ValidationCombinationResult>> {
        self.with_conn(|conn| {
            let result_rows = validation_combination_results::table
                .order(validation_combination_results::id.asc())
                .select(CombinationResultRow::as_select())
                .load::<CombinationResultRow>(conn)
                .map_err(map_diesel_error)?;

            let combination_rows = validation_combinations::table
                .order(validation_combinations::id.asc())
                .select(CombinationRow::as_select())
                .load::<CombinationRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(result_rows
                .into_iter()
                .map(|row| {
                    let combinations: Vec<ValidationCombination> = combination_rows
                        .iter()
                        .filter(|c| c.combination_result_id == row.id)
                        .cloned()
                        .map(Into::into)
                        .collect();
                    row.into_result(combinations)
                })
                .collect())
        })
        .await
    }
}
