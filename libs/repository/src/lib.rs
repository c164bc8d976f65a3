use block::BlockRepository;
use chrono::{NaiveDateTime, SubsecRound, Utc};
use migration::Migrator;
use migration::MigratorTrait;
use page::PageRepository;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

pub mod active_models;
pub mod block;
pub mod page;

/// Storage handle injected into the services. Cloning is cheap: every
/// repository shares the same connection pool.
#[derive(Clone, Debug)]
pub struct Repository {
    pub page: PageRepository,
    pub block: BlockRepository,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "in sea-orm crate from unsuccessful database operations: {}: {}",
        message,
        source
    )]
    InSeaOrmDbErr {
        message: String,
        source: sea_orm::DbErr,
    },

    #[error("{entity} {id} was not found")]
    NotFound { entity: &'static str, id: String },

    #[error("inconsistent stored state: {0}")]
    InvalidState(String),
}

pub type Response<T> = Result<T, RepositoryError>;

pub trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, sea_orm::DbErr> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| RepositoryError::InSeaOrmDbErr {
            message: message.to_string(),
            source: e,
        })
    }
}

impl Repository {
    pub async fn new(db_url: &str) -> Response<Self> {
        Self::connect(db_url, 5).await
    }

    /// Connects and runs pending migrations. In-memory SQLite urls need a
    /// single connection, otherwise each pooled connection sees its own
    /// empty database.
    pub async fn connect(
        db_url: &str,
        max_connections: u32,
    ) -> Response<Self> {
        let db = init_db(db_url, max_connections).await?;

        Ok(Self::from_connection(db))
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            page: PageRepository::new(db.clone()),
            block: BlockRepository::new(db),
        }
    }
}

/// Current time at the microsecond precision every supported database keeps.
pub(crate) fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

async fn init_db(
    db_url: &str,
    max_connections: u32,
) -> Response<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .into_response("in database connect")?;

    Migrator::up(&db, None)
        .await
        .into_response("in migrator up")?;

    Ok(db)
}

#[cfg(test)]
pub(crate) async fn test_repository() -> Repository {
    Repository::connect("sqlite::memory:", 1).await.unwrap()
}
