use sqlx::PgPool;

/// Handle over the shared connection pool. Each request constructs one of
/// these around the managed pool; all repository traits are implemented on
/// it.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}
