pub mod store;
pub use store::{EntityKind, Record, RecordQuery, RecordStore, Repository, SharedStore};
pub mod pg_store;
pub use pg_store::PgRecordStore;
pub mod local_store;
pub use local_store::LocalRecordStore;

use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};

use crate::config::AppConfig;

/// Escolhe o armazenamento na inicialização: Postgres se `DATABASE_URL`
/// existe e responde, senão o cache local em arquivos.
pub async fn connect_store(config: &AppConfig) -> anyhow::Result<SharedStore> {
    if let Some(database_url) = &config.database_url {
        match connect_postgres(database_url).await {
            Ok(store) => {
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                return Ok(Arc::new(store));
            }
            Err(e) => {
                tracing::warn!("⚠️ Banco de dados indisponível ({:#}). Usando o armazenamento local.", e);
            }
        }
    } else {
        tracing::warn!("⚠️ DATABASE_URL não definida. Usando o armazenamento local.");
    }

    tracing::warn!(
        dir = %config.local_store_dir.display(),
        "O armazenamento local é um cache de último recurso e não é sincronizado com o banco remoto."
    );
    Ok(Arc::new(LocalRecordStore::open(&config.local_store_dir)?))
}

async fn connect_postgres(database_url: &str) -> anyhow::Result<PgRecordStore> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    // Health check
    sqlx::query("SELECT 1").execute(&pool).await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    Ok(PgRecordStore::new(pool))
}
