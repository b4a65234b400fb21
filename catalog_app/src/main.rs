// catalog_app/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use catalog_app::config::{AppConfig, LogFormat};
use catalog_app::db::{self, PgCatalogStore};
use catalog_app::state::AppState;
use catalog_app::storage::S3ObjectStore;
use catalog_app::web::configure_app_routes;
use catalog_core::CatalogService;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Text => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => {
      init_tracing(cfg.log_format);
      cfg
    }
    Err(e) => {
      init_tracing(LogFormat::Text);
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(io::Error::other(e));
    }
  };
  tracing::info!(config = ?app_config, "Starting catalog server...");

  let db_pool = db::connect(&app_config.database).await.map_err(|e| {
    tracing::error!(error = %e, "Failed to connect to the database.");
    io::Error::other(e)
  })?;

  let object_store = S3ObjectStore::from_config(&app_config.s3).await;
  let catalog = Arc::new(CatalogService::new(
    Arc::new(PgCatalogStore::new(db_pool)),
    Arc::new(object_store),
  ));
  let app_state = AppState::new(catalog, &app_config);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
