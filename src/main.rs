//! Universal Measurement Converter (UMC)
//!
//! An MCP server for exact decimal unit and temperature conversion.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use umc::build_info;
use umc::conversion::UnitTable;
use umc::db;
use umc::mcp::UmcService;
use umc::tools::conversions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the MCP transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("umc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    tracing::info!("Starting {}", build_info::BuildInfo::current().summary());
    eprintln!("Starting MCP server on stdio...");

    let db_path = umc::config::database_path();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            eprintln!("Applying database migrations...");
        }
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // Default table first, then whatever was registered in earlier sessions
    let mut table = UnitTable::standard();
    let summary = conversions::load_registrations(&database, &mut table)?;
    if !summary.skipped.is_empty() {
        tracing::warn!("{} stored registrations were skipped", summary.skipped.len());
    }

    let service = UmcService::new(db_path, database, table);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
