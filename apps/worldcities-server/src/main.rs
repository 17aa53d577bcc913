use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use worldcities::api::rest::routes;
use worldcities::domain::cities::CitiesService;
use worldcities::domain::countries::CountriesService;
use worldcities::infra::storage::cities_repo::SeaOrmCitiesRepository;
use worldcities::infra::storage::countries_repo::SeaOrmCountriesRepository;
use worldcities::infra::storage::migrations::Migrator;

mod config;
mod logging;

use config::{AppConfig, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Rewrite a sqlite DSN so its file path is absolute, creating the parent
/// directory when asked. In-memory DSNs pass through untouched; the query
/// string (e.g. `?mode=rwc`) is preserved.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }

    let rest = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {dsn})"))?;
    let (path_str, query) = rest
        .split_once('?')
        .map_or((rest, None), |(p, q)| (p, Some(q)));
    if path_str.is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }

    let path = Path::new(path_str);
    let path = if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    };
    if create_dirs {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    // Normalize backslashes so the DSN stays valid on Windows.
    let mut out = format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// WorldCities Server - paged listings and CRUD over cities and countries
#[derive(Parser)]
#[command(name = "worldcities-server")]
#[command(about = "WorldCities Server - paged listings and CRUD over cities and countries")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    let logging_config = config.logging.clone().unwrap_or_default();
    let base_dir = std::env::current_dir().context("cannot resolve working directory")?;
    logging::init_logging(&logging_config, &base_dir);
    tracing::info!("WorldCities server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, cli.mock, &base_dir).await,
        Commands::Check => check_config(config),
    }
}

async fn connect(db_config: &DatabaseConfig, mock: bool, base_dir: &Path) -> Result<DatabaseConnection> {
    let mut dsn = if mock {
        "sqlite::memory:".to_string()
    } else {
        db_config.url.trim().to_owned()
    };
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    // Absolutize sqlite DSNs to avoid cwd issues
    if dsn.starts_with("sqlite:") {
        dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
    }

    let mut opts = ConnectOptions::new(dsn.clone());
    if let Some(max_conns) = db_config.max_conns {
        opts.max_connections(max_conns);
    }

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("cannot connect to {dsn}"))
}

async fn run_server(config: AppConfig, mock: bool, base_dir: &Path) -> Result<()> {
    let db = connect(&config.database, mock, base_dir).await?;
    Migrator::up(&db, None).await.context("migrations failed")?;

    let module_config = config.worldcities.clone();
    let cities = Arc::new(CitiesService::new(
        Arc::new(SeaOrmCitiesRepository::new(db.clone())),
        module_config.clone(),
    ));
    let countries = Arc::new(CountriesService::new(
        Arc::new(SeaOrmCountriesRepository::new(db.clone())),
        module_config,
    ));

    let app = routes::router(cities, countries).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_is_kept_verbatim() {
        let out = absolutize_sqlite_dsn("sqlite::memory:", Path::new("/srv"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
        let out = absolutize_sqlite_dsn("sqlite://:memory:", Path::new("/srv"), false).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn relative_sqlite_path_is_joined_and_query_kept() {
        let out =
            absolutize_sqlite_dsn("sqlite://data/wc.db?mode=rwc", Path::new("/srv"), false)
                .unwrap();
        assert_eq!(out, "sqlite:///srv/data/wc.db?mode=rwc");
    }

    #[test]
    fn non_sqlite_dsn_is_rejected() {
        assert!(absolutize_sqlite_dsn("postgres://x/y", Path::new("/srv"), false).is_err());
    }
}
