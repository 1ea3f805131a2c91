use actix_cors::Cors;
use actix_web::{middleware::Logger, web, HttpServer};
use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blog_service::config::StorageBackend;
use blog_service::db::{self, BlogRepository};
use blog_service::middleware::AccessPolicy;
use blog_service::models::NewGroup;
use blog_service::security::TokenService;
use blog_service::services::AuthService;
use blog_service::{build_app, AppState, Config};

const USAGE: &str = "usage: blog-service [serve | migrate | create-user <username> <password> | \
                     create-group <title> <slug> [description] | healthcheck]";

enum Command {
    Serve,
    Migrate,
    CreateUser { username: String, password: String },
    CreateGroup(NewGroup),
    Healthcheck,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let Some(cmd) = args.next() else {
            return Ok(Command::Serve);
        };

        let command = match cmd.as_str() {
            "serve" => Command::Serve,
            "migrate" => Command::Migrate,
            "healthcheck" | "healthcheck-http" => Command::Healthcheck,
            "create-user" => match (args.next(), args.next()) {
                (Some(username), Some(password)) => Command::CreateUser { username, password },
                _ => bail!(USAGE),
            },
            "create-group" => match (args.next(), args.next()) {
                (Some(title), Some(slug)) => Command::CreateGroup(NewGroup {
                    title,
                    slug,
                    description: args.next().unwrap_or_default(),
                }),
                _ => bail!(USAGE),
            },
            other => bail!("unknown command '{}'\n{}", other, USAGE),
        };

        if args.next().is_some() {
            bail!(USAGE);
        }
        Ok(command)
    }
}

/// Blog Service
///
/// REST API for posts, groups and comments.
///
/// # Routes
///
/// - `/api/v1/posts/*` - Posts and their nested comments
/// - `/api/v1/groups/*` - Read-only groups
/// - `/api/v1/api-token-auth/` - Token issuance
/// - `/api/v1/health*`, `/metrics` - Probes and Prometheus scrape
///
/// # Deployment
///
/// Listens on port 8080 (configurable via BLOG_SERVICE_PORT). Users and
/// groups are provisioned with the `create-user` / `create-group` subcommands.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let command = Command::parse(std::env::args().skip(1))?;

    // Container healthchecks must not depend on full configuration
    if let Command::Healthcheck = command {
        return healthcheck().await;
    }

    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            bail!("failed to load configuration: {}", e);
        }
    };

    match command {
        Command::Serve => serve(config).await,
        Command::Migrate => {
            if config.database.backend != StorageBackend::Postgres {
                bail!("migrate requires STORAGE_BACKEND=postgres");
            }
            let pool = db::create_pool(&config.database)
                .await
                .context("failed to connect to database")?;
            db::migrate(&pool).await.context("migration failed")?;
            Ok(())
        }
        Command::CreateUser { username, password } => {
            let repo = provisioning_repo(&config).await?;
            let tokens = Arc::new(TokenService::new(
                &config.auth.jwt_secret,
                config.auth.token_ttl_secs,
            ));
            let user = AuthService::new(repo, tokens)
                .register(&username, &password)
                .await?;
            println!("created user {} ({})", user.username, user.id);
            Ok(())
        }
        Command::CreateGroup(group) => {
            let repo = provisioning_repo(&config).await?;
            let group = repo.create_group(group).await?;
            println!("created group {} ({})", group.slug, group.id);
            Ok(())
        }
        Command::Healthcheck => healthcheck().await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let production = std::env::var("APP_ENV")
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn provisioning_repo(config: &Config) -> anyhow::Result<Arc<dyn BlogRepository>> {
    if config.database.backend == StorageBackend::Memory {
        bail!("provisioning requires STORAGE_BACKEND=postgres; the memory store is per-process");
    }
    db::connect(&config.database).await
}

async fn healthcheck() -> anyhow::Result<()> {
    let port = std::env::var("BLOG_SERVICE_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);

    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => bail!("healthcheck HTTP status: {}", resp.status()),
        Err(e) => bail!("healthcheck HTTP error: {}", e),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        env = %config.app.env,
        backend = ?config.database.backend,
        require_auth_for_reads = config.auth.require_auth_for_reads,
        "Starting blog-service"
    );

    let repo = db::connect(&config.database)
        .await
        .context("failed to initialize storage")?;
    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));
    let policy = AccessPolicy::new(config.auth.require_auth_for_reads);
    let state = web::Data::new(AppState::new(repo, tokens, policy));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let allowed_origins = config.cors.allowed_origins.clone();
    tracing::info!("Starting HTTP server on {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        build_app(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .workers(config.app.workers)
    .shutdown_timeout(30)
    .disable_signals()
    .run();

    let server_handle = server.handle();

    tokio::select! {
        result = server => {
            result.context("HTTP server error")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received; draining connections");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("blog-service stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
