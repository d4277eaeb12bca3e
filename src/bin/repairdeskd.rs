use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;

use repairdesk::{AppState, InMemoryDocumentStore, create_router, sql::PgDocumentStore};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"repairdeskd - Repairdesk daemon

USAGE:
    repairdeskd [OPTIONS]

OPTIONS:
    --host <HOST>        Host to bind the HTTP server [default: 0.0.0.0]
    --port <PORT>        Port to bind the HTTP server [default: $PORT or 8000]
    --verbose            Enable verbose logging

ENVIRONMENT:
    PORT                 Listening port when --port is not given
    DATABASE_URL         PostgreSQL URL; selects the persistent backend.
                         Unset: documents are kept in process memory only.
    DATABASE_NAME        Reported by the /test diagnostic endpoint

API ENDPOINTS:
    GET    /                 Service banner
    GET    /api/health       Liveness check
    GET    /test             Store connectivity diagnostics
    GET    /api/categories   List issue categories
    GET    /api/guides       List solution guides (?category_key=KEY to filter)
    POST   /api/requests     Submit a service request
    POST   /api/seed         Insert baseline data into empty collections"#;

fn resolve_port(args_port: Option<u16>) -> u16 {
    if let Some(port) = args_port {
        return port;
    }
    match std::env::var("PORT") {
        Ok(value) => match value.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("Ignoring unparseable PORT value: {}", value);
                8000
            }
        },
        Err(_) => 8000,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: repairdeskd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let host = args.host.clone().unwrap_or_else(|| "0.0.0.0".to_string());
    let port = resolve_port(args.port);

    let state = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            // Lazy pool: the process starts even when the database is down;
            // the /test endpoint reports the degraded state.
            let pool = PgPoolOptions::new().connect_lazy(&database_url)?;
            let store = PgDocumentStore::new(pool);
            if let Err(e) = store.migrate().await {
                eprintln!("⚠️  Could not run migrations: {}", e);
            } else if args.verbose {
                println!("Migrations applied");
            }
            AppState::new(Arc::new(store))
        }
        Err(_) => {
            println!("DATABASE_URL not set; using in-memory document store");
            AppState::new(Arc::new(InMemoryDocumentStore::new()))
        }
    };

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    println!("🚀 Repairdesk daemon started successfully!");
    println!("📡 Server listening on: http://{}", addr);
    println!("🔄 Ready to accept API requests");

    if args.verbose {
        println!();
        println!("{}", HELP_TEXT);
        println!();
    }

    println!("💡 Use Ctrl+C or send SIGTERM for graceful shutdown");
    println!();

    let shutdown_signal = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                eprintln!("❌ Server error: {}", e);
                std::process::exit(1);
            }
        }
        () = shutdown_signal => {
            println!();
            println!("🛑 Shutdown signal received, stopping server gracefully...");
            println!("👋 Repairdesk daemon stopped");
        }
    }

    Ok(())
}
