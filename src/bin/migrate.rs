use anyhow::{Result, anyhow};
use queue_bot::config::database_url_from_env;
use queue_bot::database::connection::DatabaseManager;
use std::env;
use std::io;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenvy::dotenv().ok();

    let command = env::args().nth(1).unwrap_or_else(|| "migrate".to_string());

    match command.as_str() {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

/// Filesystem path behind a `sqlite:` URL, if it is one.
fn sqlite_path(database_url: &str) -> Option<&str> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    Some(path.split('?').next().unwrap_or(path))
}

async fn run_migrations() -> Result<()> {
    println!("🔧 Queue Bot - Database Migration Tool");
    println!("======================================");

    let database_url = database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    if let Some(parent) = sqlite_path(&database_url).and_then(|p| Path::new(p).parent()) {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            println!("📁 Creating directory: {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }

    println!("🚀 Running database migrations...");

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    if let Err(e) = db_manager.run_migrations().await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }

    println!("✅ Migrations completed successfully!");
    Ok(())
}

async fn check_database() -> Result<()> {
    println!("🔍 Checking database connection and schema...");

    let database_url = database_url_from_env();
    println!("📊 Database URL: {}", mask_url(&database_url));

    let db_manager = DatabaseManager::new(&database_url).await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    let tables = db_manager.table_names().await?;
    let missing: Vec<&str> = ["events", "queue"]
        .into_iter()
        .filter(|t| !tables.iter().any(|name| name == t))
        .collect();

    println!("📋 Found tables:");
    for table in &tables {
        println!("  • {table}");
    }

    if missing.is_empty() {
        println!("✅ Schema is complete");
    } else {
        println!("⚠️  Missing tables: {}", missing.join(", "));
        println!("💡 Run 'migrate up' to create the schema");
    }

    Ok(())
}

async fn reset_database() -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL events and queues!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let database_url = database_url_from_env();
    let Some(db_path) = sqlite_path(&database_url) else {
        return Err(anyhow!("Reset is only supported for SQLite databases"));
    };

    if Path::new(db_path).exists() {
        std::fs::remove_file(db_path)?;
        println!("🗑️  Deleted database file: {db_path}");
    }

    println!("🔄 Recreating database schema...");
    run_migrations().await?;

    println!("✅ Database reset completed!");
    Ok(())
}

fn mask_url(url: &str) -> String {
    match sqlite_path(url).and_then(|p| Path::new(p).file_name()) {
        Some(filename) => format!("sqlite:.../{}", filename.to_string_lossy()),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("🎟  Queue Bot - Database Migration Tool");
    println!();
    println!("USAGE:");
    println!("    migrate [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    migrate, up    Run database migrations (default)");
    println!("    check          Check database connection and schema");
    println!("    reset          Reset database (SQLite only) - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL   Database connection string (default: sqlite:<DB_PATH>)");
    println!("    DB_PATH        SQLite file used when DATABASE_URL is unset (default: queue.db)");
    println!();
}
