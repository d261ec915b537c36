use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use stocktake_bootstrap::introspect;
use stocktake_config::{ApiConfig, DbConfig};
use stocktake_db::Db;
use stocktake_models::users::{AdminUser, roles, sort_by_tier};
use stocktake_probe::report::all_passed;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "stocktake")]
#[command(about = "Operational tools for the college inventory database and API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every schema-bootstrap routine (all are idempotent)
    Bootstrap,
    /// Inspect the schema: tables, columns, duplicate external keys
    Inspect {
        /// Show the columns of one table
        #[arg(short = 't', long)]
        table: Option<String>,

        /// Look for duplicated SKUs, student ids and invoice numbers
        #[arg(short = 'd', long)]
        duplicates: bool,
    },
    /// Create an administrator account
    CreateAdmin {
        /// Username (prompted when omitted)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address (prompted when omitted)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (prompted securely when omitted)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Full name
        #[arg(short = 'f', long)]
        full_name: Option<String>,

        /// Role, e.g. admin or subadmin
        #[arg(short = 'r', long, default_value = "admin")]
        role: String,
    },
    /// List administrator accounts in tier order
    ListAdmins,
    /// Probe the database: tables and row counts
    ProbeDb,
    /// Probe the HTTP API: GET pass, create/lookup/conflict pass
    ProbeApi {
        /// Delete the rows the probe created afterwards
        #[arg(long)]
        cleanup: bool,
    },
    /// Upload one invoice image to the OCR endpoint
    ProbeOcr {
        /// Path to the image file
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bootstrap => handle_bootstrap().await,
        Commands::Inspect { table, duplicates } => handle_inspect(table, duplicates).await,
        Commands::CreateAdmin {
            username,
            email,
            password,
            full_name,
            role,
        } => handle_create_admin(username, email, password, full_name, role).await,
        Commands::ListAdmins => handle_list_admins().await,
        Commands::ProbeDb => handle_probe_db().await,
        Commands::ProbeApi { cleanup } => handle_probe_api(cleanup).await,
        Commands::ProbeOcr { image } => handle_probe_ocr(image).await,
    };

    if let Err(e) = result {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stocktake={log_level},stocktake_db={log_level},stocktake_bootstrap={log_level},stocktake_probe={log_level},sqlx=warn,hyper=warn,reqwest=warn"
        ))
    });

    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}

async fn handle_bootstrap() -> anyhow::Result<()> {
    let admin_password =
        std::env::var("ADMIN_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let db = Db::open(&DbConfig::from_env()).await?;
    let reports = stocktake_bootstrap::run_all(&db, &admin_password).await;
    db.close().await;

    for report in &reports {
        match &report.outcome {
            stocktake_bootstrap::Outcome::Failed(_) => {
                println!("❌ {}: {}", report.name, report.outcome)
            }
            _ => println!("✅ {}: {}", report.name, report.outcome),
        }
    }
    Ok(())
}

async fn handle_inspect(table: Option<String>, duplicates: bool) -> anyhow::Result<()> {
    let db = Db::open(&DbConfig::from_env()).await?;

    if let Some(table) = &table {
        let columns = introspect::list_columns(&db, table).await?;
        if columns.is_empty() {
            println!("table {table} does not exist");
        } else {
            println!("{table}:");
            for column in columns {
                let nullable = if column.is_nullable { "NULL" } else { "NOT NULL" };
                let default = column
                    .default
                    .map(|d| format!(" DEFAULT {d}"))
                    .unwrap_or_default();
                println!(
                    "  {:<24} {} {}{}",
                    column.name, column.data_type, nullable, default
                );
            }
        }
    } else if duplicates {
        report_duplicates(&db).await?;
    } else {
        let tables = introspect::list_tables(&db).await?;
        println!("{} tables in public schema:", tables.len());
        for table in &tables {
            // Identifier comes from the catalog, not from input; strip
            // quotes anyway before embedding it.
            let ident = table.replace('"', "");
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{ident}\""))
                .fetch_one(db.pool())
                .await?;
            println!("  {table:<24} {count} rows");
        }
    }

    db.close().await;
    Ok(())
}

/// Duplicate external keys. The schema enforces these as UNIQUE, but legacy
/// copies of the database predate the constraints.
async fn report_duplicates(db: &Db) -> anyhow::Result<()> {
    let checks = [
        ("products", "sku"),
        ("students", "student_id"),
        ("invoices", "invoice_number"),
    ];

    for (table, column) in checks {
        if !introspect::table_exists(db, table).await? {
            println!("table {table} missing, skipped");
            continue;
        }
        // Fixed identifiers from the list above.
        let duplicated: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT {column}, COUNT(*) FROM {table}
             GROUP BY {column} HAVING COUNT(*) > 1
             ORDER BY {column}"
        ))
        .fetch_all(db.pool())
        .await?;

        if duplicated.is_empty() {
            println!("✅ {table}.{column}: no duplicates");
        } else {
            for (key, count) in duplicated {
                println!("❌ {table}.{column}: {key} appears {count} times");
            }
        }
    }
    Ok(())
}

async fn handle_create_admin(
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    full_name: Option<String>,
    role: String,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("failed to read username")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let db = Db::open(&DbConfig::from_env()).await?;
    let created = create_admin(
        &db,
        &username,
        &email,
        &password,
        full_name.as_deref(),
        &role,
    )
    .await;
    db.close().await;
    created?;

    println!("✅ Administrator created successfully!");
    println!("   Username: {username}");
    println!("   Role: {role}");
    Ok(())
}

async fn create_admin(
    db: &Db,
    username: &str,
    email: &str,
    password: &str,
    full_name: Option<&str>,
    role: &str,
) -> anyhow::Result<()> {
    if role == roles::MAIN_ADMIN {
        let main_admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(roles::MAIN_ADMIN)
            .fetch_one(db.pool())
            .await?;
        if main_admins > 0 {
            bail!("a main_admin already exists; exactly one is allowed");
        }
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .context("failed to hash administrator password")?;

    let inserted: Option<String> = sqlx::query_scalar(
        "INSERT INTO users (id, username, email, password_hash, full_name, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(username)
    .bind(email)
    .bind(&password_hash)
    .bind(full_name)
    .bind(role)
    .fetch_optional(db.pool())
    .await?;

    if inserted.is_none() {
        bail!("user with username {username} already exists");
    }
    Ok(())
}

async fn handle_list_admins() -> anyhow::Result<()> {
    let db = Db::open(&DbConfig::from_env()).await?;

    let mut admins: Vec<AdminUser> = sqlx::query_as(
        "SELECT id, username, email, full_name, role, status, is_active
         FROM users WHERE role ILIKE $1",
    )
    .bind("%admin%")
    .fetch_all(db.pool())
    .await?;
    db.close().await;

    sort_by_tier(&mut admins);

    println!("{} administrator accounts:", admins.len());
    for admin in &admins {
        let marker = if admin.is_active { " " } else { "✗" };
        println!(
            "{marker} {:<20} {:<12} {}",
            admin.username,
            admin.role,
            admin.email.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn handle_probe_db() -> anyhow::Result<()> {
    let db = Db::open(&DbConfig::from_env()).await?;
    let outcomes = stocktake_probe::probe_database(&db).await;
    db.close().await;

    for outcome in &outcomes {
        println!("{outcome}");
    }
    if !all_passed(&outcomes) {
        std::process::exit(1);
    }
    Ok(())
}

async fn handle_probe_api(cleanup: bool) -> anyhow::Result<()> {
    let probe = stocktake_probe::HttpProbe::new(ApiConfig::from_env())?;
    let run = probe.run().await;

    for outcome in &run.outcomes {
        println!("{outcome}");
    }

    let mut passed = all_passed(&run.outcomes);
    if cleanup {
        let db = Db::open(&DbConfig::from_env()).await?;
        let cleanup_outcomes = stocktake_probe::cleanup_created_rows(&db, &run.created).await;
        db.close().await;
        for outcome in &cleanup_outcomes {
            println!("{outcome}");
        }
        passed = passed && all_passed(&cleanup_outcomes);
    }

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

async fn handle_probe_ocr(image: PathBuf) -> anyhow::Result<()> {
    let response = stocktake_probe::probe_ocr(&ApiConfig::from_env(), &image).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.success {
        if !response.confidence_in_range() {
            println!("⚠️  confidence_score outside [0, 1]");
        }
        let name = response
            .extracted_data
            .as_ref()
            .and_then(|d| d.student_name.as_deref())
            .unwrap_or("-");
        println!("✅ OCR extracted student: {name}");
    } else {
        println!(
            "⚠️  OCR reported failure: {}",
            response.error.as_deref().unwrap_or("no error message")
        );
    }
    Ok(())
}
