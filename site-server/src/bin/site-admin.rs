//! Site maintenance CLI
//!
//! ```text
//! site-admin cleanup-images   # delete uploads no record references
//! site-admin check-info       # business info diagnostic
//! site-admin seed             # admin account + default business info
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use shared::util::{format_kb, format_mb};
use site_server::db::repository::{BusinessInfoRepository, DocumentReader};
use site_server::db::seed;
use site_server::services::ImageCleanupService;
use site_server::{DbService, ImageRefClassifier, ReconcileOutcome, reconcile_orphans};

#[derive(Parser)]
#[command(version, about = "Site server maintenance tasks")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Command,
}

/// Locations shared with the server (same environment variables)
#[derive(Args)]
struct StoreArgs {
    #[arg(long, env = "WORK_DIR", default_value = "./data", global = true)]
    work_dir: PathBuf,

    /// Defaults to {WORK_DIR}/database/site.db
    #[arg(long, env = "DATABASE_PATH", global = true)]
    database_path: Option<PathBuf>,

    /// Defaults to {WORK_DIR}/uploads
    #[arg(long, env = "UPLOADS_DIR", global = true)]
    uploads_dir: Option<PathBuf>,
}

impl StoreArgs {
    fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.work_dir.join("database").join("site.db"))
    }

    fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| self.work_dir.join("uploads"))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Delete every uploaded image no record references
    CleanupImages {
        #[arg(
            long,
            env = "LOCAL_IMAGE_PREFIXES",
            value_delimiter = ',',
            default_value = "http://localhost"
        )]
        local_prefixes: Vec<String>,

        #[arg(
            long,
            env = "EXCLUDED_IMAGE_MARKERS",
            value_delimiter = ',',
            default_value = "unsplash"
        )]
        excluded_markers: Vec<String>,
    },
    /// Print the business info record count and working hours
    CheckInfo,
    /// Create or refresh the admin user and seed default business info
    Seed {
        #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
        username: String,

        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into());
    site_server::init_logger_with_file(Some(&log_level), Some(false), None);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let database_path = cli.store.database_path();
    println!("🔌 Opening database at {}...", database_path.display());
    let db = DbService::open(&database_path)
        .await
        .context("failed to open database")?;
    println!("✅ Database ready\n");

    match cli.command {
        Command::CleanupImages {
            local_prefixes,
            excluded_markers,
        } => {
            let classifier = ImageRefClassifier::new(local_prefixes, excluded_markers);
            let cleanup = ImageCleanupService::new(cli.store.uploads_dir());
            cleanup_images(&db, &classifier, &cleanup).await?
        }
        Command::CheckInfo => check_info(&db).await?,
        Command::Seed { username, password } => {
            let outcome = seed::seed(&db.db, &username, &password)
                .await
                .context("seed failed")?;
            if outcome.admin_created {
                println!("✅ Admin user \"{username}\" created");
            } else {
                println!("✅ Password updated for \"{username}\"");
            }
            if outcome.info_created {
                println!("✅ Business info seeded");
            } else {
                println!("ℹ️  Business info already exists, left unchanged");
            }
        }
    }

    db.close();
    Ok(())
}

async fn cleanup_images(
    db: &DbService,
    classifier: &ImageRefClassifier,
    cleanup: &ImageCleanupService,
) -> anyhow::Result<()> {
    println!("🔍 Scanning database and uploads directory...");
    let source = DocumentReader::new(db.db.clone());
    let outcome = reconcile_orphans(&source, classifier, cleanup)
        .await
        .context("image reconciliation failed")?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &ReconcileOutcome) {
    if !outcome.listing.exists {
        println!(
            "📁 Uploads directory {} does not exist.",
            outcome.listing.dir.display()
        );
        return;
    }

    println!(
        "📊 Found {} referenced images in database",
        outcome.references.len()
    );
    println!(
        "📊 Found {} files in uploads directory\n",
        outcome.listing.files.len()
    );

    if outcome.orphans.is_empty() {
        println!("✨ No unused images found! Your uploads folder is clean.");
        return;
    }

    println!("🗑️  Found {} unused images:\n", outcome.orphans.orphans.len());
    for file in &outcome.orphans.orphans {
        println!("   - {} ({})", file.name, format_kb(file.size));
    }
    println!(
        "\n💾 Total space to be freed: {}\n",
        format_mb(outcome.orphans.total_bytes)
    );

    for failure in &outcome.deletion.failures {
        eprintln!("   ❌ Failed to delete {}: {}", failure.name, failure.reason);
    }
    println!(
        "✅ Deleted {} of {} unused images",
        outcome.deletion.deleted, outcome.deletion.attempted
    );
}

async fn check_info(db: &DbService) -> anyhow::Result<()> {
    let repo = BusinessInfoRepository::new(db.db.clone());
    let count = repo.count().await.context("failed to count business info")?;
    println!("BusinessInfo count: {count}");

    if let Some(info) = repo.get().await.context("failed to read business info")? {
        println!("Working Hours:");
        for entry in &info.working_hours {
            let status = if entry.is_open { "open" } else { "closed" };
            println!("   {:<10} {:<7} {}", entry.day, status, entry.time);
        }
    }
    Ok(())
}
