use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use engine::{HttpIdentity, UserTable};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use settings::{Database, Identity, Settings};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "budgets")]
#[command(about = "Budget validation and mutation service")]
struct Cli {
    /// Settings file, without extension (also read from `BUDGETS_CONFIG`).
    #[arg(long, env = "BUDGETS_CONFIG", default_value = "settings")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply or inspect schema migrations.
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
    /// Add a user to the local `users` table.
    AddUser {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let settings = Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budgets={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.server.database).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            Migrator::up(&db, None).await?;
            serve(settings, db).await?;
        }
        Command::Migrate { action } => match action {
            MigrateAction::Up => Migrator::up(&db, None).await?,
            MigrateAction::Down => Migrator::down(&db, None).await?,
            MigrateAction::Fresh => Migrator::fresh(&db).await?,
            MigrateAction::Status => Migrator::status(&db).await?,
        },
        Command::AddUser { id, name } => {
            Migrator::up(&db, None).await?;
            let name = name.unwrap_or_else(|| id.clone());
            let profile = UserTable::new(db).register(&id, &name).await?;
            println!("user '{}' created", profile.id);
        }
    }

    Ok(())
}

async fn serve(settings: Settings, db: DatabaseConnection) -> Result<(), BoxError> {
    let mut builder = engine::Engine::builder().database(db);
    if let Identity::Http { url } = &settings.identity {
        tracing::info!("resolving users through {url}");
        builder = builder.identity(Arc::new(HttpIdentity::new(reqwest::Client::new(), url)?));
    }
    let engine = builder.build()?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    server::run_with_listener(engine, listener).await?;
    Ok(())
}

async fn connect(config: &Database) -> Result<DatabaseConnection, BoxError> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    Ok(sea_orm::Database::connect(url).await?)
}
