// command line interface

use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

use crate::{DEFAULT_ENDPOINT, DEFAULT_MODEL, Server, Store, TutorConfig, demo};

#[derive(Parser)]
#[command(name = "studyhub", about = "Study groups with an AI tutor", version)]
struct Cli {
    /// database connection url
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://studyhub.db", global = true)]
    db: String,

    /// api key for the completion provider
    #[arg(long, short = 'k', env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// chat completions endpoint
    #[arg(long, env = "TUTOR_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// model the tutor asks for
    #[arg(long, env = "TUTOR_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// log filter, used when RUST_LOG is not set
    #[arg(long, env = "STUDYHUB_LOG", default_value = "info", global = true)]
    log_level: String,

    /// log as json lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// start the http server (the default)
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// wipe the database and load demo data
    Seed,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.log_json);

    let tutor = TutorConfig {
        api_key: cli.api_key,
        endpoint: cli.endpoint,
        model: cli.model,
    };

    match cli.command.unwrap_or(Commands::Serve {
        port: 3000,
        host: "127.0.0.1".to_string(),
    }) {
        Commands::Serve { port, host } => Ok(Server::run(&cli.db, tutor, &host, port).await?),

        Commands::Seed => {
            let store = Store::connect(&cli.db).await?;
            demo::seed(&store).await?;
            println!("demo data loaded into {}", cli.db);
            Ok(())
        }
    }
}

// RUST_LOG wins, then --log-level, then plain info
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| level.parse::<EnvFilter>())
        .unwrap_or_else(|e| {
            eprintln!("warning: bad log filter '{level}' ({e}), using info");
            EnvFilter::new("info")
        });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    if let Err(e) = result {
        eprintln!("warning: logging not initialised: {e}");
    }
}
