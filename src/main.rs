use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use userapi::{
    commands::{
        self, FieldSpec,
        config::{ClientConfig, Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    },
    retry::{MAX_RETRIES, RETRY_DELAY_MS, RetryPolicy},
    users::UserId,
};

/// userapi - client for a remote user-management REST API
///
/// Lists, creates, updates and deletes users at <base-url>/users.
/// Without a subcommand it runs a short demonstration of every operation.
///
/// Examples:
///   userapi list --filter _limit=5
///   userapi create --field name="John Doe" --field email=john@example.com
///   userapi delete 1
#[derive(Parser, Debug)]
#[command(author, version = env!("USERAPI_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// API base URL (also via USERAPI_BASE_URL)
    #[arg(
        long = "base-url",
        env = "USERAPI_BASE_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL,
        global = true
    )]
    pub base_url: String,

    /// Attempts made by retried requests
    #[arg(long, value_name = "N", default_value_t = MAX_RETRIES, global = true)]
    pub retries: usize,

    /// Delay between retried attempts, in milliseconds
    #[arg(long = "retry-delay-ms", value_name = "MS", default_value_t = RETRY_DELAY_MS, global = true)]
    pub retry_delay_ms: u64,

    /// Request timeout in seconds
    #[arg(long = "timeout-secs", value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run list, create, update, delete and a retried request in sequence
    Demo,

    /// List users
    List(ListArgs),

    /// Create a user
    Create(CreateArgs),

    /// Replace a user's data
    Update(UpdateArgs),

    /// Delete a user
    Delete(DeleteArgs),

    /// GET a path with retries and print the status code
    Probe(ProbeArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Query filter, may be repeated
    #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
    pub filters: Vec<FieldSpec>,
}

#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// User field, may be repeated
    #[arg(long = "field", short = 'F', value_name = "KEY=VALUE", required = true)]
    pub fields: Vec<FieldSpec>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// The user ID
    #[arg(value_name = "ID")]
    pub id: UserId,

    /// User field, may be repeated
    #[arg(long = "field", short = 'F', value_name = "KEY=VALUE", required = true)]
    pub fields: Vec<FieldSpec>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// The user ID
    #[arg(value_name = "ID")]
    pub id: UserId,
}

#[derive(clap::Args, Debug)]
pub struct ProbeArgs {
    /// Path to request
    #[arg(value_name = "PATH", default_value = commands::SAMPLE_PATH)]
    pub path: String,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryPolicy::new(self.retries, Duration::from_millis(self.retry_delay_ms)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let config = Config::new(&cli.client_config())?;

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => commands::demo(&config.users, &config.http, &config.retry).await?,
        Commands::List(args) => {
            commands::list(&config.users, &commands::to_query(&args.filters)).await;
        }
        Commands::Create(args) => {
            commands::create(&config.users, &commands::to_record(&args.fields)).await;
        }
        Commands::Update(args) => {
            commands::update(&config.users, args.id, &commands::to_record(&args.fields)).await;
        }
        Commands::Delete(args) => {
            commands::delete(&config.users, args.id).await;
        }
        Commands::Probe(args) => {
            commands::probe(&config.http, &args.path, &config.retry).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults_to_demo() {
        let cli = Cli::try_parse_from(["userapi"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.retries, 3);
        assert_eq!(cli.retry_delay_ms, 1000);
    }

    #[test]
    fn test_cli_list_filters_parsing() {
        let cli = Cli::try_parse_from(["userapi", "list", "-f", "_limit=5", "--filter", "id=2"])
            .unwrap();
        match cli.command {
            Some(Commands::List(args)) => {
                assert_eq!(args.filters.len(), 2);
                assert_eq!(args.filters[0].key, "_limit");
                assert_eq!(args.filters[1].value, "2");
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_update_parsing() {
        let cli = Cli::try_parse_from(["userapi", "update", "7", "--field", "name=Jane"]).unwrap();
        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.id, 7);
                assert_eq!(args.fields[0].to_string(), "name=Jane");
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn test_cli_create_requires_fields() {
        assert!(Cli::try_parse_from(["userapi", "create"]).is_err());
    }

    #[test]
    fn test_cli_rejects_malformed_field() {
        assert!(Cli::try_parse_from(["userapi", "create", "--field", "name"]).is_err());
    }

    #[test]
    fn test_cli_delete_requires_numeric_id() {
        assert!(Cli::try_parse_from(["userapi", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "userapi",
            "probe",
            "--base-url",
            "http://localhost:3000",
            "--retries",
            "5",
            "--retry-delay-ms",
            "10",
        ])
        .unwrap();

        let config = cli.client_config();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay, Duration::from_millis(10));
        match cli.command {
            Some(Commands::Probe(args)) => assert_eq!(args.path, "/posts/1"),
            _ => panic!("Expected Probe command"),
        }
    }
}
