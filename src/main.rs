use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use tusk::account::{MastodonAccount, RunOutcome};
use tusk::config::Config;
use tusk::events::AccountEvent;

/// Tusk: follow a Mastodon account from the terminal.
///
/// Seeds your recent notifications and home timeline, then streams new
/// activity live until you press Ctrl-C.
#[derive(Parser)]
#[command(name = "tusk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register this app with an instance and print the authorization URL
    Register {
        /// Instance address (e.g. mastodon.social)
        instance: String,
    },

    /// Exchange the authorization code shown by the instance for an access token
    Authorize {
        /// The code displayed after approving the app
        code: String,
    },

    /// Show recent history, then stream live events until Ctrl-C
    Run {
        /// Print events as JSON lines instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Publish a new status
    Post {
        /// Status text
        text: String,
    },

    /// Reply to a status
    Reply {
        /// ID of the status to reply to
        id: String,
        /// Reply text
        text: String,
    },

    /// Boost a status
    Boost {
        /// Status ID
        id: String,
    },

    /// Favourite a status
    Favourite {
        /// Status ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tusk=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Register { instance } => {
            let (account, auth_url, _redirect_uri) = MastodonAccount::register(&instance).await?;
            let creds = account.credentials();

            println!("{}", "App registered.".bold());
            println!("\nAdd these to your .env file:");
            println!("  MASTODON_INSTANCE={}", creds.instance);
            println!("  MASTODON_CLIENT_ID={}", creds.client_id);
            println!("  MASTODON_CLIENT_SECRET={}", creds.client_secret);
            println!("\nThen open this URL, approve the app and copy the code:");
            println!("  {auth_url}");
            println!("\nFinally run: tusk authorize <code>");
        }

        Commands::Authorize { code } => {
            config.require_client()?;
            let mut account = MastodonAccount::new(config.credentials())?;
            let creds = account.authenticate(&code).await?;

            println!("{}", "Authorized.".bold());
            println!("\nAdd this to your .env file:");
            println!("  MASTODON_ACCESS_TOKEN={}", creds.access_token);
        }

        Commands::Run { json } => {
            config.require_run()?;
            let mut account = MastodonAccount::new(config.credentials())?;

            let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AccountEvent>();
            let (cancel_tx, cancel_rx) = watch::channel(false);

            let printer = tokio::spawn(async move {
                while let Some(event) = event_rx.recv().await {
                    if json {
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => warn!(error = %e, "Failed to serialize event"),
                        }
                    } else {
                        tusk::output::terminal::display_event(&event);
                    }
                }
            });

            let ctrl_c = tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Ctrl-C received, stopping");
                        let _ = cancel_tx.send(true);
                    }
                    Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
                }
                // A dropped sender also stops the run, so hold it until aborted
                std::future::pending::<()>().await;
            });

            let outcome = account.run(event_tx, cancel_rx).await;
            ctrl_c.abort();
            // The sender was moved into `run` and dropped on return, so this drains and exits
            let _ = printer.await;

            match outcome? {
                RunOutcome::NotAuthenticated => {
                    println!(
                        "{}",
                        "No access token configured. Run `tusk register` and `tusk authorize` first."
                            .dimmed()
                    );
                }
                RunOutcome::Cancelled => {
                    println!("{}", "Stopped.".dimmed());
                }
            }
        }

        Commands::Post { text } => {
            config.require_token()?;
            let account = MastodonAccount::new(config.credentials())?;
            account.post(&text).await?;
            println!("Posted.");
        }

        Commands::Reply { id, text } => {
            config.require_token()?;
            let account = MastodonAccount::new(config.credentials())?;
            account.reply(&id, &text).await?;
            println!("Replied to {id}.");
        }

        Commands::Boost { id } => {
            config.require_token()?;
            let account = MastodonAccount::new(config.credentials())?;
            account.boost(&id).await?;
            println!("Boosted {id}.");
        }

        Commands::Favourite { id } => {
            config.require_token()?;
            let account = MastodonAccount::new(config.credentials())?;
            account.favourite(&id).await?;
            println!("Favourited {id}.");
        }
    }

    Ok(())
}
