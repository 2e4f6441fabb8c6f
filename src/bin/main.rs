use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use runway::core::helpers::validate_id;
use runway::models::models::{Actor, FollowTarget, Product};
use runway::{
    AuthStore, ClientConfig, Collaborators, FeedLoader, FetchOutcome, HttpApi,
    InteractionController, MarketplaceApi, ToggleOutcome, TracingNotifier,
};

#[derive(Parser)]
#[command(name = "runway", about = "Storefront client core against a live API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Page through the reels feed
    Reels {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Toggle following a user
    Follow {
        user_id: String,
        /// Current state as shown in the UI
        #[arg(long)]
        followed: bool,
        #[arg(long, default_value_t = 0)]
        followers: u64,
    },
    /// Toggle a product in the wishlist
    Wishlist {
        product_id: String,
        #[arg(long)]
        wishlisted: bool,
    },
}

fn actor_from_env() -> Option<Actor> {
    let token = std::env::var("RUNWAY_TOKEN").ok().filter(|t| !t.is_empty())?;
    let id = std::env::var("RUNWAY_USER_ID").ok().filter(|id| validate_id(id))?;
    let username = std::env::var("RUNWAY_USERNAME").unwrap_or_else(|_| id.clone());
    Some(Actor { id, username, token })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("runway=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    let actor = actor_from_env();

    let mut http = HttpApi::new(&config).context("building HTTP client")?;
    if let Some(a) = &actor {
        http = http.with_token(a.token.clone());
    }
    let api: Arc<dyn MarketplaceApi> = Arc::new(http);

    let auth = AuthStore::new();
    let deps = Collaborators {
        api: api.clone(),
        auth: auth.clone(),
        notifier: Arc::new(TracingNotifier),
    };

    match cli.command {
        Command::Reels { pages } => {
            let loader = FeedLoader::new(api, &config);
            let rx = auth.subscribe();
            auth.resolve(actor);

            let mut outcome = loader.run(rx).await;
            for _ in 1..pages {
                match outcome {
                    Some(FetchOutcome::Loaded { has_more: true, .. }) => {
                        outcome = loader.load_more().await
                    }
                    _ => break,
                }
            }

            for reel in loader.items() {
                println!(
                    "{}  {}  {}  {}",
                    reel.created_at.to_rfc3339(),
                    reel.id,
                    reel.author_id,
                    reel.caption
                );
            }
            println!(
                "{} reels, next page {}, phase {:?}",
                loader.len(),
                loader.cursor(),
                loader.phase()
            );
        }
        Command::Follow { user_id, followed, followers } => {
            anyhow::ensure!(validate_id(&user_id), "invalid user id");
            auth.resolve(actor);
            let target = FollowTarget {
                id: user_id.clone(),
                username: user_id,
                is_followed_by_me: followed,
                followers_count: followers,
            };
            let control = InteractionController::follow(&target, deps);
            let outcome = control.toggle().await;
            report(outcome, &control);
        }
        Command::Wishlist { product_id, wishlisted } => {
            anyhow::ensure!(validate_id(&product_id), "invalid product id");
            auth.resolve(actor);
            let product = Product {
                id: product_id.clone(),
                name: product_id,
                is_initially_wishlisted: wishlisted,
            };
            let control = InteractionController::wishlist(&product, deps);
            let outcome = control.toggle().await;
            report(outcome, &control);
        }
    }

    Ok(())
}

fn report(outcome: ToggleOutcome, control: &InteractionController) {
    let state = control.state();
    match state.count {
        Some(count) => println!("{:?}: active={} count={}", outcome, state.active, count),
        None => println!("{:?}: active={}", outcome, state.active),
    }
}
