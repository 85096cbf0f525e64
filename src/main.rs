use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use freelancer_bid_agent::bot::BidBot;
use freelancer_bid_agent::config::Config;
use freelancer_bid_agent::freelancer::{FreelancerClient, MarketplaceInterface};
use freelancer_bid_agent::llm::{CompletionInterface, GroqClient};
use freelancer_bid_agent::simulation::MarketplaceSimulator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "freelancer_bid_agent=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    print_banner(&config);

    let marketplace: Arc<dyn MarketplaceInterface> = if config.agent.simulation_mode {
        info!("🎞️  Initializing Marketplace Simulator");
        Arc::new(MarketplaceSimulator::new())
    } else {
        info!("🌐 Initializing Freelancer client");
        Arc::new(FreelancerClient::new(&config.freelancer))
    };
    let llm: Arc<dyn CompletionInterface> = Arc::new(GroqClient::new(&config.llm));

    // Ctrl-C stops the loop between operations rather than mid-call
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Ctrl-C received, stopping after the current operation");
            let _ = stop_tx.send(true);
        }
    });

    let mut bot = BidBot::new(config, marketplace, llm, stop_rx);
    let summary = bot.run().await?;

    info!(
        "Run complete: {} bids placed across {} projects seen",
        summary.bids_placed, summary.projects_seen
    );
    Ok(())
}

fn print_banner(config: &Config) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║            Freelancer Bid Agent with Groq                ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "📊 Mode: {}",
        if config.agent.simulation_mode {
            "SIMULATION (no live bids)"
        } else {
            "⚠️  LIVE BIDDING ⚠️"
        }
    );
    println!("🎯 Bid cap: {} bids", config.agent.bid_limit);
    println!("🔍 Search page size: {}", config.agent.project_search_limit);
    println!("🔍 Eligibility Filters:");
    println!(
        "   • Excluded currencies: {}",
        config.filters.unwanted_currencies.join(", ")
    );
    println!(
        "   • Excluded countries: {}",
        config.filters.unwanted_countries.len()
    );
    println!(
        "   • Min fixed budget: {:.0}",
        config.filters.min_fixed_budget
    );
    println!("🤖 Model: {}", config.llm.model);
    println!(
        "⏱️  Poll interval: {} seconds, min bid age: {} seconds",
        config.agent.poll_interval_secs, config.agent.min_bid_age_secs
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!("═══════════════════════════════════════════════════════════");
    println!();
}
