use superstore_insights::config::Settings;
use superstore_insights::filter::FilterSpec;
use superstore_insights::server::{self, AppState};
use superstore_insights::service::SalesService;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "superstore-insights")]
#[command(about = "Sales analytics over the Superstore dataset")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API
    Serve {
        /// Bind address (overrides SUPERSTORE_BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the dataset once and print one view as JSON
    Report {
        view: View,

        /// Earliest order date, YYYY-MM-DD
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Latest order date, YYYY-MM-DD
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Region to include (repeatable)
        #[arg(long)]
        region: Vec<String>,

        /// Segment to include (repeatable)
        #[arg(long)]
        segment: Vec<String>,

        /// Category to include (repeatable)
        #[arg(long)]
        category: Vec<String>,
    },
    /// Print the available filter values
    Options,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Overview,
    Category,
    Region,
    Trends,
    Profit,
    Segment,
    States,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = Settings::from_env()?;

    match args.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind_addr = bind;
            }
            let service = SalesService::from_settings(&settings)?;

            info!("Starting {} v{} on {}", settings.api_title, settings.api_version, settings.bind_addr);
            let listener = TcpListener::bind(&settings.bind_addr)
                .await
                .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;

            server::serve(listener, Arc::new(AppState { service, settings })).await?;
        }
        Commands::Report {
            view,
            start_date,
            end_date,
            region,
            segment,
            category,
        } => {
            let service = SalesService::from_settings(&settings)?;
            let mut filter = FilterSpec::new()
                .with_regions(region)
                .with_segments(segment)
                .with_categories(category);
            filter.start_date = start_date;
            filter.end_date = end_date;

            match view {
                View::Overview => print_json(&service.overview(&filter).await?)?,
                View::Category => print_json(&service.sales_by_category(&filter).await?)?,
                View::Region => print_json(&service.sales_by_region(&filter).await?)?,
                View::Trends => print_json(&service.sales_trends(&filter).await?)?,
                View::Profit => print_json(&service.profit_analysis(&filter).await?)?,
                View::Segment => print_json(&service.segment_analysis(&filter).await?)?,
                View::States => print_json(&service.state_sales(&filter).await?)?,
            }
        }
        Commands::Options => {
            let service = SalesService::from_settings(&settings)?;
            print_json(&service.filter_options().await?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
