mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "menuscrape-cli")]
#[command(about = "Restaurant menu scraper command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one site's pipeline and write its menu file
    Scrape {
        /// Site profile id, e.g. `ilcaminetto` or `uber`
        #[arg(long)]
        site: String,

        /// Page to scrape; defaults to the profile's URL
        #[arg(long)]
        url: Option<String>,

        /// Overrides `MENUSCRAPE_OUTPUT_DIR`
        #[arg(long, env = "MENUSCRAPE_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Print the resolved run and exit without loading the page
        #[arg(long)]
        dry_run: bool,
    },
    /// List the configured site profiles
    Profiles,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = menuscrape_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let profiles = menuscrape_core::load_profiles(config.profiles_path.as_deref())?;

    match cli.command {
        Some(Commands::Scrape {
            site,
            url,
            output_dir,
            dry_run,
        }) => {
            let request = scrape::ScrapeRequest {
                site: &site,
                url: url.as_deref(),
                output_dir: output_dir.as_deref(),
                dry_run,
            };
            scrape::run_scrape(&config, &profiles, &request).await?;
        }
        Some(Commands::Profiles) => scrape::print_profiles(&profiles),
        None => println!("menuscrape-cli: use --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
