mod lookup;

use clap::Parser;
use socialscope_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "socialscope")]
#[command(about = "Resolve social media handles into profile summaries")]
struct Cli {
    /// instagram (ig), facebook (fb), tiktok (tt) or threads
    platform: Platform,

    /// One or more handles; a leading `@` is optional.
    #[arg(required = true)]
    identities: Vec<String>,

    /// Print profiles as a JSON array instead of a summary table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = socialscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let results = lookup::run_lookups(&config, cli.platform, &cli.identities).await?;
    if cli.json {
        println!("{}", lookup::render_json(&results)?);
    } else {
        for line in lookup::render_summary(&results, chrono::Utc::now()) {
            println!("{line}");
        }
    }

    let found = results.iter().filter(|r| r.profile.is_some()).count();
    if found == 0 {
        anyhow::bail!("no profiles resolved on {}", cli.platform);
    }
    Ok(())
}
