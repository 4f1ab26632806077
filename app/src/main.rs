use clap::Parser;
use foodlenz_core::{application::create_controller, domain::common::FoodLenzConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::shell::Shell;
use crate::args::{Args, LogArgs};

mod application;
mod args;

fn init_logger(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.filter));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so they never interleave with the screen on stdout.
    if args.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logger(&args.log);

    let profile = args.profile;
    let config = FoodLenzConfig::from(args);
    let mut controller = create_controller(config).await?;
    controller.set_profile(profile);

    let input = BufReader::new(tokio::io::stdin()).lines();
    let mut shell = Shell::new(controller, input);
    shell.run().await
}
