mod cli;

use clap::Parser;

use smolder_engine::logging::{init_logging, LoggingConfig};
use smolder_fx::Application;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let mut app = Application::new()
        .size(cli.width, cli.height)
        .config(cli.scene_config());
    if let Some(seed) = cli.seed {
        app = app.seed(seed);
    }

    if let Err(e) = app.run() {
        log::error!("smolder runtime error: {e:#}");
        std::process::exit(1);
    }
}
