use anyhow::Result;
use clap::{App as Cli, Arg};
use std::path::Path;
use taskdeck::app::App;
use taskdeck::config::{self, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Sets a custom configuration directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("tasks")
                .short("t")
                .long("tasks")
                .value_name("DIR")
                .help("Reads tasks from this directory")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("theme")
                .long("theme")
                .value_name("NAME")
                .help("Overrides the configured theme")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(dir) = matches.value_of("tasks") {
        config.tasks_dir = config::expand_home(Path::new(dir));
    }
    if let Some(theme) = matches.value_of("theme") {
        config.theme_name = theme.to_string();
    }
    App::start(config).await
}
