use anyhow::Context;
use clap::Parser;
use relm4::prelude::*;
use ring_gauge::config;
use ring_gauge::gauge::EntityId;
use ring_gauge::gui::app::{AppInit, AppModel};
use ring_gauge::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ring-gauge", version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Entity to control, overriding the config file
    #[arg(short, long)]
    entity: Option<String>,

    /// Write a commented default config file (at --config, if given) and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.init_config {
        config::write_default_config(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("{}", config_path.display());
        return Ok(());
    }
    let entity_override = args.entity.map(EntityId::new);

    let config = config::load_config_from(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?
        .with_entity(entity_override.as_ref());
    config.validate().context("Invalid configuration")?;

    let (tx, rx) = async_channel::bounded(32);
    let (outbound_tx, outbound_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(
        tx,
        outbound_rx,
        config.socket_path.clone(),
        config_path.clone(),
    );

    // GTK must not see our own flags
    let app = RelmApp::new("org.ringgauge.RingGauge").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        config_path,
        entity_override,
        outbound: outbound_tx,
        events: rx,
    });
    Ok(())
}
