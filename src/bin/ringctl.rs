use clap::{Parser, Subcommand};
use ring_gauge::config::DEFAULT_SOCKET_PATH;
use ring_gauge::gauge::host::{EntityId, EntitySnapshot, EntityState};
use ring_gauge::sys::server::Inbound;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ringctl", version, about, long_about = None)]
struct Cli {
    /// Socket of the running ring-gauge
    #[arg(short, long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Report the state of an entity
    State {
        entity: String,
        state: String,
        /// Current value, in the gauge's value range
        #[arg(long)]
        value: Option<f64>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Picture for the center of the gauge
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Forget an entity
    Remove { entity: String },
    /// Print commands and events emitted by the gauge
    Listen,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::State {
            entity,
            state,
            value,
            name,
            picture,
        } => {
            let mut snapshot =
                EntitySnapshot::new(EntityId::new(entity), EntityState::new(state), value);
            snapshot.name = name;
            snapshot.picture = picture;
            send_message(&cli.socket, &Inbound::State(snapshot))
        }
        Commands::Remove { entity } => send_message(
            &cli.socket,
            &Inbound::Remove {
                entity: EntityId::new(entity),
            },
        ),
        Commands::Listen => listen(&cli.socket),
    }
}

fn connect(socket: &Path) -> anyhow::Result<UnixStream> {
    UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ring-gauge at {}: {}. Is ring-gauge running?",
            socket.display(),
            e
        )
    })
}

fn send_message(socket: &Path, msg: &Inbound) -> anyhow::Result<()> {
    let mut stream = connect(socket)?;
    writeln!(stream, "{}", serde_json::to_string(msg)?)?;
    Ok(())
}

fn listen(socket: &Path) -> anyhow::Result<()> {
    let stream = connect(socket)?;
    for line in BufReader::new(stream).lines() {
        println!("{}", line?);
    }
    Ok(())
}
