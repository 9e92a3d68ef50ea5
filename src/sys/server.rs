use crate::events::AppEvent;
use crate::gauge::{Command, EntityId, EntitySnapshot, HostEvent};
use async_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;

/// Number of outbound lines a slow client may fall behind before it skips ahead.
const OUTBOUND_BACKLOG: usize = 64;

/// A line sent by a state provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    State(EntitySnapshot),
    Remove { entity: EntityId },
}

impl From<Inbound> for AppEvent {
    fn from(msg: Inbound) -> Self {
        match msg {
            Inbound::State(snapshot) => AppEvent::EntityUpdate(snapshot),
            Inbound::Remove { entity } => AppEvent::EntityRemoved(entity),
        }
    }
}

/// A line broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outbound {
    Command(Command),
    Event(HostEvent),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind unix socket {}: {source}", .path.display())]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_inbound(line: &str) -> Result<Inbound, ServerError> {
    Ok(serde_json::from_str(line)?)
}

pub fn encode_outbound(msg: &Outbound) -> Result<String, ServerError> {
    Ok(serde_json::to_string(msg)?)
}

fn bind(path: &Path) -> Result<UnixListener, ServerError> {
    // stale socket from a previous run
    if fs_err::metadata(path).is_ok() {
        let _ = fs_err::remove_file(path);
    }
    UnixListener::bind(path).map_err(|source| ServerError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn run_server(
    socket_path: PathBuf,
    tx: Sender<AppEvent>,
    outbound: broadcast::Sender<String>,
) -> Result<(), ServerError> {
    let listener = bind(&socket_path)?;
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let outbound = outbound.subscribe();
                tokio::spawn(handle_client(stream, tx, outbound));
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_client(
    stream: UnixStream,
    tx: Sender<AppEvent>,
    outbound: broadcast::Receiver<String>,
) {
    let (read, write) = stream.into_split();
    let writer = tokio::spawn(write_outbound(write, outbound));

    let mut lines = BufReader::new(read).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_inbound(line) {
                    Ok(msg) => {
                        if tx.send(AppEvent::from(msg)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::warn!("Skipping line '{}': {}", line, e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read from client: {}", e);
                break;
            }
        }
    }

    writer.abort();
}

async fn write_outbound(mut write: OwnedWriteHalf, mut outbound: broadcast::Receiver<String>) {
    loop {
        match outbound.recv().await {
            Ok(line) => {
                if write.write_all(line.as_bytes()).await.is_err()
                    || write.write_all(b"\n").await.is_err()
                {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                log::warn!("Client fell behind, dropped {} messages", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Encodes messages coming off the GTK thread and fans them out to clients.
pub async fn forward_outbound(rx: Receiver<Outbound>, outbound: broadcast::Sender<String>) {
    while let Ok(msg) = rx.recv().await {
        match encode_outbound(&msg) {
            Ok(line) => {
                // no listeners is fine
                if outbound.send(line).is_err() {
                    log::debug!("No clients connected, dropped {:?}", msg);
                }
            }
            Err(e) => log::error!("Failed to encode {:?}: {}", msg, e),
        }
    }
}

pub fn outbound_channel() -> broadcast::Sender<String> {
    broadcast::channel(OUTBOUND_BACKLOG).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::host::{EntityState, NavigationPath};

    #[test]
    fn test_parse_state_line() {
        let msg = parse_inbound(
            r#"{"type": "state", "entity": "light.desk", "state": "on", "value": 128, "name": "Desk"}"#,
        )
        .unwrap();
        let mut expected = EntitySnapshot::new(
            EntityId::new("light.desk"),
            EntityState::new("on"),
            Some(128.0),
        );
        expected.name = Some("Desk".into());
        assert_eq!(msg, Inbound::State(expected));
    }

    #[test]
    fn test_parse_remove_line() {
        let msg = parse_inbound(r#"{"type": "remove", "entity": "light.desk"}"#).unwrap();
        assert!(matches!(
            AppEvent::from(msg),
            AppEvent::EntityRemoved(e) if e == EntityId::new("light.desk")
        ));
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        for line in [
            "show",
            r#"{"type": "state"}"#,
            r#"{"type": "explode", "entity": "x"}"#,
            r#"{"entity": "light.desk", "state": "on"}"#,
        ] {
            assert!(
                matches!(parse_inbound(line), Err(ServerError::Json(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn test_outbound_wire_format() {
        let line = encode_outbound(&Outbound::Command(Command::SetValue {
            target: EntityId::new("light.desk"),
            value: 85.0,
        }))
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "set_value", "target": "light.desk", "value": 85.0})
        );

        let line = encode_outbound(&Outbound::Event(HostEvent::Navigate {
            path: NavigationPath::new("/energy"),
        }))
        .unwrap();
        assert_eq!(line, r#"{"type":"navigate","path":"/energy"}"#);
    }

    #[test]
    fn test_outbound_decodes_either_kind() {
        let cmd: Outbound = serde_json::from_str(r#"{"type":"toggle","target":"light.desk"}"#).unwrap();
        assert!(matches!(cmd, Outbound::Command(Command::Toggle { .. })));
        let ev: Outbound =
            serde_json::from_str(r#"{"type":"show_detail","entity":"light.desk"}"#).unwrap();
        assert!(matches!(ev, Outbound::Event(HostEvent::ShowDetail { .. })));
    }

    #[tokio::test]
    async fn test_forward_outbound_broadcasts_lines() {
        let (tx, rx) = async_channel::unbounded();
        let outbound = outbound_channel();
        let mut client = outbound.subscribe();

        tx.send(Outbound::Command(Command::TurnOff {
            target: EntityId::new("light.desk"),
        }))
        .await
        .unwrap();
        drop(tx);
        forward_outbound(rx, outbound).await;

        assert_eq!(
            client.recv().await.unwrap(),
            r#"{"type":"turn_off","target":"light.desk"}"#
        );
    }
}
