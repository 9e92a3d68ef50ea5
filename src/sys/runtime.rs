use crate::events::AppEvent;
use crate::sys::server::{self, Outbound};
use async_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(
    tx: Sender<AppEvent>,
    outbound_rx: Receiver<Outbound>,
    socket_path: PathBuf,
    config_path: PathBuf,
) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            let outbound = server::outbound_channel();

            {
                let tx = tx.clone();
                let outbound = outbound.clone();
                tokio::spawn(async move {
                    if let Err(e) = server::run_server(socket_path, tx, outbound).await {
                        log::error!("Socket server stopped: {}", e);
                    }
                });
            }

            tokio::spawn(server::forward_outbound(outbound_rx, outbound));

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(config_path, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
