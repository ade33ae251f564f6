//! The stdio serve loop, generic over its byte streams.
//!
//! ```text
//! reader ──lines──► parse_line ──► spawn_blocking(dispatch) ──┐
//!                        │                                     ├──► mpsc ──► writer
//!                  malformed frame ───────────────────────────┤
//! Dispatcher::subscribe ──► forwarder ────────────────────────┘
//! ```
//!
//! Only the writer task touches the output stream. On end of input (or a
//! read error) every in-flight call is answered and every notification it
//! emitted is flushed before `serve` returns.

use std::sync::{atomic::Ordering, Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::{
        broadcast::{
            self,
            error::{RecvError, TryRecvError},
        },
        mpsc, oneshot,
    },
    task::{JoinError, JoinSet},
};
use tracing::{error, info, warn};

use chameleon_core::Notification;

use crate::state::BridgeState;
use crate::transport::{self, OutboundFrame};

/// Serve requests from `reader` until it is exhausted, writing frames to
/// `writer`.
///
/// Lines that are not valid UTF-8 or not valid frames are answered with an
/// `INVALID_ARGUMENT` frame; serving continues. A read error ends input the
/// same way end-of-stream does.
pub async fn serve<R, W>(state: Arc<BridgeState>, mut reader: R, writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundFrame>();
    let writer = tokio::spawn(write_frames(out_rx, writer));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let forwarder = tokio::spawn(forward_notifications(
        Arc::clone(&state),
        state.dispatcher.subscribe(),
        out_tx.clone(),
        shutdown_rx,
    ));

    // ── Reader: one blocking worker per call ──────────────────────────────
    let mut in_flight: JoinSet<()> = JoinSet::new();
    let mut buf = Vec::new();
    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("input read failed, shutting down: {e}");
                        break;
                    }
                }
                match transport::parse_line(&buf) {
                    Ok(None) => {}
                    Ok(Some((id, call))) => {
                        let state = Arc::clone(&state);
                        let tx = out_tx.clone();
                        in_flight.spawn_blocking(move || {
                            let response = state.dispatcher.dispatch(&call);
                            state.record_response(&response);
                            let _ = tx.send(OutboundFrame::Response {
                                id: Some(id),
                                response,
                            });
                        });
                    }
                    Err(frame) => {
                        state.frames_malformed.fetch_add(1, Ordering::Relaxed);
                        let _ = out_tx.send(frame);
                    }
                }
                buf.clear();
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_worker_exit(joined);
            }
        }
    }

    info!("input closed; waiting for {} in-flight calls", in_flight.len());
    while let Some(joined) = in_flight.join_next().await {
        log_worker_exit(joined);
    }

    let _ = shutdown_tx.send(());
    if let Err(e) = forwarder.await {
        error!("notification forwarder failed: {e}");
    }
    drop(out_tx);
    writer.await??;
    Ok(())
}

async fn write_frames<W>(
    mut out_rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = out_rx.recv().await {
        let mut line = match transport::encode(&frame) {
            Ok(line) => line,
            Err(e) => {
                error!("failed to encode outbound frame: {e}");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}

async fn forward_notifications(
    state: Arc<BridgeState>,
    mut notify_rx: broadcast::Receiver<Notification>,
    out_tx: mpsc::UnboundedSender<OutboundFrame>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let forward = |note: &Notification| {
        state.notifications_forwarded.fetch_add(1, Ordering::Relaxed);
        out_tx.send(OutboundFrame::from(note)).is_ok()
    };
    let lagged = |n: u64| {
        warn!("notification forwarder lagged by {n} events");
        state
            .notifications_lagged
            .fetch_add(n as usize, Ordering::Relaxed);
    };

    loop {
        tokio::select! {
            biased;
            received = notify_rx.recv() => match received {
                Ok(note) => {
                    if !forward(&note) {
                        return;
                    }
                }
                Err(RecvError::Lagged(n)) => lagged(n),
                Err(RecvError::Closed) => return,
            },
            _ = &mut shutdown_rx => break,
        }
    }

    // Flush whatever the last calls emitted.
    loop {
        match notify_rx.try_recv() {
            Ok(note) => {
                if !forward(&note) {
                    return;
                }
            }
            Err(TryRecvError::Lagged(n)) => lagged(n),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return,
        }
    }
}

fn log_worker_exit(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("dispatch worker failed: {e}");
    }
}
