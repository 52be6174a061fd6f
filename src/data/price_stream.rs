use {
    crate::{
        config::{DF, SOURCES},
        data::RepaintSignal,
        domain::AssetId,
        reconciler::{StreamEvent, StreamStatus},
    },
    anyhow::{Context, Result, anyhow},
    futures::{SinkExt, StreamExt},
    serde_json::Value,
    std::{
        sync::mpsc::Sender,
        thread::{self, JoinHandle},
    },
    tokio::sync::oneshot,
    tokio_tungstenite::{connect_async, tungstenite::Message},
};

fn build_stream_url(assets: &[AssetId]) -> String {
    let ids: Vec<&str> = assets.iter().map(|a| a.id()).collect();
    format!("{}{}", SOURCES.stream.base_url, ids.join(","))
}

/// Owns the live price subscription. Dropping the handle closes the socket
/// and joins the worker thread, however the window goes away.
pub struct PriceStreamHandle {
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PriceStreamHandle {
    /// Opens one subscription for `assets`. Events go to `tx` in arrival order
    /// and each one wakes the UI. Connection failures are reported as `Closed`
    /// and never retried.
    pub fn open(
        assets: &[AssetId],
        tx: Sender<StreamEvent>,
        repaint: RepaintSignal,
    ) -> Result<Self> {
        Self::open_url(build_stream_url(assets), tx, repaint)
    }

    fn open_url(url: String, tx: Sender<StreamEvent>, repaint: RepaintSignal) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = thread::Builder::new()
            .name("price-stream".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("Failed to create price stream runtime: {}", e);
                        emit(&tx, &repaint, StreamEvent::Status(StreamStatus::Closed));
                        return;
                    }
                };
                rt.block_on(async {
                    if let Err(e) = run_price_stream(&url, &tx, &repaint, shutdown_rx).await {
                        log::error!("WebSocket error: {:#}", e);
                    }
                    emit(&tx, &repaint, StreamEvent::Status(StreamStatus::Closed));
                });
                // A DNS lookup still parked on the blocking pool must not hold up the join.
                rt.shutdown_background();
            })
            .context("Failed to spawn price stream thread")?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
        })
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl Drop for PriceStreamHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Err only means the worker already finished.
            let _ = shutdown.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Price stream thread panicked");
            }
        }
        #[cfg(debug_assertions)]
        if DF.log_price_stream_updates {
            log::info!("Price stream torn down");
        }
    }
}

/// Sends one event and wakes the UI. False once the receiver is gone.
fn emit(tx: &Sender<StreamEvent>, repaint: &RepaintSignal, event: StreamEvent) -> bool {
    let sent = tx.send(event).is_ok();
    repaint.wake();
    sent
}

async fn run_price_stream(
    url: &str,
    tx: &Sender<StreamEvent>,
    repaint: &RepaintSignal,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<()> {
    emit(tx, repaint, StreamEvent::Status(StreamStatus::Connecting));

    #[cfg(debug_assertions)]
    if DF.log_price_stream_updates {
        log::info!("Attempting connection to {}", url);
    }

    let ws_stream = tokio::select! {
        biased;
        _ = &mut shutdown => return Ok(()),
        conn = connect_async(url) => conn.context("WebSocket connect failed")?.0,
    };

    if !emit(tx, repaint, StreamEvent::Status(StreamStatus::Open)) {
        return Ok(());
    }

    let (mut write, mut read) = ws_stream.split();

    loop {
        let msg = tokio::select! {
            biased;
            _ = &mut shutdown => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(());
            }
            msg = read.next() => msg,
        };

        match msg {
            Some(Ok(Message::Text(text))) => match parse_price_frame(&text) {
                Ok(updates) if updates.is_empty() => {}
                Ok(updates) => {
                    #[cfg(debug_assertions)]
                    if DF.log_price_stream_updates {
                        for (asset, price) in &updates {
                            log::info!("[tick] {} -> {:.8}", asset, price);
                        }
                    }
                    if !emit(tx, repaint, StreamEvent::Prices(updates)) {
                        // Nobody is listening any more.
                        return Ok(());
                    }
                }
                Err(e) => log::warn!("⚠️ Failed to parse WebSocket message: {:#}", e),
            },
            Some(Ok(Message::Close(frame))) => {
                log::warn!("WebSocket closed by server: {:?}", frame);
                return Ok(());
            }
            Some(Ok(_)) => {} // ping/pong/binary
            Some(Err(e)) => return Err(anyhow!(e)),
            None => return Ok(()),
        }
    }
}

/// Parses one inbound frame: a JSON object of asset id -> price. Prices come
/// as strings (`"6929.82"`) or numbers. Unknown ids and bad values are
/// skipped without dropping the rest of the frame.
pub(crate) fn parse_price_frame(text: &str) -> Result<Vec<(AssetId, f64)>> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(text).context("price frame is not a JSON object")?;

    let updates = object
        .into_iter()
        .filter_map(|(id, value)| {
            let Some(asset) = AssetId::from_id(&id) else {
                log::debug!("Ignoring untracked asset in stream: {}", id);
                return None;
            };
            let price = match &value {
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            }
            .filter(|p| p.is_finite());
            if price.is_none() {
                log::debug!("Skipping unusable price for {}: {}", id, value);
            }
            price.map(|p| (asset, p))
        })
        .collect();

    Ok(updates)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{
            sync::atomic::Ordering,
            time::{Duration, Instant},
        },
        tokio::net::TcpListener,
        tokio_tungstenite::accept_async,
    };

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn local_listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/prices", listener.local_addr().unwrap());
        (listener, url)
    }

    #[test]
    fn stream_url_joins_ids() {
        assert_eq!(
            build_stream_url(&AssetId::all()),
            "wss://ws.coincap.io/prices?assets=bitcoin,ethereum,ripple,dogecoin,cardano"
        );
    }

    #[test]
    fn parses_string_and_numeric_prices() {
        let updates =
            parse_price_frame(r#"{"bitcoin":"97012.34567890","ripple":0.62341234}"#).unwrap();
        assert_eq!(
            updates,
            vec![(AssetId::Bitcoin, 97_012.3456789), (AssetId::Ripple, 0.62341234)]
        );
    }

    #[test]
    fn skips_unknown_and_bad_entries() {
        let updates = parse_price_frame(
            r#"{"solana":"180.1","dogecoin":"not-a-price","cardano":null,"ethereum":"3100.5"}"#,
        )
        .unwrap();
        assert_eq!(updates, vec![(AssetId::Ethereum, 3_100.5)]);
    }

    #[test]
    fn rejects_non_object_frames() {
        assert!(parse_price_frame("[1,2,3]").is_err());
        assert!(parse_price_frame("not json").is_err());
        assert_eq!(parse_price_frame("{}").unwrap(), vec![]);
    }

    #[test]
    fn refused_connection_is_an_error() {
        let (tx, rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        // Port 9 on loopback: refused immediately, no network needed.
        let result = rt.block_on(run_price_stream(
            "ws://127.0.0.1:9/prices",
            &tx,
            &RepaintSignal::default(),
            shutdown_rx,
        ));
        assert!(result.is_err());
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Status(StreamStatus::Connecting));
        assert!(rx.try_recv().is_err());
        drop(shutdown_tx);
    }

    #[test]
    fn shutdown_before_connect_is_clean() {
        let (tx, rx) = std::sync::mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        shutdown_tx.send(()).unwrap();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let result = rt.block_on(run_price_stream(
            "ws://10.255.255.1:9/prices",
            &tx,
            &RepaintSignal::default(),
            shutdown_rx,
        ));
        assert!(result.is_ok());
        assert_eq!(rx.try_recv().unwrap(), StreamEvent::Status(StreamStatus::Connecting));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn handle_reports_closed_after_failed_connect() {
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = PriceStreamHandle::open_url(
            "ws://127.0.0.1:9/prices".to_string(),
            tx,
            RepaintSignal::default(),
        )
        .unwrap();

        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Status(StreamStatus::Connecting)
        );
        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Status(StreamStatus::Closed)
        );
        drop(handle);
        // Worker joined on drop: the channel is now disconnected.
        assert!(rx.recv_timeout(TIMEOUT).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn forwards_frames_until_dropped() {
        let (listener, url) = local_listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            for frame in [r#"{"ripple":"0.62341234"}"#, "not json", r#"{"bitcoin":1}"#] {
                ws.send(Message::text(frame.to_string())).await.unwrap();
            }
            // Hold the socket open until the client says goodbye.
            while let Some(msg) = ws.next().await {
                match msg {
                    Ok(Message::Close(_)) => return true,
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
            false
        });

        let (tx, rx) = std::sync::mpsc::channel();
        let (signal, wakes) = crate::data::repaint::tests::counting_signal();
        let handle = PriceStreamHandle::open_url(url, tx, signal).unwrap();

        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Status(StreamStatus::Connecting)
        );
        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Status(StreamStatus::Open)
        );
        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Prices(vec![(AssetId::Ripple, 0.62341234)])
        );
        // The malformed frame in between is skipped, not fatal.
        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Prices(vec![(AssetId::Bitcoin, 1.0)])
        );
        assert!(handle.is_running());
        assert!(wakes.load(Ordering::SeqCst) > 0);

        drop(handle);
        assert_eq!(
            rx.recv_timeout(TIMEOUT).unwrap(),
            StreamEvent::Status(StreamStatus::Closed)
        );
        assert!(rx.recv_timeout(TIMEOUT).is_err());
        assert!(server.await.unwrap(), "server never saw a Close frame");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn server_close_ends_the_stream() {
        let (listener, url) = local_listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(socket).await.unwrap();
            ws.send(Message::text(r#"{"cardano":"0.45"}"#.to_string()))
                .await
                .unwrap();
            ws.close(None).await.unwrap();
        });

        let (tx, rx) = std::sync::mpsc::channel();
        let handle = PriceStreamHandle::open_url(url, tx, RepaintSignal::default()).unwrap();

        let events: Vec<StreamEvent> = (0..4).map(|_| rx.recv_timeout(TIMEOUT).unwrap()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::Status(StreamStatus::Connecting),
                StreamEvent::Status(StreamStatus::Open),
                StreamEvent::Prices(vec![(AssetId::Cardano, 0.45)]),
                StreamEvent::Status(StreamStatus::Closed),
            ]
        );
        server.await.unwrap();

        // No reconnect: the worker is done and the channel drains dry.
        drop(handle);
        assert!(rx.recv_timeout(TIMEOUT).is_err());
    }

    #[test]
    fn drop_while_connecting_returns_promptly() {
        let (tx, _rx) = std::sync::mpsc::channel();
        // Unroutable: the connect either hangs or fails, never succeeds.
        let handle = PriceStreamHandle::open_url(
            "ws://10.255.255.1:9/prices".to_string(),
            tx,
            RepaintSignal::default(),
        )
        .unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        drop(handle);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
