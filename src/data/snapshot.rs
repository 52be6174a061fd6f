use {
    crate::{
        config::{DF, RetryPolicy, SOURCES, USER_AGENT},
        data::RepaintSignal,
        domain::AssetId,
        reconciler::SnapshotPriceTable,
    },
    anyhow::{Context, Result, anyhow},
    async_trait::async_trait,
    chrono::Local,
    reqwest::Client,
    serde::Deserialize,
    std::{
        collections::{BTreeMap, HashMap},
        sync::{Arc, mpsc::Sender},
        thread,
        time::Duration,
    },
};

/// Abstract interface for a one-shot pull of every tracked price.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch_prices(&self, assets: &[AssetId]) -> Result<SnapshotPriceTable>;
}

/// `simple/price` body: `{"bitcoin": {"usd": 97000.1}, ...}`
#[derive(Debug, Deserialize)]
struct SimplePriceData {
    #[serde(default)]
    usd: Option<f64>,
}

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(SOURCES.snapshot.timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: SOURCES.snapshot.base_url.to_string(),
        })
    }

    fn request_url(&self, assets: &[AssetId]) -> String {
        let ids: Vec<&str> = assets.iter().map(|a| a.id()).collect();
        format!(
            "{}?ids={}&vs_currencies={}",
            self.base_url,
            ids.join(","),
            SOURCES.snapshot.vs_currency
        )
    }
}

#[async_trait]
impl SnapshotProvider for CoinGeckoProvider {
    async fn fetch_prices(&self, assets: &[AssetId]) -> Result<SnapshotPriceTable> {
        let url = self.request_url(assets);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch from CoinGecko")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("CoinGecko API error: {}", status));
        }

        let raw: HashMap<String, SimplePriceData> = response
            .json()
            .await
            .context("Failed to parse CoinGecko response")?;

        Ok(SnapshotPriceTable::new(
            prices_from_response(raw, assets),
            Local::now(),
        ))
    }
}

/// Keeps only the assets we asked for that carry a usable USD price.
fn prices_from_response(
    raw: HashMap<String, SimplePriceData>,
    wanted: &[AssetId],
) -> BTreeMap<AssetId, f64> {
    let prices: BTreeMap<AssetId, f64> = raw
        .into_iter()
        .filter_map(|(id, data)| {
            let asset = AssetId::from_id(&id).filter(|a| wanted.contains(a))?;
            let price = data.usd.filter(|p| p.is_finite())?;
            Some((asset, price))
        })
        .collect();

    if prices.len() < wanted.len() {
        log::warn!(
            "Snapshot priced {}/{} assets; the rest stay N/A until the stream fills them",
            prices.len(),
            wanted.len()
        );
    }
    prices
}

/// Runs one fetch cycle: the first attempt plus up to `policy.retries` more,
/// backing off between them. Only the final outcome is returned.
pub async fn fetch_with_retry(
    provider: &dyn SnapshotProvider,
    assets: &[AssetId],
    policy: RetryPolicy,
) -> Result<SnapshotPriceTable> {
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match provider.fetch_prices(assets).await {
            Ok(table) => return Ok(table),
            Err(e) if attempt < attempts => {
                let delay_ms = policy.backoff_ms(attempt);
                if DF.log_snapshot {
                    log::warn!(
                        "Snapshot attempt {}/{} failed: {:#}. Retrying in {}ms...",
                        attempt,
                        attempts,
                        e,
                        delay_ms
                    );
                }
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!("gave up after {} attempts", attempts)));
            }
        }
    }
}

/// Runs a fetch cycle on its own thread, sends the outcome on `tx` and wakes
/// the UI. If the receiver is gone by then the result is simply dropped.
pub fn spawn_snapshot_fetch(
    provider: Arc<dyn SnapshotProvider>,
    policy: RetryPolicy,
    tx: Sender<Result<SnapshotPriceTable>>,
    repaint: RepaintSignal,
) -> Result<()> {
    thread::Builder::new()
        .name("snapshot-fetch".to_string())
        .spawn(move || {
            let result = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt.block_on(fetch_with_retry(provider.as_ref(), &AssetId::all(), policy)),
                Err(e) => Err(anyhow!(e).context("Failed to create snapshot runtime")),
            };
            let _ = tx.send(result);
            repaint.wake();
        })
        .context("Failed to spawn snapshot thread")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::sync::{
            atomic::{AtomicU32, Ordering},
            mpsc,
        },
    };

    /// Fails the first `failures` calls, then succeeds.
    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyProvider {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl SnapshotProvider for FlakyProvider {
        async fn fetch_prices(&self, _assets: &[AssetId]) -> Result<SnapshotPriceTable> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(anyhow!("attempt {} refused", call));
            }
            let prices = BTreeMap::from([(AssetId::Bitcoin, 97_000.0)]);
            Ok(SnapshotPriceTable::new(prices, Local::now()))
        }
    }

    fn no_wait(retries: u32) -> RetryPolicy {
        RetryPolicy {
            retries,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    #[tokio::test]
    async fn recovers_within_budget() {
        let provider = FlakyProvider::new(2);
        let table = fetch_with_retry(&provider, &AssetId::all(), no_wait(3))
            .await
            .unwrap();
        assert_eq!(table.get(AssetId::Bitcoin), Some(97_000.0));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let provider = FlakyProvider::new(u32::MAX);
        let err = fetch_with_retry(&provider, &AssetId::all(), no_wait(3))
            .await
            .unwrap_err();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
        let msg = format!("{:#}", err);
        assert!(msg.contains("gave up after 4 attempts"), "{}", msg);
        assert!(msg.contains("attempt 4 refused"), "{}", msg);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let provider = FlakyProvider::new(1);
        assert!(
            fetch_with_retry(&provider, &AssetId::all(), no_wait(0))
                .await
                .is_err()
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn spawned_fetch_reports_once() {
        let (tx, rx) = mpsc::channel();
        let provider: Arc<dyn SnapshotProvider> = Arc::new(FlakyProvider::new(u32::MAX));
        let (signal, wakes) = crate::data::repaint::tests::counting_signal();
        spawn_snapshot_fetch(provider, no_wait(2), tx, signal).unwrap();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(result.is_err());
        // The sender is dropped with the thread: exactly one outcome per cycle.
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
        assert!(wakes.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn response_keeps_only_wanted_priced_assets() {
        let body = r#"{
            "bitcoin": {"usd": 97000.5},
            "ethereum": {"usd": 3100.25},
            "ripple": {},
            "solana": {"usd": 180.0}
        }"#;
        let raw: HashMap<String, SimplePriceData> = serde_json::from_str(body).unwrap();
        let prices = prices_from_response(raw, &AssetId::all());

        assert_eq!(prices.len(), 2);
        assert_eq!(prices.get(&AssetId::Bitcoin), Some(&97_000.5));
        assert_eq!(prices.get(&AssetId::Ethereum), Some(&3_100.25));
        assert!(!prices.contains_key(&AssetId::Ripple));
    }

    #[test]
    fn request_url_lists_every_asset() {
        let provider = CoinGeckoProvider::new().unwrap();
        assert_eq!(
            provider.request_url(&AssetId::all()),
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin,ethereum,ripple,dogecoin,cardano&vs_currencies=usd"
        );
    }
}
