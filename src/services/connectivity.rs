// Network State - Connectivity Prober
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Internet reachability prober.
//!
//! Walks an ordered endpoint list issuing HEAD requests and reports a
//! single boolean per probe: the first 200/204 response short-circuits
//! to reachable, exhausting the list means unreachable. Runs on its own
//! worker task so the multi-endpoint walk — worst case N × request
//! timeout — never stalls state reconciliation.

use once_cell::sync::Lazy;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::models::{ConnectivityConfig, Error, Result};

/// Built-in endpoints used when none are configured.
static DEFAULT_CHECK_URLS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "https://www.baidu.com",
        "https://www.bing.com",
        "https://www.google.com",
        "https://www.amazon.com",
        "https://github.com",
    ]
    .iter()
    .map(|url| url.to_string())
    .collect()
});

/// Per-request bound. Stands in for the platform default request
/// timeout; there is no per-endpoint override below it.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Sequential multi-endpoint reachability check.
pub struct ConnectivityChecker {
    urls: Vec<String>,
    client: reqwest::Client,
}

impl ConnectivityChecker {
    pub fn new(config: &ConnectivityConfig) -> Result<Self> {
        let urls = if config.check_urls.is_empty() {
            DEFAULT_CHECK_URLS.clone()
        } else {
            config.check_urls.clone()
        };

        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(format!("network-state/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Internal(format!("failed to build probe client: {}", e)))?;

        Ok(Self { urls, client })
    }

    /// Run one probe. Per-endpoint failures are expected and tried in
    /// sequence; only exhausting every endpoint reports unreachable.
    pub async fn check(&self) -> bool {
        for url in &self.urls {
            debug!("Checking connectivity using url: {}", url);

            match self.client.head(url).send().await {
                Ok(response) if matches!(response.status().as_u16(), 200 | 204) => {
                    debug!("Connected to url: {}", url);
                    return true;
                }
                Ok(response) => {
                    debug!("Unexpected status {} from {}", response.status(), url);
                }
                Err(e) => {
                    debug!("Failed to connect to {}: {}", url, e);
                }
            }
        }

        warn!("All connectivity endpoints unreachable");
        false
    }
}

/// Trigger for the spawned prober. Cheap to clone and hand out.
#[derive(Debug, Clone)]
pub struct ProbeHandle {
    trigger: mpsc::Sender<()>,
}

impl ProbeHandle {
    /// Request a probe. A probe already pending or in flight absorbs the
    /// request — triggers coalesce, they do not queue.
    pub fn request_check(&self) {
        let _ = self.trigger.try_send(());
    }
}

/// Spawn the prober worker.
///
/// The worker probes on a fixed interval and on demand, delivering one
/// boolean per probe over `outcome`. The first interval tick fires
/// immediately, giving a startup probe. The worker exits when every
/// handle is dropped or the outcome receiver goes away.
pub fn spawn(
    checker: ConnectivityChecker,
    interval: Duration,
    outcome: mpsc::Sender<bool>,
) -> ProbeHandle {
    let (trigger_tx, mut trigger_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                request = trigger_rx.recv() => {
                    if request.is_none() {
                        break;
                    }
                }
            }

            let reachable = checker.check().await;
            if outcome.send(reachable).await.is_err() {
                break;
            }
        }

        debug!("Connectivity prober stopped");
    });

    ProbeHandle {
        trigger: trigger_tx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(urls: Vec<String>) -> ConnectivityConfig {
        ConnectivityConfig {
            check_urls: urls,
            check_interval_secs: 300,
        }
    }

    #[test]
    fn test_empty_config_falls_back_to_default_urls() {
        let checker = ConnectivityChecker::new(&config(Vec::new())).unwrap();
        assert_eq!(checker.urls, *DEFAULT_CHECK_URLS);
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let failing = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&failing)
            .await;

        let succeeding = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&succeeding)
            .await;

        let never_reached = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&never_reached)
            .await;

        let checker = ConnectivityChecker::new(&config(vec![
            failing.uri(),
            succeeding.uri(),
            never_reached.uri(),
        ]))
        .unwrap();

        assert!(checker.check().await);
        // never_reached verifies its zero-call expectation on drop.
    }

    #[tokio::test]
    async fn test_all_endpoints_failing_reports_unreachable() {
        let error = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&error)
            .await;

        // 301 is not an acceptable probe response.
        let redirect = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(301))
            .mount(&redirect)
            .await;

        let checker =
            ConnectivityChecker::new(&config(vec![error.uri(), redirect.uri()])).unwrap();
        assert!(!checker.check().await);
    }

    #[tokio::test]
    async fn test_triggers_coalesce() {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        let handle = ProbeHandle { trigger: tx };

        handle.request_check();
        handle.request_check();
        handle.request_check();

        assert!(rx.try_recv().is_ok());
        // Extra triggers were absorbed, not queued.
        assert!(rx.try_recv().is_err());
    }
}
