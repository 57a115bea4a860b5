//! Core link checking orchestration.
//!
//! [`LinkChecker`] is the crate facade: it fans a batch of independent
//! probes out with bounded concurrency, joins the outcomes in submission
//! order, and cooperates with [`BatchStore`] to cache results under a
//! batch id, transparently re-probing stale batches on retrieval.
//!
//! A probe never aborts the batch it belongs to. Malformed input, network
//! failures, and timeouts all collapse into
//! [`LinkStatus::Unavailable`](crate::types::LinkStatus) for that one URL.

use crate::classify::classify;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::report::{RenderedReport, ReportRenderer, TextReportRenderer};
use crate::store::BatchStore;
use crate::types::{BatchId, LinkInfo, LinkStatus};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Concurrent link checker backed by a TTL batch store.
pub struct LinkChecker {
    store: Arc<BatchStore>,
    config: Arc<Config>,
    client: reqwest::Client,
    renderer: Arc<dyn ReportRenderer>,
    /// Flag to indicate whether new submissions are accepted (set to false during shutdown)
    accepting_new: AtomicBool,
}

impl LinkChecker {
    /// Create a checker over `store` with probe behavior taken from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(store: Arc<BatchStore>, config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.probe.timeout())
            .user_agent(config.probe.user_agent.clone())
            .build()?;

        Ok(Self {
            store,
            config,
            client,
            renderer: Arc::new(TextReportRenderer),
            accepting_new: AtomicBool::new(true),
        })
    }

    /// Replace the report renderer (the default renders plain text).
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Probe every URL and return one result per URL, same length and
    /// order as the input.
    ///
    /// Probes are independent: one URL's failure never affects another's
    /// outcome. At most `probe.concurrency` probes are in flight at once;
    /// the buffered stream still yields results in input order, so
    /// completion order never leaks into the output.
    pub async fn probe_all(&self, urls: &[String]) -> Vec<LinkInfo> {
        let concurrency = self.config.probe.concurrency.max(1);

        let probes: Vec<_> = urls.iter().map(|url| self.probe(url)).collect();
        stream::iter(probes)
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Probe a batch of URLs and store the results under a new batch id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShuttingDown`] during shutdown and
    /// [`Error::Validation`] for an empty submission; probe failures are
    /// absorbed into the per-link statuses and never fail the call.
    pub async fn submit(&self, urls: Vec<String>) -> Result<(BatchId, Vec<LinkInfo>)> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        if urls.is_empty() {
            return Err(Error::Validation(
                "a submission must contain at least one link".to_string(),
            ));
        }

        let links = self.probe_all(&urls).await;
        let id = self.store.create(links.clone());

        tracing::info!(batch_id = %id, links = links.len(), "Stored new batch");
        Ok((id, links))
    }

    /// Retrieve a batch, transparently re-probing and refreshing it if its
    /// TTL has elapsed. Returns `None` for an unknown id.
    pub async fn retrieve(&self, id: BatchId) -> Option<Vec<LinkInfo>> {
        let (links, expired) = self.store.lookup(id)?;

        if !expired {
            return Some(links);
        }

        tracing::info!(batch_id = %id, "Batch expired, re-probing");

        let urls: Vec<String> = links.into_iter().map(|l| l.url).collect();
        let refreshed = self.probe_all(&urls).await;
        self.store.refresh(id, refreshed.clone());

        Some(refreshed)
    }

    /// Render the requested batches into a printable report.
    ///
    /// Ids that do not resolve to a stored batch are skipped silently, as
    /// are batches with no links. Stale batches are refreshed first, since
    /// report generation goes through normal retrieval.
    ///
    /// # Errors
    ///
    /// Returns an error only if the renderer itself fails.
    pub async fn render_report(&self, ids: &[BatchId]) -> Result<RenderedReport> {
        let mut batches = Vec::new();

        for &id in ids {
            match self.retrieve(id).await {
                Some(links) if !links.is_empty() => batches.push((id, links)),
                Some(_) => {
                    tracing::debug!(batch_id = %id, "Skipping empty batch in report");
                }
                None => {
                    tracing::debug!(batch_id = %id, "Skipping unknown batch in report");
                }
            }
        }

        let bytes = self.renderer.render(&batches)?;
        Ok(RenderedReport {
            bytes,
            content_type: self.renderer.content_type(),
            filename: self.renderer.filename(),
        })
    }

    /// Stop accepting new submissions. Retrievals and report generation
    /// keep working so in-flight requests can drain.
    pub fn begin_shutdown(&self) {
        if self.accepting_new.swap(false, Ordering::SeqCst) {
            tracing::info!("Stopped accepting new submissions");
        }
    }

    /// Gracefully shut down the checker: stop accepting submissions and
    /// write the store snapshot to the configured path.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written. Callers are
    /// expected to log the failure and continue shutting down.
    pub fn shutdown(&self) -> Result<()> {
        self.begin_shutdown();

        let path = &self.config.store.snapshot_path;
        self.store.save(path)?;
        tracing::info!(path = %path.display(), "Snapshot saved on shutdown");
        Ok(())
    }

    async fn probe(&self, raw: &str) -> LinkInfo {
        LinkInfo::new(raw, self.probe_status(raw).await)
    }

    /// One bounded reachability check. Reconstructs the URL from its
    /// scheme and host (dropping any path), guards against parser drift,
    /// and issues exactly one GET with the configured timeout. No retries.
    async fn probe_status(&self, raw: &str) -> LinkStatus {
        let (scheme, host) = split_scheme_host(raw);

        let rebuilt = format!("{scheme}://{host}");
        let parsed = match Url::parse(&rebuilt) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(url = raw, error = %e, "Unparseable URL, no probe attempted");
                return LinkStatus::Unavailable;
            }
        };

        // Consistency guard: the reconstructed URL must keep the scheme we
        // built it from, otherwise the parser normalized it into something
        // else than what was asked for.
        if parsed.scheme() != scheme {
            return LinkStatus::Unavailable;
        }

        classify(self.client.get(parsed).send().await.map(|r| r.status()))
    }
}

/// Split a raw submission string into `(scheme, host)`.
///
/// A string carrying a scheme separator is parsed and reduced to its
/// scheme and authority; anything else (including strings that fail to
/// parse) defaults to scheme `https` with the whole string as host.
fn split_scheme_host(raw: &str) -> (String, String) {
    if raw.contains("://") {
        if let Ok(parsed) = Url::parse(raw) {
            let mut host = parsed.host_str().unwrap_or_default().to_string();
            if let Some(port) = parsed.port() {
                host = format!("{host}:{port}");
            }
            return (parsed.scheme().to_string(), host);
        }
    }

    ("https".to_string(), raw.to_string())
}
