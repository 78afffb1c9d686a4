//! Seller-status lookup against the users service.
//!
//! Given an email address, asks the users service whether that address is
//! registered as a seller. Every failure - transport error, non-2xx
//! status, malformed body - collapses to "not a seller"; callers can not
//! distinguish a failed lookup from a negative answer.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

use tradewinds_core::Email;

use crate::config::IdentityConfig;

/// Path prefix of the seller-status endpoint on the users service.
const SELLER_STATUS_PATH: &str = "users/seller";

/// Errors that can occur during a lookup.
///
/// Internal only: the resolver swallows every variant into a `false`
/// status.
#[derive(Debug, Error)]
enum LookupError {
    /// Transport failure or malformed response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error: status {status}")]
    Api { status: u16 },

    /// The endpoint URL could not be built from the configured base.
    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Wire format of `GET /users/seller/{email}`.
#[derive(Debug, Deserialize)]
struct SellerStatusResponse {
    #[serde(rename = "isSeller")]
    is_seller: bool,
}

/// Published seller-status value.
///
/// Defaults to `is_seller: false` and resets to it whenever the input
/// email changes.
#[derive(Debug, Clone, Default)]
pub struct SellerStatus {
    /// Whether the current input email is registered as a seller.
    pub is_seller: bool,
    /// Bumped on every input change; lookups only commit while their
    /// generation is still current.
    generation: u64,
}

/// Asynchronous seller-status resolution for an optional email input.
///
/// Feed inputs with [`SellerStatusResolver::set_email`]; observe through
/// [`SellerStatusResolver::is_seller`] or
/// [`SellerStatusResolver::subscribe`]. Whenever the input changes, the
/// published status resets to `false`, any in-flight lookup is superseded,
/// and - for a present input - a single request is issued. A lookup tied
/// to a stale input can never overwrite the status of a newer one.
pub struct SellerStatusResolver {
    client: Client,
    base_url: Url,
    email: Option<Email>,
    tx: watch::Sender<SellerStatus>,
    rx: watch::Receiver<SellerStatus>,
    task: Option<JoinHandle<()>>,
}

impl SellerStatusResolver {
    /// Create a resolver with no input.
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        let (tx, rx) = watch::channel(SellerStatus::default());
        Self {
            client: Client::new(),
            base_url: config.seller_api_base_url.clone(),
            email: None,
            tx,
            rx,
            task: None,
        }
    }

    /// Update the input email, restarting resolution if it changed.
    ///
    /// An unchanged input is a no-op: no request is issued and no state
    /// change is published. On a change the status resets to `false`, any
    /// in-flight lookup is superseded, and a new lookup starts when the
    /// input is present. An absent input issues no request and leaves the
    /// status at the reset `false`.
    pub fn set_email(&mut self, email: Option<Email>) {
        if self.email == email {
            return;
        }
        self.email.clone_from(&email);

        // Supersede the in-flight lookup before publishing the reset, so
        // its settle can no longer be observed.
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let mut generation = 0;
        self.tx.send_modify(|status| {
            status.generation += 1;
            status.is_seller = false;
            generation = status.generation;
        });

        let Some(email) = email else {
            debug!("seller input cleared");
            return;
        };

        debug!(email = %email, "seller lookup started");
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let tx = self.tx.clone();

        self.task = Some(tokio::spawn(async move {
            let is_seller = match fetch_seller_status(&client, &base_url, &email).await {
                Ok(value) => value,
                Err(error) => {
                    // Deliberate policy: a failed lookup reads as "not a
                    // seller" and is never surfaced to the caller.
                    debug!(email = %email, error = %error, "seller lookup failed");
                    false
                }
            };

            // Commit atomically, and only while this lookup's input is
            // still the current one. abort() cannot interrupt a poll
            // already in progress, so the generation check is what makes
            // stale settles impossible.
            let committed = tx.send_if_modified(|status| {
                if status.generation == generation {
                    status.is_seller = is_seller;
                    true
                } else {
                    false
                }
            });
            if committed {
                debug!(email = %email, is_seller, "seller lookup settled");
            }
        }));
    }

    /// The current input email, if any.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    /// Whether the current input email is registered as a seller.
    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.rx.borrow().is_seller
    }

    /// Snapshot of the published status.
    #[must_use]
    pub fn status(&self) -> SellerStatus {
        self.rx.borrow().clone()
    }

    /// Subscribe to status changes.
    ///
    /// A change is published for every reset and for every settle of a
    /// current-input lookup, including settles that confirm `false`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SellerStatus> {
        self.rx.clone()
    }
}

impl Drop for SellerStatusResolver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Issue the lookup request and decode the answer.
async fn fetch_seller_status(
    client: &Client,
    base_url: &Url,
    email: &Email,
) -> Result<bool, LookupError> {
    let url = base_url.join(&format!(
        "{SELLER_STATUS_PATH}/{}",
        urlencoding::encode(email.as_str())
    ))?;

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(LookupError::Api {
            status: status.as_u16(),
        });
    }

    let body: SellerStatusResponse = response.json().await?;
    Ok(body.is_seller)
}
