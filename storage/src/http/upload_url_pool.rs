use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use time::{Duration, OffsetDateTime};

use crate::http::buckets::get_upload_url::GetUploadUrlResponse;
use crate::http::Error;

/// How long a grant is assumed to stay usable after it was fetched.
///
/// The service does not report an expiry, so this is a client side assumption only.
pub const DEFAULT_UPLOAD_URL_VALIDITY: Duration = Duration::hours(24);

/// An upload url and the token that authorizes uploads to it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct UploadGrant {
    pub upload_url: String,
    pub authorization_token: String,
    pub expiration: OffsetDateTime,
}

impl UploadGrant {
    pub fn new(response: GetUploadUrlResponse, expiration: OffsetDateTime) -> Self {
        Self {
            upload_url: response.upload_url,
            authorization_token: response.authorization_token,
            expiration,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expiration <= now
    }
}

/// Upload grants of a single bucket.
///
/// Selection is best effort: expired grants are swept, then the most recently added grant is
/// reused without being removed. Nothing here proves a grant is still accepted; an upload made
/// with a stale grant fails with an API error from the service.
#[derive(Debug)]
pub struct UploadUrlPool {
    grants: Mutex<Vec<UploadGrant>>,
    // Only a single task can fetch a new grant.
    refill: tokio::sync::Mutex<()>,
    validity: Duration,
}

impl Default for UploadUrlPool {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_URL_VALIDITY)
    }
}

impl UploadUrlPool {
    pub fn new(validity: Duration) -> Self {
        Self {
            grants: Mutex::new(Vec::new()),
            refill: tokio::sync::Mutex::new(()),
            validity,
        }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Returns a usable grant, calling `fetch` only when no unexpired grant is pooled.
    ///
    /// A failed fetch leaves the pool untouched.
    pub async fn acquire<F, Fut>(&self, fetch: F) -> Result<UploadGrant, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<GetUploadUrlResponse, Error>>,
    {
        if let Some(grant) = self.reusable_at(OffsetDateTime::now_utc()) {
            return Ok(grant);
        }

        let _locking = self.refill.lock().await;

        if let Some(grant) = self.reusable_at(OffsetDateTime::now_utc()) {
            return Ok(grant);
        }

        let response = fetch().await?;
        let grant = UploadGrant::new(response, OffsetDateTime::now_utc() + self.validity);
        tracing::debug!("upload url fetched : expiration={:?}", grant.expiration);
        self.push(grant.clone());
        Ok(grant)
    }

    /// Sweeps, then clones the last grant.
    pub fn reusable_at(&self, now: OffsetDateTime) -> Option<UploadGrant> {
        let mut grants = self.lock();
        sweep(&mut grants, now);
        grants.last().cloned()
    }

    /// Removes every grant expired at `now`, keeping the order of the rest. Returns the number removed.
    pub fn sweep_at(&self, now: OffsetDateTime) -> usize {
        sweep(&mut self.lock(), now)
    }

    pub fn push(&self, grant: UploadGrant) {
        self.lock().push(grant);
    }

    /// Drops a grant the service refused, so the next acquire does not hand it out again.
    pub fn discard(&self, upload_url: &str) {
        self.lock().retain(|g| g.upload_url != upload_url);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn grants(&self) -> Vec<UploadGrant> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<UploadGrant>> {
        // a panic while holding the lock can not leave the vector half written
        self.grants.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn sweep(grants: &mut Vec<UploadGrant>, now: OffsetDateTime) -> usize {
    let before = grants.len();
    grants.retain(|g| !g.is_expired_at(now));
    let removed = before - grants.len();
    if removed > 0 {
        tracing::trace!("swept {} expired upload urls", removed);
    }
    removed
}
