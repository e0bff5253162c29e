//! Wallet Session Manager
//!
//! Brokers between UI consumers and the pluggable wallet back-ends.
//! State-mutating operations (connect, disconnect, signing) run one at a time
//! behind a single async lock that also owns the active back-end. The session
//! snapshot lives behind its own lock so readers never wait on a wallet prompt.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::{watch, Mutex};

use forge_storage::Database;

use crate::account::AccountInfo;
use crate::error::WalletError;
use crate::format::format_address;
use crate::provider::{ProviderKind, WalletBackend};
use crate::registry::ProviderFactory;
use crate::session::WalletSession;
use crate::store::SessionStore;
use crate::transaction::Transaction;
use crate::Result;

struct ActiveBackend {
    kind: ProviderKind,
    connection_id: String,
    backend: Box<dyn WalletBackend>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectMode {
    /// Failures land in the session as Error
    Interactive,
    /// Startup restore: failures fall back to Disconnected silently
    Restore,
}

/// Clears the in-flight flag when the connect attempt ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Marks a back-end that may be mid-login; dropping it unsettled means the
/// caller cancelled the connect and the external wallet was never logged out
struct PendingConnect {
    kind: ProviderKind,
    settled: bool,
}

impl PendingConnect {
    fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingConnect {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(
                provider = %self.kind,
                "Connect abandoned; wallet back-end dropped without logout"
            );
        }
    }
}

pub struct WalletSessionManager {
    /// Current session snapshot
    session: Arc<RwLock<WalletSession>>,
    /// Active back-end; its lock serializes every state-mutating operation
    active: Arc<Mutex<Option<ActiveBackend>>>,
    connect_in_flight: Arc<AtomicBool>,
    restore_attempted: Arc<AtomicBool>,
    /// Result of the one-time environment probe
    supported: Arc<OnceLock<Vec<ProviderKind>>>,
    factory: Arc<dyn ProviderFactory>,
    accounts: Option<Arc<dyn AccountInfo>>,
    store: SessionStore,
    updates: Arc<watch::Sender<WalletSession>>,
}

impl WalletSessionManager {
    pub fn new(db: Database, factory: Arc<dyn ProviderFactory>) -> Self {
        let session = WalletSession::new();
        let (updates, _) = watch::channel(session.clone());

        Self {
            session: Arc::new(RwLock::new(session)),
            active: Arc::new(Mutex::new(None)),
            connect_in_flight: Arc::new(AtomicBool::new(false)),
            restore_attempted: Arc::new(AtomicBool::new(false)),
            supported: Arc::new(OnceLock::new()),
            factory,
            accounts: None,
            store: SessionStore::new(db),
            updates: Arc::new(updates),
        }
    }

    /// Attach the collaborator used for balance lookups
    pub fn with_account_info(mut self, accounts: Arc<dyn AccountInfo>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Snapshot of the current session
    pub fn session(&self) -> WalletSession {
        self.session.read().clone()
    }

    /// Receive a fresh snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.updates.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.session.read().is_connected()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Probe the runtime for every provider kind.
    ///
    /// The probe runs once; later calls return the cached result.
    pub fn detect_supported_providers(&self) -> Vec<ProviderKind> {
        let mut probed = false;
        let supported = self
            .supported
            .get_or_init(|| {
                probed = true;
                ProviderKind::ALL
                    .into_iter()
                    .filter(|kind| self.factory.is_available(*kind))
                    .collect()
            })
            .clone();

        if probed {
            self.update(|s| s.supported_providers = supported.clone());
            tracing::info!(providers = ?supported, "Detected wallet providers");
        }

        supported
    }

    /// Connect with the given provider kind.
    ///
    /// Cancelling the returned future mid-login leaves the session in
    /// Connecting and the external wallet logged in; the next connect
    /// resets the session before starting over.
    pub async fn connect(&self, kind: ProviderKind) -> Result<WalletSession> {
        self.connect_with(kind, ConnectMode::Interactive).await
    }

    async fn connect_with(&self, kind: ProviderKind, mode: ConnectMode) -> Result<WalletSession> {
        let in_flight =
            InFlightGuard::acquire(&self.connect_in_flight).ok_or(WalletError::AlreadyConnecting)?;

        let supported = self.detect_supported_providers();
        let mut active = self.active.lock().await;

        if let Some(existing) = self.existing_connection(kind)? {
            return Ok(existing);
        }

        self.update(|s| {
            if s.is_connecting() {
                // A dropped connect future never reached Connected or Error
                tracing::warn!("Recovering from an abandoned wallet connect");
                s.reset();
            }
            s.begin_connect(kind)
        })?;

        let pending = PendingConnect::new(kind);
        let outcome = match self.establish(kind, &supported).await {
            Ok((backend, address)) => self
                .update(|s| s.mark_connected(kind, address.clone()))
                .map(|connection_id| (backend, address, connection_id)),
            Err(e) => Err(e),
        };
        pending.settle();

        let (backend, address, connection_id) = match outcome {
            Ok(connected) => connected,
            Err(e) => {
                tracing::warn!(provider = %kind, error = %e, "Wallet connection failed");
                let message = e.to_string();
                match mode {
                    ConnectMode::Interactive => self.update(|s| {
                        if let Err(err) = s.mark_failed(message) {
                            tracing::warn!(error = %err, "Could not record wallet failure");
                        }
                    }),
                    ConnectMode::Restore => self.update(|s| s.reset()),
                }
                return Err(e);
            }
        };

        *active = Some(ActiveBackend {
            kind,
            connection_id: connection_id.clone(),
            backend,
        });

        if let Err(e) = self.store.save(kind, &address) {
            tracing::warn!(error = %e, "Failed to persist wallet session");
        }

        tracing::info!(
            provider = %kind,
            address = %format_address(&address, 6),
            connection_id = %connection_id,
            "Wallet connected"
        );

        drop(active);
        drop(in_flight);

        // Best-effort; a missing balance never fails the connect
        self.refresh_balance().await;

        Ok(self.session())
    }

    /// Guard against reconnecting an already active session.
    ///
    /// `Some` for the same provider (no-op), an error for a different one.
    fn existing_connection(&self, kind: ProviderKind) -> Result<Option<WalletSession>> {
        let session = self.session.read();
        if !session.is_connected() {
            return Ok(None);
        }

        match session.provider {
            Some(current) if current == kind => Ok(Some(session.clone())),
            Some(current) => Err(WalletError::AlreadyConnected(current)),
            None => Ok(None),
        }
    }

    /// Build, initialize and log in a back-end
    async fn establish(
        &self,
        kind: ProviderKind,
        supported: &[ProviderKind],
    ) -> Result<(Box<dyn WalletBackend>, String)> {
        let init_failed = |reason: String| WalletError::ProviderInitFailed {
            provider: kind,
            reason,
        };

        if !supported.contains(&kind) {
            return Err(init_failed(
                "provider is not available in this environment".to_string(),
            ));
        }

        let mut backend = self
            .factory
            .create(kind)
            .map_err(|e| init_failed(e.to_string()))?;

        match backend.initialize().await {
            Ok(true) => {}
            Ok(false) => return Err(init_failed("initialization was refused".to_string())),
            Err(e) => return Err(init_failed(e.to_string())),
        }

        let address = backend
            .login()
            .await
            .map_err(|e| WalletError::LoginFailed {
                provider: kind,
                reason: e.to_string(),
            })?;

        let address = address.trim().to_string();
        if address.is_empty() {
            return Err(WalletError::LoginFailed {
                provider: kind,
                reason: "no wallet address returned".to_string(),
            });
        }

        Ok((backend, address))
    }

    /// Tear down the active back-end and forget the session.
    ///
    /// Logout and storage failures are logged; the session always ends
    /// Disconnected.
    pub async fn disconnect(&self) -> WalletSession {
        let mut active = self.active.lock().await;

        if let Some(mut current) = active.take() {
            match current.backend.logout().await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(provider = %current.kind, "Wallet back-end refused logout")
                }
                Err(e) => {
                    tracing::warn!(provider = %current.kind, error = %e, "Wallet logout failed")
                }
            }

            tracing::info!(
                provider = %current.kind,
                connection_id = %current.connection_id,
                "Wallet disconnected"
            );
        }

        self.update(|s| s.reset());

        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted wallet session");
        }

        self.session()
    }

    /// Re-read the balance of the connected account.
    ///
    /// Returns the new display value, or `None` when nothing changed.
    pub async fn refresh_balance(&self) -> Option<String> {
        let (address, connection_id) = {
            let session = self.session.read();
            if !session.is_connected() {
                return None;
            }
            (session.address.clone(), session.connection_id.clone())
        };

        let Some(accounts) = self.accounts.as_ref() else {
            tracing::debug!("No account-info client configured; balance left unchanged");
            return None;
        };

        match accounts.get_balance(&address).await {
            Ok(balance) => {
                let applied = self.update(|s| {
                    if s.is_connected() && s.connection_id == connection_id {
                        s.set_balance(balance.clone());
                        true
                    } else {
                        false
                    }
                });

                if applied {
                    Some(balance)
                } else {
                    tracing::debug!("Discarding balance fetched for a closed connection");
                    None
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh balance");
                None
            }
        }
    }

    /// Sign an arbitrary payload with the active back-end
    pub async fn sign_message(&self, message: &[u8]) -> Result<String> {
        let active = self.active.lock().await;
        let current = connected_backend(&active)?;

        match current.backend.sign_message(message).await {
            Ok(signature) => Ok(signature),
            Err(e) => Err(self.record_signing_failure(current.kind, e.to_string())),
        }
    }

    /// Sign transactions with the active back-end.
    ///
    /// The result has the same length and order as the input, each entry
    /// signed and matching its request.
    pub async fn sign_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>> {
        let active = self.active.lock().await;
        let current = connected_backend(&active)?;

        let requested = transactions.clone();
        let signed = match current.backend.sign_transactions(transactions).await {
            Ok(signed) => signed,
            Err(e) => return Err(self.record_signing_failure(current.kind, e.to_string())),
        };

        verify_signed(&requested, signed)
            .map_err(|reason| self.record_signing_failure(current.kind, reason))
    }

    fn record_signing_failure(&self, kind: ProviderKind, reason: String) -> WalletError {
        tracing::warn!(provider = %kind, error = %reason, "Signing failed");
        let error = WalletError::SigningFailed(reason);
        let message = error.to_string();
        self.update(|s| s.set_error(message));
        error
    }

    /// Reconnect the wallet persisted by a previous run.
    ///
    /// Attempted once per manager. A failed restore purges the stored pair
    /// and leaves the session Disconnected without an error.
    pub async fn restore_session(&self) -> Option<WalletSession> {
        if self.restore_attempted.swap(true, Ordering::SeqCst) {
            tracing::debug!("Wallet session restore already attempted");
            return None;
        }

        self.detect_supported_providers();

        let persisted = match self.store.load() {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                if self.store.has_leftovers().unwrap_or(false) {
                    tracing::info!("Discarding half-written wallet session");
                    self.purge_persisted();
                } else {
                    tracing::debug!("No persisted wallet session");
                }
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable wallet session");
                self.purge_persisted();
                return None;
            }
        };

        tracing::info!(provider = %persisted.provider, "Restoring wallet session");

        match self
            .connect_with(persisted.provider, ConnectMode::Restore)
            .await
        {
            Ok(session) => {
                if session.address != persisted.address {
                    tracing::info!(
                        provider = %persisted.provider,
                        "Restored wallet reported a different account"
                    );
                }
                Some(session)
            }
            Err(WalletError::AlreadyConnecting) | Err(WalletError::AlreadyConnected(_)) => {
                tracing::debug!("Wallet already in use; skipping restore");
                None
            }
            Err(e) => {
                tracing::info!(error = %e, "Stale wallet session discarded");
                self.purge_persisted();
                None
            }
        }
    }

    /// Forget the last error; a failed session returns to Disconnected
    pub fn clear_error(&self) {
        self.update(|s| s.clear_error());
    }

    fn purge_persisted(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to purge persisted wallet session");
        }
    }

    /// Mutate the session and publish the new snapshot
    fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut WalletSession) -> T,
    {
        let (result, snapshot) = {
            let mut session = self.session.write();
            let result = f(&mut session);
            (result, session.clone())
        };

        self.updates.send_replace(snapshot);
        result
    }
}

impl Clone for WalletSessionManager {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            active: Arc::clone(&self.active),
            connect_in_flight: Arc::clone(&self.connect_in_flight),
            restore_attempted: Arc::clone(&self.restore_attempted),
            supported: Arc::clone(&self.supported),
            factory: Arc::clone(&self.factory),
            accounts: self.accounts.clone(),
            store: self.store.clone(),
            updates: Arc::clone(&self.updates),
        }
    }
}

fn connected_backend(active: &Option<ActiveBackend>) -> Result<&ActiveBackend> {
    active
        .as_ref()
        .filter(|current| current.backend.is_connected())
        .ok_or(WalletError::NotConnected)
}

fn verify_signed(
    requested: &[Transaction],
    signed: Vec<Transaction>,
) -> std::result::Result<Vec<Transaction>, String> {
    if signed.len() != requested.len() {
        return Err(format!(
            "expected {} signed transactions, got {}",
            requested.len(),
            signed.len()
        ));
    }

    for (index, (want, got)) in requested.iter().zip(&signed).enumerate() {
        if !want.corresponds_to(got) {
            return Err(format!("transaction {} does not match the request", index));
        }
        if !got.is_signed() {
            return Err(format!("transaction {} was returned unsigned", index));
        }
    }

    Ok(signed)
}
