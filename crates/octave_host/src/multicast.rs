//! Multicast capability management
//!
//! LAN session discovery needs the platform to deliver multicast packets,
//! which it only does while a multicast lock is held. The lock is held for
//! exactly the resumed interval of the host.
//!
//! The platform counts acquisitions on a reference-counted lock, so an extra
//! acquire leaks the capability and an extra release faults. The manager
//! keeps its own `held` flag and never consults the platform's count.

use tracing::{debug, info, warn};

use crate::error::{HostError, Result};

/// Label the lock is registered under unless configured otherwise
pub const DEFAULT_LOCK_TAG: &str = "Octave";

/// A platform multicast lock handle
pub trait MulticastLock {
    /// Take one reference on the lock
    fn acquire(&mut self) -> Result<()>;

    /// Drop one reference on the lock
    fn release(&mut self) -> Result<()>;
}

/// The platform service that creates multicast locks
pub trait MulticastService {
    /// Lock handle type produced by this service
    type Lock: MulticastLock;

    /// Create a new lock registered under `tag`
    fn create_multicast_lock(&self, tag: &str, reference_counted: bool) -> Result<Self::Lock>;
}

/// Host environment lookup for the multicast service
pub trait MulticastProvider {
    /// Service type handed out by the environment
    type Service: MulticastService;

    /// Look up the service, `None` if the environment has none
    fn multicast_service(&self) -> Option<Self::Service>;
}

/// Acquires the multicast lock on resume and releases it on pause
///
/// The service and lock handles are created lazily on the first resume and
/// then kept for the lifetime of the manager.
pub struct MulticastManager<P: MulticastProvider> {
    provider: P,
    tag: String,
    reference_counted: bool,
    service: Option<P::Service>,
    lock: Option<<P::Service as MulticastService>::Lock>,
    held: bool,
}

impl<P: MulticastProvider> MulticastManager<P> {
    /// Create a manager that looks its service up through `provider`
    pub fn new(provider: P) -> Self {
        Self::with_tag(provider, DEFAULT_LOCK_TAG, true)
    }

    /// Create a manager with an explicit lock tag and counting mode
    pub fn with_tag(provider: P, tag: impl Into<String>, reference_counted: bool) -> Self {
        Self {
            provider,
            tag: tag.into(),
            reference_counted,
            service: None,
            lock: None,
            held: false,
        }
    }

    /// Whether the bridge currently holds the lock
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// The lock handle, once created
    pub fn lock(&self) -> Option<&<P::Service as MulticastService>::Lock> {
        self.lock.as_ref()
    }

    /// Whether the service handle has been obtained
    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Lock tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Ensure handles exist and hold the lock
    ///
    /// Fails with [`HostError::ServiceUnavailable`] if the environment has no
    /// multicast service.
    pub fn on_resume(&mut self) -> Result<()> {
        if self.service.is_none() {
            let service = self.provider.multicast_service().ok_or_else(|| {
                HostError::ServiceUnavailable("multicast service not provided by host".to_string())
            })?;
            debug!("Obtained multicast service");
            self.service = Some(service);
        }

        if self.lock.is_none() {
            if let Some(service) = self.service.as_ref() {
                let lock = service.create_multicast_lock(&self.tag, self.reference_counted)?;
                info!(tag = %self.tag, reference_counted = self.reference_counted, "Created multicast lock");
                self.lock = Some(lock);
            }
        }

        if !self.held {
            if let Some(lock) = self.lock.as_mut() {
                lock.acquire()?;
                self.held = true;
                debug!(tag = %self.tag, "Multicast lock acquired");
            }
        }

        Ok(())
    }

    /// Release the lock if held
    pub fn on_pause(&mut self) -> Result<()> {
        if !self.held {
            return Ok(());
        }
        let Some(lock) = self.lock.as_mut() else {
            return Ok(());
        };

        // On failure the platform may still count our reference, so stay
        // marked as held and let the next pause release it.
        if let Err(e) = lock.release() {
            warn!(tag = %self.tag, error = %e, "Multicast lock release failed");
            return Err(e);
        }
        self.held = false;
        debug!(tag = %self.tag, "Multicast lock released");
        Ok(())
    }
}

impl<P: MulticastProvider> std::fmt::Debug for MulticastManager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MulticastManager")
            .field("tag", &self.tag)
            .field("reference_counted", &self.reference_counted)
            .field("has_service", &self.service.is_some())
            .field("has_lock", &self.lock.is_some())
            .field("held", &self.held)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMulticastProvider, LockOp};

    #[test]
    fn test_lazy_creation_on_first_resume() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::new(provider.clone());

        assert!(!manager.has_service());
        assert!(manager.lock().is_none());
        assert_eq!(provider.locks_created(), 0);

        manager.on_resume().unwrap();

        assert!(manager.has_service());
        assert!(manager.is_held());
        assert_eq!(provider.locks_created(), 1);
        assert_eq!(provider.last_tag().as_deref(), Some(DEFAULT_LOCK_TAG));
        assert_eq!(provider.ops(), vec![LockOp::Acquire(0)]);
    }

    #[test]
    fn test_resume_pause_cycle_is_paired() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::new(provider.clone());

        manager.on_resume().unwrap();
        let first_id = manager.lock().map(|lock| lock.id());
        manager.on_pause().unwrap();
        manager.on_resume().unwrap();
        manager.on_pause().unwrap();

        assert_eq!(manager.lock().map(|lock| lock.id()), first_id);
        assert_eq!(provider.locks_created(), 1);
        assert_eq!(
            provider.ops(),
            vec![
                LockOp::Acquire(0),
                LockOp::Release(0),
                LockOp::Acquire(0),
                LockOp::Release(0),
            ]
        );
    }

    #[test]
    fn test_double_resume_acquires_once() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::new(provider.clone());

        manager.on_resume().unwrap();
        manager.on_resume().unwrap();

        assert_eq!(provider.ops(), vec![LockOp::Acquire(0)]);
    }

    #[test]
    fn test_pause_before_resume_is_noop() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::new(provider.clone());

        manager.on_pause().unwrap();
        manager.on_pause().unwrap();

        assert!(provider.ops().is_empty());
        assert!(!manager.has_service());
    }

    #[test]
    fn test_missing_service_is_fatal() {
        let provider = FakeMulticastProvider::unavailable();
        let mut manager = MulticastManager::new(provider);

        let err = manager.on_resume().unwrap_err();

        assert!(matches!(err, HostError::ServiceUnavailable(_)));
        assert!(err.is_fatal());
        assert!(!manager.is_held());
    }

    #[test]
    fn test_failed_release_keeps_lock_held() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::new(provider.clone());
        manager.on_resume().unwrap();

        provider.fail_next_release();
        assert!(manager.on_pause().is_err());
        assert!(manager.is_held());

        // Next resume must not acquire again; next pause releases.
        manager.on_resume().unwrap();
        manager.on_pause().unwrap();
        assert_eq!(
            provider.ops(),
            vec![LockOp::Acquire(0), LockOp::Release(0)]
        );
    }

    #[test]
    fn test_custom_tag() {
        let provider = FakeMulticastProvider::new();
        let mut manager = MulticastManager::with_tag(provider.clone(), "LanDiscovery", false);

        manager.on_resume().unwrap();

        assert_eq!(manager.tag(), "LanDiscovery");
        assert_eq!(provider.last_tag().as_deref(), Some("LanDiscovery"));
        assert_eq!(provider.last_reference_counted(), Some(false));
    }
}
