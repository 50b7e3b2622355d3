//! Wi-Fi multicast lock
//!
//! `WifiManager.MulticastLock` behind the [`MulticastProvider`] traits. The
//! manager and lock objects are pinned with global references so they
//! survive across JNI frames for the lifetime of the host.

use std::rc::Rc;

use jni::objects::{GlobalRef, JValue};
use tracing::{debug, warn};

use octave_host::{HostError, MulticastLock, MulticastProvider, MulticastService, Result};

use crate::jni_utils::{application_context, system_service, JniContext};

/// Looks up `WifiManager` from the application context
pub struct WifiMulticastProvider {
    ctx: Rc<JniContext>,
}

impl WifiMulticastProvider {
    /// Create a provider over the activity held by `ctx`
    pub fn new(ctx: Rc<JniContext>) -> Self {
        Self { ctx }
    }
}

impl MulticastProvider for WifiMulticastProvider {
    type Service = WifiService;

    fn multicast_service(&self) -> Option<Self::Service> {
        let manager = self.ctx.with_env(|env, activity| {
            // WifiManager leaks when obtained from an activity context
            let app_context = application_context(env, activity)?;
            match system_service(env, &app_context, "WIFI_SERVICE")? {
                Some(manager) => env.new_global_ref(manager).map(Some),
                None => Ok(None),
            }
        });

        match manager {
            Ok(Some(manager)) => Some(WifiService {
                ctx: Rc::clone(&self.ctx),
                manager,
            }),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to look up WifiManager: {:?}", e);
                None
            }
        }
    }
}

/// Handle to the platform `WifiManager`
pub struct WifiService {
    ctx: Rc<JniContext>,
    manager: GlobalRef,
}

impl MulticastService for WifiService {
    type Lock = WifiMulticastLock;

    fn create_multicast_lock(&self, tag: &str, reference_counted: bool) -> Result<Self::Lock> {
        let lock = self
            .ctx
            .with_env(|env, _| {
                let jtag = env.new_string(tag)?;
                let lock = env
                    .call_method(
                        &self.manager,
                        "createMulticastLock",
                        "(Ljava/lang/String;)Landroid/net/wifi/WifiManager$MulticastLock;",
                        &[JValue::Object(&*jtag)],
                    )?
                    .l()?;
                env.call_method(
                    &lock,
                    "setReferenceCounted",
                    "(Z)V",
                    &[JValue::Bool(u8::from(reference_counted))],
                )?;
                env.new_global_ref(lock)
            })
            .map_err(|e| HostError::LockCreation(format!("createMulticastLock: {}", e)))?;

        debug!("WifiManager.MulticastLock created for tag {}", tag);
        Ok(WifiMulticastLock {
            ctx: Rc::clone(&self.ctx),
            lock,
        })
    }
}

/// A `WifiManager.MulticastLock`
pub struct WifiMulticastLock {
    ctx: Rc<JniContext>,
    lock: GlobalRef,
}

impl WifiMulticastLock {
    /// The platform's own view of whether the lock is held
    ///
    /// Diagnostic only; the bridge tracks its own held state.
    pub fn is_held_by_platform(&self) -> bool {
        self.ctx
            .with_env(|env, _| env.call_method(&self.lock, "isHeld", "()Z", &[])?.z())
            .unwrap_or(false)
    }

    fn call_void(&self, method: &str) -> Result<()> {
        self.ctx
            .with_env(|env, _| {
                env.call_method(&self.lock, method, "()V", &[])?;
                Ok(())
            })
            .map_err(|e| HostError::Lock(format!("MulticastLock.{}: {}", method, e)))
    }
}

impl MulticastLock for WifiMulticastLock {
    fn acquire(&mut self) -> Result<()> {
        self.call_void("acquire")?;
        debug!(platform_held = self.is_held_by_platform(), "MulticastLock.acquire");
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.call_void("release")?;
        debug!(platform_held = self.is_held_by_platform(), "MulticastLock.release");
        Ok(())
    }
}
