//! Octave Host Bridge
//!
//! Platform-independent core of the bridge between an OS-managed application
//! host and the Octave engine runtime.
//!
//! # Architecture
//!
//! The OS drives a single [`HostBridge`] with lifecycle and visibility events.
//! The bridge fans them out to two state machines:
//!
//! - [`ChromeSuppressor`] - keeps the status and navigation bars hidden
//! - [`MulticastManager`] - holds the multicast lock while resumed
//!
//! The engine calls back into the host through [`native`] for soft keyboard
//! and orientation requests, served by [`InputBridge`].
//!
//! Platform services sit behind [`HostWindow`] and the
//! [`MulticastProvider`] family of traits.
//!
//! # Platform Implementations
//!
//! - `octave_host_android` - Android using JNI and android-activity
//!
//! # Example
//!
//! ```ignore
//! use octave_host::prelude::*;
//!
//! let mut host = HostBridge::new(window, provider, PlatformTier::from_api_level(34));
//! host.handle_lifecycle_event(LifecycleEvent::Create)?;
//! host.handle_lifecycle_event(LifecycleEvent::Resume)?;
//! host.handle_visibility_changed(0);
//! host.handle_lifecycle_event(LifecycleEvent::Pause)?;
//! ```

mod chrome;
mod config;
mod error;
mod host;
mod input;
mod lifecycle;
mod multicast;
mod window;

pub mod logging;
pub mod native;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export all public types
pub use chrome::{ChromeFlags, ChromeSuppressor, PlatformTier};
pub use config::BridgeConfig;
pub use error::{HostError, Result};
pub use host::HostBridge;
pub use input::{InputBridge, OrientationMode, ScreenOrientation};
pub use lifecycle::{LifecycleEvent, LifecyclePhase, Transition};
pub use multicast::{
    MulticastLock, MulticastManager, MulticastProvider, MulticastService, DEFAULT_LOCK_TAG,
};
pub use native::NativeHost;
pub use window::HostWindow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chrome::{ChromeFlags, PlatformTier};
    pub use crate::config::BridgeConfig;
    pub use crate::error::{HostError, Result};
    pub use crate::host::HostBridge;
    pub use crate::input::{OrientationMode, ScreenOrientation};
    pub use crate::lifecycle::{LifecycleEvent, LifecyclePhase};
    pub use crate::multicast::{MulticastLock, MulticastProvider, MulticastService};
    pub use crate::window::HostWindow;
}
