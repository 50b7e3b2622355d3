//! Octave Android Host
//!
//! Android implementation of the Octave host bridge: immersive chrome
//! suppression, the Wi-Fi multicast lock and soft keyboard / orientation
//! services, all backed by JNI calls on the hosting `NativeActivity`.
//!
//! # Architecture
//!
//! - [`AndroidHost`] owns the bridge and pumps android-activity events into it
//! - [`AndroidHostWindow`] implements `HostWindow` over the decor view
//! - [`WifiMulticastProvider`] implements the multicast provider over `WifiManager`
//! - [`native_exports`] exposes the engine-facing calls as a C ABI
//!
//! # Usage
//!
//! ```ignore
//! use android_activity::{AndroidApp, PollEvent};
//! use octave_host_android::{load_config, AndroidHost};
//!
//! #[no_mangle]
//! fn android_main(app: AndroidApp) {
//!     let (config, _) = load_config(&app);
//!     let mut host = AndroidHost::new(&app, &config).unwrap();
//!     while host.is_running() {
//!         app.poll_events(None, |event| {
//!             if let PollEvent::Main(event) = event {
//!                 let _ = host.handle_main_event(event);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod events;
pub mod native_exports;

#[cfg(target_os = "android")]
pub mod activity;
#[cfg(target_os = "android")]
pub mod jni_utils;
#[cfg(target_os = "android")]
pub mod multicast;
#[cfg(target_os = "android")]
pub mod window;

pub use events::{dispatch, HostEvent};

#[cfg(target_os = "android")]
pub use activity::{init_logging, load_config, AndroidBridge, AndroidHost, CONFIG_ASSET};
#[cfg(target_os = "android")]
pub use jni_utils::JniContext;
#[cfg(target_os = "android")]
pub use multicast::{WifiMulticastLock, WifiMulticastProvider, WifiService};
#[cfg(target_os = "android")]
pub use window::{AndroidHostWindow, UI_THREAD_HOOK};

// Re-export the core crate for applications that only depend on this one
pub use octave_host;
