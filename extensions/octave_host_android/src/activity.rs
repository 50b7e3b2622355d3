//! Android Activity integration
//!
//! Drives the host bridge from the android-activity event stream and
//! provides the optional `android_main` entry point.

use std::cell::RefCell;
use std::ffi::CString;
use std::io::Read;
use std::rc::Rc;

use android_activity::{AndroidApp, MainEvent};
use ndk::asset::Asset;
use octave_host::{native, BridgeConfig, HostBridge, LifecycleEvent, Result};
use tracing::{debug, info, warn};

use crate::events::{dispatch, HostEvent};
use crate::jni_utils::JniContext;
use crate::multicast::WifiMulticastProvider;
use crate::window::AndroidHostWindow;

/// Asset the bridge configuration is read from, if bundled
pub const CONFIG_ASSET: &str = "octave_host.toml";

/// The bridge type used on Android
pub type AndroidBridge = HostBridge<AndroidHostWindow, WifiMulticastProvider>;

/// Android host state
///
/// Owns the bridge, registers it for engine calls on the current thread and
/// translates activity events into bridge events.
pub struct AndroidHost {
    bridge: Rc<RefCell<AndroidBridge>>,
    running: bool,
}

impl AndroidHost {
    /// Create the bridge for `app` and deliver the create event
    pub fn new(app: &AndroidApp, config: &BridgeConfig) -> Result<Self> {
        let ctx = Rc::new(JniContext::from_app(app)?);
        let api_level = ctx.sdk_int().unwrap_or_else(|e| {
            warn!("Could not determine API level, assuming no chrome support: {}", e);
            0
        });

        let window = AndroidHostWindow::new(Rc::clone(&ctx), api_level);
        let provider = WifiMulticastProvider::new(ctx);
        let bridge = HostBridge::from_config(window, provider, config, api_level);
        info!(api_level, tier = ?bridge.tier(), "Android host bridge created");

        let bridge = Rc::new(RefCell::new(bridge));
        dispatch(
            &mut *bridge.borrow_mut(),
            HostEvent::Lifecycle(LifecycleEvent::Create),
        )?;
        native::install(&bridge);

        Ok(Self {
            bridge,
            running: true,
        })
    }

    /// Shared handle to the bridge
    pub fn bridge(&self) -> Rc<RefCell<AndroidBridge>> {
        Rc::clone(&self.bridge)
    }

    /// Check if the host is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handle main lifecycle events
    ///
    /// Returns an error only for failures that should end the app.
    pub fn handle_main_event(&mut self, event: MainEvent) -> Result<()> {
        let Some(host_event) = self.translate(&event) else {
            return Ok(());
        };

        let result = dispatch(&mut *self.bridge.borrow_mut(), host_event);

        if host_event == HostEvent::Lifecycle(LifecycleEvent::Destroy) {
            native::uninstall();
            self.running = false;
        }
        result
    }

    fn translate(&self, event: &MainEvent) -> Option<HostEvent> {
        match event {
            MainEvent::Resume { .. } => Some(HostEvent::Lifecycle(LifecycleEvent::Resume)),
            MainEvent::Pause => Some(HostEvent::Lifecycle(LifecycleEvent::Pause)),
            MainEvent::Destroy => Some(HostEvent::Lifecycle(LifecycleEvent::Destroy)),

            MainEvent::GainedFocus => Some(HostEvent::FocusChanged(true)),
            MainEvent::LostFocus => Some(HostEvent::FocusChanged(false)),

            // System bars coming back show up as inset/content rect changes
            MainEvent::InsetsChanged { .. } | MainEvent::ContentRectChanged { .. } => {
                let mask = self.bridge.borrow().window().system_ui_visibility();
                Some(HostEvent::VisibilityChanged(mask))
            }

            MainEvent::Start => {
                debug!("App started");
                None
            }
            MainEvent::Stop => {
                debug!("App stopped");
                None
            }
            MainEvent::LowMemory => {
                warn!("Low memory warning");
                None
            }
            _ => None,
        }
    }
}

/// Read the bridge configuration from the app's assets
///
/// Falls back to defaults when the asset is missing or invalid; the second
/// value carries the reason so it can be logged once logging is up.
pub fn load_config(app: &AndroidApp) -> (BridgeConfig, Option<String>) {
    let Ok(name) = CString::new(CONFIG_ASSET) else {
        return (BridgeConfig::default(), None);
    };
    let asset: Option<Asset> = app.asset_manager().open(&name);
    let Some(mut asset) = asset else {
        return (BridgeConfig::default(), None);
    };

    let mut content = String::new();
    if let Err(e) = asset.read_to_string(&mut content) {
        return (
            BridgeConfig::default(),
            Some(format!("failed to read {}: {}", CONFIG_ASSET, e)),
        );
    }

    match BridgeConfig::from_toml_str(&content) {
        Ok(config) => (config, None),
        Err(e) => (BridgeConfig::default(), Some(e.to_string())),
    }
}

/// Initialize Android logging
pub fn init_logging(config: &BridgeConfig) {
    let level = config
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or(log::LevelFilter::Debug);

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag(config.log_tag.as_str()),
    );
}

/// Android main entry point
///
/// This is called by the android-activity crate when the app starts.
/// This is only enabled when the "default-activity" feature is enabled.
/// Applications embedding the engine differently should create an
/// [`AndroidHost`] from their own `android_main`.
#[cfg(feature = "default-activity")]
#[no_mangle]
pub fn android_main(app: AndroidApp) {
    let (config, config_error) = load_config(&app);
    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Using default bridge configuration: {}", e);
    }

    info!("android_main called");

    if let Err(e) = run(&app, &config) {
        tracing::error!("Octave host stopped: {:#}", e);
    }

    info!("Octave Android host shutting down");
}

#[cfg(feature = "default-activity")]
fn run(app: &AndroidApp, config: &BridgeConfig) -> anyhow::Result<()> {
    use android_activity::PollEvent;
    use anyhow::Context;

    let mut host = AndroidHost::new(app, config).context("Failed to start host bridge")?;

    while host.is_running() {
        let mut outcome = Ok(());
        app.poll_events(None, |event| {
            if let PollEvent::Main(main_event) = event {
                if outcome.is_ok() {
                    outcome = host.handle_main_event(main_event);
                }
            }
        });
        outcome.context("Fatal host lifecycle error")?;
    }

    Ok(())
}
