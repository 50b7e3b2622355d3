//! The host bridge
//!
//! Owns the lifecycle phase and fans OS events out to the chrome suppressor
//! and multicast manager. Engine requests for keyboard and orientation go
//! through here too, so they can be dropped once the host is gone.

use tracing::{debug, info, trace};

use crate::chrome::{ChromeFlags, ChromeSuppressor, PlatformTier};
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::input::{InputBridge, OrientationMode};
use crate::lifecycle::{LifecycleEvent, LifecyclePhase, Transition};
use crate::multicast::{MulticastManager, MulticastProvider};
use crate::window::HostWindow;

/// Platform bridge between the OS host and the engine runtime
///
/// All methods must be called on the host's UI thread.
pub struct HostBridge<W: HostWindow, P: MulticastProvider> {
    phase: Option<LifecyclePhase>,
    window: W,
    chrome: ChromeSuppressor,
    multicast: MulticastManager<P>,
    input: InputBridge,
    focused: bool,
}

impl<W: HostWindow, P: MulticastProvider> HostBridge<W, P> {
    /// Create a bridge for a host window running on `tier`
    pub fn new(window: W, provider: P, tier: PlatformTier) -> Self {
        Self::with_multicast(window, MulticastManager::new(provider), tier)
    }

    /// Create a bridge from configuration and the platform API level
    pub fn from_config(window: W, provider: P, config: &BridgeConfig, api_level: i32) -> Self {
        let tier = config.resolve_tier(api_level);
        let multicast = MulticastManager::with_tag(
            provider,
            config.multicast_lock_tag.clone(),
            config.multicast_reference_counted,
        );
        Self::with_multicast(window, multicast, tier)
    }

    fn with_multicast(window: W, multicast: MulticastManager<P>, tier: PlatformTier) -> Self {
        debug!(?tier, "Creating host bridge");
        Self {
            phase: None,
            window,
            chrome: ChromeSuppressor::new(tier),
            multicast,
            input: InputBridge::new(),
            focused: false,
        }
    }

    /// Current lifecycle phase, `None` before the create event
    pub fn phase(&self) -> Option<LifecyclePhase> {
        self.phase
    }

    /// Whether the host window can be used
    pub fn is_alive(&self) -> bool {
        self.phase.is_some_and(LifecyclePhase::is_alive)
    }

    /// Platform tier in use
    pub fn tier(&self) -> PlatformTier {
        self.chrome.tier()
    }

    /// Last known system chrome state
    pub fn chrome_state(&self) -> ChromeFlags {
        self.chrome.state()
    }

    /// Multicast manager
    pub fn multicast(&self) -> &MulticastManager<P> {
        &self.multicast
    }

    /// Whether the multicast lock is currently held
    pub fn is_multicast_held(&self) -> bool {
        self.multicast.is_held()
    }

    /// The host window
    pub fn window(&self) -> &W {
        &self.window
    }

    /// Whether the host window has input focus
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Apply an OS lifecycle event
    ///
    /// Out-of-order events are rejected and leave the bridge untouched.
    /// Repeated events are ignored. A multicast error is returned after the
    /// phase has already advanced; [`crate::HostError::is_fatal`] tells the
    /// caller whether to abort startup.
    pub fn handle_lifecycle_event(&mut self, event: LifecycleEvent) -> Result<()> {
        let next = match LifecyclePhase::transition(self.phase, event)? {
            Transition::Enter(next) => next,
            Transition::Unchanged => {
                trace!(?event, "Lifecycle event repeats current phase");
                return Ok(());
            }
        };

        let previous = self.phase.replace(next);
        info!(?event, from = ?previous, to = ?next, "Host lifecycle transition");

        match next {
            LifecyclePhase::Created => {
                self.chrome.on_create(&self.window);
                Ok(())
            }
            LifecyclePhase::Resumed => {
                self.chrome.on_resume(&self.window);
                self.multicast.on_resume()
            }
            LifecyclePhase::Paused => {
                self.focused = false;
                self.multicast.on_pause()
            }
            LifecyclePhase::Destroyed => {
                self.focused = false;
                self.chrome.on_destroy();
                // Destroy straight from resumed still owes the pause-side release.
                self.multicast.on_pause()
            }
        }
    }

    /// The OS changed system UI visibility
    ///
    /// `visibility` is the raw platform mask; only the fact that it changed
    /// matters.
    pub fn handle_visibility_changed(&mut self, visibility: u32) {
        if !self.is_alive() {
            return;
        }
        self.chrome.on_visibility_changed(&self.window, visibility);
    }

    /// The host window gained or lost input focus
    pub fn handle_focus_changed(&mut self, focused: bool) {
        if self.is_alive() {
            self.focused = focused;
        }
    }

    /// Show the soft keyboard; no-op unless the host is alive
    pub fn show_soft_keyboard(&self) {
        match self.live_window() {
            Some(window) => self.input.show_keyboard(window),
            None => trace!("show_soft_keyboard ignored, host not alive"),
        }
    }

    /// Hide the soft keyboard; no-op unless the host is alive
    pub fn hide_soft_keyboard(&self) {
        match self.live_window() {
            Some(window) => self.input.hide_keyboard(window),
            None => trace!("hide_soft_keyboard ignored, host not alive"),
        }
    }

    /// Whether the soft keyboard is visible; `false` unless the host is alive
    pub fn is_soft_keyboard_shown(&self) -> bool {
        self.live_window()
            .map(|window| self.input.is_keyboard_shown(window))
            .unwrap_or(false)
    }

    /// Soft keyboard height in pixels; 0 unless the host is alive
    pub fn soft_keyboard_height(&self) -> u32 {
        self.live_window()
            .map(|window| self.input.keyboard_height(window))
            .unwrap_or(0)
    }

    /// Request an orientation; no-op unless the host is alive
    pub fn set_orientation(&mut self, mode: OrientationMode) {
        if !self.is_alive() {
            trace!(?mode, "set_orientation ignored, host not alive");
            return;
        }
        self.input.set_orientation(&self.window, mode);
    }

    /// Request an orientation using the engine's integer encoding
    pub fn set_system_orientation(&mut self, mode: i32) {
        self.set_orientation(OrientationMode::from_raw(mode));
    }

    /// Last requested orientation
    pub fn orientation(&self) -> Option<OrientationMode> {
        self.input.orientation()
    }

    /// Last requested orientation in the engine's encoding, `-1` if none
    pub fn get_system_orientation(&self) -> i32 {
        self.orientation().map(OrientationMode::to_raw).unwrap_or(-1)
    }

    fn live_window(&self) -> Option<&W> {
        self.is_alive().then_some(&self.window)
    }
}
