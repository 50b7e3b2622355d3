//! System chrome suppression
//!
//! Hides the status and navigation bars so the engine owns the whole screen,
//! and re-asserts that whenever the OS brings the chrome back.
//!
//! Which flags are available depends on the platform release. Rather than
//! branching on API levels at every call site, each release range maps to a
//! [`PlatformTier`], and each tier owns a fixed suppression preset.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::window::HostWindow;

bitflags! {
    /// System UI visibility flags (`View.SYSTEM_UI_FLAG_*` bit values)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChromeFlags: u32 {
        /// Dim the status and navigation bars
        const LOW_PROFILE = 0x0000_0001;
        /// Hide the navigation bar
        const HIDE_NAVIGATION = 0x0000_0002;
        /// Hide the status bar
        const FULLSCREEN = 0x0000_0004;
        /// Keep content insets stable while bars come and go
        const LAYOUT_STABLE = 0x0000_0100;
        /// Lay content out as if the navigation bar were hidden
        const LAYOUT_HIDE_NAVIGATION = 0x0000_0200;
        /// Lay content out as if the status bar were hidden
        const LAYOUT_FULLSCREEN = 0x0000_0400;
        /// Non-sticky immersive mode
        const IMMERSIVE = 0x0000_0800;
        /// Sticky immersive mode: bars reappear transiently on swipe
        const IMMERSIVE_STICKY = 0x0000_1000;
    }
}

impl ChromeFlags {
    /// Pre-ICS name for the low-profile bit
    pub const STATUS_BAR_HIDDEN: Self = Self::LOW_PROFILE;

    /// Fully suppressed chrome: sticky immersive with a stable fullscreen layout
    pub const FULLY_SUPPRESSED: Self = Self::FULLSCREEN
        .union(Self::HIDE_NAVIGATION)
        .union(Self::IMMERSIVE_STICKY)
        .union(Self::LAYOUT_FULLSCREEN)
        .union(Self::LAYOUT_HIDE_NAVIGATION)
        .union(Self::LAYOUT_STABLE);

    /// Degraded preset for releases without navigation hiding
    pub const LOW_PROFILE_FULLSCREEN: Self = Self::FULLSCREEN.union(Self::LOW_PROFILE);
}

/// Chrome suppression capability of the running platform release
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTier {
    /// No system UI visibility flags at all
    Unsupported,
    /// Only the status bar can be hidden
    StatusBarOnly,
    /// Fullscreen plus low-profile navigation
    LowProfile,
    /// Full sticky immersive mode
    Immersive,
}

/// Static description of one tier
struct TierProfile {
    tier: PlatformTier,
    min_api_level: i32,
    resume_preset: Option<ChromeFlags>,
    persistent_listener: bool,
}

/// Ordered from newest to oldest; the first entry whose minimum level is met wins.
const TIER_TABLE: &[TierProfile] = &[
    TierProfile {
        tier: PlatformTier::Immersive,
        min_api_level: 19,
        resume_preset: Some(ChromeFlags::FULLY_SUPPRESSED),
        persistent_listener: true,
    },
    TierProfile {
        tier: PlatformTier::LowProfile,
        min_api_level: 14,
        resume_preset: Some(ChromeFlags::LOW_PROFILE_FULLSCREEN),
        persistent_listener: false,
    },
    TierProfile {
        tier: PlatformTier::StatusBarOnly,
        min_api_level: 11,
        resume_preset: Some(ChromeFlags::STATUS_BAR_HIDDEN),
        persistent_listener: false,
    },
    TierProfile {
        tier: PlatformTier::Unsupported,
        min_api_level: i32::MIN,
        resume_preset: None,
        persistent_listener: false,
    },
];

impl PlatformTier {
    /// Classify a platform API level
    pub fn from_api_level(api_level: i32) -> Self {
        TIER_TABLE
            .iter()
            .find(|profile| api_level >= profile.min_api_level)
            .map(|profile| profile.tier)
            .unwrap_or(PlatformTier::Unsupported)
    }

    fn profile(self) -> &'static TierProfile {
        // The table covers every variant, so the fallback is never taken.
        TIER_TABLE
            .iter()
            .find(|profile| profile.tier == self)
            .unwrap_or(&TIER_TABLE[TIER_TABLE.len() - 1])
    }

    /// Flags applied when the host resumes, if any
    pub fn resume_preset(self) -> Option<ChromeFlags> {
        self.profile().resume_preset
    }

    /// Whether full immersive suppression is available
    pub fn supports_immersive(self) -> bool {
        self.profile().persistent_listener
    }
}

/// Keeps the system chrome hidden across the host lifecycle
#[derive(Debug)]
pub struct ChromeSuppressor {
    tier: PlatformTier,
    listening: bool,
    state: ChromeFlags,
}

impl ChromeSuppressor {
    /// Create a suppressor for the given platform tier
    pub fn new(tier: PlatformTier) -> Self {
        Self {
            tier,
            listening: false,
            state: ChromeFlags::empty(),
        }
    }

    /// Platform tier this suppressor was built for
    pub fn tier(&self) -> PlatformTier {
        self.tier
    }

    /// Last known chrome state
    pub fn state(&self) -> ChromeFlags {
        self.state
    }

    /// Whether visibility changes currently trigger re-suppression
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Apply full suppression and start listening for visibility changes
    ///
    /// Does nothing on tiers without immersive support.
    pub fn on_create<W: HostWindow>(&mut self, window: &W) {
        if !self.tier.supports_immersive() {
            debug!(tier = ?self.tier, "Immersive mode unavailable, skipping create-time suppression");
            return;
        }
        self.apply(window, ChromeFlags::FULLY_SUPPRESSED);
        self.listening = true;
    }

    /// Apply the tier's resume preset
    pub fn on_resume<W: HostWindow>(&mut self, window: &W) {
        match self.tier.resume_preset() {
            Some(flags) => self.apply(window, flags),
            None => debug!(tier = ?self.tier, "No chrome suppression for this platform tier"),
        }
    }

    /// React to the OS changing system UI visibility
    ///
    /// The mask is recorded as the current state and then overwritten by full
    /// suppression before returning.
    pub fn on_visibility_changed<W: HostWindow>(&mut self, window: &W, visibility: u32) {
        self.state = ChromeFlags::from_bits_retain(visibility);
        if self.listening {
            trace!(visibility, "System UI visibility changed, re-suppressing");
            self.apply(window, ChromeFlags::FULLY_SUPPRESSED);
        }
    }

    /// Stop listening; the window is going away
    pub fn on_destroy(&mut self) {
        self.listening = false;
    }

    fn apply<W: HostWindow>(&mut self, window: &W, flags: ChromeFlags) {
        if window.set_system_ui_visibility(flags) {
            self.state = flags;
        } else {
            warn!(?flags, state = ?self.state, "System UI flags not applied");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingWindow};

    #[test]
    fn test_fully_suppressed_bits() {
        assert_eq!(ChromeFlags::FULLY_SUPPRESSED.bits(), 0x1706);
        assert_eq!(ChromeFlags::LOW_PROFILE_FULLSCREEN.bits(), 0x5);
        assert_eq!(ChromeFlags::STATUS_BAR_HIDDEN.bits(), 0x1);
    }

    #[test]
    fn test_tier_from_api_level() {
        assert_eq!(PlatformTier::from_api_level(-1), PlatformTier::Unsupported);
        assert_eq!(PlatformTier::from_api_level(10), PlatformTier::Unsupported);
        assert_eq!(PlatformTier::from_api_level(11), PlatformTier::StatusBarOnly);
        assert_eq!(PlatformTier::from_api_level(13), PlatformTier::StatusBarOnly);
        assert_eq!(PlatformTier::from_api_level(14), PlatformTier::LowProfile);
        assert_eq!(PlatformTier::from_api_level(18), PlatformTier::LowProfile);
        assert_eq!(PlatformTier::from_api_level(19), PlatformTier::Immersive);
        assert_eq!(PlatformTier::from_api_level(34), PlatformTier::Immersive);
    }

    #[test]
    fn test_resume_presets() {
        assert_eq!(PlatformTier::Unsupported.resume_preset(), None);
        assert_eq!(
            PlatformTier::StatusBarOnly.resume_preset(),
            Some(ChromeFlags::STATUS_BAR_HIDDEN)
        );
        assert_eq!(
            PlatformTier::LowProfile.resume_preset(),
            Some(ChromeFlags::LOW_PROFILE_FULLSCREEN)
        );
        assert_eq!(
            PlatformTier::Immersive.resume_preset(),
            Some(ChromeFlags::FULLY_SUPPRESSED)
        );
    }

    #[test]
    fn test_create_on_immersive_tier() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Immersive);

        chrome.on_create(&window);

        assert!(chrome.is_listening());
        assert_eq!(chrome.state(), ChromeFlags::FULLY_SUPPRESSED);
        assert_eq!(
            window.calls(),
            vec![Call::SetSystemUiVisibility(ChromeFlags::FULLY_SUPPRESSED)]
        );
    }

    #[test]
    fn test_create_below_immersive_tier_does_nothing() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::LowProfile);

        chrome.on_create(&window);
        chrome.on_visibility_changed(&window, 0);

        assert!(!chrome.is_listening());
        assert!(window.calls().is_empty());
    }

    #[test]
    fn test_resume_applies_degraded_preset() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::StatusBarOnly);

        chrome.on_resume(&window);

        assert_eq!(chrome.state(), ChromeFlags::STATUS_BAR_HIDDEN);
        assert_eq!(
            window.calls(),
            vec![Call::SetSystemUiVisibility(ChromeFlags::STATUS_BAR_HIDDEN)]
        );
    }

    #[test]
    fn test_resume_unsupported_tier_is_silent() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Unsupported);

        chrome.on_create(&window);
        chrome.on_resume(&window);

        assert!(window.calls().is_empty());
        assert_eq!(chrome.state(), ChromeFlags::empty());
    }

    #[test]
    fn test_visibility_change_reconverges() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Immersive);
        chrome.on_create(&window);

        // OS shows the bars again
        chrome.on_visibility_changed(&window, 0);

        assert_eq!(chrome.state(), ChromeFlags::FULLY_SUPPRESSED);
        assert_eq!(window.calls().len(), 2);
    }

    #[test]
    fn test_rejected_flags_keep_previous_state() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Immersive);
        window.reject_chrome_flags(true);

        chrome.on_create(&window);
        chrome.on_resume(&window);

        assert_eq!(chrome.state(), ChromeFlags::empty());
        assert_eq!(window.calls().len(), 2);

        // Once the platform accepts the flags again, resume converges
        window.reject_chrome_flags(false);
        chrome.on_resume(&window);
        assert_eq!(chrome.state(), ChromeFlags::FULLY_SUPPRESSED);
    }

    #[test]
    fn test_rejected_flags_after_visibility_change() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Immersive);
        chrome.on_create(&window);
        window.reject_chrome_flags(true);

        chrome.on_visibility_changed(&window, 0);

        assert_eq!(chrome.state(), ChromeFlags::empty());
    }

    #[test]
    fn test_destroy_stops_listening() {
        let window = RecordingWindow::new();
        let mut chrome = ChromeSuppressor::new(PlatformTier::Immersive);
        chrome.on_create(&window);
        chrome.on_destroy();
        window.clear();

        chrome.on_visibility_changed(&window, 0);

        assert!(window.calls().is_empty());
        assert_eq!(chrome.state(), ChromeFlags::empty());
    }
}
