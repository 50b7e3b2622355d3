//! Soft keyboard and orientation requests
//!
//! Request/response operations the engine invokes when it needs a platform
//! action. Keyboard visibility is always read from the window; only the last
//! requested orientation is remembered.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::window::HostWindow;

/// Orientation requested by the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    /// Locked to landscape
    Landscape,
    /// Locked to portrait
    Portrait,
    /// Follows the user's rotation setting
    UserControlled,
}

impl OrientationMode {
    /// Decode the engine's integer encoding
    ///
    /// `0` is landscape, `1` is portrait, anything else unlocks rotation.
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => OrientationMode::Landscape,
            1 => OrientationMode::Portrait,
            _ => OrientationMode::UserControlled,
        }
    }

    /// Encode for the engine
    pub fn to_raw(self) -> i32 {
        match self {
            OrientationMode::Landscape => 0,
            OrientationMode::Portrait => 1,
            OrientationMode::UserControlled => 2,
        }
    }

    /// Platform orientation this mode requests
    pub fn screen_orientation(self) -> ScreenOrientation {
        match self {
            OrientationMode::Landscape => ScreenOrientation::Landscape,
            OrientationMode::Portrait => ScreenOrientation::Portrait,
            OrientationMode::UserControlled => ScreenOrientation::User,
        }
    }
}

/// Platform requested-orientation values (`ActivityInfo.SCREEN_ORIENTATION_*`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ScreenOrientation {
    /// Locked landscape
    Landscape = 0,
    /// Locked portrait
    Portrait = 1,
    /// User-controlled rotation
    User = 2,
}

impl ScreenOrientation {
    /// Raw platform constant
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Keyboard and orientation operations on the host window
#[derive(Debug, Default)]
pub struct InputBridge {
    orientation: Option<OrientationMode>,
}

impl InputBridge {
    /// Create a bridge with no orientation requested yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the platform to show the soft keyboard
    ///
    /// The keyboard appears asynchronously; [`Self::is_keyboard_shown`] may
    /// still report `false` right after this returns.
    pub fn show_keyboard<W: HostWindow>(&self, window: &W) {
        debug!("Showing soft keyboard");
        window.show_soft_input();
    }

    /// Ask the platform to hide the soft keyboard
    pub fn hide_keyboard<W: HostWindow>(&self, window: &W) {
        debug!("Hiding soft keyboard");
        window.hide_soft_input();
    }

    /// Whether the keyboard inset is visible right now
    pub fn is_keyboard_shown<W: HostWindow>(&self, window: &W) -> bool {
        window.is_ime_visible()
    }

    /// Height of the keyboard inset in pixels
    pub fn keyboard_height<W: HostWindow>(&self, window: &W) -> u32 {
        window.ime_inset_bottom()
    }

    /// Request a screen orientation
    pub fn set_orientation<W: HostWindow>(&mut self, window: &W, mode: OrientationMode) {
        let orientation = mode.screen_orientation();
        debug!(?mode, raw = orientation.as_raw(), "Requesting screen orientation");
        window.set_requested_orientation(orientation);
        self.orientation = Some(mode);
    }

    /// Last orientation requested, if any
    pub fn orientation(&self) -> Option<OrientationMode> {
        self.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingWindow};

    #[test]
    fn test_orientation_from_raw() {
        assert_eq!(OrientationMode::from_raw(0), OrientationMode::Landscape);
        assert_eq!(OrientationMode::from_raw(1), OrientationMode::Portrait);
        assert_eq!(OrientationMode::from_raw(2), OrientationMode::UserControlled);
        assert_eq!(OrientationMode::from_raw(-1), OrientationMode::UserControlled);
        assert_eq!(
            OrientationMode::from_raw(i32::MAX),
            OrientationMode::UserControlled
        );
    }

    #[test]
    fn test_orientation_platform_values() {
        assert_eq!(ScreenOrientation::Landscape.as_raw(), 0);
        assert_eq!(ScreenOrientation::Portrait.as_raw(), 1);
        assert_eq!(ScreenOrientation::User.as_raw(), 2);
    }

    #[test]
    fn test_set_orientation_records_mode() {
        let window = RecordingWindow::new();
        let mut input = InputBridge::new();
        assert_eq!(input.orientation(), None);

        input.set_orientation(&window, OrientationMode::Portrait);

        assert_eq!(input.orientation(), Some(OrientationMode::Portrait));
        assert_eq!(
            window.calls(),
            vec![Call::SetRequestedOrientation(ScreenOrientation::Portrait)]
        );
    }

    #[test]
    fn test_keyboard_requests_reach_window() {
        let window = RecordingWindow::new();
        let input = InputBridge::new();

        input.show_keyboard(&window);
        input.hide_keyboard(&window);

        assert_eq!(window.calls(), vec![Call::ShowSoftInput, Call::HideSoftInput]);
    }

    #[test]
    fn test_keyboard_query_reads_window() {
        let window = RecordingWindow::new();
        let input = InputBridge::new();
        assert!(!input.is_keyboard_shown(&window));
        assert_eq!(input.keyboard_height(&window), 0);

        window.set_ime(true, 840);

        assert!(input.is_keyboard_shown(&window));
        assert_eq!(input.keyboard_height(&window), 840);
    }
}
