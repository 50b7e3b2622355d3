//! Host window abstraction
//!
//! The operations the bridge needs from the platform window. Every method is
//! fire-and-forget from the bridge's point of view: implementations log
//! platform failures and return, they never propagate them. Chrome flag
//! updates report whether they reached the platform so the bridge never
//! records a state the window does not have.

use crate::chrome::ChromeFlags;
use crate::input::ScreenOrientation;

/// Platform window services used by the host bridge
///
/// Implemented by each platform backend (`octave_host_android` for Android,
/// `testing::RecordingWindow` for tests).
pub trait HostWindow {
    /// Replace the window's system UI visibility flags
    ///
    /// Returns `false` if the flags could not be applied or handed to the
    /// platform's UI thread.
    fn set_system_ui_visibility(&self, flags: ChromeFlags) -> bool;

    /// Set the host's requested screen orientation
    ///
    /// Takes effect on the platform's next layout pass.
    fn set_requested_orientation(&self, orientation: ScreenOrientation);

    /// Force the soft keyboard open on the host's primary view
    fn show_soft_input(&self);

    /// Dismiss the soft keyboard bound to the primary view's window token
    fn hide_soft_input(&self);

    /// Whether the IME inset is currently visible
    fn is_ime_visible(&self) -> bool;

    /// Bottom IME inset in pixels, 0 when the keyboard is hidden
    fn ime_inset_bottom(&self) -> u32 {
        0
    }
}
