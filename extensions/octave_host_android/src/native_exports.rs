//! C ABI entry points for the engine runtime
//!
//! The engine links against these instead of calling into Java. Each one
//! routes to the bridge installed on the calling thread and does nothing when
//! there is none, so calls racing host teardown are harmless.
//!
//! # Usage from C++
//!
//! ```cpp
//! extern "C" {
//!     void octave_show_soft_keyboard();
//!     void octave_hide_soft_keyboard();
//!     bool octave_is_soft_keyboard_shown();
//!     uint32_t octave_soft_keyboard_height();
//!     void octave_set_system_orientation(int32_t mode);
//!     int32_t octave_get_system_orientation();
//! }
//!
//! void INP_ShowSoftKeyboard(bool show)
//! {
//!     show ? octave_show_soft_keyboard() : octave_hide_soft_keyboard();
//! }
//! ```
//!
//! All functions must be called on the host's UI thread.

use octave_host::native;

/// Show the soft keyboard
#[no_mangle]
pub extern "C" fn octave_show_soft_keyboard() {
    native::show_soft_keyboard();
}

/// Hide the soft keyboard
#[no_mangle]
pub extern "C" fn octave_hide_soft_keyboard() {
    native::hide_soft_keyboard();
}

/// Whether the soft keyboard is visible
#[no_mangle]
pub extern "C" fn octave_is_soft_keyboard_shown() -> bool {
    native::is_soft_keyboard_shown()
}

/// Soft keyboard height in pixels, 0 when hidden
#[no_mangle]
pub extern "C" fn octave_soft_keyboard_height() -> u32 {
    native::soft_keyboard_height()
}

/// Request an orientation: 0 landscape, 1 portrait, anything else unlocked
#[no_mangle]
pub extern "C" fn octave_set_system_orientation(mode: i32) {
    native::set_system_orientation(mode);
}

/// Last requested orientation, -1 if none
#[no_mangle]
pub extern "C" fn octave_get_system_orientation() -> i32 {
    native::get_system_orientation()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use octave_host::testing::{Call, FakeMulticastProvider, RecordingWindow};
    use octave_host::{HostBridge, LifecycleEvent, PlatformTier, ScreenOrientation};

    #[test]
    fn test_exports_without_host() {
        native::uninstall();

        octave_show_soft_keyboard();
        octave_hide_soft_keyboard();
        octave_set_system_orientation(0);

        assert!(!octave_is_soft_keyboard_shown());
        assert_eq!(octave_soft_keyboard_height(), 0);
        assert_eq!(octave_get_system_orientation(), -1);
    }

    #[test]
    fn test_exports_route_to_host() {
        let window = RecordingWindow::new();
        let host = Rc::new(RefCell::new(HostBridge::new(
            window.clone(),
            FakeMulticastProvider::new(),
            PlatformTier::Immersive,
        )));
        host.borrow_mut()
            .handle_lifecycle_event(LifecycleEvent::Create)
            .unwrap();
        native::install(&host);
        window.clear();

        octave_set_system_orientation(1);
        octave_show_soft_keyboard();
        window.set_ime(true, 720);

        assert!(octave_is_soft_keyboard_shown());
        assert_eq!(octave_soft_keyboard_height(), 720);
        assert_eq!(octave_get_system_orientation(), 1);
        assert_eq!(
            &window.calls()[..2],
            &[
                Call::SetRequestedOrientation(ScreenOrientation::Portrait),
                Call::ShowSoftInput,
            ]
        );

        native::uninstall();
    }
}
