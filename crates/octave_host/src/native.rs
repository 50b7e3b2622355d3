//! Engine-facing entry points
//!
//! The engine runtime does not hold a reference to the bridge. It calls the
//! free functions here, which look up the bridge installed for the current
//! (UI) thread. The registry only keeps a weak reference: once the host is
//! dropped or destroyed, every call quietly does nothing.
//!
//! ```ignore
//! let host = Rc::new(RefCell::new(HostBridge::new(window, provider, tier)));
//! native::install(&host);
//!
//! // later, from the engine on the UI thread
//! native::set_system_orientation(0);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::host::HostBridge;
use crate::multicast::MulticastProvider;
use crate::window::HostWindow;

/// Operations the engine may request from the host
pub trait NativeHost {
    /// Show the soft keyboard
    fn show_soft_keyboard(&self);
    /// Hide the soft keyboard
    fn hide_soft_keyboard(&self);
    /// Whether the soft keyboard is visible
    fn is_soft_keyboard_shown(&self) -> bool;
    /// Soft keyboard height in pixels
    fn soft_keyboard_height(&self) -> u32;
    /// Request an orientation: 0 landscape, 1 portrait, anything else unlocked
    fn set_system_orientation(&mut self, mode: i32);
    /// Last requested orientation, -1 if none
    fn get_system_orientation(&self) -> i32;
}

impl<W: HostWindow, P: MulticastProvider> NativeHost for HostBridge<W, P> {
    fn show_soft_keyboard(&self) {
        HostBridge::show_soft_keyboard(self)
    }

    fn hide_soft_keyboard(&self) {
        HostBridge::hide_soft_keyboard(self)
    }

    fn is_soft_keyboard_shown(&self) -> bool {
        HostBridge::is_soft_keyboard_shown(self)
    }

    fn soft_keyboard_height(&self) -> u32 {
        HostBridge::soft_keyboard_height(self)
    }

    fn set_system_orientation(&mut self, mode: i32) {
        HostBridge::set_system_orientation(self, mode)
    }

    fn get_system_orientation(&self) -> i32 {
        HostBridge::get_system_orientation(self)
    }
}

thread_local! {
    static ACTIVE_HOST: RefCell<Option<Weak<RefCell<dyn NativeHost>>>> = const { RefCell::new(None) };
}

/// Route engine calls on this thread to `host`
///
/// Replaces any previously installed host.
pub fn install<H: NativeHost + 'static>(host: &Rc<RefCell<H>>) {
    let weak = Rc::downgrade(host);
    let weak: Weak<RefCell<dyn NativeHost>> = weak;
    ACTIVE_HOST.with(|slot| *slot.borrow_mut() = Some(weak));
    debug!("Native host installed");
}

/// Stop routing engine calls on this thread
pub fn uninstall() {
    ACTIVE_HOST.with(|slot| slot.borrow_mut().take());
    debug!("Native host uninstalled");
}

/// Whether a live host is installed on this thread
pub fn is_installed() -> bool {
    ACTIVE_HOST.with(|slot| {
        slot.borrow()
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    })
}

fn with_host<R>(f: impl FnOnce(&mut dyn NativeHost) -> R) -> Option<R> {
    let host = ACTIVE_HOST.with(|slot| slot.borrow().as_ref().and_then(Weak::upgrade))?;
    let result = match host.try_borrow_mut() {
        Ok(mut guard) => Some(f(&mut *guard)),
        Err(_) => {
            warn!("Native host busy, dropping engine request");
            None
        }
    };
    result
}

/// Show the soft keyboard
pub fn show_soft_keyboard() {
    with_host(|host| host.show_soft_keyboard());
}

/// Hide the soft keyboard
pub fn hide_soft_keyboard() {
    with_host(|host| host.hide_soft_keyboard());
}

/// Whether the soft keyboard is visible; `false` without a live host
pub fn is_soft_keyboard_shown() -> bool {
    with_host(|host| host.is_soft_keyboard_shown()).unwrap_or(false)
}

/// Soft keyboard height in pixels; 0 without a live host
pub fn soft_keyboard_height() -> u32 {
    with_host(|host| host.soft_keyboard_height()).unwrap_or(0)
}

/// Request an orientation: 0 landscape, 1 portrait, anything else unlocked
pub fn set_system_orientation(mode: i32) {
    with_host(|host| host.set_system_orientation(mode));
}

/// Last requested orientation, -1 if none or without a live host
pub fn get_system_orientation() -> i32 {
    with_host(|host| host.get_system_orientation()).unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::PlatformTier;
    use crate::input::ScreenOrientation;
    use crate::lifecycle::LifecycleEvent;
    use crate::testing::{Call, FakeMulticastProvider, RecordingWindow};

    fn installed_host() -> (
        Rc<RefCell<HostBridge<RecordingWindow, FakeMulticastProvider>>>,
        RecordingWindow,
    ) {
        let window = RecordingWindow::new();
        let host = Rc::new(RefCell::new(HostBridge::new(
            window.clone(),
            FakeMulticastProvider::new(),
            PlatformTier::Immersive,
        )));
        host.borrow_mut()
            .handle_lifecycle_event(LifecycleEvent::Create)
            .unwrap();
        install(&host);
        window.clear();
        (host, window)
    }

    #[test]
    fn test_calls_without_host() {
        uninstall();
        assert!(!is_installed());

        show_soft_keyboard();
        hide_soft_keyboard();
        set_system_orientation(1);

        assert!(!is_soft_keyboard_shown());
        assert_eq!(soft_keyboard_height(), 0);
        assert_eq!(get_system_orientation(), -1);
    }

    #[test]
    fn test_calls_route_to_installed_host() {
        let (_host, window) = installed_host();
        assert!(is_installed());

        show_soft_keyboard();
        set_system_orientation(0);

        assert_eq!(get_system_orientation(), 0);
        assert_eq!(
            window.calls(),
            vec![
                Call::ShowSoftInput,
                Call::SetRequestedOrientation(ScreenOrientation::Landscape),
            ]
        );
    }

    #[test]
    fn test_keyboard_hidden_by_default() {
        let (_host, _window) = installed_host();
        assert!(!is_soft_keyboard_shown());
    }

    #[test]
    fn test_dropped_host_is_noop() {
        let (host, window) = installed_host();
        drop(host);

        assert!(!is_installed());
        show_soft_keyboard();
        set_system_orientation(1);

        assert!(window.calls().is_empty());
    }

    #[test]
    fn test_destroyed_host_is_noop() {
        let (host, window) = installed_host();
        host.borrow_mut()
            .handle_lifecycle_event(LifecycleEvent::Destroy)
            .unwrap();
        window.clear();

        show_soft_keyboard();
        hide_soft_keyboard();
        set_system_orientation(0);

        assert!(!is_soft_keyboard_shown());
        assert!(window.calls().is_empty());
    }

    #[test]
    fn test_install_replaces_previous_host() {
        let (_first, first_window) = installed_host();
        let (_second, second_window) = installed_host();

        show_soft_keyboard();

        assert!(first_window.calls().is_empty());
        assert_eq!(second_window.calls(), vec![Call::ShowSoftInput]);
    }

    #[test]
    fn test_reentrant_call_is_dropped() {
        let (host, window) = installed_host();
        let _guard = host.borrow_mut();

        show_soft_keyboard();

        assert!(window.calls().is_empty());
    }
}
