//! Platform-neutral host events
//!
//! The Android pump translates `android-activity` events into [`HostEvent`]s
//! and hands them to [`dispatch`]. Keeping this step free of JNI lets it run
//! under host tests.

use octave_host::{HostBridge, HostWindow, LifecycleEvent, MulticastProvider, Result};
use tracing::{trace, warn};

/// An OS notification relevant to the host bridge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// Lifecycle transition
    Lifecycle(LifecycleEvent),
    /// Window focus gained (`true`) or lost (`false`)
    FocusChanged(bool),
    /// System UI visibility or window insets changed; carries the raw mask
    VisibilityChanged(u32),
}

/// Feed one event to the bridge
///
/// Only fatal errors are returned. Anything else (an out-of-order lifecycle
/// event, a multicast lock hiccup) is logged and the host keeps running.
pub fn dispatch<W, P>(bridge: &mut HostBridge<W, P>, event: HostEvent) -> Result<()>
where
    W: HostWindow,
    P: MulticastProvider,
{
    trace!(?event, "Dispatching host event");
    match event {
        HostEvent::Lifecycle(lifecycle) => match bridge.handle_lifecycle_event(lifecycle) {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(?lifecycle, error = %e, "Lifecycle event not fully applied");
                Ok(())
            }
            Ok(()) => Ok(()),
        },
        HostEvent::FocusChanged(focused) => {
            bridge.handle_focus_changed(focused);
            Ok(())
        }
        HostEvent::VisibilityChanged(mask) => {
            bridge.handle_visibility_changed(mask);
            Ok(())
        }
    }
}
