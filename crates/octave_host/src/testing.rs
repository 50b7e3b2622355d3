//! Recording fakes for the platform service traits
//!
//! Enabled with the `testing` feature. The fakes share their state through
//! `Rc`, so a test keeps a clone and inspects what the bridge did.

use std::cell::RefCell;
use std::rc::Rc;

use crate::chrome::ChromeFlags;
use crate::error::{HostError, Result};
use crate::input::ScreenOrientation;
use crate::multicast::{MulticastLock, MulticastProvider, MulticastService};
use crate::window::HostWindow;

/// A platform call observed by [`RecordingWindow`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SetSystemUiVisibility(ChromeFlags),
    SetRequestedOrientation(ScreenOrientation),
    ShowSoftInput,
    HideSoftInput,
    QueryImeVisible,
    QueryImeInset,
}

#[derive(Debug, Default)]
struct WindowState {
    calls: Vec<Call>,
    ime_visible: bool,
    ime_height: u32,
    reject_chrome_flags: bool,
}

/// Host window that records every call
#[derive(Clone, Debug, Default)]
pub struct RecordingWindow {
    state: Rc<RefCell<WindowState>>,
}

impl RecordingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Simulate the platform's IME inset state
    pub fn set_ime(&self, visible: bool, height: u32) {
        let mut state = self.state.borrow_mut();
        state.ime_visible = visible;
        state.ime_height = height;
    }

    /// Make chrome flag updates report that they were not applied
    ///
    /// Calls are still recorded.
    pub fn reject_chrome_flags(&self, reject: bool) {
        self.state.borrow_mut().reject_chrome_flags = reject;
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl HostWindow for RecordingWindow {
    fn set_system_ui_visibility(&self, flags: ChromeFlags) -> bool {
        self.record(Call::SetSystemUiVisibility(flags));
        !self.state.borrow().reject_chrome_flags
    }

    fn set_requested_orientation(&self, orientation: ScreenOrientation) {
        self.record(Call::SetRequestedOrientation(orientation));
    }

    fn show_soft_input(&self) {
        self.record(Call::ShowSoftInput);
    }

    fn hide_soft_input(&self) {
        self.record(Call::HideSoftInput);
    }

    fn is_ime_visible(&self) -> bool {
        self.record(Call::QueryImeVisible);
        self.state.borrow().ime_visible
    }

    fn ime_inset_bottom(&self) -> u32 {
        self.record(Call::QueryImeInset);
        let state = self.state.borrow();
        if state.ime_visible {
            state.ime_height
        } else {
            0
        }
    }
}

/// A lock operation observed by the fake multicast service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockOp {
    /// Acquire on the lock with this id
    Acquire(usize),
    /// Release on the lock with this id
    Release(usize),
}

#[derive(Debug)]
struct NetState {
    available: bool,
    services_obtained: usize,
    locks_created: usize,
    last_tag: Option<String>,
    last_reference_counted: Option<bool>,
    ops: Vec<LockOp>,
    fail_next_acquire: bool,
    fail_next_release: bool,
}

/// Multicast provider backed by an in-memory, reference-counting service
#[derive(Clone, Debug)]
pub struct FakeMulticastProvider {
    state: Rc<RefCell<NetState>>,
}

impl FakeMulticastProvider {
    /// Provider whose environment has a multicast service
    pub fn new() -> Self {
        Self::with_availability(true)
    }

    /// Provider whose environment lacks the service
    pub fn unavailable() -> Self {
        Self::with_availability(false)
    }

    fn with_availability(available: bool) -> Self {
        Self {
            state: Rc::new(RefCell::new(NetState {
                available,
                services_obtained: 0,
                locks_created: 0,
                last_tag: None,
                last_reference_counted: None,
                ops: Vec::new(),
                fail_next_acquire: false,
                fail_next_release: false,
            })),
        }
    }

    /// Successful lock operations, in order
    pub fn ops(&self) -> Vec<LockOp> {
        self.state.borrow().ops.clone()
    }

    /// Number of times the service was looked up
    pub fn services_obtained(&self) -> usize {
        self.state.borrow().services_obtained
    }

    /// Number of lock handles created
    pub fn locks_created(&self) -> usize {
        self.state.borrow().locks_created
    }

    /// Tag of the most recently created lock
    pub fn last_tag(&self) -> Option<String> {
        self.state.borrow().last_tag.clone()
    }

    /// Counting mode of the most recently created lock
    pub fn last_reference_counted(&self) -> Option<bool> {
        self.state.borrow().last_reference_counted
    }

    /// Make the next acquire fail
    pub fn fail_next_acquire(&self) {
        self.state.borrow_mut().fail_next_acquire = true;
    }

    /// Make the next release fail
    pub fn fail_next_release(&self) {
        self.state.borrow_mut().fail_next_release = true;
    }
}

impl Default for FakeMulticastProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MulticastProvider for FakeMulticastProvider {
    type Service = FakeMulticastService;

    fn multicast_service(&self) -> Option<Self::Service> {
        let mut state = self.state.borrow_mut();
        if !state.available {
            return None;
        }
        state.services_obtained += 1;
        Some(FakeMulticastService {
            state: Rc::clone(&self.state),
        })
    }
}

/// Service handed out by [`FakeMulticastProvider`]
#[derive(Debug)]
pub struct FakeMulticastService {
    state: Rc<RefCell<NetState>>,
}

impl MulticastService for FakeMulticastService {
    type Lock = FakeMulticastLock;

    fn create_multicast_lock(&self, tag: &str, reference_counted: bool) -> Result<Self::Lock> {
        let mut state = self.state.borrow_mut();
        let id = state.locks_created;
        state.locks_created += 1;
        state.last_tag = Some(tag.to_string());
        state.last_reference_counted = Some(reference_counted);
        Ok(FakeMulticastLock {
            id,
            ref_count: 0,
            state: Rc::clone(&self.state),
        })
    }
}

/// Lock that faults on release without a matching acquire, like the platform
#[derive(Debug)]
pub struct FakeMulticastLock {
    id: usize,
    ref_count: usize,
    state: Rc<RefCell<NetState>>,
}

impl FakeMulticastLock {
    /// Identity assigned at creation
    pub fn id(&self) -> usize {
        self.id
    }

    /// Platform-side reference count
    pub fn ref_count(&self) -> usize {
        self.ref_count
    }
}

impl MulticastLock for FakeMulticastLock {
    fn acquire(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_acquire) {
            return Err(HostError::Lock("acquire rejected".to_string()));
        }
        self.ref_count += 1;
        state.ops.push(LockOp::Acquire(self.id));
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_release) {
            return Err(HostError::Lock("release rejected".to_string()));
        }
        if self.ref_count == 0 {
            return Err(HostError::Lock("MulticastLock under-locked".to_string()));
        }
        self.ref_count -= 1;
        state.ops.push(LockOp::Release(self.id));
        Ok(())
    }
}
