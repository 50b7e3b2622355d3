//! Host lifecycle phases and transitions
//!
//! The host moves through `Created → Resumed ⇄ Paused → Destroyed`. Only the
//! `Resumed ⇄ Paused` cycle may repeat; every other transition is one-way.

use crate::error::{HostError, Result};

/// Lifecycle phase of the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Host created, not yet in the foreground
    Created,
    /// Host in the foreground and interactive
    Resumed,
    /// Host left the foreground
    Paused,
    /// Host torn down; nothing may touch its window anymore
    Destroyed,
}

impl LifecyclePhase {
    /// Whether the host window can still be used
    pub fn is_alive(self) -> bool {
        !matches!(self, LifecyclePhase::Destroyed)
    }

    /// Resolve the effect of `event` on an optional current phase
    ///
    /// `None` means the host has not received its create event yet.
    /// Re-delivery of the event that produced the current phase is accepted
    /// and reported as [`Transition::Unchanged`].
    pub fn transition(from: Option<LifecyclePhase>, event: LifecycleEvent) -> Result<Transition> {
        use LifecycleEvent as E;
        use LifecyclePhase as P;

        let next = match (from, event) {
            (None, E::Create) => P::Created,

            (Some(P::Created), E::Create)
            | (Some(P::Resumed), E::Resume)
            | (Some(P::Paused), E::Pause)
            | (Some(P::Destroyed), E::Destroy) => return Ok(Transition::Unchanged),

            (Some(P::Created), E::Resume) | (Some(P::Paused), E::Resume) => P::Resumed,
            (Some(P::Resumed), E::Pause) => P::Paused,
            (Some(P::Created), E::Destroy)
            | (Some(P::Resumed), E::Destroy)
            | (Some(P::Paused), E::Destroy) => P::Destroyed,

            (from, event) => return Err(HostError::InvalidTransition { from, event }),
        };

        Ok(Transition::Enter(next))
    }
}

/// Lifecycle events delivered by the OS
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Host instance created
    Create,
    /// Host came to the foreground
    Resume,
    /// Host went to the background
    Pause,
    /// Host is being torn down
    Destroy,
}

/// Outcome of applying a lifecycle event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The host enters a new phase
    Enter(LifecyclePhase),
    /// The event repeats the current phase
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(from: Option<LifecyclePhase>, event: LifecycleEvent) -> LifecyclePhase {
        match LifecyclePhase::transition(from, event).unwrap() {
            Transition::Enter(phase) => phase,
            Transition::Unchanged => panic!("expected a phase change for {event:?}"),
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let created = enter(None, LifecycleEvent::Create);
        assert_eq!(created, LifecyclePhase::Created);

        let resumed = enter(Some(created), LifecycleEvent::Resume);
        assert_eq!(resumed, LifecyclePhase::Resumed);

        let paused = enter(Some(resumed), LifecycleEvent::Pause);
        assert_eq!(paused, LifecyclePhase::Paused);

        assert_eq!(
            enter(Some(paused), LifecycleEvent::Resume),
            LifecyclePhase::Resumed
        );
        assert_eq!(
            enter(Some(paused), LifecycleEvent::Destroy),
            LifecyclePhase::Destroyed
        );
    }

    #[test]
    fn test_repeated_event_is_unchanged() {
        let cases = [
            (LifecyclePhase::Created, LifecycleEvent::Create),
            (LifecyclePhase::Resumed, LifecycleEvent::Resume),
            (LifecyclePhase::Paused, LifecycleEvent::Pause),
            (LifecyclePhase::Destroyed, LifecycleEvent::Destroy),
        ];
        for (phase, event) in cases {
            assert_eq!(
                LifecyclePhase::transition(Some(phase), event).unwrap(),
                Transition::Unchanged
            );
        }
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(LifecyclePhase::transition(None, LifecycleEvent::Resume).is_err());
        assert!(
            LifecyclePhase::transition(Some(LifecyclePhase::Created), LifecycleEvent::Pause)
                .is_err()
        );
        assert!(
            LifecyclePhase::transition(Some(LifecyclePhase::Paused), LifecycleEvent::Create)
                .is_err()
        );
        assert!(
            LifecyclePhase::transition(Some(LifecyclePhase::Destroyed), LifecycleEvent::Resume)
                .is_err()
        );
    }

    #[test]
    fn test_is_alive() {
        assert!(LifecyclePhase::Created.is_alive());
        assert!(LifecyclePhase::Paused.is_alive());
        assert!(!LifecyclePhase::Destroyed.is_alive());
    }
}
