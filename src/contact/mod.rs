//! Physics → audio contact handoff.
//!
//! The physics side holds a [`ContactSender`] and reports impacts, the body's
//! speed and continuing contact whenever its loop ticks. The audio side holds
//! the matching [`ContactReceiver`] and takes one [`ContactSnapshot`] at the
//! top of every render call. Nothing here blocks or allocates after
//! [`channel`] returns.
//!
//! ```
//! use contact_noise::contact;
//!
//! let (tx, rx) = contact::channel();
//! tx.report_impact(2.0 * 3.0 * 3.0); // mass * v^2
//! tx.set_speed(0.4);
//!
//! let snap = rx.snapshot();
//! assert_eq!(snap.impact, 18.0);
//! assert_eq!(rx.snapshot().impact, 0.0);
//! ```

use std::sync::Arc;

/// Collision bursts queued for the burst bank.
#[cfg(feature = "rtrb")]
pub mod burst;
/// Atomic single-value slots.
pub mod slot;

pub use slot::{FlagSlot, PeakSlot, SharedScalar};

#[derive(Debug, Default)]
struct ContactState {
    impact: PeakSlot,
    speed: SharedScalar,
    touching: FlagSlot,
}

/// Everything the render call needs from the physics side, read once.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactSnapshot {
    /// Largest impact magnitude reported since the last snapshot, or 0.
    pub impact: f32,
    /// Most recent relative speed.
    pub speed: f32,
    /// Whether continuing contact was reported since the last snapshot.
    pub touching: bool,
}

/// Physics-side handle.
#[derive(Debug)]
pub struct ContactSender {
    state: Arc<ContactState>,
}

impl ContactSender {
    /// Report a collision with the given kinetic-energy-like magnitude.
    ///
    /// Several reports between two render calls collapse to the largest.
    pub fn report_impact(&self, magnitude: f32) {
        self.state.impact.offer(magnitude);
    }

    /// Convenience for `mass * relative_speed²`.
    pub fn report_collision(&self, mass: f32, relative_speed: f32) {
        self.report_impact(mass * relative_speed * relative_speed);
    }

    /// Publish the current sliding/rolling speed. Negative values read as 0.
    pub fn set_speed(&self, speed: f32) {
        self.state.speed.store(speed.max(0.0));
    }

    /// Flag that the body is still touching something this tick.
    pub fn report_contact(&self) {
        self.state.touching.raise();
    }
}

/// Audio-side handle.
#[derive(Debug)]
pub struct ContactReceiver {
    state: Arc<ContactState>,
}

impl ContactReceiver {
    /// Take the pending impact and contact flag and read the current speed.
    #[inline]
    pub fn snapshot(&self) -> ContactSnapshot {
        ContactSnapshot {
            impact: self.state.impact.take(),
            speed: self.state.speed.load(),
            touching: self.state.touching.take(),
        }
    }
}

/// Create a connected sender/receiver pair.
pub fn channel() -> (ContactSender, ContactReceiver) {
    let state = Arc::new(ContactState::default());
    (
        ContactSender {
            state: Arc::clone(&state),
        },
        ContactReceiver { state },
    )
}
