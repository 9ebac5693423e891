use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::player::PlayerState;

/// Copy of everything the render loop needs from the input side, taken once
/// per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub player: PlayerState,
    pub show_hud: bool,
}

/// State written by the input thread and read by the render loop.
#[derive(Debug)]
pub struct SharedState {
    player: Mutex<PlayerState>,
    show_hud: AtomicBool,
    elapsed_bits: AtomicU64,
}

impl SharedState {
    pub fn new(player: PlayerState, show_hud: bool) -> Self {
        Self {
            player: Mutex::new(player),
            show_hud: AtomicBool::new(show_hud),
            elapsed_bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// The pose is plain data, so a poisoned lock still holds a usable value.
    pub fn player(&self) -> MutexGuard<'_, PlayerState> {
        self.player
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: *self.player(),
            show_hud: self.show_hud(),
        }
    }

    pub fn show_hud(&self) -> bool {
        self.show_hud.load(Ordering::Acquire)
    }

    pub fn toggle_hud(&self) -> bool {
        !self.show_hud.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn elapsed(&self) -> f64 {
        f64::from_bits(self.elapsed_bits.load(Ordering::Acquire))
    }

    pub fn publish_elapsed(&self, seconds: f64) {
        self.elapsed_bits
            .store(seconds.max(0.0).to_bits(), Ordering::Release);
    }
}
