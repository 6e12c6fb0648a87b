//! Interface to the immediate-mode GUI library being bridged.
//!
//! The library itself is an external collaborator: it owns widget layout
//! and draw-list generation. The bridge only needs the handful of entry
//! points below, and treats the state handle the library returns as an
//! opaque identity.

use std::cell::Cell;

use glam::Vec2;
use glaze_core::{DrawData, FontAtlasData, Io, TextureId};

/// Opaque GUI-library state block identity. Minted by
/// [`GuiDriver::create_state`] and never inspected by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHandle(pub u64);

/// Entry points the bridge needs from the GUI library.
///
/// Receivers are `&self`: the library behind this seam is a process-global
/// with one implicit current-state slot, so implementations keep their own
/// interior mutability. Every call other than state management implicitly
/// acts on whichever state was last made current.
pub trait GuiDriver {
    /// Allocate a fresh library state block.
    fn create_state(&self) -> StateHandle;

    /// Release a state block created by [`GuiDriver::create_state`].
    fn destroy_state(&self, state: StateHandle);

    /// Point the library at `state`, or at nothing.
    fn set_current(&self, state: Option<StateHandle>);

    /// Build the default font atlas and return its pixel buffer, if the
    /// library has fonts configured.
    fn build_font_atlas(&self) -> Option<FontAtlasData>;

    /// Tell the library which registry id the font-atlas texture received.
    fn set_font_texture(&self, id: TextureId);

    /// Drop font data on teardown.
    fn clear_fonts(&self);

    /// Begin accepting layout calls for a new frame.
    fn new_frame(&self, io: &Io);

    /// Finalize the frame's draw lists. Called exactly once per
    /// `new_frame`, on every exit path out of the layout phase.
    fn render(&self) -> DrawData;
}

/// No-op driver: accepts the whole protocol and produces empty draw data.
///
/// Useful headless, in tests, and as a placeholder while a real library
/// binding is wired up.
#[derive(Debug, Default)]
pub struct NullDriver {
    next_state: Cell<u64>,
    live_states: Cell<usize>,
    display_size: Cell<Vec2>,
}

impl NullDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of state blocks created and not yet destroyed.
    pub fn live_states(&self) -> usize {
        self.live_states.get()
    }
}

impl GuiDriver for NullDriver {
    fn create_state(&self) -> StateHandle {
        let id = self.next_state.get() + 1;
        self.next_state.set(id);
        self.live_states.set(self.live_states.get() + 1);
        StateHandle(id)
    }

    fn destroy_state(&self, _state: StateHandle) {
        self.live_states.set(self.live_states.get().saturating_sub(1));
    }

    fn set_current(&self, _state: Option<StateHandle>) {}

    fn build_font_atlas(&self) -> Option<FontAtlasData> {
        // 1x1 white pixel so the font bootstrap path stays exercised.
        Some(FontAtlasData {
            width: 1,
            height: 1,
            pixels: vec![0xff; 4],
        })
    }

    fn set_font_texture(&self, _id: TextureId) {}

    fn clear_fonts(&self) {}

    fn new_frame(&self, io: &Io) {
        self.display_size.set(io.display_size);
    }

    fn render(&self) -> DrawData {
        DrawData {
            display_size: self.display_size.get(),
            lists: Vec::new(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::Io;

    #[test]
    fn test_null_driver_tracks_states() {
        let driver = NullDriver::new();
        let a = driver.create_state();
        let b = driver.create_state();
        assert_ne!(a, b);
        assert_eq!(driver.live_states(), 2);
        driver.destroy_state(a);
        driver.destroy_state(b);
        assert_eq!(driver.live_states(), 0);
    }

    #[test]
    fn test_null_driver_echoes_display_size() {
        let driver = NullDriver::new();
        let mut io = Io::new();
        io.display_size = Vec2::new(640.0, 480.0);
        driver.new_frame(&io);
        let data = driver.render();
        assert_eq!(data.display_size, Vec2::new(640.0, 480.0));
        assert!(data.is_empty());
    }
}
