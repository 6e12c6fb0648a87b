//! Per-frame io block exchanged with the GUI library.
//!
//! The platform backend writes display metrics and input state here every
//! frame; both backends advertise their identity and capabilities here once
//! at activation. The GUI library reads all of it at `new_frame`.

use bitflags::bitflags;
use glam::Vec2;

use crate::texture::TextureId;

/// Fallback tick duration when the platform cannot provide a real one.
pub const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;

/// Number of pointer buttons tracked.
pub const MOUSE_BUTTON_COUNT: usize = 5;

/// Size of the raw key-down table, indexed by host scan code.
pub const KEY_DOWN_COUNT: usize = 512;

bitflags! {
    /// Behaviour toggles the host sets once at initialization.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ConfigFlags: u32 {
        /// Keyboard navigation of widgets
        const NAV_ENABLE_KEYBOARD = 1 << 0;
        /// Gamepad navigation of widgets
        const NAV_ENABLE_GAMEPAD = 1 << 1;
        /// Suppress OS cursor changes; the GUI draws its own cursor
        const NO_MOUSE_CURSOR_CHANGE = 1 << 2;
    }
}

bitflags! {
    /// Capabilities a backend advertises after activation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BackendFlags: u32 {
        /// Platform can render distinct mouse cursor shapes
        const HAS_MOUSE_CURSORS = 1 << 0;
        /// Platform can warp the pointer
        const HAS_SET_MOUSE_POS = 1 << 1;
        /// Platform reports gamepad state
        const HAS_GAMEPAD = 1 << 2;
    }
}

/// Named keys the GUI library understands. Platforms fill the io key map
/// with the host scan code for each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    A,
    C,
    V,
    X,
    Y,
    Z,
}

impl Key {
    pub const COUNT: usize = 21;

    pub const ALL: [Key; Self::COUNT] = [
        Key::Tab,
        Key::LeftArrow,
        Key::RightArrow,
        Key::UpArrow,
        Key::DownArrow,
        Key::PageUp,
        Key::PageDown,
        Key::Home,
        Key::End,
        Key::Insert,
        Key::Delete,
        Key::Backspace,
        Key::Space,
        Key::Enter,
        Key::Escape,
        Key::A,
        Key::C,
        Key::V,
        Key::X,
        Key::Y,
        Key::Z,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Input, display and configuration state for one frame.
#[derive(Debug, Clone)]
pub struct Io {
    /// Display size in pixels, refreshed by the platform every frame
    pub display_size: Vec2,
    /// Seconds since the previous frame; always positive
    pub delta_time: f32,
    /// Pointer position in display pixels; (-1, -1) when unavailable
    pub mouse_pos: Vec2,
    /// Pointer button state
    pub mouse_down: [bool; MOUSE_BUTTON_COUNT],
    /// Vertical wheel delta for this frame
    pub mouse_wheel: f32,
    /// Raw key-down table indexed by host scan code
    pub keys_down: [bool; KEY_DOWN_COUNT],
    pub key_ctrl: bool,
    pub key_shift: bool,
    pub key_alt: bool,
    pub key_super: bool,
    /// Translation from named keys to host scan codes; -1 = unmapped
    pub key_map: [i32; Key::COUNT],
    pub config_flags: ConfigFlags,
    pub backend_flags: BackendFlags,
    /// Diagnostic name reported by the active platform backend
    pub backend_platform_name: Option<String>,
    /// Diagnostic name reported by the active renderer backend
    pub backend_renderer_name: Option<String>,
    /// Id of the font-atlas texture for the current epoch
    pub font_texture_id: TextureId,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            display_size: Vec2::ZERO,
            delta_time: DEFAULT_DELTA_TIME,
            mouse_pos: Vec2::new(-1.0, -1.0),
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_wheel: 0.0,
            keys_down: [false; KEY_DOWN_COUNT],
            key_ctrl: false,
            key_shift: false,
            key_alt: false,
            key_super: false,
            key_map: [-1; Key::COUNT],
            config_flags: ConfigFlags::empty(),
            backend_flags: BackendFlags::empty(),
            backend_platform_name: None,
            backend_renderer_name: None,
            font_texture_id: TextureId::INVALID,
        }
    }
}

impl Io {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a named key to its host scan code.
    pub fn map_key(&mut self, key: Key, scan_code: i32) {
        self.key_map[key.index()] = scan_code;
    }

    /// Host scan code for a named key, if mapped.
    pub fn key_code(&self, key: Key) -> Option<i32> {
        let code = self.key_map[key.index()];
        (code >= 0).then_some(code)
    }

    /// Whether a named key is currently held, going through the translation
    /// table.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.key_code(key)
            .and_then(|code| self.keys_down.get(code as usize).copied())
            .unwrap_or(false)
    }

    /// Zero all pointer and keyboard state. Platforms without a real input
    /// source call this every frame so no stale state leaks in.
    pub fn clear_input(&mut self) {
        self.mouse_pos = Vec2::new(-1.0, -1.0);
        self.mouse_down = [false; MOUSE_BUTTON_COUNT];
        self.mouse_wheel = 0.0;
        self.keys_down = [false; KEY_DOWN_COUNT];
        self.key_ctrl = false;
        self.key_shift = false;
        self.key_alt = false;
        self.key_super = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_satisfy_io_contract() {
        let io = Io::new();
        assert!(io.delta_time > 0.0);
        assert_eq!(io.font_texture_id, TextureId::INVALID);
        assert!(io.config_flags.is_empty());
        assert!(io.backend_platform_name.is_none());
    }

    #[test]
    fn test_key_mapping_round_trip() {
        let mut io = Io::new();
        assert_eq!(io.key_code(Key::Enter), None);
        io.map_key(Key::Enter, 13);
        assert_eq!(io.key_code(Key::Enter), Some(13));
        io.keys_down[13] = true;
        assert!(io.is_key_down(Key::Enter));
        assert!(!io.is_key_down(Key::Escape));
    }

    #[test]
    fn test_unmapped_key_is_never_down() {
        let mut io = Io::new();
        io.keys_down.fill(true);
        assert!(!io.is_key_down(Key::Tab));
    }

    #[test]
    fn test_clear_input_zeroes_everything() {
        let mut io = Io::new();
        io.mouse_pos = Vec2::new(10.0, 20.0);
        io.mouse_down[0] = true;
        io.mouse_wheel = 1.5;
        io.keys_down[42] = true;
        io.key_ctrl = true;
        io.clear_input();
        assert_eq!(io.mouse_pos, Vec2::new(-1.0, -1.0));
        assert!(!io.mouse_down.iter().any(|&b| b));
        assert_eq!(io.mouse_wheel, 0.0);
        assert!(!io.keys_down.iter().any(|&b| b));
        assert!(!io.key_ctrl);
    }
}
