//! Texture id and handle types shared across the bridge.

use std::fmt;

/// Small integer id handed to the GUI library in place of a real texture.
///
/// Ids are epoch-local: the registry clears at the start of every frame, so
/// an id cached from a previous frame silently resolves to a different
/// texture, or to nothing. Callers must re-resolve ids every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub i32);

impl TextureId {
    /// Sentinel for "no texture" / "not found". Zero is also reserved;
    /// valid ids are strictly positive.
    pub const INVALID: TextureId = TextureId(-1);

    pub fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tex({})", self.0)
    }
}

/// Opaque reference to an externally-owned texture.
///
/// The host rendering backend owns the actual resource; the bridge only
/// passes this value around and never frees it. Zero means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

impl TextureHandle {
    pub const NULL: TextureHandle = TextureHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.0)
    }
}

/// Pixel buffer for the GUI library's default font atlas.
#[derive(Debug, Clone)]
pub struct FontAtlasData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly packed RGBA32 bytes, `width * height * 4` long
    pub pixels: Vec<u8>,
}
