//! Glaze Core - data model for the immediate-mode GUI bridge
//!
//! Leaf types shared by the bridge and its backends:
//! - `Io`: per-frame input/display state exchanged with the GUI library
//! - Draw-data snapshot types consumed by renderer backends
//! - The texture id/handle registry with frame-scoped invalidation

mod draw;
mod io;
mod registry;
mod texture;

pub use draw::{DrawCmd, DrawData, DrawList, DrawVert, Rect};
pub use io::{
    BackendFlags, ConfigFlags, Io, Key, DEFAULT_DELTA_TIME, KEY_DOWN_COUNT, MOUSE_BUTTON_COUNT,
};
pub use registry::TextureRegistry;
pub use texture::{FontAtlasData, TextureHandle, TextureId};
