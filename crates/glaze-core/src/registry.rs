//! Bidirectional texture registry with frame-scoped invalidation.
//!
//! The GUI library references textures by small integer ids while the host
//! keeps ownership of the textures themselves. Both mapping directions clear
//! at the start of every frame, which bounds registry growth and keeps stale
//! ids from outliving the externally-owned textures they point at, at the
//! price of id instability across frames.

use std::collections::HashMap;

use tracing::trace;

use crate::texture::{TextureHandle, TextureId};

/// Maps texture handles to the ids the GUI library sees, and back.
///
/// Invariant: for every registered pair, the reverse lookup returns the same
/// pair; no id maps to more than one handle and no handle to more than one
/// id while the mapping is live.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    next_id: i32,
    by_id: HashMap<TextureId, TextureHandle>,
    by_handle: HashMap<TextureHandle, TextureId>,
    font_atlas: Option<TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle for the current frame epoch.
    ///
    /// Registering the same handle twice within one epoch returns the same
    /// id. A null handle gets the invalid sentinel.
    pub fn register(&mut self, handle: TextureHandle) -> TextureId {
        if handle.is_null() {
            return TextureId::INVALID;
        }
        if let Some(&id) = self.by_handle.get(&handle) {
            return id;
        }
        self.next_id += 1;
        let id = TextureId(self.next_id);
        self.by_id.insert(id, handle);
        self.by_handle.insert(handle, id);
        trace!(%id, %handle, "registered texture");
        id
    }

    /// Resolve an id back to its handle, if registered this epoch.
    pub fn lookup(&self, id: TextureId) -> Option<TextureHandle> {
        self.by_id.get(&id).copied()
    }

    /// Id for a handle, registering it on the fly when it is new this epoch.
    pub fn id_of(&mut self, handle: TextureHandle) -> TextureId {
        if handle.is_null() {
            return TextureId::INVALID;
        }
        match self.by_handle.get(&handle) {
            Some(&id) => id,
            None => self.register(handle),
        }
    }

    /// Remember the font-atlas texture so every frame reset re-registers it
    /// as the first id of the new epoch.
    pub fn set_font_atlas(&mut self, handle: TextureHandle) {
        self.font_atlas = (!handle.is_null()).then_some(handle);
    }

    pub fn font_atlas(&self) -> Option<TextureHandle> {
        self.font_atlas
    }

    /// Start a new frame epoch: drop every mapping and the id counter, then
    /// re-register the font atlas (when present) so it deterministically
    /// takes the first id. Returns the atlas id for the new epoch.
    pub fn reset_frame(&mut self) -> Option<TextureId> {
        self.next_id = 0;
        self.by_id.clear();
        self.by_handle.clear();
        self.font_atlas.map(|handle| self.register(handle))
    }

    /// Full teardown on context destruction. The textures themselves belong
    /// to the host and are untouched.
    pub fn clear(&mut self) {
        self.next_id = 0;
        self.by_id.clear();
        self.by_handle.clear();
        self.font_atlas = None;
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
