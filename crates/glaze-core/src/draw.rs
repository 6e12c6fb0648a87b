//! Draw-data snapshot types.
//!
//! `DrawData` is the finalized, backend-agnostic description of one frame,
//! produced by the GUI library's render step and consumed by the renderer
//! backend. Texture ids ride along unmodified; the renderer resolves them
//! back to real textures through the registry before submission.

use glam::Vec2;

use crate::texture::TextureId;

/// Axis-aligned rectangle in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }
}

/// One vertex of the GUI's triangle soup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawVert {
    pub pos: Vec2,
    pub uv: Vec2,
    /// Packed RGBA, one byte per channel
    pub color: u32,
}

/// One draw call: a contiguous index range sharing a texture and clip rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCmd {
    /// Registry id of the texture to sample; epoch-local
    pub texture: TextureId,
    /// Scissor rectangle in display pixels
    pub clip_rect: Rect,
    /// First index into the owning list's index buffer
    pub index_offset: u32,
    /// Number of indices to draw
    pub index_count: u32,
}

/// Vertex and index buffers plus the commands that slice them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<u32>,
    pub commands: Vec<DrawCmd>,
}

/// Immutable snapshot of everything to render for one frame.
///
/// Valid only for the duration of the renderer backend call that receives
/// it; the next frame rebuilds it from scratch.
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    /// Display size the frame was laid out for
    pub display_size: Vec2,
    pub lists: Vec<DrawList>,
}

impl DrawData {
    pub fn total_vertex_count(&self) -> usize {
        self.lists.iter().map(|l| l.vertices.len()).sum()
    }

    pub fn total_index_count(&self) -> usize {
        self.lists.iter().map(|l| l.indices.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(|l| l.commands.is_empty())
    }
}
