//! Glaze Bridge - lifecycle glue between an immediate-mode GUI library and
//! a host rendering backend.
//!
//! - `GuiDriver`: seam to the external GUI library
//! - `Context` + `context::make_current`: the one process-wide current slot
//! - `PlatformBackend` / `RendererBackend`: pluggable per-frame roles
//! - `GuiBridge`: the per-tick frame state machine

pub mod context;

mod backend;
mod bridge;
mod driver;

pub use backend::{
    HeadlessPlatform, NullRenderer, PlatformBackend, RendererBackend, TextureFactory,
};
pub use bridge::{BridgeConfig, FramePhase, GuiBridge, InitError};
pub use context::{Context, LayoutFn};
pub use driver::{GuiDriver, NullDriver, StateHandle};
