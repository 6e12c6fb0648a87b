//! Frame-lifecycle controller.
//!
//! `GuiBridge` owns the GUI context and the active platform/renderer pair,
//! and turns each host tick into one strictly-ordered frame cycle:
//! texture-epoch reset, platform frame prep, new frame, layout tiers,
//! draw-list finalization, draw submission.

use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use glaze_core::{ConfigFlags, Io, Rect, TextureId, DEFAULT_DELTA_TIME};

use crate::backend::{
    HeadlessPlatform, NullRenderer, PlatformBackend, RendererBackend, TextureFactory,
};
use crate::context::{self, Context, LayoutFn};
use crate::driver::GuiDriver;

/// Toggles applied to io once during [`GuiBridge::initialize`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Run process-wide layout callbacks before instance callbacks
    pub global_layout: bool,
    /// Let the GUI draw its own cursor and suppress OS cursor changes
    pub mouse_draw_cursor: bool,
    /// Keyboard navigation of widgets
    pub keyboard_navigation: bool,
    /// Gamepad navigation of widgets
    pub gamepad_navigation: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            global_layout: true,
            mouse_draw_cursor: false,
            keyboard_navigation: false,
            gamepad_navigation: false,
        }
    }
}

/// Phases of one frame cycle, in the order they run. Nothing here persists
/// between ticks; the enum exists for trace output and documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    Idle,
    Prepared,
    Recording,
    Rendered,
    Submitted,
}

/// A backend refused to activate. By the time this reaches the caller the
/// bridge has already unwound to its pre-`initialize` state.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("platform backend failed to initialize")]
    Platform(#[source] anyhow::Error),

    #[error("renderer backend failed to initialize")]
    Renderer(#[source] anyhow::Error),
}

/// Owns the GUI context and the active backend pair, and drives the
/// per-frame protocol. Single-threaded by construction: every operation
/// runs to completion inside the call that invoked it, and `&mut self`
/// receivers keep backend swaps out of in-flight ticks.
pub struct GuiBridge {
    driver: Rc<dyn GuiDriver>,
    config: BridgeConfig,
    context: Option<Context>,
    platform: Option<Box<dyn PlatformBackend>>,
    renderer: Option<Box<dyn RendererBackend>>,
    texture_factory: Option<Box<dyn TextureFactory>>,
    layout: Vec<LayoutFn>,
    display_rect: Rect,
    initialized: bool,
}

impl GuiBridge {
    pub fn new(driver: Rc<dyn GuiDriver>, config: BridgeConfig) -> Self {
        Self {
            driver,
            config,
            context: None,
            platform: None,
            renderer: None,
            texture_factory: None,
            layout: Vec::new(),
            display_rect: Rect::default(),
            initialized: false,
        }
    }

    /// Attach the host collaborator that builds the font-atlas texture.
    /// Without one the bridge runs without a font texture.
    pub fn with_texture_factory(mut self, factory: Box<dyn TextureFactory>) -> Self {
        self.texture_factory = Some(factory);
        self
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut Context> {
        self.context.as_mut()
    }

    /// Host-supplied display metrics, forwarded to the platform each frame.
    /// An empty rect lets the platform pick its own size.
    pub fn set_display_rect(&mut self, rect: Rect) {
        self.display_rect = rect;
    }

    /// Register an instance layout callback, run after the global tier on
    /// every frame.
    pub fn on_layout(&mut self, f: impl FnMut() -> Result<()> + 'static) {
        self.layout.push(Box::new(f));
    }

    /// Create the context, make it current, apply configuration, bootstrap
    /// the font atlas, then activate platform and renderer in that order.
    /// Missing backends default to the stubs.
    ///
    /// If either backend refuses, everything started so far is torn down
    /// before the error is returned; no partially-initialized bridge is
    /// ever observable. Calling again after success is a no-op.
    pub fn initialize(
        &mut self,
        platform: Option<Box<dyn PlatformBackend>>,
        renderer: Option<Box<dyn RendererBackend>>,
    ) -> Result<(), InitError> {
        if self.initialized {
            debug!("initialize called on an initialized bridge; ignoring");
            return Ok(());
        }

        info!("initializing gui bridge");
        let mut ctx = Context::new(Rc::clone(&self.driver));
        context::make_current(Some(&ctx));
        self.config.apply_to(&mut ctx.io);
        self.bootstrap_font_atlas(&mut ctx);

        // Platform before renderer: renderer activation may lean on
        // registry state the platform never touches.
        let mut platform = platform.unwrap_or_else(|| Box::new(HeadlessPlatform::default()));
        if let Err(err) = platform.init(&mut ctx.io) {
            self.abort_initialize(ctx);
            return Err(InitError::Platform(err));
        }

        let mut renderer = renderer.unwrap_or_else(|| Box::new(NullRenderer::new()));
        if let Err(err) = renderer.init(&mut ctx.io) {
            platform.shutdown(&mut ctx.io);
            self.abort_initialize(ctx);
            return Err(InitError::Renderer(err));
        }

        self.context = Some(ctx);
        self.platform = Some(platform);
        self.renderer = Some(renderer);
        self.initialized = true;
        info!("gui bridge initialized");
        Ok(())
    }

    /// Unwind a failed `initialize` so no partial state stays observable.
    fn abort_initialize(&self, ctx: Context) {
        warn!("backend activation failed; unwinding initialization");
        self.driver.clear_fonts();
        context::make_current(None);
        drop(ctx);
    }

    /// Tear down in reverse activation order: renderer, then platform, then
    /// the context. Idempotent; never fails; safe before any `initialize`.
    pub fn shutdown(&mut self) {
        if self.context.is_none() {
            self.initialized = false;
            return;
        }

        info!("shutting down gui bridge");
        if let Some(ctx) = self.context.as_mut() {
            context::make_current(Some(&*ctx));
            if let Some(mut renderer) = self.renderer.take() {
                renderer.shutdown(&mut ctx.io);
            }
            if let Some(mut platform) = self.platform.take() {
                platform.shutdown(&mut ctx.io);
            }
        }
        self.driver.clear_fonts();
        context::make_current(None);
        self.context = None;
        self.initialized = false;
    }

    /// Drive one frame cycle. A bridge that is not initialized ignores the
    /// call, so hosts do not have to guard every tick.
    pub fn update(&mut self) {
        if !self.initialized {
            trace!("update before initialize ignored");
            return;
        }
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        context::make_current(Some(&*ctx));

        // Idle -> Prepared: new texture epoch, then the platform refreshes
        // io for this tick.
        trace!(phase = ?FramePhase::Prepared, "frame cycle");
        let font_id = ctx.with_textures(|t| t.reset_frame());
        ctx.io.font_texture_id = match font_id {
            Some(id) => {
                self.driver.set_font_texture(id);
                id
            }
            None => TextureId::INVALID,
        };
        if let Some(platform) = self.platform.as_mut() {
            if let Err(err) = platform.prepare_frame(&mut ctx.io, self.display_rect) {
                error!(error = %err, "platform prepare_frame failed");
            }
        }
        // Io contract: delta time is always positive.
        if ctx.io.delta_time <= 0.0 {
            ctx.io.delta_time = DEFAULT_DELTA_TIME;
        }

        // Prepared -> Recording: the library starts accepting layout calls.
        trace!(phase = ?FramePhase::Recording, "frame cycle");
        self.driver.new_frame(&ctx.io);

        // Recording -> Rendered: layout tiers, then finalization on every
        // exit path, including unwinds out of a callback.
        let mut errors = Vec::new();
        let draw_data = {
            let guard = FinalizeGuard::new(self.driver.as_ref());
            if self.config.global_layout {
                context::run_global_layout(&mut errors);
            }
            for callback in self.layout.iter_mut() {
                if let Err(err) = callback() {
                    errors.push(err);
                }
            }
            guard.finish()
        };
        for err in &errors {
            error!(error = %err, "layout callback failed");
        }
        trace!(phase = ?FramePhase::Rendered, "frame cycle");

        // Rendered -> Submitted: hand the snapshot to the renderer. A
        // failed submission is logged, not propagated; the host loop keeps
        // ticking.
        if let Some(renderer) = self.renderer.as_mut() {
            if let Err(err) = renderer.render_draw_data(&draw_data) {
                error!(error = %err, "draw submission failed");
            }
        }
        trace!(phase = ?FramePhase::Submitted, "frame cycle");
        // Submitted -> Idle: nothing to do.
    }

    /// Replace the platform slot between cycles. The old backend shuts down
    /// first regardless of what follows; the new one only occupies the slot
    /// once its activation succeeds.
    pub fn set_platform(&mut self, platform: Option<Box<dyn PlatformBackend>>) -> Result<()> {
        let Some(ctx) = self.context.as_mut() else {
            anyhow::bail!("no context; initialize the bridge before swapping backends");
        };
        if let Some(mut old) = self.platform.take() {
            old.shutdown(&mut ctx.io);
        }
        if let Some(mut new) = platform {
            new.init(&mut ctx.io)?;
            self.platform = Some(new);
        }
        Ok(())
    }

    /// Replace the renderer slot between cycles. Same discipline as
    /// [`GuiBridge::set_platform`].
    pub fn set_renderer(&mut self, renderer: Option<Box<dyn RendererBackend>>) -> Result<()> {
        let Some(ctx) = self.context.as_mut() else {
            anyhow::bail!("no context; initialize the bridge before swapping backends");
        };
        if let Some(mut old) = self.renderer.take() {
            old.shutdown(&mut ctx.io);
        }
        if let Some(mut new) = renderer {
            new.init(&mut ctx.io)?;
            self.renderer = Some(new);
        }
        Ok(())
    }

    /// Full restart with replacement backends.
    pub fn reload(
        &mut self,
        platform: Option<Box<dyn PlatformBackend>>,
        renderer: Option<Box<dyn RendererBackend>>,
    ) -> Result<(), InitError> {
        self.shutdown();
        self.initialize(platform, renderer)
    }

    /// Build the default font atlas and hand its pixels to the host texture
    /// factory. Absence or failure is not fatal; the bridge just runs
    /// without a font texture.
    fn bootstrap_font_atlas(&mut self, ctx: &mut Context) {
        let Some(factory) = self.texture_factory.as_mut() else {
            return;
        };
        let Some(atlas) = self.driver.build_font_atlas() else {
            debug!("gui library has no font atlas to build");
            return;
        };
        match factory.create_font_texture(&atlas) {
            Ok(handle) => {
                let id = ctx.with_textures(|t| {
                    t.set_font_atlas(handle);
                    t.register(handle)
                });
                self.driver.set_font_texture(id);
                ctx.io.font_texture_id = id;
                debug!(%id, %handle, "font atlas texture registered");
            }
            Err(err) => {
                warn!(error = %err, "font atlas texture creation failed; continuing without");
            }
        }
    }
}

impl BridgeConfig {
    fn apply_to(&self, io: &mut Io) {
        if self.mouse_draw_cursor {
            io.config_flags |= ConfigFlags::NO_MOUSE_CURSOR_CHANGE;
        }
        if self.keyboard_navigation {
            io.config_flags |= ConfigFlags::NAV_ENABLE_KEYBOARD;
        }
        if self.gamepad_navigation {
            io.config_flags |= ConfigFlags::NAV_ENABLE_GAMEPAD;
        }
    }
}

impl Drop for GuiBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs the GUI library's finalization step on every exit path out of the
/// layout phase, so a failing callback cannot leave a frame half-recorded.
struct FinalizeGuard<'a> {
    driver: &'a dyn GuiDriver,
    armed: bool,
}

impl<'a> FinalizeGuard<'a> {
    fn new(driver: &'a dyn GuiDriver) -> Self {
        Self {
            driver,
            armed: true,
        }
    }

    /// Normal exit: finalize and hand back the frame's draw data.
    fn finish(mut self) -> glaze_core::DrawData {
        self.armed = false;
        self.driver.render()
    }
}

impl Drop for FinalizeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            // Unwind path: finalize for frame consistency; the draw data of
            // the aborted tick is discarded.
            let _ = self.driver.render();
        }
    }
}
