//! Platform and renderer capability contracts plus their stub
//! implementations.
//!
//! Concrete per-engine backends live outside this crate; anything that can
//! fill per-frame input state can be a platform, anything that can consume
//! a draw-data snapshot can be a renderer. The stubs here keep the bridge
//! runnable headless and give tests something deterministic to drive.

use anyhow::Result;
use glam::Vec2;
use tracing::{debug, trace};

use glaze_core::{DrawData, FontAtlasData, Io, Key, Rect, TextureHandle, DEFAULT_DELTA_TIME};

/// Input/display provider role: supplies display metrics and input state to
/// the GUI library every frame.
pub trait PlatformBackend {
    /// One-time activation. Sets a diagnostic backend name and capability
    /// flags on `io`. Failure aborts bridge initialization.
    fn init(&mut self, io: &mut Io) -> Result<()>;

    /// Teardown; must leave `io` clean for a replacement backend.
    fn shutdown(&mut self, io: &mut Io);

    /// Refresh `io` for the coming frame: display size and a positive delta
    /// time at minimum, plus pointer/keyboard state. `display` is the
    /// host-supplied viewport, which a windowless platform may ignore.
    fn prepare_frame(&mut self, io: &mut Io, display: Rect) -> Result<()>;
}

/// Draw-submission role: hands finalized frames to a graphics API.
pub trait RendererBackend {
    /// One-time activation. Failure aborts bridge initialization.
    fn init(&mut self, io: &mut Io) -> Result<()>;

    /// Teardown; must leave `io` clean for a replacement backend.
    fn shutdown(&mut self, io: &mut Io);

    /// Submit a finalized frame. `draw_data` is an immutable snapshot valid
    /// only for the duration of this call; texture ids inside it resolve
    /// through the current context's registry.
    fn render_draw_data(&mut self, draw_data: &DrawData) -> Result<()>;
}

/// Host collaborator that turns the font-atlas pixel buffer into a real
/// texture on whatever graphics API the host runs.
pub trait TextureFactory {
    fn create_font_texture(&mut self, atlas: &FontAtlasData) -> Result<TextureHandle>;
}

/// Platform stub for headless and test use: fixed display size, fallback
/// delta time, and deterministically zeroed input so no stale state leaks
/// into the frame.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    /// Display size reported when the host supplies no viewport
    pub display_size: Vec2,
}

impl HeadlessPlatform {
    pub const NAME: &'static str = "glaze-platform-headless";

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            display_size: Vec2::new(width, height),
        }
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

impl PlatformBackend for HeadlessPlatform {
    fn init(&mut self, io: &mut Io) -> Result<()> {
        io.backend_platform_name = Some(Self::NAME.to_string());
        // ASCII-ish scan codes so named keys stay resolvable without a
        // real input source.
        for (key, code) in [
            (Key::Tab, 9),
            (Key::LeftArrow, 276),
            (Key::RightArrow, 275),
            (Key::UpArrow, 273),
            (Key::DownArrow, 274),
            (Key::PageUp, 280),
            (Key::PageDown, 281),
            (Key::Home, 278),
            (Key::End, 279),
            (Key::Insert, 277),
            (Key::Delete, 127),
            (Key::Backspace, 8),
            (Key::Space, 32),
            (Key::Enter, 13),
            (Key::Escape, 27),
            (Key::A, 97),
            (Key::C, 99),
            (Key::V, 118),
            (Key::X, 120),
            (Key::Y, 121),
            (Key::Z, 122),
        ] {
            io.map_key(key, code);
        }
        debug!(name = Self::NAME, "platform backend initialized");
        Ok(())
    }

    fn shutdown(&mut self, io: &mut Io) {
        io.backend_platform_name = None;
        debug!(name = Self::NAME, "platform backend shut down");
    }

    fn prepare_frame(&mut self, io: &mut Io, display: Rect) -> Result<()> {
        io.display_size = if display.is_empty() {
            self.display_size
        } else {
            display.size()
        };
        io.delta_time = DEFAULT_DELTA_TIME;
        io.clear_input();
        Ok(())
    }
}

/// Renderer stub: accepts draw data and drops it, counting submissions so
/// tests and the demo can observe the frame flow.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames_submitted: u64,
}

impl NullRenderer {
    pub const NAME: &'static str = "glaze-renderer-null";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }
}

impl RendererBackend for NullRenderer {
    fn init(&mut self, io: &mut Io) -> Result<()> {
        io.backend_renderer_name = Some(Self::NAME.to_string());
        debug!(name = Self::NAME, "renderer backend initialized");
        Ok(())
    }

    fn shutdown(&mut self, io: &mut Io) {
        io.backend_renderer_name = None;
        debug!(name = Self::NAME, "renderer backend shut down");
    }

    fn render_draw_data(&mut self, draw_data: &DrawData) -> Result<()> {
        self.frames_submitted += 1;
        trace!(
            lists = draw_data.lists.len(),
            vertices = draw_data.total_vertex_count(),
            "draw data dropped"
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording backend doubles with injectable failures.

    use anyhow::{anyhow, Result};

    use glaze_core::{DrawData, FontAtlasData, Io, Rect, TextureHandle};

    use super::{PlatformBackend, RendererBackend, TextureFactory};
    use crate::driver::testing::{push, EventLog};

    #[derive(Default)]
    pub struct Failures {
        pub init: bool,
        pub per_frame: bool,
    }

    pub struct RecordingPlatform {
        pub log: EventLog,
        pub fail: Failures,
    }

    impl RecordingPlatform {
        pub fn new(log: EventLog) -> Self {
            Self {
                log,
                fail: Failures::default(),
            }
        }

        pub fn failing_init(log: EventLog) -> Self {
            Self {
                log,
                fail: Failures {
                    init: true,
                    ..Default::default()
                },
            }
        }
    }

    impl PlatformBackend for RecordingPlatform {
        fn init(&mut self, _io: &mut Io) -> Result<()> {
            push(&self.log, "platform.init");
            if self.fail.init {
                return Err(anyhow!("platform activation refused"));
            }
            Ok(())
        }

        fn shutdown(&mut self, _io: &mut Io) {
            push(&self.log, "platform.shutdown");
        }

        fn prepare_frame(&mut self, _io: &mut Io, _display: Rect) -> Result<()> {
            push(&self.log, "platform.prepare_frame");
            if self.fail.per_frame {
                return Err(anyhow!("no input source this tick"));
            }
            Ok(())
        }
    }

    pub struct RecordingRenderer {
        pub log: EventLog,
        pub fail: Failures,
    }

    impl RecordingRenderer {
        pub fn new(log: EventLog) -> Self {
            Self {
                log,
                fail: Failures::default(),
            }
        }

        pub fn failing_init(log: EventLog) -> Self {
            Self {
                log,
                fail: Failures {
                    init: true,
                    ..Default::default()
                },
            }
        }

        pub fn failing_per_frame(log: EventLog) -> Self {
            Self {
                log,
                fail: Failures {
                    per_frame: true,
                    ..Default::default()
                },
            }
        }
    }

    impl RendererBackend for RecordingRenderer {
        fn init(&mut self, _io: &mut Io) -> Result<()> {
            push(&self.log, "renderer.init");
            if self.fail.init {
                return Err(anyhow!("renderer activation refused"));
            }
            Ok(())
        }

        fn shutdown(&mut self, _io: &mut Io) {
            push(&self.log, "renderer.shutdown");
        }

        fn render_draw_data(&mut self, _draw_data: &DrawData) -> Result<()> {
            push(&self.log, "renderer.render_draw_data");
            if self.fail.per_frame {
                return Err(anyhow!("device lost"));
            }
            Ok(())
        }
    }

    /// Hands out sequential fake host texture handles.
    #[derive(Default)]
    pub struct CountingFactory {
        next: u64,
    }

    impl TextureFactory for CountingFactory {
        fn create_font_texture(&mut self, _atlas: &FontAtlasData) -> Result<TextureHandle> {
            self.next += 1;
            Ok(TextureHandle(self.next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glaze_core::Io;

    #[test]
    fn test_headless_platform_sets_display_and_delta() {
        let mut platform = HeadlessPlatform::new(800.0, 600.0);
        let mut io = Io::new();
        platform.init(&mut io).unwrap();
        assert_eq!(io.backend_platform_name.as_deref(), Some(HeadlessPlatform::NAME));

        platform
            .prepare_frame(&mut io, Rect::default())
            .unwrap();
        assert_eq!(io.display_size, Vec2::new(800.0, 600.0));
        assert!(io.delta_time > 0.0);
        assert_eq!(io.key_code(Key::Enter), Some(13));

        platform.shutdown(&mut io);
        assert!(io.backend_platform_name.is_none());
    }

    #[test]
    fn test_headless_platform_honors_host_viewport() {
        let mut platform = HeadlessPlatform::default();
        let mut io = Io::new();
        let viewport = Rect::from_size(Vec2::new(1280.0, 720.0));
        platform.prepare_frame(&mut io, viewport).unwrap();
        assert_eq!(io.display_size, Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn test_headless_platform_zeroes_stale_input() {
        let mut platform = HeadlessPlatform::default();
        let mut io = Io::new();
        io.mouse_down[1] = true;
        io.keys_down[13] = true;
        io.key_shift = true;
        platform.prepare_frame(&mut io, Rect::default()).unwrap();
        assert!(!io.mouse_down.iter().any(|&b| b));
        assert!(!io.keys_down.iter().any(|&b| b));
        assert!(!io.key_shift);
    }

    #[test]
    fn test_null_renderer_counts_submissions() {
        let mut renderer = NullRenderer::new();
        let mut io = Io::new();
        renderer.init(&mut io).unwrap();
        assert_eq!(io.backend_renderer_name.as_deref(), Some(NullRenderer::NAME));

        renderer.render_draw_data(&DrawData::default()).unwrap();
        renderer.render_draw_data(&DrawData::default()).unwrap();
        assert_eq!(renderer.frames_submitted(), 2);
    }
}
