//! Glaze demo: drives the bridge headless for a few frames.
//!
//! Wires the stub driver and backends together, optionally loading a
//! `BridgeConfig` from a JSON file given as the first argument.

use std::rc::Rc;

use anyhow::{Context as _, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use glaze_bridge::{
    context, BridgeConfig, GuiBridge, HeadlessPlatform, NullDriver, NullRenderer, TextureFactory,
};
use glaze_core::{FontAtlasData, TextureHandle};

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Hands out fake host texture handles; stands in for a real graphics API.
struct CountingTextureFactory {
    next: u64,
}

impl TextureFactory for CountingTextureFactory {
    fn create_font_texture(&mut self, atlas: &FontAtlasData) -> Result<TextureHandle> {
        self.next += 1;
        info!(
            width = atlas.width,
            height = atlas.height,
            "font atlas texture created"
        );
        Ok(TextureHandle(self.next))
    }
}

fn load_config() -> Result<BridgeConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing config {path}"))
        }
        None => Ok(BridgeConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .compact()
        .init();

    let config = load_config()?;
    info!(?config, "glaze demo starting");

    context::on_global_layout(|| {
        info!("global layout tier");
        Ok(())
    });

    let driver = Rc::new(NullDriver::new());
    let mut bridge = GuiBridge::new(driver, config)
        .with_texture_factory(Box::new(CountingTextureFactory { next: 0 }));
    bridge.on_layout(|| {
        info!("instance layout tier");
        Ok(())
    });

    bridge.initialize(
        Some(Box::new(HeadlessPlatform::new(1280.0, 720.0))),
        Some(Box::new(NullRenderer::new())),
    )?;

    for frame in 0..3u32 {
        info!(frame, "tick");
        bridge.update();
    }

    bridge.shutdown();
    info!("glaze demo finished");
    Ok(())
}
