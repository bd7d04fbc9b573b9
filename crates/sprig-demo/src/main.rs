use anyhow::Result;

use sprig_engine::assets::{PendingTexture, TextureLoader};
use sprig_engine::color::{self, Color};
use sprig_engine::coords::{Rect, Vec2, Viewport};
use sprig_engine::core::{App, AppControl, FrameCtx};
use sprig_engine::device::{Gpu, GpuInit};
use sprig_engine::gfx::{Texture2D, TextureFormat, TextureRef};
use sprig_engine::input::Key;
use sprig_engine::logging::{init_logging, LoggingConfig};
use sprig_engine::render::{origin, BatchConfig, Quad, SpriteBatcher};
use sprig_engine::window::{Runtime, RuntimeConfig};

const LOGICAL: Viewport = Viewport::new(1280.0, 720.0);
const GRID: u32 = 48;

/// Bouncing tinted quads over a grid, plus whatever images are passed on the
/// command line.
struct Demo {
    loader: TextureLoader,
    requested: Vec<PendingTexture>,

    batcher: Option<SpriteBatcher>,
    // Kept alive for as long as the batcher samples them.
    textures: Vec<Texture2D>,
    sprites: Vec<TextureRef>,
    checker: TextureRef,
}

impl Demo {
    fn new(images: Vec<String>) -> Self {
        let mut loader = TextureLoader::new();
        let requested = images.iter().map(|p| loader.request(p, false)).collect();
        Self {
            loader,
            requested,
            batcher: None,
            textures: Vec::new(),
            sprites: Vec::new(),
            checker: TextureRef::NONE,
        }
    }
}

/// 2x2 checkerboard, sampled with repeat addressing.
fn checker_texture(gpu: &Gpu<'_>) -> Texture2D {
    let light = [0xEE, 0xEE, 0xEE, 0xFF];
    let dark = [0x44, 0x44, 0x44, 0xFF];
    let pixels = [light, dark, dark, light].concat();
    Texture2D::from_data(
        gpu.device(),
        gpu.queue(),
        "checker",
        2,
        2,
        TextureFormat::RGBA8,
        &pixels,
    )
}

impl App for Demo {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let config = BatchConfig {
            logical_size: LOGICAL,
            ..BatchConfig::default()
        };
        let mut batcher = SpriteBatcher::new(gpu.device(), gpu.queue(), config)?;

        let report = self.loader.load_pending(gpu.device(), gpu.queue());
        log::info!("loaded {}/{} images", report.loaded, report.requested);

        let checker = checker_texture(gpu);
        self.checker = batcher.register_texture(&checker);
        self.textures.push(checker);

        for pending in self.requested.drain(..) {
            // Failed loads stay empty; skip them.
            let Ok(texture) = std::rc::Rc::try_unwrap(pending) else { continue };
            if let Some(texture) = texture.into_inner() {
                self.sprites.push(batcher.register_texture(&texture));
                self.textures.push(texture);
            }
        }

        self.batcher = Some(batcher);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            ctx.close();
            return AppControl::Continue;
        }

        let Some(batcher) = self.batcher.as_mut() else {
            return AppControl::Continue;
        };

        let t = ctx.time.elapsed as f32;
        let pointer = ctx.input.pointer_position();
        let window = ctx.window.logical_size();
        let checker = self.checker;
        let sprites = &self.sprites;

        ctx.render(color::CORNFLOWER_BLUE, |_rctx, target| {
            batcher.begin(target);

            // Background grid, one cell per GRID logical px.
            let cols = (LOGICAL.width as u32).div_ceil(GRID);
            let rows = (LOGICAL.height as u32).div_ceil(GRID);
            let cell = Vec2::new(GRID as f32, GRID as f32);
            for y in 0..rows {
                for x in 0..cols {
                    let pos = Vec2::new((x * GRID) as f32, (y * GRID) as f32);
                    let shade = 0.85 + 0.15 * ((x + y) % 2) as f32;
                    let quad = Quad::textured(pos, cell - Vec2::splat(2.0), checker, Rect::unit())
                        .with_color(Color::new(shade, shade, shade, 0.25));
                    batcher.append_quad(&quad, origin::TOP_LEFT);
                }
            }

            // Orbiting tinted squares.
            let center = Vec2::new(LOGICAL.width * 0.5, LOGICAL.height * 0.5);
            for i in 0..64 {
                let phase = t + i as f32 * 0.35;
                let radius = 120.0 + 8.0 * i as f32;
                let pos = center + Vec2::new(phase.cos() * radius, (phase * 1.3).sin() * radius * 0.5);
                let tint = Color::new(
                    0.5 + 0.5 * phase.sin(),
                    0.5 + 0.5 * (phase * 0.7).cos(),
                    0.8,
                    0.9,
                );
                batcher.append_rect(pos, Vec2::splat(24.0), tint, origin::CENTER);
            }

            // Loaded images in a row along the bottom, each followed by one
            // quarter of itself cycling as if it were a 2x2 sprite sheet.
            let cell = (t * 2.0) as u32 % 4;
            for (i, &sprite) in sprites.iter().enumerate() {
                let pos = Vec2::new(16.0 + i as f32 * 272.0, LOGICAL.height - 16.0);
                let whole = Quad::textured(pos, Vec2::splat(128.0), sprite, Rect::unit());
                batcher.append_quad(&whole, origin::BOTTOM_LEFT);

                if let Some(uv) = Rect::unit().grid_cell(2, 2, cell) {
                    let frame = Quad::textured(pos + Vec2::new(136.0, 0.0), Vec2::splat(128.0), sprite, uv);
                    batcher.append_quad(&frame, origin::BOTTOM_LEFT);
                }
            }

            // Pointer marker, mapped from window space into the batch space.
            if let Some(p) = pointer.filter(|_| window.is_valid()) {
                let p = Vec2::new(
                    p.x * LOGICAL.width / window.width,
                    p.y * LOGICAL.height / window.height,
                );
                batcher.append_rect(p, Vec2::splat(10.0), color::GOLD, origin::CENTER);
            }

            batcher.end();
        })
    }

    fn on_exit(&mut self) {
        if let Some(batcher) = &self.batcher {
            log::info!("batcher flushed {} times", batcher.flush_count());
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let images: Vec<String> = std::env::args().skip(1).collect();
    let config = RuntimeConfig {
        title: "sprig demo".to_string(),
        initial_size: winit::dpi::LogicalSize::new(LOGICAL.width as f64, LOGICAL.height as f64),
        vsync: true,
    };
    let gpu_init = GpuInit::for_batching(BatchConfig::default().texture_slots);

    Runtime::run(config, gpu_init, Demo::new(images))
}
