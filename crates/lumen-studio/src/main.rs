use anyhow::{Context, Result};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use lumen_engine::coords::{Rect, Vec2, Viewport};
use lumen_engine::core::{App, AppControl, FrameCtx, FrameStatus};
use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::paint::Color;
use lumen_engine::render::{BufferKind, FrameOutcome, UiPipeline, WgpuBackend, WgpuRenderer};
use lumen_engine::text::{FontAtlas, PRINTABLE_ASCII};
use lumen_engine::ui::UiContext;
use lumen_engine::window::{Runtime, RuntimeConfig};
use lumen_engine::{UiConfig, UiError};

const BACKGROUND: u32 = 0x16181dff;
const PANEL: u32 = 0x22262eff;
const HEADER: u32 = 0x2d3340ff;
const ACCENT: u32 = 0x4f8cffff;
const TEXT: u32 = 0xe6e8edff;
const MUTED: u32 = 0x8a91a0ff;

const MESSAGE: &str = "The quick brown fox jumps over the lazy dog. ";
/// Frames per typed character in the demo text field.
const TYPE_EVERY: u64 = 6;

struct Studio {
    fonts: FontAtlas,
    ui: UiContext,
    renderer: WgpuRenderer,
    pipeline: Option<UiPipeline>,
    typed: usize,
    last_outcome: Option<FrameOutcome>,
}

impl Studio {
    fn new(fonts: FontAtlas, config: &UiConfig) -> Self {
        let ui = UiContext::new(fonts.atlas());
        Self {
            fonts,
            ui,
            renderer: WgpuRenderer::new(config),
            pipeline: None,
            typed: 0,
            last_outcome: None,
        }
    }

    fn ensure_pipeline(&mut self, ctx: &FrameCtx<'_, '_>) -> Result<(), UiError> {
        let format = ctx.gpu.surface_format();
        if self.pipeline.as_ref().is_some_and(|p| p.format() == format) {
            return Ok(());
        }
        let pipeline = UiPipeline::new(ctx.gpu.device(), ctx.gpu.queue(), format, self.fonts.atlas())?;
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn declare(&mut self, viewport: Viewport, frame_index: u64) -> Result<(), UiError> {
        let (ui, fonts) = (&mut self.ui, &self.fonts);
        let (w, h) = (viewport.width, viewport.height);
        let line = fonts.line_height();

        ui.begin()?;

        // header bar
        ui.rect(Rect::new(0.0, 0.0, w, line + 16.0), Color::from_hex(HEADER))?;
        ui.text(fonts, Vec2::new(12.0, 8.0), "Lumen Studio", Color::from_hex(TEXT))?;

        // side panel
        let side = Rect::new(12.0, line + 28.0, 220.0, (h - line - 40.0).max(0.0));
        ui.rect(side, Color::from_hex(PANEL))?;
        ui.frame(side, 1.0, Color::from_hex(HEADER))?;
        let stats = match self.last_outcome {
            Some(FrameOutcome::Drawn(s)) => format!("{} triangles", s.triangle_count()),
            Some(FrameOutcome::Empty) => "empty frame".to_string(),
            Some(FrameOutcome::Skipped) | None => "-".to_string(),
        };
        let rows = [
            format!("frame {frame_index}"),
            stats,
            format!("{} glyphs", fonts.atlas().glyph_count()),
            format!("vbo {} B", self.renderer.buffers().capacity(BufferKind::Vertex)),
        ];
        for (i, row) in rows.iter().enumerate() {
            let origin = Vec2::new(side.origin.x + 10.0, side.origin.y + 10.0 + i as f32 * line);
            ui.text(fonts, origin, row, Color::from_hex(MUTED))?;
        }

        // text field that keeps growing, one character at a time
        let field = Rect::new(side.max().x + 12.0, line + 28.0, (w - side.max().x - 24.0).max(0.0), line + 12.0);
        ui.rect(field, Color::from_hex(PANEL))?;
        ui.frame(field, 1.0, Color::from_hex(ACCENT))?;
        let shown: String = MESSAGE.chars().cycle().take(self.typed).collect();
        let size = ui.text(fonts, Vec2::new(field.origin.x + 8.0, field.origin.y + 6.0), &shown, Color::from_hex(TEXT))?;
        let caret_x = (field.origin.x + 8.0 + size.x).min(field.max().x - 4.0);
        if (frame_index / 30) % 2 == 0 {
            ui.rect(Rect::new(caret_x, field.origin.y + 6.0, 2.0, line), Color::from_hex(ACCENT))?;
        }

        // translucent overlay swatches to exercise premultiplied blending
        for i in 0..4 {
            let x = field.origin.x + i as f32 * 40.0;
            let alpha = 0.25 * (i + 1) as f32;
            ui.rect(
                Rect::new(x, field.max().y + 16.0, 56.0, 56.0),
                Color::from_hex(ACCENT).faded(alpha),
            )?;
        }

        ui.end()?;
        Ok(())
    }
}

impl App for Studio {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed && event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(err) = self.ensure_pipeline(ctx) {
            log::error!("failed to create the UI pipeline: {err}");
            return AppControl::Exit;
        }

        let viewport = ctx.viewport();
        if let Err(err) = self.declare(viewport, ctx.frame_index) {
            log::error!("ui declaration failed: {err}");
            self.ui.skip_frame();
            return AppControl::Continue;
        }

        let Self { ui, renderer, pipeline, last_outcome, .. } = self;
        let Some(pipeline) = pipeline.as_ref() else {
            return AppControl::Exit;
        };

        let status = ctx.render(Color::from_hex(BACKGROUND), |rctx, target| {
            let mut backend = WgpuBackend::new(rctx, target, pipeline);
            *last_outcome = Some(ui.render(renderer, &mut backend, rctx.viewport)?);
            Ok(())
        });

        match status {
            Ok(FrameStatus::Presented) => {
                if let Some(FrameOutcome::Drawn(stats)) = last_outcome {
                    if stats.vertex_growth.reallocated() || stats.index_growth.reallocated() {
                        log::debug!(
                            "frame {}: buffers grew (vertex {:?}, index {:?})",
                            ctx.frame_index,
                            stats.vertex_growth,
                            stats.index_growth
                        );
                    }
                }
            }
            Ok(FrameStatus::Skipped | FrameStatus::Dropped) => ui.skip_frame(),
            Err(UiError::Submission(err)) => {
                log::error!("giving up on rendering: {err}");
                return AppControl::Exit;
            }
            Err(err) => log::warn!("frame dropped: {err}"),
        }

        if ctx.frame_index % TYPE_EVERY == 0 {
            self.typed = (self.typed + 1) % (MESSAGE.len() * 3);
        }
        AppControl::Continue
    }
}

fn load_font() -> Result<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .context("no usable system font found (tried DejaVu Sans and Noto Sans)")
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = UiConfig::from_env().context("invalid LUMEN_* configuration")?;
    let font = load_font()?;
    let fonts = FontAtlas::bake(&font, PRINTABLE_ASCII, &config).context("failed to bake the glyph atlas")?;

    let studio = Studio::new(fonts, &config);
    Runtime::run(RuntimeConfig::from_ui_config("Lumen Studio", &config), GpuInit::default(), studio)
}
