//! Headless smoke run of the engine.
//!
//! Builds a small window of buttons, icons and labels, replays a scripted
//! pointer session against it, lowers every frame through the batcher into an
//! offscreen wgpu target (or memory, without a GPU) and logs draw statistics.

mod assets;
mod output;
mod widgets;

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};

use tessel_engine::batch::{NativeBatch2D, RecordingBackend};
use tessel_engine::config::{EngineConfig, RenderOptions};
use tessel_engine::coords::{PxExtent2D, PxRectangle, PxThicknessU, Rect, Vec2};
use tessel_engine::device::Gpu;
use tessel_engine::input::{
    ButtonState, InputCommandKind, InputPlayback, InputRecorder, MouseButton, PointerState, WheelDelta,
};
use tessel_engine::logging::{init_logging, LoggingConfig};
use tessel_engine::paint::Color;
use tessel_engine::particles::{BoxEmitter, ParticleSystemTwoArrays};
use tessel_engine::render::{OffscreenTarget, WgpuBatchBackend};
use tessel_engine::scene::{DrawCommandBuffer, Drawable, UiRenderSystem, ZIndex};
use tessel_engine::sprite::{
    BlendState, NativeTextureInfo, NineSliceSpriteInfo, NineSliceTransparency, OptimizedNineSliceSpriteInfo,
    SpriteMaterialId, SpriteMaterialInfo,
};
use tessel_engine::text::{bake_font, SpriteFont, TextLayoutOptions};
use tessel_engine::time::FrameClock;
use tessel_engine::EngineContext;

use output::{MemoryOutput, StudioOutput};
use widgets::{Button, Icon, Label, Panel, Window};

const FRAMES: u64 = 90;
const TARGET_EXTENT: PxExtent2D = PxExtent2D::new(800, 480);
const FRAME_STEP: Duration = Duration::from_micros(16_667);

const BACKGROUND: Color = Color::from_premul(0.05, 0.06, 0.08, 1.0);
const SPARK: Color = Color::from_premul(0.9, 0.5, 0.2, 0.0);
const HIGHLIGHT: Color = Color::from_premul(0.2, 0.8, 1.0, 1.0);
const DOT_SIZE: Vec2 = Vec2::new(8.0, 8.0);

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig {
        render: RenderOptions { draw_reorder: true },
        ..Default::default()
    };
    let mut ctx = EngineContext::new(config).context("failed to create engine context")?;

    match Gpu::new_blocking(ctx.config().gpu.clone()) {
        Ok(gpu) => {
            let target = OffscreenTarget::new(gpu.device(), TARGET_EXTENT)?;
            let mut backend = WgpuBatchBackend::new(&gpu);
            backend.bind_target(&target);
            run(&mut ctx, backend)
        }
        Err(err) => {
            log::warn!("no GPU available ({err:#}); rendering into memory");
            run(&mut ctx, MemoryOutput::default())
        }
    }
}

struct Assets {
    white: NativeTextureInfo,
    dot: NativeTextureInfo,
    panel: SpriteMaterialInfo,
    panel_opaque: SpriteMaterialInfo,
    dot_material: SpriteMaterialInfo,
    font: Option<Rc<SpriteFont>>,
}

fn load_assets<O: StudioOutput>(ctx: &EngineContext, out: &mut O) -> Result<Assets> {
    let white = out.upload("white", PxExtent2D::new(1, 1), &[255; 4])?;
    let panel_tex = out.upload("panel", PxExtent2D::new(32, 32), &assets::panel_pixels(32, 8.0, 2.0))?;
    let dot = out.upload("dot", PxExtent2D::new(16, 16), &assets::dot_pixels(16))?;

    let panel = ctx.create_material(SpriteMaterialId(1), panel_tex, BlendState::AlphaBlend)?;
    let panel_opaque = ctx.create_material(SpriteMaterialId(2), panel_tex, BlendState::Opaque)?;
    let dot_material = ctx.create_material(SpriteMaterialId(3), dot, BlendState::AlphaBlend)?;

    let font = match assets::load_system_font() {
        Some((name, bytes)) => match bake_font(&name, &bytes, 16, (32u8..127).map(char::from), 256) {
            Ok(baked) => {
                let tex = out.upload("font", baked.extent, &baked.pixels)?;
                let material = ctx.create_material(SpriteMaterialId(4), tex, BlendState::AlphaBlend)?;
                Some(Rc::new(SpriteFont::new(material, baked.font, TextLayoutOptions::default())?))
            }
            Err(err) => {
                log::warn!("font '{name}' could not be baked: {err}");
                None
            }
        },
        None => {
            log::warn!("no system font found; labels are skipped");
            None
        }
    };

    Ok(Assets { white, dot, panel, panel_opaque, dot_material, font })
}

fn label(ctx: &mut EngineContext, assets: &Assets, text: &str, position: Vec2, z: ZIndex) -> Result<Option<Label>> {
    let Some(font) = &assets.font else { return Ok(None) };
    let mesh = ctx.meshes_mut().create_text_mesh(Rc::clone(font), text)?;
    Ok(Some(Label { mesh, position, color: Color::WHITE, z }))
}

fn build_window(ctx: &mut EngineContext, assets: &Assets) -> Result<Window> {
    let frame_sprite = NineSliceSpriteInfo::new(
        assets.panel,
        PxThicknessU::default(),
        PxRectangle::create(0, 0, 32, 32),
        PxThicknessU::uniform(10),
        PxThicknessU::uniform(12),
        160,
        ctx.density(),
    )?;
    // only the rounded corners need blending
    let corners = NineSliceTransparency(0b1_0100_0101);
    let window_sprite = OptimizedNineSliceSpriteInfo::new(frame_sprite.clone(), assets.panel_opaque, corners)?;
    let icon_sprite = ctx.image_sprite(assets.dot_material, 320)?;

    let bounds = Rect::new(40.0, 40.0, 480.0, 360.0);
    let frame = Panel {
        mesh: ctx.meshes_mut().create_mesh(window_sprite),
        rect: bounds,
        color: Color::WHITE,
        z: ZIndex::default(),
    };
    let title = label(ctx, assets, "tessel studio", Vec2::new(60.0, 52.0), ZIndex::default())?;

    let mut buttons = Vec::new();
    for i in 0..4 {
        let rect = Rect::new(64.0, 96.0 + i as f32 * 64.0, 160.0, 48.0);
        let mesh = ctx.meshes_mut().create_mesh(frame_sprite.clone());
        let text = format!("Button {}", i + 1);
        buttons.push(Button {
            frame: Panel { mesh, rect, color: Color::WHITE, z: ZIndex::default() },
            label: label(ctx, assets, &text, Vec2::new(rect.left + 16.0, rect.top + 14.0), ZIndex::default())?,
            hovered: false,
            clicks: 0,
        });
    }

    let mut icons = Vec::new();
    for i in 0..6 {
        let (col, row) = (i / 4, i % 4);
        icons.push(Icon {
            mesh: ctx.meshes_mut().create_mesh(icon_sprite.clone()),
            rect: Rect::new(240.0 + col as f32 * 48.0, 104.0 + row as f32 * 64.0, 32.0, 32.0),
            color: Color::from_premul(0.3, 0.7, 0.4, 1.0),
        });
    }

    let status = label(ctx, assets, "clicks: 0", Vec2::new(64.0, 360.0), ZIndex::default().above())?;

    Ok(Window {
        frame,
        title,
        content: Rect::new(52.0, 80.0, 456.0, 308.0),
        icons,
        buttons,
        status,
    })
}

/// Pointer session: hover and click the first two buttons, scroll, leave.
fn input_script() -> Result<InputPlayback> {
    let first = Vec2::new(144.0, 120.0);
    let second = Vec2::new(144.0, 184.0);
    let script = [
        (5, InputCommandKind::PointerMoved { position: first }),
        (10, press(first)),
        (12, release(first)),
        (30, InputCommandKind::PointerMoved { position: second }),
        (35, press(second)),
        (36, release(second)),
        (50, InputCommandKind::Wheel { delta: WheelDelta::Line(Vec2::new(0.0, -1.0)), position: second }),
        (60, InputCommandKind::PointerLeft),
    ];
    let mut recorder = InputRecorder::new();
    for (frame, kind) in script {
        recorder.record(frame, FRAME_STEP * frame as u32, kind)?;
    }
    Ok(recorder.finish())
}

fn press(position: Vec2) -> InputCommandKind {
    InputCommandKind::PointerButton { button: MouseButton::Left, state: ButtonState::Pressed, position }
}

fn release(position: Vec2) -> InputCommandKind {
    InputCommandKind::PointerButton { button: MouseButton::Left, state: ButtonState::Released, position }
}

#[derive(Debug, Default)]
struct Totals {
    frames: u64,
    quads: u64,
    segments: u64,
    draw_calls: u64,
    skipped_stale: u64,
    max_particles: usize,
}

fn run<O: StudioOutput>(ctx: &mut EngineContext, mut output: O) -> Result<()> {
    log::info!("studio output: {}", output.name());
    let assets = load_assets(ctx, &mut output)?;
    let mut window = build_window(ctx, &assets)?;
    let playback = input_script()?;

    let mut batch = ctx.create_batch(output);
    let mut system = ctx.create_ui_render_system();
    let mut buffer = DrawCommandBuffer::new();
    let mut pointer = PointerState::new();
    let mut clock = FrameClock::fixed(FRAME_STEP);

    let mut particles = ParticleSystemTwoArrays::new(512).with_gravity(Vec2::new(0.0, 40.0));
    let mut emitter = BoxEmitter::new(Rect::new(560.0, 380.0, 160.0, 20.0), 120.0, 0x5EED);
    emitter.velocity_min = Vec2::new(-15.0, -90.0);
    emitter.velocity_max = Vec2::new(15.0, -40.0);
    let mut positions = Vec::new();
    let mut totals = Totals::default();

    for _ in 0..FRAMES {
        let ft = clock.tick();
        playback.apply_frame(ft.frame_index, &mut pointer);

        let mut clicked = false;
        for button in &mut window.buttons {
            clicked |= button.update(&pointer);
        }
        if let (true, Some(status)) = (clicked, &window.status) {
            let total: u32 = window.buttons.iter().map(|b| b.clicks).sum();
            ctx.meshes_mut().set_mesh_text(status.mesh, &format!("clicks: {total}"))?;
            log::info!("frame {}: click, {total} so far", ft.frame_index);
        }

        emitter.emit(ft.dt, &mut particles);
        particles.update(ft.dt);
        particles.sprite_positions(DOT_SIZE, &mut positions);
        totals.max_particles = totals.max_particles.max(particles.len());

        buffer.clear();
        window.win_draw(&mut buffer);

        batch.backend_mut().begin_frame(BACKGROUND);
        batch.begin(BlendState::AlphaBlend)?;
        let ui = system.draw(&mut buffer, ctx.meshes(), &mut batch)?;
        batch.change_to(BlendState::Additive)?;
        for p in &positions {
            batch.draw_rect(&assets.dot, Rect::from_origin_size(*p, DOT_SIZE), SPARK)?;
        }
        batch.change_to(BlendState::AlphaBlend)?;
        if let Some(rect) = window.hovered_button() {
            batch.debug_draw_rectangle(&assets.white, rect, 1.0, HIGHLIGHT)?;
        }
        let stats = batch.end()?;
        batch.backend_mut().end_frame()?;

        totals.frames += 1;
        totals.quads += stats.quads as u64;
        totals.segments += stats.segments as u64;
        totals.draw_calls += batch.backend_mut().take_draw_calls() as u64;
        totals.skipped_stale += ui.skipped_stale as u64;
    }

    log::info!(
        "{} frames: {} quads, {} segments, {} draw calls, {} stale draws, peak {} particles",
        totals.frames,
        totals.quads,
        totals.segments,
        totals.draw_calls,
        totals.skipped_stale,
        totals.max_particles
    );
    report_reorder(ctx, &mut buffer)?;

    window.destroy(ctx.meshes_mut());
    Ok(())
}

/// Lowers the last frame's commands with and without reordering and logs the
/// segment counts.
fn report_reorder(ctx: &EngineContext, buffer: &mut DrawCommandBuffer) -> Result<()> {
    let mut counts = [0u32; 2];
    for (slot, draw_reorder) in counts.iter_mut().zip([false, true]) {
        let mut system = UiRenderSystem::new(RenderOptions { draw_reorder });
        let mut batch: NativeBatch2D<RecordingBackend> = ctx.create_batch(RecordingBackend::new());
        batch.begin_default()?;
        system.draw(buffer, ctx.meshes(), &mut batch)?;
        *slot = batch.end()?.segments;
    }
    log::info!("ui segments: {} in traversal order, {} reordered", counts[0], counts[1]);
    Ok(())
}
