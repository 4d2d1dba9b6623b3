//! End-to-end rendering through an offscreen capture.

use glam::{Vec2, Vec3};
use sdfplot_render::{
    Circle, Color, FrameCapture, GraphicsContext, ImageData, Line, PlotRenderer, PrimitiveRenderer,
    Rect, RendererConfig, ScreenRect,
};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const SCREEN: Vec2 = Vec2::new(WIDTH as f32, HEIGHT as f32);

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * WIDTH + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= 2)
}

fn render(draw: impl FnOnce(&mut PrimitiveRenderer)) -> Option<(Vec<u8>, PrimitiveRenderer)> {
    let context = GraphicsContext::new_owned_sync().ok()?;
    let capture = FrameCapture::new(&context, WIDTH, HEIGHT).ok()?;
    let mut renderer = PrimitiveRenderer::new(
        context.clone(),
        FrameCapture::FORMAT,
        WIDTH,
        HEIGHT,
        RendererConfig::default(),
    );

    renderer.clear(Color::WHITE);
    draw(&mut renderer);

    let mut encoder = context
        .device()
        .create_command_encoder(&sdfplot_render::wgpu::CommandEncoderDescriptor::default());
    renderer.render_to_view(&mut encoder, capture.view());
    let pixels = capture.copy_and_readback(&context, encoder).ok()?;
    Some((pixels, renderer))
}

#[test]
#[ignore] // Requires GPU
fn filled_rect_covers_its_interior() {
    let Some((pixels, renderer)) = render(|r| {
        r.draw_rects(&[Rect::new(100.0, 100.0, 50.0, 50.0, Color::BLUE)], SCREEN);
    }) else {
        println!("GPU not available");
        return;
    };

    assert_eq!(pixels.len(), (WIDTH * HEIGHT * 4) as usize);
    assert!(close(pixel(&pixels, 125, 125), [0, 0, 255, 255]));
    assert!(close(pixel(&pixels, 10, 10), [255, 255, 255, 255]));
    assert_eq!(renderer.stats().draw_calls, 1);
    assert_eq!(renderer.stats().face_instances, 1);
}

#[test]
#[ignore] // Requires GPU
fn lines_draw_over_faces() {
    let Some((pixels, _)) = render(|r| {
        let start = Vec3::new(50.0, 120.0, 0.0);
        let end = Vec3::new(270.0, 120.0, 0.0);
        r.draw_lines(&[Line::new(start, end, 6.0, Color::RED)], SCREEN);
        r.draw_rects(&[Rect::new(100.0, 100.0, 40.0, 40.0, Color::GREEN)], SCREEN);
    }) else {
        return;
    };

    // Submitted after the line, but faces are drawn first.
    assert!(close(pixel(&pixels, 120, 120), [255, 0, 0, 255]));
    assert!(close(pixel(&pixels, 120, 135), [0, 255, 0, 255]));
}

#[test]
#[ignore] // Requires GPU
fn instance_buffer_grows_for_large_batches() {
    let circles: Vec<Circle> = (0..3000)
        .map(|i| {
            let center = Vec3::new((i % 300) as f32, (i / 300) as f32 * 20.0, 0.0);
            Circle::new(center, 2.0, Color::BLACK)
        })
        .collect();
    let Some((_, renderer)) = render(|r| r.draw_circles(&circles, SCREEN)) else {
        return;
    };
    assert!(renderer.instance_capacity() >= 3000);
    assert_eq!(renderer.stats().face_instances, 3000);
}

#[test]
#[ignore] // Requires GPU
fn image_is_drawn_into_destination() {
    let Some((pixels, renderer)) = render(|r| {
        let image = ImageData::new(2, 2, vec![1.0; 4]);
        r.draw_image(&image, ScreenRect::new(0.0, 0.0, 40.0, 40.0));
    }) else {
        return;
    };

    assert_eq!(renderer.stats().images, 1);
    let top = Color::rgb(0.993, 0.906, 0.143).to_rgba_u8();
    assert!(close(pixel(&pixels, 20, 20), top));
    assert!(close(pixel(&pixels, 200, 200), [255, 255, 255, 255]));
}

#[test]
#[ignore] // Requires GPU
fn scissor_clips_the_frame() {
    let Some((pixels, _)) = render(|r| {
        r.set_scissor_rect(ScreenRect::new(0.0, 0.0, 100.0, HEIGHT as f32));
        r.draw_rects(&[Rect::new(0.0, 0.0, WIDTH as f32, HEIGHT as f32, Color::BLACK)], SCREEN);
    }) else {
        return;
    };

    assert!(close(pixel(&pixels, 50, 50), [0, 0, 0, 255]));
    assert!(close(pixel(&pixels, 200, 50), [255, 255, 255, 255]));
}
