//! Procedural textures and system font lookup.

use std::path::Path;

/// Rounded panel: `radius` px corners, `border` px light rim, dark fill.
/// Premultiplied RGBA8.
pub fn panel_pixels(size: u32, radius: f32, border: f32) -> Vec<u8> {
    let fill = [0.16, 0.18, 0.22];
    let rim = [0.55, 0.60, 0.70];
    let s = size as f32;
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
            let dx = (radius - cx).max(cx - (s - radius)).max(0.0);
            let dy = (radius - cy).max(cy - (s - radius)).max(0.0);
            let corner = (dx * dx + dy * dy).sqrt();
            let coverage = (radius + 0.5 - corner).clamp(0.0, 1.0);
            let edge = cx.min(cy).min(s - cx).min(s - cy);
            let on_rim = edge < border || corner > radius - border;
            let rgb = if on_rim { rim } else { fill };
            push_premul(&mut out, rgb, coverage);
        }
    }
    out
}

/// Soft round dot, white, alpha falling off to the rim. Premultiplied RGBA8.
pub fn dot_pixels(size: u32) -> Vec<u8> {
    let r = size as f32 * 0.5;
    let mut out = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x as f32 + 0.5 - r, y as f32 + 0.5 - r);
            let a = (1.0 - (dx * dx + dy * dy).sqrt() / r).clamp(0.0, 1.0);
            push_premul(&mut out, [1.0, 1.0, 1.0], a * a);
        }
    }
    out
}

fn push_premul(out: &mut Vec<u8>, rgb: [f32; 3], alpha: f32) {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    out.extend_from_slice(&[byte(rgb[0] * alpha), byte(rgb[1] * alpha), byte(rgb[2] * alpha), byte(alpha)]);
}

const FONT_PATHS: [&str; 5] = [
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

/// First readable system font as `(file stem, bytes)`.
pub fn load_system_font() -> Option<(String, Vec<u8>)> {
    FONT_PATHS.iter().find_map(|p| {
        let bytes = std::fs::read(p).ok()?;
        let name = Path::new(p).file_stem()?.to_string_lossy().into_owned();
        Some((name, bytes))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(px: &[u8], size: u32, x: u32, y: u32) -> u8 {
        px[((y * size + x) * 4 + 3) as usize]
    }

    #[test]
    fn panel_corners_are_transparent_and_center_opaque() {
        let px = panel_pixels(32, 8.0, 2.0);
        assert_eq!(px.len(), 32 * 32 * 4);
        assert_eq!(alpha(&px, 32, 0, 0), 0);
        assert_eq!(alpha(&px, 32, 16, 16), 255);
        // edges between the corners stay solid
        assert_eq!(alpha(&px, 32, 16, 0), 255);
    }

    #[test]
    fn dot_fades_out() {
        let px = dot_pixels(16);
        assert!(alpha(&px, 16, 8, 8) > 200);
        assert_eq!(alpha(&px, 16, 0, 0), 0);
    }
}
