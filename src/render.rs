// src/render.rs

//! Turns a solved layout into a 24-bit uncompressed TGA: links as thin gray lines,
//! nodes as filled circles sized by degree and colored along an HSL ramp over the
//! node index. Positions are rescaled to fill the image with a small margin.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nalgebra::Vector2;

use crate::objective::LinkInfo;

pub const DEFAULT_WIDTH: u16 = 1200;
pub const DEFAULT_HEIGHT: u16 = 800;

/// Render `positions` (one per node, pinned node included) and `links` to a TGA
/// file at `path`.
pub fn render_tga(
    positions: &[Vector2<f64>],
    links: &[LinkInfo],
    path: &Path,
    width: u16,
    height: u16,
) -> io::Result<()> {
    if width == 0 || height == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("image dimensions must be nonzero, got {}x{}", width, height),
        ));
    }

    let scaled = normalize(positions);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    let sx = |x: f32| -> i32 { (x * (width - 1) as f32).round() as i32 };
    let sy = |y: f32| -> i32 { (y * (height - 1) as f32).round() as i32 };

    // Edges first so nodes draw on top of them.
    for link in links {
        let (xi, yi) = scaled[link.from];
        let (xj, yj) = scaled[link.to];
        draw_line_bgr(
            &mut buffer,
            width,
            height,
            sx(xi),
            sy(yi),
            sx(xj),
            sy(yj),
            (90, 90, 90),
        );
    }

    let mut degree = vec![0usize; positions.len()];
    for link in links {
        degree[link.from] += 1;
        degree[link.to] += 1;
    }

    for (i, &(xf, yf)) in scaled.iter().enumerate() {
        let hue = (i as f32 * 47.0) % 360.0;
        let (r, g, b) = hsl_to_rgb(hue, 0.85, 0.55);
        let radius = (3 + degree[i] as i32).min(12);
        draw_filled_circle_bgr(&mut buffer, width, height, sx(xf), sy(yf), radius, (b, g, r));
    }

    write_uncompressed_tga(width, height, &buffer, path)?;
    eprintln!(
        "[render] Wrote {} nodes, {} links to {} ({}x{}).",
        positions.len(),
        links.len(),
        path.display(),
        width,
        height
    );
    Ok(())
}

/// Rescale positions into [0,1] x [0,1] with a 5% margin on every side.
fn normalize(positions: &[Vector2<f64>]) -> Vec<(f32, f32)> {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for p in positions {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    let range_x = (max_x - min_x).max(1e-9);
    let range_y = (max_y - min_y).max(1e-9);

    positions
        .iter()
        .map(|p| {
            let x = ((p.x - min_x) / range_x) as f32;
            let y = ((p.y - min_y) / range_y) as f32;
            (0.05 + x * 0.90, 0.05 + y * 0.90)
        })
        .collect()
}

/// Convert HSL to RGB. `h` in [0..360], `s`, `l` in [0..1].
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hh = h / 60.0;
    let x = c * (1.0 - (hh % 2.0 - 1.0).abs());

    let (mut r, mut g, mut b) = match hh as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    r += m;
    g += m;
    b += m;

    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Bresenham line into a BGR byte buffer.
fn draw_line_bgr(
    buffer: &mut [u8],
    width: u16,
    height: u16,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: (u8, u8, u8),
) {
    let (b, g, r) = color;
    let w = width as i32;
    let h = height as i32;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -((y1 - y0).abs());
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        if x >= 0 && x < w && y >= 0 && y < h {
            let idx = (y as usize * w as usize + x as usize) * 3;
            buffer[idx] = b;
            buffer[idx + 1] = g;
            buffer[idx + 2] = r;
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Naive filled circle: scan the bounding box, keep points within the radius.
fn draw_filled_circle_bgr(
    buffer: &mut [u8],
    width: u16,
    height: u16,
    cx: i32,
    cy: i32,
    radius: i32,
    color: (u8, u8, u8),
) {
    let (b, g, r) = color;
    let w = width as i32;
    let h = height as i32;
    let rr = radius * radius;

    for dy in -radius..=radius {
        let yy = cy + dy;
        if yy < 0 || yy >= h {
            continue;
        }
        for dx in -radius..=radius {
            let xx = cx + dx;
            if xx < 0 || xx >= w {
                continue;
            }
            if dx * dx + dy * dy <= rr {
                let idx = (yy as usize * w as usize + xx as usize) * 3;
                buffer[idx] = b;
                buffer[idx + 1] = g;
                buffer[idx + 2] = r;
            }
        }
    }
}

/// Write node positions as CSV with a `node,x,y` header row.
pub fn write_positions_csv(
    names: &[String],
    positions: &[Vector2<f64>],
    path: &Path,
) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(io::Error::other)?;
    writer
        .write_record(["node", "x", "y"])
        .map_err(io::Error::other)?;
    for (name, p) in names.iter().zip(positions.iter()) {
        writer
            .write_record([name.as_str(), &p.x.to_string(), &p.y.to_string()])
            .map_err(io::Error::other)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a 24-bit uncompressed TGA (BGR pixel order, 18-byte header).
pub fn write_uncompressed_tga(
    width: u16,
    height: u16,
    buffer: &[u8],
    path: &Path,
) -> io::Result<()> {
    let expected = width as usize * height as usize * 3;
    if buffer.len() != expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "buffer length {} != expected {} for a {}x{} TGA",
                buffer.len(),
                expected,
                width,
                height
            ),
        ));
    }

    let mut header = [0u8; 18];
    header[2] = 2; // uncompressed truecolor
    header[12] = (width & 0xFF) as u8;
    header[13] = ((width >> 8) & 0xFF) as u8;
    header[14] = (height & 0xFF) as u8;
    header[15] = ((height >> 8) & 0xFF) as u8;
    header[16] = 24; // bits per pixel

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&header)?;
    writer.write_all(buffer)?;
    writer.flush()?;

    Ok(())
}
