//! Character-cell canvas for terminal line drawing
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use wire3d_core::LineSink;

/// Glyph ramp from dim to bright.
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Brightest grey the painter selects.
const MAX_GREY: usize = 192;

/// Lifted onto every grey so the farthest lines stay visible on a dark
/// background.
const SHADE_FLOOR: u8 = 63;

/// A grid of terminal cells that records which grey last touched each cell.
#[derive(Debug, Clone)]
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<Option<u8>>,
    grey: u8,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            grey: MAX_GREY as u8,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![None; width * height];
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Grey of the line covering `(x, y)`, if any.
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    fn plot(&mut self, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = Some(self.grey);
    }

    /// Clip a segment to the canvas (Liang-Barsky), so lines far off screen
    /// cost nothing to rasterize.
    fn clip(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<(i64, i64, i64, i64)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let xmax = (self.width - 1) as f64;
        let ymax = (self.height - 1) as f64;
        let (x1, y1) = (x1 as f64, y1 as f64);
        let (dx, dy) = (x2 as f64 - x1, y2 as f64 - y1);

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [(-dx, x1), (dx, xmax - x1), (-dy, y1), (dy, ymax - y1)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((
            (x1 + t0 * dx).round() as i64,
            (y1 + t0 * dy).round() as i64,
            (x1 + t1 * dx).round() as i64,
            (y1 + t1 * dy).round() as i64,
        ))
    }

    /// Queue the canvas onto `writer`, one terminal row per canvas row.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        if self.width == 0 {
            return Ok(());
        }
        let mut color = None;
        for (row, cells) in self.cells.chunks(self.width).enumerate() {
            writer.queue(cursor::MoveTo(0, row as u16))?;
            for cell in cells {
                match *cell {
                    Some(grey) => {
                        if color != Some(grey) {
                            writer.queue(SetForegroundColor(shade(grey)))?;
                            color = Some(grey);
                        }
                        writer.queue(Print(glyph(grey)))?;
                    }
                    None => {
                        writer.queue(Print(' '))?;
                    }
                }
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    /// Plain-text rendering, one line per row.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for x in 0..self.width {
                text.push(self.cell(x, row).map_or(' ', glyph));
            }
            text.push('\n');
        }
        text
    }
}

impl LineSink for CharCanvas {
    fn select_grey(&mut self, level: u8) {
        self.grey = level;
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let Some((mut x, mut y, x2, y2)) = self.clip(x1, y1, x2, y2) else {
            return;
        };

        // Bresenham, all octants
        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            self.plot(x, y);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * error;
            if e2 >= dy {
                error += dy;
                x += sx;
            }
            if e2 <= dx {
                error += dx;
                y += sy;
            }
        }
    }
}

/// Glyph for a grey level.
pub fn glyph(grey: u8) -> char {
    let index = grey as usize * (LUMINOSITY_RAMP.len() - 1) / MAX_GREY;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn shade(grey: u8) -> Color {
    let level = grey.saturating_add(SHADE_FLOOR);
    Color::Rgb {
        r: level,
        g: level,
        b: level,
    }
}
