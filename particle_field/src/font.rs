//! Minimal 3×5 bitmap font and the message rasterizer behind the
//! rendered-text shape.
//!
//! Each character is 5 rows × 3 bits. The rasterizer upscales lit cells into
//! a sub-pixel grid, keeps every other sub-pixel, and maps the survivors to
//! centred world coordinates — the particle engine then cycles particle
//! indices through that list.

/// Sub-pixels per font cell.
const CELL_PX: usize = 4;
/// Keep every `SAMPLE_STEP`-th sub-pixel in each axis.
const SAMPLE_STEP: usize = 2;
/// Sub-pixels → world units.
const WORLD_SCALE: f32 = 12.0;
/// Vertical advance between lines, in font cells.
const LINE_ADVANCE: usize = 7;

pub fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Rasterize a message into centred world-space points.
///
/// A message containing `"! "` is split into two lines there (the first line
/// keeps its `!`), matching how the site's secret message reads best.
pub fn message_points(text: &str) -> Vec<(f32, f32)> {
    let lines: Vec<String> = match text.split_once("! ") {
        Some((first, rest)) => vec![format!("{first}!"), rest.to_string()],
        None => vec![text.to_string()],
    };

    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let grid_w = widest * 4 * CELL_PX;
    let grid_h = lines.len() * LINE_ADVANCE * CELL_PX;
    let half_w = grid_w as f32 / 2.0;
    let half_h = grid_h as f32 / 2.0;

    let mut points = Vec::new();
    for (line_idx, line) in lines.iter().enumerate() {
        let line_w = line.chars().count() * 4 * CELL_PX;
        let x0 = (grid_w - line_w) / 2;
        let y0 = line_idx * LINE_ADVANCE * CELL_PX;

        for (char_idx, c) in line.chars().enumerate() {
            let g = glyph(c);
            for (row, bits) in g.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 {
                        continue;
                    }
                    // Upscale the lit cell, keeping every other sub-pixel.
                    let cx = x0 + (char_idx * 4 + col) * CELL_PX;
                    let cy = y0 + row * CELL_PX;
                    for sy in (0..CELL_PX).step_by(SAMPLE_STEP) {
                        for sx in (0..CELL_PX).step_by(SAMPLE_STEP) {
                            let px = (cx + sx) as f32;
                            let py = (cy + sy) as f32;
                            points.push((
                                (px - half_w) / WORLD_SCALE,
                                -(py - half_h) / WORLD_SCALE,
                            ));
                        }
                    }
                }
            }
        }
    }
    points
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_fit_three_bits() {
        for c in "abcdefghijklmnopqrstuvwxyz0123456789!?'., ".chars() {
            for row in glyph(c) {
                assert!(row <= 0b111, "{c:?} row wider than 3 bits");
            }
        }
    }

    #[test]
    fn message_produces_centred_points() {
        let pts = message_points("Hi Kay! ini Abid");
        assert!(!pts.is_empty());

        let (mut sx, mut sy) = (0.0f32, 0.0f32);
        for (x, y) in &pts {
            sx += x;
            sy += y;
        }
        let n = pts.len() as f32;
        // Roughly centred around the origin
        assert!((sx / n).abs() < 1.0);
        assert!((sy / n).abs() < 1.0);
        // And wider than tall
        let max_x = pts.iter().map(|p| p.0.abs()).fold(0.0, f32::max);
        let max_y = pts.iter().map(|p| p.1.abs()).fold(0.0, f32::max);
        assert!(max_x > max_y);
    }

    #[test]
    fn split_on_bang_yields_two_lines() {
        let two = message_points("Hi Kay! ini Abid");
        let one = message_points("Hi Kay ini Abid");
        let span = |pts: &[(f32, f32)]| {
            let min = pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
            let max = pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
            max - min
        };
        assert!(span(&two) > span(&one), "two lines should span taller");
    }

    #[test]
    fn blank_text_yields_no_points() {
        assert!(message_points("   ").is_empty());
    }
}
