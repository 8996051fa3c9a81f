// ABOUTME: Text rendering of a collage for the terminal.
// ABOUTME: Draws each visible cell as a box sized by the current track weights.

use collage_core::PhotoGallery;
use collage_layout::{Cell, GridPartition};

/// Character canvas, row-major
struct Canvas {
    width: usize,
    height: usize,
    chars: Vec<char>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            chars: vec![' '; width * height],
        }
    }

    fn put(&mut self, x: usize, y: usize, c: char) {
        if x < self.width && y < self.height {
            self.chars[y * self.width + x] = c;
        }
    }

    fn text(&mut self, x: usize, y: usize, max: usize, text: &str) {
        for (i, c) in text.chars().take(max).enumerate() {
            self.put(x + i, y, c);
        }
    }

    fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.chars
            .chunks(self.width)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
    }
}

fn label(cell: &Cell, gallery: &PhotoGallery) -> String {
    match cell.occupant() {
        Some(placement) => gallery
            .get(&placement.photo)
            .map(|p| p.original_filename.clone())
            .unwrap_or_else(|| format!("?{}", placement.photo)),
        None => format!("{},{}", cell.row(), cell.col()),
    }
}

/// Render the grid into `width` x `height` characters
pub fn render(grid: &GridPartition, gallery: &PhotoGallery, width: usize, height: usize) -> String {
    let width = width.max(4);
    let height = height.max(3);
    let mut canvas = Canvas::new(width, height);
    let last_x = (width - 1) as f64;
    let last_y = (height - 1) as f64;

    for cell in grid.visible_cells() {
        let rect = grid.tracks().cell_rect(cell.footprint());
        let x0 = (rect.x * last_x).round() as usize;
        let x1 = ((rect.x + rect.width) * last_x).round() as usize;
        let y0 = (rect.y * last_y).round() as usize;
        let y1 = ((rect.y + rect.height) * last_y).round() as usize;

        for x in x0..=x1 {
            canvas.put(x, y0, '-');
            canvas.put(x, y1, '-');
        }
        for y in y0..=y1 {
            canvas.put(x0, y, '|');
            canvas.put(x1, y, '|');
        }
        for (x, y) in [(x0, y0), (x1, y0), (x0, y1), (x1, y1)] {
            canvas.put(x, y, '+');
        }
        if y1 > y0 + 1 && x1 > x0 + 1 {
            canvas.text(x0 + 1, y0 + 1, x1 - x0 - 1, &label(cell, gallery));
        }
    }

    canvas.rows().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_layout::{Coord, Direction};

    #[test]
    fn renders_merged_cell_as_one_box() {
        let mut grid = GridPartition::new(2, 2);
        let anchor = grid
            .find_cell_containing(Coord::new(1, 1))
            .unwrap()
            .id()
            .clone();
        grid.spans().grow(&anchor, Direction::Right).unwrap();

        let text = render(&grid, &PhotoGallery::default(), 21, 7);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "+-------------------+");
        assert!(lines[1].starts_with("|1,1"));
        // Bottom row still has its divider in the middle
        assert_eq!(lines[6], "+---------+---------+");
    }

    #[test]
    fn gaps_stay_blank() {
        let mut grid = GridPartition::new(1, 2);
        let anchor = grid.cells()[0].id().clone();
        grid.spans().grow(&anchor, Direction::Right).unwrap();
        grid.spans().shrink(&anchor, Direction::Right).unwrap();

        let text = render(&grid, &PhotoGallery::default(), 21, 5);
        assert_eq!(text.lines().next(), Some("+---------+"));
        assert!(!text.contains("1,2"));
    }
}
