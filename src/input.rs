//! Input plumbing shared by both modes: normalized events, click targets, and
//! pixel → cell conversion.

use ratzilla::ratatui::layout::Rect;

/// `Enter`, delivered as a key event.
pub const KEY_ENTER: char = '\n';
/// `Backspace`, delivered as a key event.
pub const KEY_BACKSPACE: char = '\u{8}';

/// Keyboard and pointer input after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, carrying the target's action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// In terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last frame, plus the grid size they were
/// laid out on.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Full-width target on `row`, ignored when the row is outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of labels laid out left to right.
    ///
    /// `labels` holds `(display_width, action_id)` per label. Each target
    /// covers its label plus half of each neighbouring separator; the first
    /// and last stretch to the edges of `total_width`.
    pub fn register_tab_targets(
        &mut self,
        labels: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = labels.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut starts = Vec::with_capacity(n);
        let mut cursor = 0u16;
        for (i, &(w, _)) in labels.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            starts.push(cursor);
            cursor += w;
        }
        let half_gap_after = |i: usize| {
            let end = starts[i] + labels[i].0;
            end + (starts[i + 1] - end) / 2
        };

        for (i, &(_, action_id)) in labels.iter().enumerate() {
            let left = if i == 0 { 0 } else { half_gap_after(i - 1) };
            let right = if i == n - 1 { total_width } else { half_gap_after(i) };
            let right = right.min(total_width);
            if right > left {
                self.add_click_target(Rect::new(x + left, y, right - left, height), action_id);
            }
        }
    }

    /// Action under a cell. Later targets win where they overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Row under `click_y` (pixels from the grid's top edge).
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

/// Column under `click_x` (pixels from the grid's left edge).
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
