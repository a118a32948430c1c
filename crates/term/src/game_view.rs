//! GameView: maps a [`MatchSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{shape, MatchSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Text shown beside the board that the snapshot does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudInfo<'a> {
    pub player: &'a str,
    /// "PLAY" or "REPLAY"
    pub mode: &'a str,
    /// Alternates each frame while rows are flashing
    pub flash_on: bool,
}

impl Default for HudInfo<'_> {
    fn default() -> Self {
        Self {
            player: "",
            mode: "PLAY",
            flash_on: true,
        }
    }
}

/// A lightweight terminal renderer for a match.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares typical terminal glyphs.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Columns and rows taken by the bordered board
    pub fn frame_size(&self) -> (u16, u16) {
        (
            BOARD_WIDTH as u16 * self.cell_w + 2,
            BOARD_HEIGHT as u16 + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    pub fn render_into(
        &self,
        snap: &MatchSnapshot,
        hud: &HudInfo<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let (frame_w, frame_h) = self.frame_size();
        let panel_w = 18;
        let start_x = viewport.width.saturating_sub(frame_w + panel_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        let flash = CellStyle::plain(Rgb::new(250, 250, 250), PLAY_BG).bold();
        let empty = CellStyle::plain(Rgb::new(90, 90, 100), PLAY_BG).dim();
        for y in 0..BOARD_HEIGHT as i8 {
            // Pending rows blink until the loop compacts them.
            let dark = snap.pending_rows[y as usize] && !hud.flash_on;
            for x in 0..BOARD_WIDTH as i8 {
                let (ch, style) = match snap.cell_with_active(x, y) {
                    _ if dark => ('▒', flash),
                    Some(color) => ('█', block_style(color)),
                    None => ('·', empty),
                };
                let px = start_x + 1 + x as u16 * self.cell_w;
                fb.fill_rect(px, start_y + 1 + y as u16, self.cell_w, 1, ch, style);
            }
        }

        self.draw_side_panel(fb, snap, hud, start_x + frame_w + 2, start_y);

        if snap.game_over {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &MatchSnapshot, hud: &HudInfo<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &MatchSnapshot,
        hud: &HudInfo<'_>,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= fb.width() {
            return;
        }
        let label = CellStyle::default().bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), SCREEN_BG);

        let player = if hud.player.is_empty() { "-" } else { hud.player };
        let fields = [
            (hud.mode, player.to_string()),
            ("SCORE", snap.score.to_string()),
            ("LEVEL", snap.level.to_string()),
            ("LINES", snap.lines.to_string()),
        ];
        let mut y = start_y;
        for (name, text) in &fields {
            fb.put_str(panel_x, y, name, label);
            fb.put_str(panel_x, y + 1, text, value);
            y += 3;
        }

        fb.put_str(panel_x, y, "NEXT", label);
        let preview_y = y + 1;
        self.draw_preview(fb, snap.next, panel_x, preview_y);

        let help_y = preview_y + 4;
        let help = value.dim();
        for (i, line) in ["arrows/hjkl move", "up rotate", "space drop", "p pause  q quit"]
            .iter()
            .enumerate()
        {
            fb.put_str(panel_x, help_y + i as u16, line, help);
        }
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, kind: PieceKind, x: u16, y: u16) {
        let style = block_style(kind.color());
        for (dx, dy) in shape(kind).offsets(0) {
            fb.fill_rect(
                x + dx as u16 * self.cell_w,
                y + dy as u16,
                self.cell_w,
                1,
                '█',
                style,
            );
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let text_w = text.chars().count() as u16;
        let x = start_x + frame_w.saturating_sub(text_w) / 2;
        let style = CellStyle::plain(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        fb.put_str(x, start_y + frame_h / 2, text, style);
    }
}

fn block_style(color: Color) -> CellStyle {
    CellStyle::plain(Rgb::of(color), PLAY_BG).bold()
}
