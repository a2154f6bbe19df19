//! Terminal window.
//!
//! Draws the canvas with upper-half-block characters: each cell carries two
//! vertically stacked pixels, the top one as the truecolor foreground and
//! the bottom one as the background. The canvas is box-filtered down to
//! fit the terminal and only cells that changed since the previous frame
//! are written.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Result, bail};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseEventKind,
};
use crossterm::{cursor, execute, queue, style, terminal};
use tracing::debug;

use crate::canvas::Surface;
use crate::color::Rgb;
use crate::session::config::{KeyBindings, SessionConfig};

use super::{Window, WindowEvent, menubar};

const HALF_BLOCK: char = '\u{2580}';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    top: Rgb,
    bottom: Rgb,
}

/// Where the canvas lands on the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Layout {
    /// Canvas pixels per half-cell pixel.
    scale: f64,
    cols: u16,
    rows: u16,
    left: u16,
    top: u16,
}

impl Layout {
    fn fit(width: u32, height: u32, term_cols: u16, term_rows: u16, top: u16) -> Self {
        let avail_cols = term_cols.max(1);
        let avail_rows = term_rows.saturating_sub(top).max(1);
        let scale = (width as f64 / avail_cols as f64)
            .max(height as f64 / (2.0 * avail_rows as f64))
            .max(f64::EPSILON);
        let cols = ((width as f64 / scale).ceil() as u16).clamp(1, avail_cols);
        let rows = ((height as f64 / (2.0 * scale)).ceil() as u16).clamp(1, avail_rows);
        Layout {
            scale,
            cols,
            rows,
            left: (avail_cols - cols) / 2,
            top,
        }
    }

    /// Canvas pixel under the centre of a terminal cell, if any. Clicks land
    /// on the upper half of the cell.
    fn to_canvas(&self, column: u16, row: u16, width: u32, height: u32) -> Option<(f64, f64)> {
        let cx = column.checked_sub(self.left)?;
        let cy = row.checked_sub(self.top)?;
        if cx >= self.cols || cy >= self.rows {
            return None;
        }
        let x = (cx as f64 + 0.5) * self.scale;
        let y = (cy as f64 * 2.0 + 0.5) * self.scale;
        (x < width as f64 && y < height as f64).then_some((x, y))
    }
}

pub struct TerminalWindow {
    out: io::Stdout,
    bindings: KeyBindings,
    show_menubar: bool,
    title: String,
    width: u32,
    height: u32,
    layout: Option<Layout>,
    grid: Vec<Cell>,
    full_redraw: bool,
    active: bool,
}

impl TerminalWindow {
    pub fn new(config: &SessionConfig) -> Self {
        TerminalWindow {
            out: io::stdout(),
            bindings: config.key_bindings.clone(),
            show_menubar: config.show_menubar,
            title: config.title.clone(),
            width: 0,
            height: 0,
            layout: None,
            grid: Vec::new(),
            full_redraw: true,
            active: false,
        }
    }

    fn relayout(&mut self) -> Result<()> {
        let (term_cols, term_rows) = terminal::size()?;
        let top = u16::from(self.show_menubar);
        let layout = Layout::fit(self.width, self.height, term_cols, term_rows, top);
        debug!(?layout, term_cols, term_rows, "terminal layout");
        self.layout = Some(layout);
        self.full_redraw = true;
        queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
        self.render_menubar()
    }

    fn render_menubar(&mut self) -> Result<()> {
        if self.show_menubar {
            let keys = [self.bindings.close.as_str(), self.bindings.close_alt.as_str()];
            menubar::render(&mut self.out, &self.title, &keys)?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn translate(&mut self, ev: Event) -> Result<Option<WindowEvent>> {
        Ok(match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if self.bindings.is_close(&key) {
                    Some(WindowEvent::Close)
                } else {
                    key_name(&key).map(WindowEvent::Key)
                }
            }
            Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => self
                .layout
                .and_then(|l| l.to_canvas(mouse.column, mouse.row, self.width, self.height))
                .map(|(x, y)| WindowEvent::Click { x, y }),
            Event::Resize(_, _) => {
                self.relayout()?;
                Some(WindowEvent::Resized)
            }
            _ => None,
        })
    }

    fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        // Always restore terminal state, even if one step fails.
        let shown = execute!(
            self.out,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let raw = terminal::disable_raw_mode();
        shown?;
        raw?;
        Ok(())
    }
}

impl Window for TerminalWindow {
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        let (term_cols, term_rows) = terminal::size()?;
        let top = u16::from(self.show_menubar);
        if term_cols == 0 || term_rows <= top {
            bail!("Terminal too small: have {term_cols}x{term_rows}");
        }

        self.width = width;
        self.height = height;
        self.title = title.to_string();

        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::SetTitle(title),
        )?;
        self.relayout()
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        execute!(self.out, terminal::SetTitle(title))?;
        self.render_menubar()
    }

    fn poll(&mut self, timeout: Duration) -> Result<Vec<WindowEvent>> {
        let mut events = Vec::new();
        if !event::poll(timeout)? {
            return Ok(events);
        }
        loop {
            if let Some(ev) = self.translate(event::read()?)? {
                events.push(ev);
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(events)
    }

    fn present(&mut self, frame: &Surface) -> Result<()> {
        let Some(layout) = self.layout else {
            return Ok(());
        };
        let grid = downsample(frame, &layout);
        let redraw_all = self.full_redraw || grid.len() != self.grid.len();

        for (i, cell) in grid.iter().enumerate() {
            if !redraw_all && self.grid[i] == *cell {
                continue;
            }
            let x = layout.left + (i % layout.cols as usize) as u16;
            let y = layout.top + (i / layout.cols as usize) as u16;
            queue!(
                self.out,
                cursor::MoveTo(x, y),
                style::SetForegroundColor(to_ct_color(cell.top)),
                style::SetBackgroundColor(to_ct_color(cell.bottom)),
                style::Print(HALF_BLOCK),
            )?;
        }
        queue!(self.out, style::ResetColor)?;
        self.out.flush()?;

        self.grid = grid;
        self.full_redraw = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.restore()
    }
}

impl Drop for TerminalWindow {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ---------------------------------------------------------------------------
// Pixel and key conversion
// ---------------------------------------------------------------------------

fn to_ct_color(c: Rgb) -> style::Color {
    style::Color::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Average the canvas pixels behind each half-cell.
fn downsample(frame: &Surface, layout: &Layout) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(layout.cols as usize * layout.rows as usize);
    for row in 0..layout.rows as u32 {
        for col in 0..layout.cols as u32 {
            cells.push(Cell {
                top: average(frame, layout.scale, col, row * 2),
                bottom: average(frame, layout.scale, col, row * 2 + 1),
            });
        }
    }
    cells
}

fn average(frame: &Surface, scale: f64, px: u32, py: u32) -> Rgb {
    let span = |i: u32, limit: u32| {
        let start = ((i as f64 * scale) as u32).min(limit.saturating_sub(1));
        let end = (((i + 1) as f64 * scale) as u32).clamp(start + 1, limit.max(start + 1));
        (start, end)
    };
    let (x0, x1) = span(px, frame.width());
    let (y0, y1) = span(py, frame.height());

    let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some([pr, pg, pb, _]) = frame.pixel(x, y) {
                r += u64::from(pr);
                g += u64::from(pg);
                b += u64::from(pb);
                n += 1;
            }
        }
    }
    if n == 0 {
        return Rgb::BLACK;
    }
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Lowercase name of a key press, or `None` for keys sketches never see.
fn key_name(key: &KeyEvent) -> Option<String> {
    let name = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Esc => "escape".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Insert => "insert".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pageup".into(),
        KeyCode::PageDown => "pagedown".into(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_are_named_in_lowercase() {
        assert_eq!(key_name(&press(KeyCode::Char('A'))).as_deref(), Some("a"));
        assert_eq!(key_name(&press(KeyCode::Char(' '))).as_deref(), Some("space"));
        assert_eq!(key_name(&press(KeyCode::Up)).as_deref(), Some("up"));
        assert_eq!(key_name(&press(KeyCode::Esc)).as_deref(), Some("escape"));
        assert_eq!(key_name(&press(KeyCode::F(5))).as_deref(), Some("f5"));
        assert_eq!(key_name(&press(KeyCode::Null)), None);
    }

    #[test]
    fn layout_fits_the_canvas_into_the_terminal() {
        // 800x600 into 100x51 with a menubar: 50 rows of 2 half-pixels.
        let layout = Layout::fit(800, 600, 100, 51, 1);
        assert_eq!(layout.scale, 8.0);
        assert_eq!((layout.cols, layout.rows), (100, 38));
        assert_eq!(layout.left, 0);

        let tall = Layout::fit(200, 400, 100, 21, 1);
        assert_eq!(tall.scale, 10.0);
        assert_eq!((tall.cols, tall.rows), (20, 20));
        assert_eq!(tall.left, 40);
    }

    #[test]
    fn clicks_map_back_to_canvas_pixels() {
        let layout = Layout::fit(200, 400, 100, 21, 1);
        assert_eq!(layout.to_canvas(40, 1, 200, 400), Some((5.0, 5.0)));
        assert_eq!(layout.to_canvas(59, 20, 200, 400), Some((195.0, 385.0)));
        assert_eq!(layout.to_canvas(39, 5, 200, 400), None);
        assert_eq!(layout.to_canvas(45, 0, 200, 400), None);
    }

    #[test]
    fn downsampling_averages_each_half_cell() {
        let mut frame = Surface::new(4, 4, Rgb::WHITE).unwrap();
        for x in 0..2 {
            frame.blend(x, 0, Rgb::BLACK, 1.0);
            frame.blend(x, 1, Rgb::BLACK, 1.0);
        }
        let layout = Layout::fit(4, 4, 2, 1, 0);
        assert_eq!(layout.scale, 2.0);
        let cells = downsample(&frame, &layout);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].top, Rgb::BLACK);
        assert_eq!(cells[0].bottom, Rgb::WHITE);
        assert_eq!(cells[1].top, Rgb::WHITE);
    }
}
