use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use okuma_seyri_core::ReadingSummary;
use okuma_seyri_core::views::render_reading_map;
use okuma_seyri_protocol::{Rect as MapRect, RenderCommand, SessionReport, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};

/// Viewport units per terminal row.
const CELL_HEIGHT: f64 = 16.0;
const SCROLL_STEP: u16 = 3;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::HeaderBackground => Color::DarkGray,
        ThemeToken::DwellHot => Color::Red,
        ThemeToken::DwellWarm => Color::Yellow,
        ThemeToken::DwellCold => Color::Blue,
        ThemeToken::DwellNone => Color::Rgb(40, 40, 40),
        ThemeToken::BlockBorder => Color::DarkGray,
        ThemeToken::GazePath => Color::Green,
        ThemeToken::RegressionPath => Color::Magenta,
        ThemeToken::SkipPath => Color::Cyan,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::Gray,
    }
}

/// Row range covered by a band, relative to the first visible row.
fn band_rows(rect: &MapRect, scroll: u16) -> (i64, i64) {
    let first = (rect.y / CELL_HEIGHT).floor() as i64 - i64::from(scroll);
    let last = ((rect.y + rect.h) / CELL_HEIGHT).ceil() as i64 - i64::from(scroll);
    (first, last.max(first + 1))
}

fn put_str(buf: &mut Buffer, area: Rect, col: u16, row: i64, text: &str, fg: Color, bg: Color) {
    if row < 0 || row >= i64::from(area.height) {
        return;
    }
    let y = area.y + row as u16;
    for (i, ch) in text.chars().enumerate() {
        let x = area.x + col + i as u16;
        if x >= area.x + area.width {
            break;
        }
        buf[(x, y)].set_char(ch).set_fg(fg).set_bg(bg);
    }
}

fn draw_map(buf: &mut Buffer, area: Rect, commands: &[RenderCommand], scroll: u16) {
    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                label,
                block_id: Some(_),
                ..
            } => {
                let bg = theme_to_color(*color);
                let col = (rect.x as u16).min(area.width);
                let width = (rect.w as u16).min(area.width - col) as usize;
                let (first, last) = band_rows(rect, scroll);
                for row in first..last {
                    put_str(buf, area, col, row, &" ".repeat(width), Color::White, bg);
                }
                if let Some(label) = label {
                    let text: String = label.chars().take(width.saturating_sub(1)).collect();
                    put_str(buf, area, col + 1, first, &text, Color::White, bg);
                }
            }
            RenderCommand::DrawLine { to, color, .. } => {
                let row = (to.y / CELL_HEIGHT).floor() as i64 - i64::from(scroll);
                let col = (to.x.max(0.0) as u16).min(area.width.saturating_sub(1));
                if row >= 0 && row < i64::from(area.height) {
                    let cell = &mut buf[(area.x + col, area.y + row as u16)];
                    cell.set_char('•').set_fg(theme_to_color(*color));
                }
            }
            _ => {}
        }
    }
}

/// Browse a report's reading map. Arrows or the wheel scroll, `+`/`-`
/// stretch the page vertically, `q` quits.
pub fn render_tui(report: &SessionReport) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let summary = ReadingSummary::from_report(report);
    let mut scroll: u16 = 0;
    let mut zoom: f64 = 1.0;

    loop {
        let term_size = terminal.size()?;
        let rows = term_size.height.saturating_sub(1);
        let viewport = Viewport::sized(
            f64::from(term_size.width),
            f64::from(rows) * CELL_HEIGHT * zoom,
        );
        let commands = render_reading_map(
            &report.blocks,
            &report.samples,
            report.reading.counters,
            &viewport,
        );

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let counters = &report.reading.counters;
            let header = Block::default()
                .title(format!(
                    " okuma-seyri | {} samples | {} changes {} back {} skip | ↑↓ scroll | +/- zoom | q quit ",
                    summary.sample_count,
                    counters.line_changes,
                    counters.line_back,
                    counters.line_skip
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let background = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            frame.render_widget(background, content_area);

            draw_map(frame.buffer_mut(), content_area, &commands, scroll);
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Up => scroll = scroll.saturating_sub(SCROLL_STEP),
                    KeyCode::Down => scroll = scroll.saturating_add(SCROLL_STEP),
                    KeyCode::PageUp => scroll = scroll.saturating_sub(rows),
                    KeyCode::PageDown => scroll = scroll.saturating_add(rows),
                    KeyCode::Home => scroll = 0,
                    KeyCode::Char('+') | KeyCode::Char('=') => zoom *= 1.3,
                    KeyCode::Char('-') => {
                        zoom = (zoom / 1.3).max(1.0);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => scroll = scroll.saturating_add(SCROLL_STEP),
                    MouseEventKind::ScrollUp => scroll = scroll.saturating_sub(SCROLL_STEP),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use okuma_seyri_protocol::Point;

    #[test]
    fn band_rows_cover_partial_cells() {
        let rect = MapRect::new(0.0, 20.0, 10.0, 30.0);
        assert_eq!(band_rows(&rect, 0), (1, 4));
        assert_eq!(band_rows(&rect, 2), (-1, 2));
        let thin = MapRect::new(0.0, 32.0, 10.0, 0.0);
        assert_eq!(band_rows(&thin, 0), (2, 3));
    }

    #[test]
    fn draws_labelled_band_and_path_marker() {
        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        let commands = vec![
            RenderCommand::DrawRect {
                rect: MapRect::new(2.0, 16.0, 10.0, 16.0),
                color: ThemeToken::DwellHot,
                border_color: None,
                label: Some("abc".into()),
                block_id: Some(0),
            },
            RenderCommand::DrawLine {
                from: Point::new(0.0, 0.0),
                to: Point::new(15.0, 48.0),
                color: ThemeToken::RegressionPath,
                width: 1.0,
            },
        ];
        draw_map(&mut buf, area, &commands, 0);
        assert_eq!(buf[(3, 1)].symbol(), "a");
        assert_eq!(buf[(2, 1)].bg, Color::Red);
        assert_eq!(buf[(15, 3)].symbol(), "•");
        assert_eq!(buf[(15, 3)].fg, Color::Magenta);
    }

    #[test]
    fn scrolled_out_rows_are_skipped() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let commands = vec![RenderCommand::DrawRect {
            rect: MapRect::new(0.0, 0.0, 10.0, 16.0),
            color: ThemeToken::DwellCold,
            border_color: None,
            label: Some("x".into()),
            block_id: Some(0),
        }];
        draw_map(&mut buf, area, &commands, 5);
        assert_eq!(buf[(1, 0)].symbol(), " ");
        assert_eq!(buf[(1, 0)].bg, Color::Reset);
    }
}
