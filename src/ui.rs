use crate::app::App;
use crate::driver::DriverState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 26;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

// UI color scheme
const BORDER_COLOR: Color = Color::Rgb(59, 130, 246);
const HIGHLIGHT_COLOR: Color = Color::Rgb(147, 51, 234);
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;
const CANVAS_BG: Color = Color::Black;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Split the frame into (sidebar, canvas block) areas
fn split(area: Rect, fullscreen: bool) -> (Option<Rect>, Rect) {
    if fullscreen {
        (None, area)
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);
        (Some(layout[0]), layout[1])
    }
}

/// Area inside the canvas border where the field is drawn
pub fn canvas_rect(frame_area: Rect, fullscreen: bool) -> Rect {
    let (_, outer) = split(frame_area, fullscreen);
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (sidebar, canvas) = split(area, app.fullscreen_mode);

    if let Some(sidebar) = sidebar {
        render_sidebar(frame, sidebar, app);
    }
    render_canvas(frame, canvas, app);

    if app.show_overlay {
        render_hero_overlay(frame, canvas_rect(area, app.fullscreen_mode));
    }
    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),  // Status
            Constraint::Length(10), // Stats
            Constraint::Min(6),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_stats_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Field ");
    let bg = &app.background;
    let field = bg.field();

    let (status_text, status_color) = match bg.state() {
        DriverState::Unstarted => ("NO SURFACE", Color::DarkGray),
        DriverState::Cancelled => ("STOPPED", Color::DarkGray),
        DriverState::Running if bg.is_paused() => ("PAUSED", HIGHLIGHT_COLOR),
        DriverState::Running if field.is_empty() => ("EMPTY", Color::Yellow),
        DriverState::Running => ("RUNNING", Color::Green),
    };
    let (cols, rows) = bg.surface().map_or((0, 0), |s| s.grid_size());

    let dim = Style::default().fg(DIM_TEXT_COLOR);
    let content = vec![
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(Span::styled(
            format!("{} / {} particles", field.len(), bg.config().max_particles),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("{:.0}x{:.0} ({}x{} cells)", field.width, field.height, cols, rows),
            dim,
        )),
        Line::from(Span::styled(format!("frame {}", bg.frames()), dim)),
        Line::from(Span::styled(format!("preset: {}", app.preset_name), dim)),
    ];

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_stats_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Impact ");
    let elapsed = app.stats_elapsed();

    let mut content = Vec::with_capacity(app.stats.len() * 2);
    for stat in &app.stats {
        content.push(Line::from(Span::styled(
            stat.display_at(elapsed),
            Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(Span::styled(
            stat.label.to_uppercase(),
            Style::default().fg(DIM_TEXT_COLOR),
        )));
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("R", "reseed"),
        make_control("+/-", "particle cap"),
        make_control("O", "hero overlay"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    frame.render_widget(Paragraph::new(content).block(styled_block(" Controls ")), area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(CANVAS_BG));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(surface) = app.background.surface() else {
        return;
    };

    let buf = frame.buffer_mut();
    for cell in surface.cells() {
        if cell.x >= inner.width || cell.y >= inner.height {
            continue;
        }
        if let Some(target) = buf.cell_mut((inner.x + cell.x, inner.y + cell.y)) {
            target.set_char(cell.char).set_fg(cell.color.into());
        }
    }
}

fn render_hero_overlay(frame: &mut Frame, canvas: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "✦ CLIENT VALUE UNLOCKED",
            Style::default().fg(Color::Rgb(191, 219, 254)),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Transforming",
            Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Business Logic",
            Style::default()
                .fg(Color::Rgb(96, 165, 250))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "into Value",
            Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "We bridge the gap between complex operational challenges",
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            "and sustainable growth through AI-driven transformation.",
            Style::default().fg(DIM_TEXT_COLOR),
        )),
    ];

    let height = (lines.len() as u16).min(canvas.height);
    let area = Rect {
        x: canvas.x,
        y: canvas.y + canvas.height.saturating_sub(height) / 2,
        width: canvas.width,
        height,
    };

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    let canvas = canvas_rect(area, app.fullscreen_mode);

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas.width.saturating_sub(2));
    let help_height = area.height.saturating_sub(4).min(28);
    let help_area = Rect {
        x: canvas.x + canvas.width.saturating_sub(help_width) / 2,
        y: area.y + area.height.saturating_sub(help_height) / 2,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let heading = Style::default().fg(HIGHLIGHT_COLOR);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE FIELD", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Drifting particles breathe in size and brightness, link up with nearby neighbours and shy away from the mouse pointer."),
        Line::from(""),
        Line::from(Span::styled("POINTER:", heading)),
        Line::from("Move the mouse over the canvas to push particles away. Particles near the pointer draw a faint line to it."),
        Line::from(""),
        Line::from(Span::styled("PARTICLES:", heading)),
        Line::from("One particle per 10 units of width, capped by the particle cap (+/-). Resizing or R regenerates them."),
        Line::from(""),
        Line::from(Span::styled("PRESETS:", heading)),
        Line::from("Start with --preset <name>; --list-presets shows them all."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", heading)),
        Line::from("Space=Pause, R=Reseed, +/-=Particle cap, O=Overlay, V=Fullscreen, J/K=Scroll help, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let is_scrollable = content_height > visible_height;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_rect_excludes_sidebar_and_border() {
        let area = Rect::new(0, 0, 120, 40);
        let canvas = canvas_rect(area, false);
        assert_eq!(canvas, Rect::new(SIDEBAR_WIDTH + 1, 1, 120 - SIDEBAR_WIDTH - 2, 38));
    }

    #[test]
    fn test_canvas_rect_fullscreen() {
        let canvas = canvas_rect(Rect::new(0, 0, 120, 40), true);
        assert_eq!(canvas, Rect::new(1, 1, 118, 38));
    }

    #[test]
    fn test_canvas_rect_tiny_terminal() {
        let canvas = canvas_rect(Rect::new(0, 0, 10, 2), false);
        assert_eq!(canvas.width, 0);
        assert_eq!(canvas.height, 0);
    }
}
