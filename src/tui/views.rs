//! TUI Views
//!
//! Draws the header, the circle canvas, the recent-event log, the footer and
//! the help overlay.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap,
        canvas::{Canvas, Circle},
    },
};

use super::board::Board;
use super::colors;
use super::state::{AppState, InteractionMode};
use crate::engine::Status;
use crate::identicon::participant_name;
use crate::session::RunOutcome;

/// Room around the circle so glyphs on the rim stay inside the canvas
const CANVAS_MARGIN: f64 = 1.25;

/// Render the whole screen.
pub fn render(state: &AppState, board: &Board, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(state, board, frame, chunks[0]);
    render_progress(board, frame, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(28)])
        .split(chunks[2]);
    render_circle(board, frame, body[0]);
    render_history(board, frame, body[1]);

    render_footer(state, frame, chunks[3]);

    if state.interaction_mode == InteractionMode::Help {
        render_help(frame);
    }
}

fn render_header(state: &AppState, board: &Board, frame: &mut Frame, area: Rect) {
    let status = match &board.outcome {
        None => Span::styled("● playing", Style::default().fg(colors::RUNNING)),
        Some(RunOutcome::Completed) => Span::styled("✔ done", Style::default().fg(colors::COMPLETE)),
        Some(RunOutcome::Failed(reason)) => {
            Span::styled(format!("✘ {}", reason), Style::default().fg(colors::FAILED))
        }
        Some(_) => Span::styled("■ stopped", Style::default().fg(colors::DIM)),
    };

    let line = Line::from(vec![
        Span::styled(
            " Josephus ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(state.params_string()),
        Span::raw(" │ "),
        Span::raw(format!("{} alive", board.alive_count())),
        Span::raw(" │ "),
        status,
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_progress(board: &Board, frame: &mut Frame, area: Rect) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(colors::RUNNING).bg(Color::Black))
        .ratio(board.progress())
        .label(format!("{}/{} counts", board.delivered, board.total_events()));
    frame.render_widget(gauge, area);
}

fn render_circle(board: &Board, frame: &mut Frame, area: Rect) {
    let radius = board
        .seats
        .iter()
        .map(|s| s.position.x.hypot(s.position.y))
        .fold(1.0_f64, f64::max);
    let bound = radius * CANVAS_MARGIN;
    let marker_radius = radius * 0.06;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Circle "))
        .marker(Marker::Braille)
        .x_bounds([-bound, bound])
        .y_bounds([-bound, bound])
        .paint(|ctx| {
            // Screen y grows downwards, canvas y upwards
            for seat in board.seats.iter().filter(|s| s.alive) {
                let (r, g, b) = seat.identicon.rgb;
                ctx.print(
                    seat.position.x,
                    -seat.position.y,
                    Span::styled(seat.identicon.glyph.to_string(), Style::default().fg(Color::Rgb(r, g, b))),
                );
            }
            if let Some(seat) = board.outline.and_then(|id| board.seats.get(id)) {
                ctx.draw(&Circle {
                    x: seat.position.x,
                    y: -seat.position.y,
                    radius: marker_radius,
                    color: colors::OUTLINE,
                });
            }
        });

    frame.render_widget(canvas, area);
}

fn render_history(board: &Board, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = board
        .history
        .iter()
        .map(|paced| {
            let (mark, style) = match paced.event.status {
                Status::Dead => ("✝", Style::default().fg(colors::FAILED).add_modifier(Modifier::BOLD)),
                Status::Alive => ("·", Style::default().fg(colors::DIM)),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>5} ", paced.sequence + 1), Style::default().fg(colors::DIM)),
                Span::styled(format!("{} {}", mark, participant_name(paced.event.id)), style),
            ]))
        })
        .collect();

    let title = match board.last_eliminated {
        Some(id) => format!(" Log │ last out: {} ", id),
        None => " Log ".to_string(),
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(colors::KEYBIND));
    let mut spans = vec![
        key(" ↑↓"),
        Span::raw(" soldiers  "),
        key("←→"),
        Span::raw(" step  "),
        key("r"),
        Span::raw(" restart  "),
        key("s"),
        Span::raw(" stop  "),
        key("?"),
        Span::raw(" help  "),
        key("q"),
        Span::raw(" quit"),
    ];
    if let Some(message) = &state.status_message {
        spans.push(Span::styled(format!("  │ {}", message), Style::default().fg(colors::DIM)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered(frame.area(), 50, 14);
    let text = vec![
        Line::from("Soldiers stand in a circle and count off."),
        Line::from("Every k-th soldier counted is removed; counting"),
        Line::from("continues with the next one until nobody is left."),
        Line::from(""),
        Line::from("↑ / ↓        one more / one fewer soldier"),
        Line::from("PgUp / PgDn  ten more / ten fewer soldiers"),
        Line::from("→ / ←        larger / smaller step"),
        Line::from("r            restart    s  stop"),
        Line::from("q / Esc      quit"),
        Line::from(""),
        Line::from("Press ? or Esc to close"),
    ];
    let help = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Rectangle of at most `width` x `height` centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
