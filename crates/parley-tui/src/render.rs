//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a
//! ratatui frame, and never mutate state or return effects. All text is
//! pre-wrapped here with unicode-aware widths; the paragraphs are drawn
//! without ratatui's own wrapping to avoid double-wrapping artifacts.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as UiBlock, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use parley_types::{Block, Emphasis, InlineRun};

use crate::feedback::{FeedbackState, Phase};
use crate::state::{AppState, FeedbackSlot, Focus, MessageCell};

/// Height of the bordered compose box.
const INPUT_HEIGHT: u16 = 3;

/// Height of the key-hint line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Horizontal padding on each side of the conversation pane.
const LOG_MARGIN: u16 = 1;

/// Typing indicator frames, advanced by the tick event.
const TYPING_FRAMES: &[&str] = &["·  ", "·· ", "···", "   "];

const STAR_FILLED: char = '★';
const STAR_EMPTY: char = '☆';

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let notice_height = u16::from(app.notice.is_some());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(notice_height),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    let log_width = area.width.saturating_sub(LOG_MARGIN * 2) as usize;
    let log_height = chunks[0].height as usize;

    // Bottom-stick scroll: the newest lines always stay visible.
    let all_lines = render_log(app, log_width);
    let skip = all_lines.len().saturating_sub(log_height);
    let visible: Vec<Line<'static>> = all_lines.into_iter().skip(skip).collect();

    let log_area = Rect {
        x: chunks[0].x + LOG_MARGIN,
        y: chunks[0].y,
        width: chunks[0].width.saturating_sub(LOG_MARGIN * 2),
        height: chunks[0].height,
    };
    frame.render_widget(Paragraph::new(visible), log_area);

    if let Some(notice) = &app.notice {
        let line = Line::from(Span::styled(
            notice.text.clone(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
    }

    render_input(app, frame, chunks[2]);
    render_status_line(app, frame, chunks[3]);
}

/// Pre-renders the conversation log into wrapped lines.
fn render_log(app: &AppState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if app.log.is_empty() && !app.awaiting_reply() {
        lines.push(Line::from(Span::styled(
            "Send a message to start the conversation.",
            Style::default().fg(Color::DarkGray),
        )));
        return lines;
    }

    for (index, cell) in app.log.iter().enumerate() {
        render_cell(app, cell, index, width, &mut lines);
        lines.push(Line::default());
    }

    if app.awaiting_reply() {
        let frame_idx = (app.spinner_frame as usize / 2) % TYPING_FRAMES.len();
        lines.push(Line::from(vec![
            Span::styled("assistant ", Style::default().fg(Color::Cyan)),
            Span::styled(
                TYPING_FRAMES[frame_idx].to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines
}

fn render_cell(
    app: &AppState,
    cell: &MessageCell,
    index: usize,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let (label, label_color) = if cell.message.role.is_user() {
        ("you", Color::Green)
    } else {
        ("assistant", Color::Cyan)
    };
    lines.push(Line::from(Span::styled(
        label,
        Style::default().fg(label_color).add_modifier(Modifier::BOLD),
    )));

    for block in &cell.message.blocks {
        render_block(block, width, lines);
    }

    if let Some(slot) = &cell.feedback {
        let focused = app.focus == Focus::Feedback(index);
        render_feedback(slot, focused, width, lines);
    }
}

fn render_block(block: &Block, width: usize, lines: &mut Vec<Line<'static>>) {
    match block {
        Block::Paragraph(runs) => lines.extend(wrap_runs(runs, width)),
        Block::CodeBlock(code) => {
            let style = Style::default().fg(Color::Gray).add_modifier(Modifier::DIM);
            for code_line in code.lines() {
                for row in wrap_text(code_line, width.saturating_sub(2)) {
                    lines.push(Line::from(Span::styled(format!("  {row}"), style)));
                }
            }
        }
        Block::BulletList(items) => {
            for item in items {
                push_prefixed(lines, "• ", item, width);
            }
        }
        Block::NumberedList(items) => {
            for (n, item) in items.iter().enumerate() {
                push_prefixed(lines, &format!("{}. ", n + 1), item, width);
            }
        }
    }
}

/// Wraps `text` under a prefix, hanging-indenting continuation rows.
fn push_prefixed(lines: &mut Vec<Line<'static>>, prefix: &str, text: &str, width: usize) {
    let indent = " ".repeat(prefix.len());
    let rows = wrap_text(text, width.saturating_sub(prefix.len()));
    for (i, row) in rows.into_iter().enumerate() {
        let head = if i == 0 { prefix } else { &indent };
        lines.push(Line::from(format!("{head}{row}")));
    }
}

fn render_feedback(
    slot: &FeedbackSlot,
    focused: bool,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    match slot {
        FeedbackSlot::AlreadyRated(server) => {
            let style = Style::default().fg(Color::DarkGray);
            lines.push(Line::from(Span::styled(
                format!("rated {}", stars(server.rating)),
                style,
            )));
            if !server.comment.is_empty() {
                for row in wrap_text(&format!("  \"{}\"", server.comment), width) {
                    lines.push(Line::from(Span::styled(row, style)));
                }
            }
        }
        FeedbackSlot::Interactive(state) => {
            render_feedback_widget(state, focused, width, lines);
        }
    }
}

fn render_feedback_widget(
    state: &FeedbackState,
    focused: bool,
    width: usize,
    lines: &mut Vec<Line<'static>>,
) {
    if state.phase == Phase::Submitted {
        lines.push(Line::from(Span::styled(
            "Thanks for your feedback!",
            Style::default().fg(Color::Green),
        )));
        return;
    }

    let star_style = if state.nudge_ticks > 0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let marker = if focused { "› " } else { "  " };
    lines.push(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled("Rate this response: ", Style::default().fg(Color::DarkGray)),
        Span::styled(stars(state.rating), star_style),
    ]));

    match &state.phase {
        Phase::Prompting | Phase::Submitted => {}
        Phase::RatingSelected | Phase::Failed(_) => {
            let cursor = if focused { "_" } else { "" };
            for row in wrap_text(
                &format!("  comment: {}{cursor}", state.comment),
                width,
            ) {
                lines.push(Line::from(Span::styled(
                    row,
                    Style::default().fg(Color::Gray),
                )));
            }
            if let Phase::Failed(error) = &state.phase {
                lines.push(Line::from(Span::styled(
                    format!("  {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        Phase::Submitting => {
            lines.push(Line::from(Span::styled(
                "  submitting...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}

fn stars(rating: u8) -> String {
    (1..=5)
        .map(|n| if n <= rating { STAR_FILLED } else { STAR_EMPTY })
        .collect()
}

fn render_input(app: &AppState, frame: &mut Frame, area: Rect) {
    let composing = app.focus == Focus::Composing;
    let border_style = if composing {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = UiBlock::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" message ");
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(app.input.text.clone()).block(block), area);

    if composing && inner.width > 0 {
        let cursor_x = inner.x + (text_width(&app.input.text) as u16).min(inner.width - 1);
        frame.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let spans: Vec<Span> = match app.focus {
        Focus::Composing => {
            let mut spans = vec![
                Span::styled("Enter", hint),
                Span::raw(" send  "),
                Span::styled("Ctrl+R", hint),
                Span::raw(" reset  "),
                Span::styled("Ctrl+C", hint),
                Span::raw(" quit"),
            ];
            if app.newest_pending_feedback().is_some() {
                spans.extend([Span::raw("  "), Span::styled("Esc", hint), Span::raw(" rate")]);
            }
            spans
        }
        Focus::Feedback(_) => vec![
            Span::styled("1-5", hint),
            Span::raw(" stars  "),
            Span::styled("Enter", hint),
            Span::raw(" submit  "),
            Span::styled("Esc", hint),
            Span::raw(" back"),
        ],
    };
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Left),
        area,
    );
}

/// Wraps styled runs into lines at `width` columns, splitting runs at
/// character boundaries. Newlines inside a run (code spans permit them)
/// force a break.
fn wrap_runs(runs: &[InlineRun], width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;
    let mut pending = String::new();

    for run in runs {
        let style = emphasis_style(run.emphasis);
        pending.clear();
        let flush_span = |pending: &mut String, current: &mut Vec<Span<'static>>| {
            if !pending.is_empty() {
                current.push(Span::styled(std::mem::take(pending), style));
            }
        };
        for c in run.text.chars() {
            if c == '\n' {
                flush_span(&mut pending, &mut current);
                lines.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
                continue;
            }
            let w = c.width().unwrap_or(0);
            if current_width + w > width {
                flush_span(&mut pending, &mut current);
                lines.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            pending.push(c);
            current_width += w;
        }
        flush_span(&mut pending, &mut current);
    }

    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn emphasis_style(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::None => Style::default(),
        Emphasis::Bold => Style::default().add_modifier(Modifier::BOLD),
        Emphasis::Italic => Style::default().add_modifier(Modifier::ITALIC),
        Emphasis::Code => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::DIM),
    }
}

/// Plain-text wrap at `width` columns, unicode-width aware. Never splits
/// inside a wide character; an empty input yields one empty row.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0usize;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if row_width + w > width {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }
        row.push(c);
        row_width += w;
    }
    rows.push(row);
    rows
}

fn text_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}
