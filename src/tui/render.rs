use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Item;
use crate::model::attachment::format_file_size;
use crate::ops::order::recency_label;

use super::app::{App, Mode, Popup};

/// Main render function — draws the current popup over a dimmed screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let popup_area = centered_popup(area);
    frame.render_widget(Clear, popup_area);

    let title = match app.popup {
        Popup::Notes => " Note ",
        Popup::Todos => " Todo ",
    };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim))
        .style(bg_style);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // input field + spacer
            Constraint::Min(1),    // item list
            Constraint::Length(1), // status row
        ])
        .split(inner);

    render_input(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
}

/// Popup rectangle: centered, with a capped width and height
fn centered_popup(area: Rect) -> Rect {
    let width = area.width.saturating_sub(4).min(76);
    let height = area.height.saturating_sub(2).min(28);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = match app.popup {
        Popup::Notes => "Write something...",
        Popup::Todos => "Add a new todo item...",
    };
    let line = if app.input.is_empty() && app.mode != Mode::Input {
        Line::from(Span::styled(
            format!(" {}", placeholder),
            Style::default().fg(app.theme.dim),
        ))
    } else {
        let cursor = if app.mode == Mode::Input { "▌" } else { "" };
        Line::from(vec![
            Span::styled(
                format!(" {}", app.input),
                Style::default().fg(app.theme.text_bright),
            ),
            Span::styled(cursor, Style::default().fg(app.theme.highlight)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let snap = app.current_board().snapshot().with_selection(match app.popup {
        Popup::Todos => app.todo_cursor.index(),
        Popup::Notes => (app.mode == Mode::Browse).then_some(app.notes_cursor),
    });
    let items = if app.show_completed {
        &snap.completed
    } else {
        &snap.active
    };

    if items.is_empty() {
        render_empty_state(frame, app, area);
        return;
    }

    let now = Local::now();
    let mut lines: Vec<Line> = Vec::new();
    let mut selection_row = 0usize;
    for (idx, item) in items.iter().enumerate() {
        let selected = snap.selection == Some(idx);
        if selected {
            selection_row = lines.len();
        }
        match app.popup {
            Popup::Notes => push_note_lines(app, &mut lines, item, selected, now),
            Popup::Todos => push_todo_lines(app, &mut lines, item, idx, selected),
        }
    }

    // Keep the selected row inside the viewport
    let height = area.height as usize;
    let scroll = selection_row.saturating_sub(height.saturating_sub(3));
    frame.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        area,
    );
}

fn push_note_lines(
    app: &App,
    lines: &mut Vec<Line>,
    item: &Item,
    selected: bool,
    now: chrono::DateTime<Local>,
) {
    let theme = &app.theme;
    let row_bg = if selected {
        Style::default().bg(theme.selection_bg)
    } else {
        Style::default()
    };

    let mut title_style = row_bg
        .fg(theme.text_bright)
        .add_modifier(Modifier::BOLD);
    let mut body_style = row_bg.fg(theme.text);
    if app.show_completed {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
        body_style = body_style.add_modifier(Modifier::CROSSED_OUT).fg(theme.dim);
    }

    let marker = if app.show_completed { "●" } else { "○" };
    let marker_style = row_bg.fg(if app.show_completed {
        theme.green
    } else {
        theme.dim
    });
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", marker), marker_style),
        Span::styled(item.title(), title_style),
    ]));

    // Body: the edit buffer when this item is being edited
    if app.notes.edit_target() == Some(&item.id) && app.mode == Mode::Edit {
        let buffer = app.notes.edit_buffer().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("   {}", buffer), row_bg.fg(theme.text_bright)),
            Span::styled("▌", row_bg.fg(theme.highlight)),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            format!("   {}", item.content),
            body_style,
        )));
    }

    for att in &item.attachments {
        lines.push(Line::from(Span::styled(
            format!(
                "   {} {} ({})",
                att.glyph(),
                att.name,
                format_file_size(att.size)
            ),
            row_bg.fg(theme.dim),
        )));
    }

    lines.push(Line::from(Span::styled(
        format!("   {}", recency_label(item.last_updated, now)),
        row_bg.fg(theme.dim),
    )));
    lines.push(Line::default());
}

fn push_todo_lines(app: &App, lines: &mut Vec<Line>, item: &Item, idx: usize, selected: bool) {
    let theme = &app.theme;
    let row_bg = if selected {
        Style::default().bg(theme.selection_bg)
    } else {
        Style::default()
    };
    let mut text_style = row_bg.fg(theme.text_bright);
    if app.show_completed {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT).fg(theme.dim);
    }
    lines.push(Line::from(vec![
        Span::styled(format!(" {:>2}. ", idx + 1), row_bg.fg(theme.dim)),
        Span::styled(item.content.clone(), text_style),
    ]));
}

fn render_empty_state(frame: &mut Frame, app: &App, area: Rect) {
    let message = match (app.popup, app.show_completed) {
        (Popup::Notes, false) => "Ready to get started? Add your first note above.",
        (Popup::Notes, true) => "All clear! No completed notes yet.",
        (Popup::Todos, false) => "No todos yet. Add one above!",
        (Popup::Todos, true) => "Nothing completed yet.",
    };
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            format!("   {}", message),
            Style::default().fg(app.theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let board = app.current_board();

    let line = if let Some(message) = &app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(theme.red)
        } else {
            Style::default().fg(theme.green)
        };
        Line::from(Span::styled(format!(" {}", message), style))
    } else {
        let counts = format!(
            " {} remaining, {} completed",
            board.active_count(),
            board.completed_count()
        );
        let hints = match app.mode {
            Mode::Input => "enter add · esc browse · tab switch",
            Mode::Browse => "e edit · d delete · v completed · q quit",
            Mode::Edit => "enter save · esc cancel",
        };
        Line::from(vec![
            Span::styled(counts, Style::default().fg(theme.text)),
            Span::styled(
                format!("  ·  {}", hints),
                Style::default().fg(theme.dim),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
