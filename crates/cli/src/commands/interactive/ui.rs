use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::app::{App, Screen, Task};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let [header_area, content_area, status_area] = layout_chunks.as_ref() else {
        return;
    };

    let header = Paragraph::new("Forecast waste, plan routes and check bins")
        .block(Block::default().borders(Borders::ALL).title("EcoFlow Waste Management"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::TaskSelect => draw_task_select(frame, app, *content_area),
        Screen::Form => draw_form(frame, app, *content_area),
    }

    draw_status(frame, app, *status_area);
}

fn draw_task_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = Task::ALL
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let prefix = if idx == app.task_index { "> " } else { "  " };
            ListItem::new(format!("{prefix}{}", task.title()))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Select Task"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    state.select(Some(app.task_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let fields = app.fields();

    let mut constraints = vec![Constraint::Length(3); fields.len()];
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, (field, chunk)) in fields.iter().zip(chunks.iter()).enumerate() {
        let value = app.inputs.get(idx).map(String::as_str).unwrap_or_default();
        let active = idx == app.field_index;

        let (text, text_style) = if value.is_empty() {
            (format!("e.g. {}", field.hint), Style::default().fg(Color::DarkGray))
        } else {
            (value.to_string(), Style::default())
        };
        let border_style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let input = Paragraph::new(text).style(text_style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(field.label),
        );
        frame.render_widget(input, *chunk);

        if active {
            let column = chunk.x + 1 + value.chars().count() as u16;
            let column = column.min(chunk.right().saturating_sub(2));
            frame.set_cursor_position(Position::new(column, chunk.y + 1));
        }
    }

    let Some(result_area) = chunks.last() else {
        return;
    };

    let lines = if app.result.is_empty() {
        vec![Line::from("Press Enter to run the task.")]
    } else {
        app.result.iter().map(|line| Line::from(line.as_str())).collect()
    };
    let result = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.selected_task().title()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(result, *result_area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.screen {
        Screen::TaskSelect => "↑/↓ move · Enter select · q/Esc quit",
        Screen::Form => "Type to edit · Tab/↓ next field · Enter run · Esc back · Ctrl-C quit",
    };

    let (status_text, status_style) = if let Some(msg) = &app.error_message {
        (format!("Error: {msg} · {nav_hint}"), Style::default().fg(Color::Red))
    } else if let Some(notice) = &app.notice {
        (format!("{notice} · {nav_hint}"), Style::default().fg(Color::Yellow))
    } else {
        (nav_hint.to_owned(), Style::default())
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}
