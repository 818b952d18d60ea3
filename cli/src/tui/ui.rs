use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tiffin_core::service::form::FormField;
use tiffin_core::OrderSink;

use crate::tui::app::{App, DetailField, Focus, InputMode, Notice};

fn panel<'a>(title: &'a str, focused: bool) -> Block<'a> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn draw<S: OrderSink>(f: &mut Frame, app: &mut App<S>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Form
            Constraint::Length(3), // Total / notices
            Constraint::Length(1), // Help
        ])
        .split(size);

    let header = Paragraph::new("PLACE YOUR TIFFIN ORDER")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(35),
        ])
        .split(main_chunks[1]);

    draw_dates(f, app, content_chunks[0]);
    draw_lines(f, app, content_chunks[1]);
    draw_details(f, app, content_chunks[2]);
    draw_status(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Editing => "Type to edit | Enter/Esc: Done",
        InputMode::Normal => "Tab: Panel | j/k: Move | Space: Toggle | +/-: Qty | [/]: Date | Enter: Edit | s: Submit | q: Quit",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_dates<S: OrderSink>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let items: Vec<ListItem> = app.window.iter().map(|date| {
        let selected = app.selections.contains(date);
        let mark = if selected { "[x] " } else { "[ ] " };
        let style = if selected { Style::default().fg(Color::Green) } else { Style::default() };
        ListItem::new(Line::from(vec![
            Span::raw(mark),
            Span::styled(date.option_label(), style),
        ]))
    }).collect();

    let list = List::new(items)
        .block(panel(" Dates * ", app.focus == Focus::Dates))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.date_state);
}

fn draw_lines<S: OrderSink>(f: &mut Frame, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::Lines;
    let Some(date) = app.current_line_date() else {
        let hint = Paragraph::new("Choose the dates you want tiffin service.")
            .style(Style::default().fg(Color::DarkGray))
            .block(panel(" Tiffin Preferences ", focused));
        f.render_widget(hint, area);
        return;
    };

    let catalog = app.service.catalog();
    let selection = app.selections.get(&date).cloned().unwrap_or_default();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} ({}/{})", date.option_label(), app.line_date + 1, app.selections.len()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let fields = app.current_fields();
    if catalog.day(date.weekday).is_none() {
        lines.push(Line::from(Span::styled("Menu not available for this day.", Style::default().fg(Color::DarkGray))));
    }

    for (i, field) in fields.iter().enumerate() {
        let (label, value) = match field {
            FormField::Meal(size) => {
                let offer = catalog.offer(date.weekday, *size);
                let cost = offer.map(|o| o.cost).unwrap_or(0);
                (format!("{} (₹{})", size.label(), cost), selection.quantity(*size).to_string())
            }
            FormField::Extra(name) => {
                let cost = catalog.extra_item(name).map(|e| e.cost).unwrap_or(0);
                (format!("{} (₹{} each)", name, cost), selection.extra(name).to_string())
            }
            FormField::Bread => ("Bread".to_string(), selection.bread.to_string()),
            FormField::ZeroMasala => ("Zero Masala Tiffin".to_string(), if selection.zero_masala { "Yes" } else { "No" }.to_string()),
            FormField::Slot => ("Slot".to_string(), selection.slot.to_string()),
        };

        let active = focused && i == app.line_field;
        let style = if active {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(if active { ">> " } else { "   " }, style),
            Span::styled(format!("{:<32}", label), style),
            Span::styled(format!("{:>3}", value), style.fg(Color::Yellow)),
        ]));

        // Show what comes in the box under each tiffin size
        if let FormField::Meal(size) = field {
            if let Some(offer) = catalog.offer(date.weekday, *size) {
                if !offer.items.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("     {}", offer.items.join(", ")),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    let body = Paragraph::new(lines)
        .block(panel(" Tiffin Preferences ", focused))
        .wrap(Wrap { trim: false });
    f.render_widget(body, area);
}

fn draw_details<S: OrderSink>(f: &mut Frame, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::Details;
    let mut lines = Vec::new();
    let mut cursor_row = None;

    for (i, field) in DetailField::ALL.iter().enumerate() {
        let active = focused && i == app.detail_field;
        let label_style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Blue)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        if active {
            cursor_row = Some(lines.len() as u16);
        }
        lines.push(Line::from(format!("  {}", app.detail_value(*field))));
        lines.push(Line::from(""));
    }

    let body = Paragraph::new(lines).block(panel(" Your Details ", focused));
    f.render_widget(body, area);

    if app.input_mode == InputMode::Editing {
        if let Some(row) = cursor_row {
            f.set_cursor_position(Position::new(area.x + 3 + app.cursor_offset(), area.y + 1 + row));
        }
    }
}

fn draw_status<S: OrderSink>(f: &mut Frame, app: &App<S>, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" Total Price (so far): ₹{} ", app.totals.grand_total),
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if let Some(min) = app.service.features().minimum_order_value {
        spans.push(Span::styled(format!("  Minimum order ₹{}", min), Style::default().fg(Color::DarkGray)));
    }

    let notice = match &app.notice {
        Some(Notice::Info(msg)) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Yellow))),
        Some(Notice::Success(msg)) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Green))),
        Some(Notice::Error(msg)) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
        None => Line::from(""),
    };

    let status = Paragraph::new(vec![Line::from(spans), notice]).block(Block::default().borders(Borders::TOP));
    f.render_widget(status, area);
}
