use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};

use crate::app::{App, Prompt, StatusKind};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let store = app.controller.store();
    let header = Paragraph::new(format!(
        "{} stops · {} checked · {} delivered",
        store.len(),
        store.selected_len(),
        app.controller.deliveries().len()
    ))
    .block(Block::default().borders(Borders::ALL).title("Kurier"));
    frame.render_widget(header, *header_area);

    if app.list_visible {
        let content_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Min(0)])
            .split(*content_area);
        let [map_area, list_area] = content_chunks.as_ref() else {
            return;
        };
        draw_map(frame, app, *map_area);
        draw_stop_list(frame, app, *list_area);
    } else {
        draw_map(frame, app, *content_area);
    }

    draw_status(frame, app, *status_area);

    if let Some(Prompt::LocationPermission) = app.prompt {
        draw_permission_prompt(frame, area);
    }
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let display = app.controller.markers().display();
    let (x_bounds, y_bounds) = display.bounds();
    let title = format!(
        "Map · zoom {:.0} · {} markers (+/- zoom, l list)",
        display.zoom(),
        app.controller.markers().len()
    );

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for marker in display.markers() {
                ctx.print(
                    marker.position.lng,
                    marker.position.lat,
                    Span::styled(
                        format!("● {}", marker.label),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_stop_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let store = app.controller.store();

    let items = if store.is_empty() {
        vec![ListItem::new("No stops left.")]
    } else {
        store
            .stops()
            .iter()
            .map(|stop| {
                let check = if store.is_selected(&stop.name.0) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(format!("{check} {:<24} {}", stop.name, stop.position))
            })
            .collect()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title("Stops (Space check, K/J reorder, d delivered, n navigate)");
    if let Some(link) = &app.last_link {
        block = block.title_bottom(format!("Last route: {link}"));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !store.is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = "↑/↓ move · Space check · K/J reorder · d delivered · n navigate · p location · q quit";

    let (status_text, status_style) = match &app.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => Style::default().fg(Color::Green),
                StatusKind::Busy => Style::default().fg(Color::Yellow),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            (format!("{} · {nav_hint}", status.text), style)
        }
        None => (nav_hint.to_owned(), Style::default()),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn draw_permission_prompt(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered(area, 50, 5);
    let prompt = Paragraph::new("Allow kurier to use your current location for navigation? (y/n)")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Location access"),
        )
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(prompt, popup);
}

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
