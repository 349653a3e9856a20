use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use rastreo_api::MapLocation;
use time::OffsetDateTime;

use super::app::{App, InputMode};
use super::card::DeviceCard;
use super::map::{MAP_TITLE, browse_url, coordinates_label, embed_url};
use super::state::{EMPTY_MESSAGE, LOADING_MESSAGE};
use crate::status::{PowerFilter, Tone};

pub const TITLE: &str = "Sistema de Rastreo";
pub const SEARCH_PLACEHOLDER: &str = "Buscar por vendedor, sucursal, modelo, teléfono...";

const CARD_WIDTH: u16 = 46;
const CARD_HEIGHT: u16 = 12;
const BAR_WIDTH: usize = 20;

const ACCENT: Color = Color::Rgb(0x3B, 0x82, 0xF6);
const MUTED: Color = Color::Rgb(0x9C, 0xA3, 0xAF);

fn tone(tone: Tone) -> Color {
    let (r, g, b) = tone.rgb();
    Color::Rgb(r, g, b)
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{text:<13}"), Style::new().fg(MUTED))
}

pub fn render(frame: &mut Frame, app: &mut App, now: OffsetDateTime) {
    let banner_height = if app.state.error().is_some() { 3 } else { 0 };
    let [header, stats, banner, body, footer] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(banner_height),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, app);
    render_stats(frame, stats, app, now);
    if let Some(message) = app.state.error() {
        render_error(frame, banner, message);
    }
    render_body(frame, body, app, now);
    render_footer(frame, footer, app);

    app.popup = app.state.map().map(|location| {
        let area = popup_area(frame.area(), 80, 50);
        render_map(frame, area, location);
        area
    });
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let search = &state.criteria.search_term;

    let search_span = match (app.mode, search.is_empty()) {
        (InputMode::Search, _) => Span::styled(format!("{search}▏"), Style::new().fg(Color::White)),
        (InputMode::Normal, true) => Span::styled(SEARCH_PLACEHOLDER, Style::new().fg(MUTED)),
        (InputMode::Normal, false) => Span::raw(search.as_str()),
    };

    let power = match state.power_filter() {
        PowerFilter::All => PowerFilter::All.label().to_string(),
        PowerFilter::On => format!("🟢 {}", PowerFilter::On.label()),
        PowerFilter::Off => format!("🔴 {}", PowerFilter::Off.label()),
    };
    let refresh = if state.is_loading() { "Actualizando..." } else { "Actualizar [r]" };

    let lines = vec![
        Line::from(vec![Span::raw("🔍 "), search_span]),
        Line::from(vec![
            Span::styled("Sucursal: ", Style::new().fg(MUTED)),
            Span::raw(state.branch_label().to_string()),
            Span::styled("  │  Estado: ", Style::new().fg(MUTED)),
            Span::raw(power),
            Span::styled("  │  ", Style::new().fg(MUTED)),
            Span::styled(refresh, Style::new().fg(ACCENT)),
        ]),
    ];

    let block = Block::bordered()
        .title(Span::styled(format!(" {TITLE} "), Style::new().add_modifier(Modifier::BOLD)))
        .border_style(Style::new().fg(ACCENT));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App, now: OffsetDateTime) {
    let stats = app.state.stats(now);
    let tiles = [
        ("DISPOSITIVOS", stats.total, ACCENT),
        ("ENCENDIDOS", stats.on, tone(Tone::Green)),
        ("EN ZONA", stats.in_zone, tone(Tone::Amber)),
    ];

    let areas = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);
    for ((title, count, color), area) in tiles.into_iter().zip(areas.iter()) {
        let text = Line::from(vec![
            Span::styled(format!("{count} "), Style::new().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(title, Style::new().fg(MUTED)),
        ]);

        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(Block::bordered()),
            *area,
        );
    }
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let red = tone(Tone::Red);
    let line = Line::from(vec![
        Span::styled("Error al cargar datos: ", Style::new().fg(red).add_modifier(Modifier::BOLD)),
        Span::raw(message.to_string()),
        Span::styled("  [r] Reintentar", Style::new().fg(ACCENT)),
    ]);

    frame.render_widget(
        Paragraph::new(line).block(Block::bordered().border_style(Style::new().fg(red))),
        area,
    );
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut App, now: OffsetDateTime) {
    app.card_areas.clear();

    if app.state.show_loading() || app.state.show_empty(now) {
        let message = if app.state.show_loading() { LOADING_MESSAGE } else { EMPTY_MESSAGE };
        let [middle] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(
            Paragraph::new(message).alignment(Alignment::Center).style(Style::new().fg(MUTED)),
            middle,
        );
        return;
    }

    let visible = app.state.visible(now);
    let visible_len = visible.len();
    let columns = usize::from((area.width / CARD_WIDTH).max(1));
    let rows_on_screen = usize::from((area.height / CARD_HEIGHT).max(1));
    let selected = app.state.selected().min(visible_len.saturating_sub(1));
    let first_row = (selected / columns).saturating_sub(rows_on_screen - 1);

    let mut card_areas = Vec::new();
    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); rows_on_screen]).split(area);
    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns]).split(*row_area);

        for (column, cell) in cells.iter().enumerate() {
            let index = (first_row + row) * columns + column;
            let Some(device) = visible.get(index) else {
                break;
            };

            let card = DeviceCard::new(device, index, now, app.offset);
            render_card(frame, *cell, &card, index == selected);
            card_areas.push((index, *cell));
        }
    }

    app.state.clamp_selection(visible_len);
    app.columns = columns;
    app.card_areas = card_areas;
}

fn render_card(frame: &mut Frame, area: Rect, card: &DeviceCard, selected: bool) {
    let power_color = tone(card.power.tone());
    let border = if selected { ACCENT } else { Color::DarkGray };

    let block = Block::bordered()
        .title(Line::from(vec![
            Span::styled(format!(" {} ", card.branch), Style::new().add_modifier(Modifier::BOLD)),
            Span::styled(format!("{} ", card.branch_code), Style::new().fg(MUTED)),
        ]))
        .title(
            Line::from(Span::styled(
                format!(" {} ", card.power.label()),
                Style::new().fg(power_color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Right),
        )
        .border_style(Style::new().fg(border));

    let battery_color = tone(card.battery_tone);
    let mut lines = vec![
        Line::from(vec![label("VENDEDOR"), Span::raw(card.salesperson.clone())]),
        Line::from(vec![label("MODELO"), Span::raw(card.imei.clone())]),
        Line::from(vec![
            label("BATERÍA"),
            Span::styled(battery_bar(card.battery_percent, BAR_WIDTH), Style::new().fg(battery_color)),
            Span::styled(format!(" {}", card.battery_label()), Style::new().fg(battery_color)),
        ]),
        Line::from(vec![
            label("UBICACIÓN"),
            Span::styled(card.zone_label, Style::new().fg(tone(zone_tone(card.in_zone)))),
        ]),
    ];

    if let Some(network) = &card.network {
        lines.push(Line::from(vec![label("TIPO DE RED"), Span::raw(network.to_uppercase())]));
    }

    lines.extend([
        Line::from(vec![label("TELÉFONO"), Span::styled(card.phone.clone(), Style::new().fg(ACCENT))]),
        Line::from(vec![
            label("ACTUALIZADO"),
            Span::styled(card.last_seen.clone(), Style::new().fg(tone(card.age.tone()))),
        ]),
        Line::from(Span::styled(
            format!("Fecha exacta: {}", card.captured_at),
            Style::new().fg(MUTED),
        )),
    ]);

    if card.has_location {
        lines.push(Line::from(Span::styled("📍 Ver en mapa [m]", Style::new().fg(ACCENT))));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn zone_tone(in_zone: bool) -> Tone {
    if in_zone { Tone::Green } else { Tone::Red }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hint = match (app.mode, app.state.map().is_some()) {
        (InputMode::Search, _) => "Escriba para buscar · Enter/Esc terminar",
        (InputMode::Normal, true) => "Esc/x cerrar mapa · q salir",
        (InputMode::Normal, false) => {
            "/ buscar · s sucursal · p estado · r actualizar · ←↑↓→ seleccionar · m mapa · q salir"
        }
    };

    frame.render_widget(Paragraph::new(hint).style(Style::new().fg(MUTED)), area);
}

fn render_map(frame: &mut Frame, area: Rect, location: MapLocation) {
    let block = Block::bordered()
        .title(Span::styled(format!(" {MAP_TITLE} "), Style::new().add_modifier(Modifier::BOLD)))
        .title(Line::from(" ✕ [x] ").alignment(Alignment::Right))
        .border_style(Style::new().fg(ACCENT));

    let lines = vec![
        Line::from(Span::styled(coordinates_label(location), Style::new().add_modifier(Modifier::BOLD))),
        Line::default(),
        Line::from(Span::styled("Mapa embebido:", Style::new().fg(MUTED))),
        Line::from(embed_url(location)),
        Line::default(),
        Line::from(Span::styled("Abrir en el navegador:", Style::new().fg(MUTED))),
        Line::from(Span::styled(browse_url(location), Style::new().fg(ACCENT))),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

/// `percent` of `width` cells filled.
pub fn battery_bar(percent: u16, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
