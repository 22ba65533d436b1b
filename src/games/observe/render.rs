//! Observation mode rendering.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::games::prime::level::catalog;
use crate::games::prime::session::join_factors;
use crate::input::{is_narrow_layout, ClickState};
use crate::time::TICKS_PER_SEC;
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::state::ObserveState;

pub fn render(
    state: &ObserveState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let borders = if is_narrow_layout(area.width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Level tabs
            Constraint::Length(6), // Current round
            Constraint::Length(6), // Controls
            Constraint::Min(3),    // History
        ])
        .split(area);

    render_level_tabs(state, f, chunks[0], borders, click_state);
    render_current(state, f, chunks[1], borders);
    render_controls(state, f, chunks[2], borders, click_state);
    render_history(state, f, chunks[3], borders);
}

fn render_level_tabs(
    state: &ObserveState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut bar = TabBar::new("│");
    for level in catalog() {
        let style = if level.number == state.level.number {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        bar = bar.tab(format!("Lv{}", level.number), style, LEVEL_BASE + level.number as u16);
    }
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" 観察モード: {} ", state.level.description()));
    bar.block(block).render(f, area, &mut click_state.borrow_mut());
}

fn render_current(state: &ObserveState, f: &mut Frame, area: Rect, borders: Borders) {
    let lines = match &state.current {
        Some((round, factorization)) => {
            let factors = if factorization.complete {
                join_factors(&factorization.factors)
            } else {
                "?".to_string()
            };
            vec![
                Line::from(Span::styled(
                    round.product.to_string(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("= {factors}"),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(Span::styled(
                    format!("{}個の素数の積", round.primes.len()),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "まもなく表示します…",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let title = if state.paused { " 一時停止中 " } else { " 素数の積 " };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    f.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_controls(
    state: &ObserveState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::White);
    let interval_secs = state.interval() as f64 / TICKS_PER_SEC as f64;

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [Space] ", key_style),
            Span::styled("次の問題", text),
        ]),
        NEXT_ROUND,
    );
    let pause_label = if state.paused { "再開" } else { "一時停止" };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [P] ", key_style),
            Span::styled(pause_label, text),
        ]),
        TOGGLE_PAUSE,
    );
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [+] ", key_style),
            Span::styled(format!("速く（間隔 {interval_secs:.1} 秒）"), text),
        ]),
        FASTER,
    );
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [-] ", key_style),
            Span::styled("遅く", text),
        ]),
        SLOWER,
    );

    let top = if borders.contains(Borders::TOP) { 1 } else { 0 };
    let bottom = if borders.contains(Borders::BOTTOM) { 1 } else { 0 };
    cl.register_targets(area, &mut click_state.borrow_mut(), top, bottom, 0);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" 操作 ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_history(state: &ObserveState, f: &mut Frame, area: Rect, borders: Borders) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .history
        .iter()
        .take(max_lines)
        .map(|entry| {
            Line::from(vec![
                Span::styled(format!(" Lv{} ", entry.level), Style::default().fg(Color::Green)),
                Span::styled(
                    format!("{} = {}", entry.product, join_factors(&entry.primes)),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" 履歴（{}問表示） ", state.rounds_shown));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
