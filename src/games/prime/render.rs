//! Factorization game rendering (read-only from state).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::time::TICKS_PER_SEC;
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::level::catalog;
use super::session::{join_factors, SessionPhase};
use super::state::{FeedbackKind, PrimeState};

/// Prime buttons per row.
const PRIMES_PER_ROW: usize = 5;

pub fn render(
    state: &PrimeState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let is_narrow = is_narrow_layout(area.width);
    let borders = if is_narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let (main_area, side_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let prime_rows = state.level.available_primes.len().div_ceil(PRIMES_PER_ROW) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // Level tabs
            Constraint::Length(7),              // Number panel
            Constraint::Length(prime_rows + 2), // Prime buttons
            Constraint::Length(8),              // Commands
            Constraint::Min(3),                 // Log (narrow only)
        ])
        .split(main_area);

    render_level_tabs(state, f, chunks[0], borders, click_state);
    render_number_panel(state, f, chunks[1], borders, click_state);
    render_prime_buttons(state, f, chunks[2], borders, click_state);
    render_commands(state, f, chunks[3], borders, click_state);

    let log_area = side_area.unwrap_or(chunks[4]);
    if state.show_history {
        render_history(state, f, log_area, borders);
    } else {
        render_log(state, f, log_area, borders);
    }
}

fn render_level_tabs(
    state: &PrimeState,
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
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        bar = bar.tab(format!("Lv{}", level.number), style, LEVEL_BASE + level.number as u16);
    }
    let title = format!(" {} ", state.level.description());
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    bar.block(block).render(f, area, &mut click_state.borrow_mut());
}

fn render_number_panel(
    state: &PrimeState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let session = &state.session;
    let border_color = match session.phase() {
        SessionPhase::Complete => Color::Green,
        SessionPhase::Revealed => Color::Magenta,
        _ => Color::Yellow,
    };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(border_color))
        .title(" 素数の積 ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(original) = session.original_product() else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "[Space] で問題を生成",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(hint, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Product
            Constraint::Length(1), // Current value
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Pending chips
            Constraint::Min(0),    // Status
        ])
        .split(inner);

    let product = Paragraph::new(Line::from(vec![
        Span::styled("問題: ", Style::default().fg(Color::Gray)),
        Span::styled(
            original.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(product, rows[0]);

    let current = Paragraph::new(Line::from(vec![
        Span::styled("現在の値: ", Style::default().fg(Color::Gray)),
        Span::styled(
            session.current_value().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(current, rows[1]);

    if let Some(progress) = session.progress_line() {
        let color = if session.is_completed() { Color::Green } else { Color::Cyan };
        let widget = Paragraph::new(Span::styled(progress, Style::default().fg(color)))
            .alignment(Alignment::Center);
        f.render_widget(widget, rows[2]);
    }

    if session.pending().is_empty() {
        let text = if session.phase() == SessionPhase::InProgress && !state.settings.instant_divide {
            "素数を選んでください"
        } else {
            ""
        };
        let widget = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center);
        f.render_widget(widget, rows[3]);
    } else {
        let mut chips = TabBar::new(" ");
        for (i, p) in session.pending().iter().enumerate() {
            chips = chips.tab(
                format!("{p}✕"),
                Style::default().fg(Color::Black).bg(Color::Yellow),
                DESELECT_BASE + i as u16,
            );
        }
        chips.render(f, rows[3], &mut click_state.borrow_mut());
    }

    let status = match session.phase() {
        SessionPhase::Complete => {
            let mut spans = vec![Span::styled(
                "🎉 完了！",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )];
            if let Some(ticks) = state.advance_countdown {
                let secs = ticks.div_ceil(TICKS_PER_SEC);
                spans.push(Span::styled(
                    format!("  次の問題まで {secs} 秒"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
        SessionPhase::Revealed => {
            let answer = session
                .round()
                .map(|r| format!("💡 {} = {}", r.product, join_factors(&r.primes)))
                .unwrap_or_default();
            Line::from(Span::styled(answer, Style::default().fg(Color::Magenta)))
        }
        _ => Line::from(""),
    };
    f.render_widget(Paragraph::new(status).alignment(Alignment::Center), rows[4]);
}

fn render_prime_buttons(
    state: &PrimeState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let active = state.session.phase() == SessionPhase::InProgress;
    let title = if state.settings.instant_divide {
        " 素数（押すとすぐ割る） "
    } else {
        " 素数 "
    };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Blue))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut cs = click_state.borrow_mut();
    let primes = &state.level.available_primes;
    for (row, chunk) in primes.chunks(PRIMES_PER_ROW).enumerate() {
        let y = inner.y + row as u16;
        if y >= inner.y + inner.height {
            break;
        }
        let mut bar = TabBar::new(" ");
        for (col, p) in chunk.iter().enumerate() {
            let idx = row * PRIMES_PER_ROW + col;
            let selected = state.session.pending().contains(p);
            let style = if !active {
                Style::default().fg(Color::DarkGray)
            } else if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            bar = bar.tab(format!("{}:{:>2}", key_label(idx), p), style, PRIME_BASE + idx as u16);
        }
        bar.render(f, Rect::new(inner.x, y, inner.width, 1), &mut cs);
    }
}

/// Key shown next to the `idx`-th prime button.
fn key_label(idx: usize) -> char {
    const KEYS: [char; 15] = [
        '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '!', '@', '#', '$', '%',
    ];
    KEYS.get(idx).copied().unwrap_or(' ')
}

fn render_commands(
    state: &PrimeState,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::White);
    let dim = Style::default().fg(Color::DarkGray);
    let active = state.session.phase() == SessionPhase::InProgress;
    let can_submit = active && !state.session.pending().is_empty();

    let mut cl = ClickableList::new();
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [Space] ", key_style),
            Span::styled("新しい問題", text),
        ]),
        NEW_ROUND,
    );
    if !state.settings.instant_divide {
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [Enter] ", key_style),
                Span::styled("選んだ素数で割る", if can_submit { text } else { dim }),
            ]),
            SUBMIT,
        );
        cl.push_clickable(
            Line::from(vec![
                Span::styled(" [C] ", key_style),
                Span::styled("選択をクリア", if can_submit { text } else { dim }),
            ]),
            CLEAR,
        );
    }
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [?] ", key_style),
            Span::styled("答えを見る", if active { text } else { dim }),
        ]),
        REVEAL,
    );
    let instant = if state.settings.instant_divide { "ON" } else { "OFF" };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [I] ", key_style),
            Span::styled(format!("即時割り算: {instant}"), text),
        ]),
        TOGGLE_INSTANT,
    );
    let panel = if state.show_history { "ログ" } else { "履歴" };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(" [H] ", key_style),
            Span::styled(format!("{panel}を表示"), text),
        ]),
        TOGGLE_HISTORY,
    );
    cl.push(Line::from(Span::styled(
        format!(
            " 正解 {} / 答え表示 {}",
            state.rounds_solved, state.rounds_revealed
        ),
        dim,
    )));

    let top = if borders.contains(Borders::TOP) { 1 } else { 0 };
    let bottom = if borders.contains(Borders::BOTTOM) { 1 } else { 0 };
    cl.register_targets(area, &mut click_state.borrow_mut(), top, bottom, 0);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" 操作 ");
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_log(state: &PrimeState, f: &mut Frame, area: Rect, borders: Borders) {
    let lines: Vec<Line> = state
        .log
        .iter()
        .map(|entry| {
            let color = match entry.kind {
                FeedbackKind::Info => Color::Gray,
                FeedbackKind::Success => Color::Green,
                FeedbackKind::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" > {}", entry.text),
                Style::default().fg(color),
            ))
        })
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" ログ ");
    let inner = block.inner(area);

    // Keep the newest entry in view once wrapped lines overflow the panel.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let wrapped = paragraph.line_count(inner.width) as u16;
    let scroll = wrapped.saturating_sub(inner.height);
    f.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

fn render_history(state: &PrimeState, f: &mut Frame, area: Rect, borders: Borders) {
    let lines: Vec<Line> = if state.history.is_empty() {
        vec![Line::from(Span::styled(
            " まだ問題がありません",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .history
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!(" Lv{} ", entry.level),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!("{} = {}", entry.product, join_factors(&entry.primes)),
                        Style::default().fg(Color::White),
                    ),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" 履歴（新しい順） ");
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
