mod games;
mod input;
mod log;
mod settings;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::{create_game, AppState, GameChoice};
use input::{is_narrow_layout, pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent, KEY_BACKSPACE, KEY_ENTER};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::{Frame, Terminal};
use ratzilla::{DomBackend, WebRenderer};
use time::GameTime;
use widgets::ClickableList;

/// Header button; a game may consume it first (e.g. to close a sub-panel).
const BACK_TO_MENU: u16 = u16::MAX;

/// Menu entries (base + index into `GameChoice::ALL`).
const MENU_BASE: u16 = 1;

/// Query the grid container's bounding rect and convert a pointer position
/// to a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend renders the grid as a <div> directly inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn key_to_event(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Char(c) => Some(InputEvent::Key(c)),
        KeyCode::Enter => Some(InputEvent::Key(KEY_ENTER)),
        KeyCode::Backspace => Some(InputEvent::Key(KEY_BACKSPACE)),
        KeyCode::Esc => Some(InputEvent::Key('q')),
        _ => None,
    }
}

fn menu_choice(event: &InputEvent) -> Option<GameChoice> {
    let idx = match event {
        InputEvent::Key(c @ '1'..='9') => *c as usize - '1' as usize,
        InputEvent::Click(id) if *id >= MENU_BASE && *id != BACK_TO_MENU => (id - MENU_BASE) as usize,
        _ => return None,
    };
    GameChoice::ALL.get(idx).copied()
}

fn is_back(event: &InputEvent) -> bool {
    matches!(event, InputEvent::Key('q') | InputEvent::Click(BACK_TO_MENU))
}

fn dispatch(app: &mut AppState, event: InputEvent) {
    match app {
        AppState::Menu => {
            if let Some(choice) = menu_choice(&event) {
                let settings = settings::load();
                log::info(&format!("[input] start {choice:?} at level {}", settings.level));
                *app = AppState::Playing {
                    game: create_game(choice, settings),
                };
            }
        }
        AppState::Playing { game } => {
            if !game.handle_input(&event) && is_back(&event) {
                *app = AppState::Menu;
            }
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let app = Rc::new(RefCell::new(AppState::Menu));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let game_time = Rc::new(RefCell::new(GameTime::new(time::TICKS_PER_SEC)));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let Some((col, row)) = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs) else {
                return;
            };
            let action = cs.hit_test(col, row);
            log::info(&format!(
                "[input] click: cell=({col}, {row}), action={action:?}, targets={}",
                cs.targets.len()
            ));
            drop(cs);

            if let Some(id) = action {
                dispatch(&mut app.borrow_mut(), InputEvent::Click(id));
            }
        }
    });

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let Some(event) = key_to_event(key_event.code) {
                dispatch(&mut app.borrow_mut(), event);
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = game_time.borrow_mut().update(time::frame_ms());
            if ticks > 0 {
                if let AppState::Playing { game } = &mut *app.borrow_mut() {
                    game.tick(ticks);
                }
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(5)])
                .split(size);

            let app = app.borrow();
            match &*app {
                AppState::Menu => {
                    render_header(f, chunks[0], false, &click_state);
                    render_menu(f, chunks[1], &click_state);
                }
                AppState::Playing { game } => {
                    render_header(f, chunks[0], true, &click_state);
                    game.render(f, chunks[1], &click_state);
                }
            }
        }
    });

    Ok(())
}

fn render_header(f: &mut Frame, area: Rect, playing: bool, click_state: &Rc<RefCell<ClickState>>) {
    let mut spans = vec![Span::styled(
        " 素数の積 ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if playing {
        spans.push(Span::styled(" [Q] メニューへ ", Style::default().fg(Color::DarkGray)));
        click_state.borrow_mut().add_row_target(area, area.y, BACK_TO_MENU);
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_menu(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let borders = if is_narrow_layout(area.width) {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(""));
    for (i, choice) in GameChoice::ALL.iter().enumerate() {
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" [{}] ", i + 1),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(choice.title(), Style::default().fg(Color::White)),
            ]),
            MENU_BASE + i as u16,
        );
        cl.push(Line::from(Span::styled(
            format!("      {}", choice.summary()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1, 0);

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" モードを選択 ")
        .title_alignment(Alignment::Center);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}
