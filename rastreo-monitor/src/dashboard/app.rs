use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use time::{OffsetDateTime, UtcOffset};

use super::state::DashboardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box
    Search,
}

/// What the event loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
    Quit,
}

/// Dashboard state plus the interaction bookkeeping of the terminal view.
pub struct App {
    pub state: DashboardState,
    pub mode: InputMode,
    pub offset: UtcOffset,
    /// Cards per row in the last drawn grid
    pub(crate) columns: usize,
    /// Screen areas of the cards drawn last, with their visible position
    pub(crate) card_areas: Vec<(usize, Rect)>,
    /// Map overlay area while it is shown
    pub(crate) popup: Option<Rect>,
}

impl App {
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            state: DashboardState::new(),
            mode: InputMode::Normal,
            offset,
            columns: 1,
            card_areas: Vec::new(),
            popup: None,
        }
    }

    pub fn handle(&mut self, event: Event, now: OffsetDateTime) -> Action {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key, now),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse);
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: OffsetDateTime) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        if self.mode == InputMode::Search {
            self.on_search_key(key.code);
            return Action::None;
        }

        if self.state.map().is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('x') => {
                    self.state.close_map();
                    Action::None
                }
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }

        let visible_len = self.state.visible(now).len();
        self.state.clamp_selection(visible_len);
        match key.code {
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Char('s') => self.state.cycle_branch(),
            KeyCode::Char('p') => self.state.cycle_power(),
            KeyCode::Char('r') => return self.refresh(),
            KeyCode::Char('m') | KeyCode::Enter => {
                if !self.state.open_map(now) {
                    tracing::debug!("Selected device has no coordinates");
                }
            }
            KeyCode::Right => self.state.select_next(visible_len),
            KeyCode::Left => self.state.select_previous(),
            KeyCode::Down => {
                let target = self.state.selected() + self.columns;
                if target < visible_len {
                    self.state.select(target, visible_len);
                }
            }
            KeyCode::Up => {
                if let Some(target) = self.state.selected().checked_sub(self.columns) {
                    self.state.select(target, visible_len);
                }
            }
            _ => {}
        }

        Action::None
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);

        if self.state.map().is_some() {
            if self.popup.is_some_and(|popup| !popup.contains(position)) {
                self.state.close_map();
            }
            return;
        }

        if let Some(&(index, _)) = self.card_areas.iter().find(|(_, area)| area.contains(position)) {
            self.state.select(index, usize::MAX);
        }
    }

    /// A refresh while a fetch is in flight is dropped.
    fn refresh(&self) -> Action {
        if self.state.is_loading() {
            Action::None
        } else {
            Action::Refresh
        }
    }

    fn on_search_key(&mut self, code: KeyCode) {
        let mut term = self.state.criteria.search_term.clone();
        match code {
            KeyCode::Esc | KeyCode::Enter => {
                self.mode = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                term.pop();
            }
            KeyCode::Char(c) => term.push(c),
            _ => return,
        }

        self.state.set_search(term);
    }
}

#[cfg(test)]
mod tests {
    use rastreo_api::{DeviceRecord, Tracking};

    use super::*;
    use crate::dashboard::state::ALL_BRANCHES;
    use crate::services::PollEvent;
    use crate::status::PowerFilter;
    use crate::status::fixtures::{device, now, staffed, tracking};

    fn press(app: &mut App, code: KeyCode) -> Action {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE), now())
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.on_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn app_with(devices: Vec<DeviceRecord>) -> App {
        let mut app = App::new(UtcOffset::UTC);
        app.state.apply(PollEvent::Started);
        app.state.apply(PollEvent::Loaded(devices));
        app
    }

    fn located() -> DeviceRecord {
        device(Tracking {
            latitud: Some(-25.3),
            longitud: Some(-57.6),
            ..tracking()
        })
    }

    #[test]
    fn test_search_mode_edits_term() {
        let mut app = app_with(Vec::new());

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, InputMode::Search);

        for c in "anaq".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(c)), Action::None);
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.state.criteria.search_term, "ana");
    }

    #[test]
    fn test_filter_keys() {
        let mut app = app_with(vec![staffed("A", "Central", tracking())]);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.state.branch_label(), "Central");
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.state.branch_label(), ALL_BRANCHES);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.state.power_filter(), PowerFilter::On);
    }

    #[test]
    fn test_refresh_ignored_while_loading() {
        let mut app = app_with(Vec::new());
        assert_eq!(press(&mut app, KeyCode::Char('r')), Action::Refresh);

        app.state.apply(PollEvent::Started);
        assert_eq!(press(&mut app, KeyCode::Char('r')), Action::None);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(Vec::new());

        assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), now()),
            Action::Quit
        );
    }

    #[test]
    fn test_grid_navigation() {
        let mut app = app_with(vec![device(tracking()); 5]);
        app.columns = 2;

        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), 2);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state.selected(), 3);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.state.selected(), 3);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.state.selected(), 1);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state.selected(), 0);
    }

    #[test]
    fn test_map_overlay_keys() {
        let mut app = app_with(vec![located()]);

        press(&mut app, KeyCode::Char('m'));
        assert!(app.state.map().is_some());

        // Filters are inert behind the overlay.
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.state.power_filter(), PowerFilter::All);

        press(&mut app, KeyCode::Char('x'));
        assert!(app.state.map().is_none());

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert!(app.state.map().is_none());
    }

    #[test]
    fn test_map_opens_after_filtered_list_shrinks() {
        let in_branch = |name: &str, branch: &str| {
            staffed(name, branch, Tracking {
                latitud: Some(-25.3),
                longitud: Some(-57.6),
                ..tracking()
            })
        };
        let mut app = app_with(vec![
            in_branch("A", "Central"),
            in_branch("B", "Central"),
            in_branch("C", "Central"),
        ]);
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state.selected(), 2);

        app.state.apply(PollEvent::Loaded(vec![
            in_branch("A", "Central"),
            in_branch("B", "Norte"),
            in_branch("C", "Norte"),
            in_branch("D", "Norte"),
        ]));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state.selected(), 0);
        assert!(app.state.map().is_some());
    }

    #[test]
    fn test_click_outside_overlay_closes_it() {
        let mut app = app_with(vec![located()]);
        press(&mut app, KeyCode::Enter);
        app.popup = Some(Rect::new(10, 5, 20, 10));

        click(&mut app, 15, 8);
        assert!(app.state.map().is_some());

        click(&mut app, 2, 2);
        assert!(app.state.map().is_none());
    }

    #[test]
    fn test_click_selects_card() {
        let mut app = app_with(vec![device(tracking()); 3]);
        app.card_areas = vec![
            (0, Rect::new(0, 0, 10, 5)),
            (1, Rect::new(10, 0, 10, 5)),
            (2, Rect::new(0, 5, 10, 5)),
        ];

        click(&mut app, 3, 7);
        assert_eq!(app.state.selected(), 2);
    }
}
