//! Main TUI application state and logic

use crate::dashboard::{Dashboard, Tab};
use crate::fixtures::Difficulty;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// How long the event loop waits for input before ticking background work
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The main application state
pub struct App {
    pub dashboard: Dashboard,

    /// Whether the app should quit
    pub should_quit: bool,

    /// First buffer line shown in the editor pane
    pub editor_scroll: usize,

    /// Editor rows visible in the last frame, used for PageUp/PageDown
    pub editor_height: usize,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        App {
            dashboard,
            should_quit: false,
            editor_scroll: 0,
            editor_height: 20,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with a timeout so finished runs and reviews show up unprompted
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.dashboard.tick(Instant::now());
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        super::panes::render_header(frame, main_chunks[0], self.dashboard.tab);

        let body = main_chunks[1];
        match self.dashboard.tab {
            Tab::Editor => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(body);

                self.editor_height = columns[0].height.saturating_sub(2).max(1) as usize;
                let editor = &mut self.dashboard.editor;
                let fault_line = editor.output.report().and_then(|r| r.fault_line);
                let is_running = editor.is_running();

                super::panes::render_editor_pane(
                    frame,
                    columns[0],
                    &editor.buffer,
                    fault_line,
                    is_running,
                    &mut self.editor_scroll,
                );
                super::panes::render_output_pane(frame, columns[1], &mut editor.output, is_running);
            }
            Tab::Analysis => {
                super::panes::render_analysis_pane(frame, body, &self.dashboard.analysis);
            }
            Tab::Tutorials => {
                super::panes::render_tutorials_pane(frame, body, &self.dashboard.tutorials);
            }
            Tab::Exercises => {
                super::panes::render_exercises_pane(frame, body, &self.dashboard.exercises);
            }
        }

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.dashboard.status_message,
            self.dashboard.tab,
            self.dashboard.editor.is_running(),
            self.dashboard.analysis.is_analyzing(),
            self.dashboard.editor.output.is_failure(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Bindings that work on every tab
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if ctrl => {
                self.dashboard.run_code();
                return;
            }
            KeyCode::F(5) => {
                self.dashboard.run_code();
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.dashboard.reset_code();
                self.editor_scroll = 0;
                return;
            }
            KeyCode::Esc => {
                self.dashboard.cancel_run();
                return;
            }
            KeyCode::F(n @ 1..=4) => {
                self.dashboard.select_tab(Tab::ALL[n as usize - 1]);
                return;
            }
            _ => {}
        }

        match self.dashboard.tab {
            Tab::Editor => self.handle_editor_key(key, ctrl),
            Tab::Analysis => self.handle_analysis_key(key),
            Tab::Tutorials => self.handle_tutorials_key(key),
            Tab::Exercises => self.handle_exercises_key(key),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, ctrl: bool) {
        let editor = &mut self.dashboard.editor;
        let buffer = &mut editor.buffer;
        match key.code {
            KeyCode::Up if ctrl => {
                editor.output.scroll = editor.output.scroll.saturating_sub(1);
            }
            KeyCode::Down if ctrl => {
                editor.output.scroll = editor.output.scroll.saturating_add(1);
            }
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => buffer.insert_char(c),
            KeyCode::Enter => buffer.newline(),
            KeyCode::Tab => buffer.insert_tab(),
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Delete => buffer.delete(),
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Up => buffer.move_up(),
            KeyCode::Down => buffer.move_down(),
            KeyCode::Home => buffer.home(),
            KeyCode::End => buffer.end(),
            KeyCode::PageUp => buffer.page_up(self.editor_height),
            KeyCode::PageDown => buffer.page_down(self.editor_height),
            _ => {}
        }
    }

    fn handle_analysis_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.dashboard.start_analysis(Instant::now()),
            KeyCode::Tab => self.dashboard.select_tab(Tab::Analysis.next()),
            KeyCode::BackTab => self.dashboard.select_tab(Tab::Analysis.prev()),
            _ => {}
        }
    }

    fn handle_tutorials_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.dashboard.tutorials.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.dashboard.tutorials.select_next(),
            KeyCode::Char('p') => {
                self.dashboard.load_practice();
                self.editor_scroll = 0;
            }
            KeyCode::Tab => self.dashboard.select_tab(Tab::Tutorials.next()),
            KeyCode::BackTab => self.dashboard.select_tab(Tab::Tutorials.prev()),
            _ => {}
        }
    }

    fn handle_exercises_key(&mut self, key: KeyEvent) {
        let exercises = &mut self.dashboard.exercises;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='3') => {
                let tier = Difficulty::ALL[(c as u8 - b'1') as usize];
                exercises.set_difficulty(tier);
                self.dashboard.status_message = format!("Difficulty: {}", tier);
            }
            KeyCode::Char('d') => {
                exercises.cycle_difficulty();
                self.dashboard.status_message = format!("Difficulty: {}", exercises.difficulty());
            }
            KeyCode::Char('n') => {
                exercises.new_exercise();
                self.dashboard.status_message = format!("New exercise: {}", exercises.exercise().title);
            }
            KeyCode::Char('h') => {
                if !exercises.next_hint() {
                    self.dashboard.status_message = "No more hints".to_string();
                }
            }
            KeyCode::Char('s') => exercises.toggle_solution(),
            KeyCode::Enter => self.dashboard.submit_exercise(),
            KeyCode::Char('e') => {
                self.dashboard.load_solution();
                self.editor_scroll = 0;
            }
            KeyCode::Tab => self.dashboard.select_tab(Tab::Exercises.next()),
            KeyCode::BackTab => self.dashboard.select_tab(Tab::Exercises.prev()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CodeRunner;
    use ratatui::backend::TestBackend;

    fn app(tab: Tab) -> App {
        App::new(Dashboard::new(
            CodeRunner::default(),
            Duration::from_millis(10),
            tab,
        ))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_function_keys_switch_tabs() {
        let mut app = app(Tab::Editor);
        press(&mut app, KeyCode::F(3));
        assert_eq!(app.dashboard.tab, Tab::Tutorials);
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.dashboard.tab, Tab::Editor);
    }

    #[test]
    fn test_q_types_in_editor_but_quits_elsewhere() {
        let mut app = app(Tab::Editor);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert!(app.dashboard.editor.buffer.text().starts_with('q'));

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_l_resets_editor() {
        let mut app = app(Tab::Editor);
        press(&mut app, KeyCode::Char('x'));
        ctrl(&mut app, 'l');
        assert_eq!(app.dashboard.editor.buffer.text(), crate::fixtures::RESET_SNIPPET);
    }

    #[test]
    fn test_exercise_keys() {
        let mut app = app(Tab::Exercises);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.dashboard.exercises.difficulty(), Difficulty::Intermediate);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.dashboard.exercises.score(), 20);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.dashboard.tab, Tab::Editor);
    }

    #[test]
    fn test_every_tab_renders() {
        let mut app = app(Tab::Editor);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for tab in Tab::ALL {
            app.dashboard.select_tab(tab);
            terminal.draw(|f| app.render(f)).unwrap();
        }
        app.dashboard.exercises.toggle_solution();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app(Tab::Editor);
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).unwrap();
        for tab in Tab::ALL {
            app.dashboard.select_tab(tab);
            terminal.draw(|f| app.render(f)).unwrap();
        }
    }
}
