//! Main TUI application state and logic

use crate::interpreter::constants::AUTOPLAY_INTERVAL_MS;
use crate::interpreter::engine::Simulator;
use crate::ui::panes::{
    render_log_pane, render_source_pane, render_status_bar, render_terminal_pane,
    render_variables_pane, SourceRenderData, SourceScrollState, StatusRenderData,
    VariablesRenderData,
};
use crate::ui::theme::DEFAULT_THEME;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Variables,
    Log,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> variables -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Log,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Variables => FocusedPane::Output,
            FocusedPane::Log => FocusedPane::Variables,
        }
    }
}

/// The main application state
pub struct App {
    /// The simulator being driven
    pub sim: Simulator,

    /// Why nothing is traced, when the load did not produce a program
    pub notice: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub variables_scroll: usize,
    pub log_scroll: usize,
    pub output_scroll: usize,

    /// 0-based run-to target line
    pub cursor_line: usize,

    /// Keep the cursor in view instead of the current line until the next step
    pub follow_cursor: bool,

    /// Text typed while a statement waits for input
    pub input_buffer: String,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app around a loaded simulator
    pub fn new(sim: Simulator, notice: Option<String>) -> Self {
        let status_message = notice.clone().unwrap_or_else(|| String::from("Ready!"));
        App {
            sim,
            notice,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            variables_scroll: 0,
            log_scroll: 0,
            output_scroll: 0,
            cursor_line: 0,
            follow_cursor: false,
            input_buffer: String::new(),
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing
                && self.last_play_time.elapsed() >= Duration::from_millis(AUTOPLAY_INTERVAL_MS)
            {
                self.play_tick();
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let input_height = if self.sim.pending_input().is_some() { 3 } else { 0 };

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(input_height),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_header(frame, main_chunks[0]);

        // Split into 2 columns
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[1]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Variables (top) | Log (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(columns[1]);

        let current_line = self
            .sim
            .position()
            .filter(|&p| !self.sim.is_finished() && p < self.sim.program().len());
        render_source_pane(
            frame,
            left_rows[0],
            &SourceRenderData {
                lines: self.sim.program().lines(),
                current_line,
                cursor_line: self.cursor_line,
                awaiting_input: self.sim.pending_input().is_some(),
                follow_cursor: self.follow_cursor,
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_terminal_pane(
            frame,
            left_rows[1],
            self.sim.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        render_variables_pane(
            frame,
            right_rows[0],
            &VariablesRenderData {
                variables: self.sim.variables(),
                loops: self.sim.loop_stack(),
            },
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        render_log_pane(
            frame,
            right_rows[1],
            self.sim.log(),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        if input_height > 0 {
            self.render_input_row(frame, main_chunks[2]);
        }

        render_status_bar(
            frame,
            main_chunks[3],
            &StatusRenderData {
                message: &self.status_message,
                step: self.sim.history().len().saturating_sub(1),
                is_playing: self.is_playing,
                is_finished: self.sim.is_finished(),
                awaiting_input: self.sim.pending_input().is_some(),
                problem: self.notice.is_some(),
            },
        );
    }

    /// Title, record header and the line about to run
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let record = self.sim.record();
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", record.title),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}   ", record.header()),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled(
                self.sim.current_line_description(),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_input_row(&self, frame: &mut Frame, area: Rect) {
        let description = self
            .sim
            .pending_input()
            .map(|request| request.description.clone())
            .unwrap_or_default();
        let block = Block::default()
            .title(format!(" Input · {} ", description))
            .borders(Borders::ALL)
            .border_style(
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD),
            );
        let text = Line::from(vec![
            Span::styled(self.input_buffer.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            Span::styled("█", Style::default().fg(DEFAULT_THEME.secondary)),
        ]);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.sim.pending_input().is_some() && self.handle_input_key(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if self.sim.step_forward().is_err() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.after_step();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    self.cursor_line = self.cursor_line.saturating_sub(1);
                    self.follow_cursor = true;
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    let last = self.sim.program().len().saturating_sub(1);
                    self.cursor_line = (self.cursor_line + 1).min(last);
                    self.follow_cursor = true;
                }
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1);
                }
                FocusedPane::Log => {
                    self.log_scroll = self.log_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_millis(AUTOPLAY_INTERVAL_MS))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                match self.sim.run_to_line(self.cursor_line) {
                    Ok(()) => {
                        self.status_message = match self.sim.pending_input() {
                            Some(request) => format!("Stopped for input: {}", request.description),
                            None => format!("Ran to line {}", self.cursor_line + 1),
                        };
                    }
                    Err(e) => {
                        self.status_message = format!("Cannot run to line: {}", e);
                    }
                }
                self.after_step();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.is_playing = false;
                self.sim.reset();
                self.status_message = "Reset to start".to_string();
                self.after_step();
            }
            _ => {}
        }
    }

    /// Keys that edit or submit the pending input. Returns whether the key was consumed.
    fn handle_input_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                let raw = std::mem::take(&mut self.input_buffer);
                match self.sim.submit_input(&raw) {
                    Ok(()) => self.status_message = "Input accepted".to_string(),
                    Err(e) => self.status_message = format!("Cannot submit input: {}", e),
                }
                self.after_step();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            // Esc on an empty buffer quits
            KeyCode::Esc if self.input_buffer.is_empty() => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.input_buffer.clear();
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            _ => return false,
        }
        true
    }

    /// One autoplay step; stops playback on any refusal or input request
    fn play_tick(&mut self) {
        match self.sim.step_forward() {
            Ok(()) => {
                self.status_message = match self.sim.pending_input() {
                    Some(request) => {
                        self.is_playing = false;
                        format!("Waiting for input: {}", request.description)
                    }
                    None => "Playing...".to_string(),
                };
            }
            Err(e) => {
                self.is_playing = false;
                self.status_message = format!("Playback stopped: {}", e);
            }
        }
        self.after_step();
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        match self.sim.step_forward() {
            Ok(()) => {
                self.status_message = match self.sim.pending_input() {
                    Some(request) => format!("Waiting for input: {}", request.description),
                    None => "Stepped forward".to_string(),
                };
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
        self.after_step();
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        match self.sim.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
        self.after_step();
    }

    /// Follow the current line and auto-scroll log and output to the bottom
    fn after_step(&mut self) {
        self.follow_cursor = false;
        self.log_scroll = usize::MAX;
        self.output_scroll = usize::MAX;
    }
}
