use chrono::{Local, NaiveDate, NaiveDateTime};
use ratatui::widgets::TableState;

use homeboard::board::{MemberBoard, QuotaOutcome};
use homeboard::config::HouseholdConfig;
use homeboard::error::Result;
use homeboard::models::{Frequency, ImportantDate, RecurringTask, Task};
use homeboard::schedule::parse_schedule;
use homeboard::storage::FileStore;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Pane {
    Today,
    Recurring,
    Tasks,
}

/// State for the multi-step "Add" wizard.
#[derive(Default)]
pub struct AddState {
    pub text: String,
    pub frequency: Option<Frequency>,
    pub step: usize, // Recurring: 0 text, 1 frequency, 2 schedule. Tasks: 0 text.
}

pub struct App {
    store: FileStore,
    config: HouseholdConfig,
    pub member: String,
    pub today: NaiveDate,
    pub now: NaiveDateTime,
    pub due: Vec<RecurringTask>,
    pub recurring: Vec<RecurringTask>,
    pub tasks: Vec<Task>,
    pub dates: Vec<ImportantDate>,
    pub current_chore: Option<String>,
    pub media_count: u32,
    pub media_cap: u32,
    pub pane: Pane,
    pub today_state: TableState,
    pub recurring_state: TableState,
    pub task_state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    /// Last notice shown to the user.
    pub status: String,
}

fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => 0,
    };
    state.select(Some(i));
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(store: FileStore, config: HouseholdConfig, member: String) -> App {
        let now = Local::now().naive_local();
        let media_cap = config.weekly_media_cap;
        let mut app = App {
            store,
            config,
            member,
            today: now.date(),
            now,
            due: Vec::new(),
            recurring: Vec::new(),
            tasks: Vec::new(),
            dates: Vec::new(),
            current_chore: None,
            media_count: 0,
            media_cap,
            pane: Pane::Today,
            today_state: TableState::default(),
            recurring_state: TableState::default(),
            task_state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            status: String::new(),
        };
        app.reload();
        app
    }

    fn board(&mut self) -> MemberBoard<&mut FileStore> {
        MemberBoard::load(&mut self.store, &self.config, &self.member, self.today)
    }

    pub fn has_chores(&self) -> bool {
        self.config.has_chores(&self.member)
    }

    pub fn has_media_time(&self) -> bool {
        self.config.has_media_time(&self.member)
    }

    /// Reloads the member's records from storage and refreshes the views.
    pub fn reload(&mut self) {
        let board = self.board();
        let due: Vec<RecurringTask> = board.due_today().into_iter().cloned().collect();
        let recurring = board.list_recurring().to_vec();
        let tasks = board.tasks().to_vec();
        let dates = board.important_dates().to_vec();
        let current_chore = board.current_chore().map(str::to_string);
        let media_count = board.media_usage().count;

        self.due = due;
        self.recurring = recurring;
        self.tasks = tasks;
        self.dates = dates;
        self.current_chore = current_chore;
        self.media_count = media_count;

        clamp_selection(&mut self.today_state, self.due.len());
        clamp_selection(&mut self.recurring_state, self.recurring.len());
        clamp_selection(&mut self.task_state, self.tasks.len());
    }

    /// Called once a second: moves the clock and rolls over to a new day.
    pub fn tick(&mut self) {
        self.now = Local::now().naive_local();
        if self.now.date() != self.today {
            self.today = self.now.date();
            self.reload();
        }
    }

    fn finish(&mut self, result: Result<String>) {
        self.status = match result {
            Ok(msg) => msg,
            Err(e) => e.to_string(),
        };
        self.reload();
    }

    pub fn next_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Today => Pane::Recurring,
            Pane::Recurring => Pane::Tasks,
            Pane::Tasks => Pane::Today,
        };
    }

    pub fn next(&mut self) {
        self.move_selection(true);
    }

    pub fn previous(&mut self) {
        self.move_selection(false);
    }

    fn move_selection(&mut self, forward: bool) {
        match self.pane {
            Pane::Today => step(&mut self.today_state, self.due.len(), forward),
            Pane::Recurring => step(&mut self.recurring_state, self.recurring.len(), forward),
            Pane::Tasks => step(&mut self.task_state, self.tasks.len(), forward),
        }
    }

    fn selected_due(&self) -> Option<&RecurringTask> {
        self.today_state.selected().and_then(|i| self.due.get(i))
    }

    fn selected_recurring(&self) -> Option<&RecurringTask> {
        self.recurring_state.selected().and_then(|i| self.recurring.get(i))
    }

    fn selected_task(&self) -> Option<&Task> {
        self.task_state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Space: done for today, or complete a one-off task.
    pub fn complete_selected(&mut self) {
        match self.pane {
            Pane::Today | Pane::Recurring => {
                let target = if self.pane == Pane::Today {
                    self.selected_due()
                } else {
                    self.selected_recurring()
                };
                if let Some((id, text)) = target.map(|t| (t.id, t.text.clone())) {
                    let result = self.board().complete_today(id).map(|_| format!("'{}' done for today", text));
                    self.finish(result);
                }
            }
            Pane::Tasks => {
                if let Some((id, text)) = self.selected_task().map(|t| (t.id, t.text.clone())) {
                    let result = self.board().complete_task(id).map(|_| format!("'{}' completed", text));
                    self.finish(result);
                }
            }
        }
    }

    pub fn toggle_pause_selected(&mut self) {
        if self.pane != Pane::Recurring {
            return;
        }
        if let Some((id, paused)) = self.selected_recurring().map(|t| (t.id, t.paused)) {
            let mut board = self.board();
            let result = if paused {
                board.resume(id).map(|_| "Resumed".to_string())
            } else {
                board.pause(id).map(|_| "Paused".to_string())
            };
            self.finish(result);
        }
    }

    pub fn delete_selected(&mut self) {
        match self.pane {
            Pane::Recurring => {
                if let Some(id) = self.selected_recurring().map(|t| t.id) {
                    let result = self.board().delete_recurring(id).map(|_| "Recurring task deleted".to_string());
                    self.finish(result);
                }
            }
            Pane::Tasks => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    let result = self.board().complete_task(id).map(|_| "Task deleted".to_string());
                    self.finish(result);
                }
            }
            Pane::Today => {}
        }
    }

    pub fn assign_next_chore(&mut self) {
        if !self.has_chores() {
            return;
        }
        let mut board = self.board();
        let chore = board.next_chore(board.current_chore());
        let result = board
            .assign_chore(chore)
            .map(|_| format!("{} {} chore assigned for all days!", chore.icon(), chore));
        self.finish(result);
    }

    pub fn check_media_time(&mut self) {
        if !self.has_media_time() {
            return;
        }
        let result = self.board().check_quota().map(|outcome| match outcome {
            QuotaOutcome::Exhausted { .. } => "Media time used up this week!".to_string(),
            QuotaOutcome::ChoresIncomplete { .. } => "DO YOUR CHORES FIRST!!!".to_string(),
            QuotaOutcome::Granted { minutes, count, cap } => {
                format!("You can now do {} minutes of media! ({}/{} this week)", minutes, count, cap)
            }
        });
        self.finish(result);
    }

    /// Initiates the "Add" wizard for the focused pane.
    pub fn start_add(&mut self) {
        if self.pane == Pane::Today {
            self.pane = Pane::Recurring;
        }
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles Enter while the wizard is open.
    pub fn handle_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.pane {
            Pane::Tasks => {
                let result = self.board().add_task(&input).map(|id| format!("Task added (id = {})", id));
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.finish(result);
            }
            Pane::Recurring | Pane::Today => match self.add_state.step {
                0 => {
                    if !input.is_empty() {
                        self.add_state.text = input;
                        self.add_state.step += 1;
                        self.input_buffer.clear();
                    }
                }
                1 => match input.parse::<Frequency>() {
                    Ok(f) => {
                        self.add_state.frequency = Some(f);
                        self.add_state.step += 1;
                        self.input_buffer.clear();
                        self.status.clear();
                    }
                    Err(e) => self.status = e.to_string(),
                },
                2 => {
                    let frequency = self.add_state.frequency.unwrap_or(Frequency::Daily);
                    let text = self.add_state.text.clone();
                    let result = parse_schedule(frequency, &input)
                        .and_then(|s| self.board().add_recurring(&text, s))
                        .map(|id| format!("Recurring task added (id = {})", id));
                    match result {
                        Ok(msg) => {
                            self.input_mode = InputMode::Normal;
                            self.input_buffer.clear();
                            self.finish(Ok(msg));
                        }
                        // Stay on the schedule step so the input can be fixed.
                        Err(e) => self.status = e.to_string(),
                    }
                }
                _ => {}
            },
        }
    }
}
