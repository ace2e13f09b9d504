//! Application state machine and event dispatcher.
//!
//! Each tab owns one [`ListSession`]. Page fetches run on spawned tasks and
//! report back over a channel; [`App::drain_outcomes`] feeds the results into
//! the owning session, which drops any that a filter change has made stale.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  aggregator::FetchTicket,
  filter::Filters,
  page::PageResponse,
  record::{
    AttendanceRecord,
    Employee,
    EmploymentStatus,
    OnboardingStage,
    OnboardingStep,
  },
  scroll::{ScrollPosition, ScrollTrigger},
  session::{Completion, ListSession, PendingFetch},
  source::{PagedListSource, SourceError},
};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;

use crate::client::{ApiClient, ApiRecord, Endpoint};

/// The employee picker behaves like a nested dropdown.
const EMPLOYEE_TRIGGER: ScrollTrigger = ScrollTrigger::DROPDOWN;
/// Rows left below the cursor before the onboarding board loads more.
const ONBOARDING_TRIGGER: ScrollTrigger = ScrollTrigger::DistanceFromEnd(5);

// ─── Tabs & focus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Employees,
  Attendance,
  Onboarding,
}

impl Tab {
  pub const ALL: [Tab; 3] = [Tab::Employees, Tab::Attendance, Tab::Onboarding];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Employees => "Employees",
      Tab::Attendance => "Attendance",
      Tab::Onboarding => "Onboarding",
    }
  }

  fn next(self) -> Self {
    match self {
      Tab::Employees => Tab::Attendance,
      Tab::Attendance => Tab::Onboarding,
      Tab::Onboarding => Tab::Employees,
    }
  }
}

/// Which pane of the attendance tab has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceFocus {
  Departments,
  Records,
}

// ─── Fetch plumbing ───────────────────────────────────────────────────────────

type PageResult<T> = Result<PageResponse<T>, SourceError>;

/// A finished fetch, tagged with the tab it belongs to.
pub enum FetchOutcome {
  Employees(FetchTicket, PageResult<Employee>),
  Attendance(FetchTicket, PageResult<AttendanceRecord>),
  Onboarding(FetchTicket, PageResult<OnboardingStep>),
}

/// Run `pending` on a spawned task and send the tagged result to `tx`.
fn spawn_fetch<T: ApiRecord>(
  source: Endpoint<T>,
  pending: PendingFetch,
  tx: mpsc::UnboundedSender<FetchOutcome>,
  tag: fn(FetchTicket, PageResult<T>) -> FetchOutcome,
) {
  tokio::spawn(async move {
    let result = source.fetch_page(&pending.request).await;
    // The receiver only goes away when the app is shutting down.
    let _ = tx.send(tag(pending.ticket, result));
  });
}

// ─── List view ────────────────────────────────────────────────────────────────

/// A session plus the cursor the user moves through it.
pub struct ListView<T: ApiRecord> {
  pub session: ListSession<Endpoint<T>>,
  pub cursor:  usize,
}

impl<T: ApiRecord> ListView<T> {
  fn new(source: Endpoint<T>, page_size: u32) -> anyhow::Result<Self> {
    Ok(Self {
      session: ListSession::new(source, page_size, Filters::new())?,
      cursor:  0,
    })
  }

  pub fn selected(&self) -> Option<&T> { self.session.items().get(self.cursor) }

  /// Cursor position in list entries: the cursor row is the viewport.
  fn position(&self) -> ScrollPosition {
    ScrollPosition::new(self.cursor as u32, 1, self.session.items().len() as u32)
  }

  fn down(&mut self) {
    if self.cursor + 1 < self.session.items().len() {
      self.cursor += 1;
    }
  }

  fn up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  fn clamp_cursor(&mut self) {
    let len = self.session.items().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }

  /// Apply a finished fetch. Returns a follow-up fetch when the session
  /// restarts from page 1, and an error message for the status bar.
  fn finish(
    &mut self,
    ticket: &FetchTicket,
    result: PageResult<T>,
  ) -> (Option<PendingFetch>, Option<String>) {
    let outcome = match self.session.complete(ticket, result) {
      Completion::Applied { .. } | Completion::Discarded => (None, None),
      Completion::Restart(pending) => (Some(pending), None),
      Completion::Failed(e) => (None, Some(format!("Error: {e}"))),
    };
    self.clamp_cursor();
    outcome
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab: Tab,

  pub employees:  ListView<Employee>,
  pub attendance: ListView<AttendanceRecord>,
  pub onboarding: ListView<OnboardingStep>,

  /// Search text for the employee list (sent to the server).
  pub search:        String,
  /// Whether the user is typing into the search box.
  pub search_active: bool,
  pub status_filter: Option<EmploymentStatus>,
  pub stage_filter:  Option<OnboardingStage>,

  pub departments:       Vec<String>,
  pub department_cursor: usize,
  /// Department whose attendance is currently expanded.
  pub expanded:          Option<String>,
  pub attendance_focus:  AttendanceFocus,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  client:   ApiClient,
  tx:       mpsc::UnboundedSender<FetchOutcome>,
  outcomes: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl App {
  pub fn new(client: ApiClient, page_size: u32) -> anyhow::Result<Self> {
    let (tx, outcomes) = mpsc::unbounded_channel();
    Ok(Self {
      tab: Tab::Employees,
      employees: ListView::new(client.employees(), page_size)?,
      attendance: ListView::new(client.attendance(), page_size)?,
      onboarding: ListView::new(client.onboarding(), page_size)?,
      search: String::new(),
      search_active: false,
      status_filter: None,
      stage_filter: None,
      departments: Vec::new(),
      department_cursor: 0,
      expanded: None,
      attendance_focus: AttendanceFocus::Departments,
      status_msg: String::new(),
      client,
      tx,
      outcomes,
    })
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the department list and kick off the first page of every tab.
  pub async fn start(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    match self.client.list_departments().await {
      Ok(departments) => self.departments = departments,
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        return Err(e);
      }
    }
    self.status_msg.clear();

    self.load_more_employees();
    self.load_more_onboarding();
    if let Some(first) = self.departments.first().cloned() {
      self.expand_department(first);
    }
    Ok(())
  }

  fn dispatch_employees(&self, pending: PendingFetch) {
    let source = self.employees.session.source().clone();
    spawn_fetch(source, pending, self.tx.clone(), FetchOutcome::Employees);
  }

  fn dispatch_attendance(&self, pending: PendingFetch) {
    let source = self.attendance.session.source().clone();
    spawn_fetch(source, pending, self.tx.clone(), FetchOutcome::Attendance);
  }

  fn dispatch_onboarding(&self, pending: PendingFetch) {
    let source = self.onboarding.session.source().clone();
    spawn_fetch(source, pending, self.tx.clone(), FetchOutcome::Onboarding);
  }

  fn load_more_employees(&mut self) {
    if let Some(pending) = self.employees.session.begin_load_more() {
      self.dispatch_employees(pending);
    }
  }

  fn load_more_onboarding(&mut self) {
    if let Some(pending) = self.onboarding.session.begin_load_more() {
      self.dispatch_onboarding(pending);
    }
  }

  /// Apply every fetch that has finished since the last call.
  pub fn drain_outcomes(&mut self) {
    while let Ok(outcome) = self.outcomes.try_recv() {
      self.apply(outcome);
    }
  }

  fn apply(&mut self, outcome: FetchOutcome) {
    let error = match outcome {
      FetchOutcome::Employees(ticket, result) => {
        let (restart, error) = self.employees.finish(&ticket, result);
        if let Some(pending) = restart {
          self.dispatch_employees(pending);
        }
        error
      }
      FetchOutcome::Attendance(ticket, result) => {
        let (restart, error) = self.attendance.finish(&ticket, result);
        if let Some(pending) = restart {
          self.dispatch_attendance(pending);
        }
        error
      }
      FetchOutcome::Onboarding(ticket, result) => {
        let (restart, error) = self.onboarding.finish(&ticket, result);
        if let Some(pending) = restart {
          self.dispatch_onboarding(pending);
        }
        error
      }
    };
    if let Some(msg) = error {
      self.status_msg = msg;
    }
  }

  // ── Filters ───────────────────────────────────────────────────────────────

  fn employee_filters(&self) -> Filters {
    let mut filters = Filters::new().with("search", self.search.clone());
    if let Some(status) = self.status_filter {
      filters.set("status", status.as_ref());
    }
    filters
  }

  fn apply_employee_filters(&mut self) {
    let filters = self.employee_filters();
    if let Some(pending) = self.employees.session.begin_filter_change(filters) {
      self.employees.cursor = 0;
      self.dispatch_employees(pending);
    }
  }

  fn cycle_status_filter(&mut self) {
    self.status_filter = cycle(self.status_filter);
    self.apply_employee_filters();
  }

  fn cycle_stage_filter(&mut self) {
    self.stage_filter = cycle(self.stage_filter);
    let filters = match self.stage_filter {
      Some(stage) => Filters::new().with("stage", stage.as_ref()),
      None => Filters::new(),
    };
    if let Some(pending) = self.onboarding.session.begin_filter_change(filters) {
      self.onboarding.cursor = 0;
      self.dispatch_onboarding(pending);
    }
  }

  /// Show attendance for `department`, discarding whatever was expanded.
  fn expand_department(&mut self, department: String) {
    let filters = Filters::new().with("department", department.clone());
    self.expanded = Some(department);
    if let Some(pending) = self.attendance.session.begin_filter_change(filters) {
      self.attendance.cursor = 0;
      self.dispatch_attendance(pending);
    }
  }

  fn refresh_current(&mut self) {
    match self.tab {
      Tab::Employees => {
        let pending = self.employees.session.begin_refresh();
        self.dispatch_employees(pending);
      }
      Tab::Attendance if self.expanded.is_some() => {
        let pending = self.attendance.session.begin_refresh();
        self.dispatch_attendance(pending);
      }
      Tab::Attendance => {}
      Tab::Onboarding => {
        let pending = self.onboarding.session.begin_refresh();
        self.dispatch_onboarding(pending);
      }
    }
    self.status_msg.clear();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    // Search input mode: printable keys go into the search box.
    if self.search_active {
      self.handle_search_key(key);
      return true;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Tab => {
        self.tab = self.tab.next();
        self.status_msg.clear();
        return true;
      }
      KeyCode::Char('r') => {
        self.refresh_current();
        return true;
      }
      _ => {}
    }

    match self.tab {
      Tab::Employees => self.handle_employees_key(key),
      Tab::Attendance => self.handle_attendance_key(key),
      Tab::Onboarding => self.handle_onboarding_key(key),
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.search.clear();
        self.apply_employee_filters();
      }
      KeyCode::Enter => self.search_active = false,
      KeyCode::Backspace => {
        self.search.pop();
        self.apply_employee_filters();
      }
      KeyCode::Char(c) => {
        self.search.push(c);
        self.apply_employee_filters();
      }
      _ => {}
    }
  }

  fn handle_employees_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        self.employees.down();
        let position = self.employees.position();
        if let Some(pending) = self
          .employees
          .session
          .begin_scroll(position, EMPLOYEE_TRIGGER)
        {
          self.dispatch_employees(pending);
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.employees.up(),
      KeyCode::Char('/') => {
        self.search_active = true;
      }
      KeyCode::Char('s') => self.cycle_status_filter(),
      _ => {}
    }
  }

  fn handle_attendance_key(&mut self, key: KeyEvent) {
    match self.attendance_focus {
      AttendanceFocus::Departments => match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
          if self.department_cursor + 1 < self.departments.len() {
            self.department_cursor += 1;
          }
        }
        KeyCode::Up | KeyCode::Char('k') => {
          self.department_cursor = self.department_cursor.saturating_sub(1);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
          if let Some(department) = self.departments.get(self.department_cursor).cloned() {
            self.expand_department(department);
            self.attendance_focus = AttendanceFocus::Records;
          }
        }
        _ => {}
      },
      AttendanceFocus::Records => match key.code {
        KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
          self.attendance_focus = AttendanceFocus::Departments;
        }
        KeyCode::Down | KeyCode::Char('j') => self.attendance.down(),
        KeyCode::Up | KeyCode::Char('k') => self.attendance.up(),
        // Explicit "Load More" / "Load Less" buttons.
        KeyCode::Char('m') => {
          if let Some(pending) = self.attendance.session.begin_load_more() {
            self.dispatch_attendance(pending);
          }
        }
        KeyCode::Char('L') => {
          if self.attendance.session.load_less().is_some() {
            self.attendance.clamp_cursor();
          }
        }
        _ => {}
      },
    }
  }

  fn handle_onboarding_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        self.onboarding.down();
        let position = self.onboarding.position();
        if let Some(pending) = self
          .onboarding
          .session
          .begin_scroll(position, ONBOARDING_TRIGGER)
        {
          self.dispatch_onboarding(pending);
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.onboarding.up(),
      KeyCode::Char('s') => self.cycle_stage_filter(),
      _ => {}
    }
  }
}

/// `None` → first variant → … → last variant → `None`.
fn cycle<E: IntoEnumIterator + PartialEq + Copy>(current: Option<E>) -> Option<E> {
  match current {
    None => E::iter().next(),
    Some(value) => E::iter().skip_while(|v| *v != value).nth(1),
  }
}

#[cfg(test)]
impl App {
  /// Wait for outstanding fetches (and any restarts they trigger) to land.
  async fn settle(&mut self) {
    while self.employees.session.aggregator().is_fetching()
      || self.attendance.session.aggregator().is_fetching()
      || self.onboarding.session.aggregator().is_fetching()
    {
      match self.outcomes.recv().await {
        Some(outcome) => self.apply(outcome),
        None => break,
      }
    }
  }
}
