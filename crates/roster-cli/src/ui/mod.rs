//! TUI rendering — orchestrates all panes.

pub mod detail;
pub mod list_pane;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use roster_core::record::{AttendanceRecord, AttendanceStatus, Employee, OnboardingStep};

use crate::app::{App, AttendanceFocus, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  match app.tab {
    Tab::Employees => draw_employees(f, rows[1], app),
    Tab::Attendance => draw_attendance(f, rows[1], app),
    Tab::Onboarding => draw_onboarding(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let mut spans = vec![Span::styled(
    " roster ",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  )];
  for tab in Tab::ALL {
    let style = if tab == app.tab {
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!(" {} ", tab.title()), style));
  }

  let date = Local::now().format("%Y-%m-%d ").to_string();
  let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize).saturating_sub(used + date.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(date, Style::default().fg(Color::Gray)));

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Tabs ─────────────────────────────────────────────────────────────────────

fn split_columns(area: Rect, left: u16) -> std::rc::Rc<[Rect]> {
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(left), Constraint::Percentage(100 - left)])
    .split(area)
}

fn draw_employees(f: &mut Frame, area: Rect, app: &App) {
  let mut area = area;
  if app.search_active || !app.search.is_empty() {
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(area);
    let text = if app.search_active {
      format!("/{}_", app.search)
    } else {
      format!("/{}", app.search)
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      rows[0],
    );
    area = rows[1];
  }

  let title = match app.status_filter {
    Some(status) => format!("Employees · {status}"),
    None => "Employees".to_string(),
  };
  let cols = split_columns(area, 45);
  list_pane::draw(f, cols[0], &title, &app.employees, true, employee_row);
  detail::draw_employee(f, cols[1], app.employees.selected());
}

fn draw_attendance(f: &mut Frame, area: Rect, app: &App) {
  let cols = split_columns(area, 25);
  draw_departments(f, cols[0], app);

  match &app.expanded {
    Some(department) => list_pane::draw(
      f,
      cols[1],
      department,
      &app.attendance,
      app.attendance_focus == AttendanceFocus::Records,
      attendance_row,
    ),
    None => {
      let block = Block::default()
        .title(" Attendance ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
      f.render_widget(
        Paragraph::new("Pick a department and press Enter.")
          .style(Style::default().fg(Color::DarkGray))
          .block(block),
        cols[1],
      );
    }
  }
}

fn draw_departments(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.attendance_focus == AttendanceFocus::Departments;
  let block = Block::default()
    .title(" Departments ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));

  let items: Vec<ListItem> = app
    .departments
    .iter()
    .map(|d| {
      let marker = if app.expanded.as_ref() == Some(d) { "▾ " } else { "▸ " };
      ListItem::new(format!("{marker}{d}"))
    })
    .collect();

  let mut state = ListState::default();
  state.select((!app.departments.is_empty()).then_some(app.department_cursor));
  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::Blue).fg(Color::White)),
    area,
    &mut state,
  );
}

fn draw_onboarding(f: &mut Frame, area: Rect, app: &App) {
  let title = match app.stage_filter {
    Some(stage) => format!("Onboarding · {stage}"),
    None => "Onboarding".to_string(),
  };
  let cols = split_columns(area, 55);
  list_pane::draw(f, cols[0], &title, &app.onboarding, true, step_row);
  detail::draw_step(f, cols[1], app.onboarding.selected());
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

fn employee_row(e: &Employee) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("{} ", e.employee_no), Style::default().fg(Color::DarkGray)),
    Span::raw(e.full_name.clone()),
    Span::styled(
      format!("  {}", e.status),
      Style::default().fg(detail::status_color(e.status)),
    ),
  ])
}

fn attendance_row(a: &AttendanceRecord) -> Line<'static> {
  let color = match a.status {
    AttendanceStatus::Present => Color::Green,
    AttendanceStatus::Late => Color::Yellow,
    AttendanceStatus::Absent => Color::Red,
    AttendanceStatus::OnLeave => Color::Cyan,
  };
  let hours = match (a.check_in, a.check_out) {
    (Some(i), Some(o)) => format!("  {}–{}", i.format("%H:%M"), o.format("%H:%M")),
    (Some(i), None) => format!("  {}–", i.format("%H:%M")),
    _ => String::new(),
  };
  Line::from(vec![
    Span::styled(format!("{} ", a.date.format("%Y-%m-%d")), Style::default().fg(Color::DarkGray)),
    Span::raw(a.employee_name.clone()),
    Span::styled(format!("  {}", a.status), Style::default().fg(color)),
    Span::styled(hours, Style::default().fg(Color::DarkGray)),
  ])
}

fn step_row(s: &OnboardingStep) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("[{}] ", s.stage),
      Style::default().fg(detail::stage_color(s.stage)),
    ),
    Span::raw(format!("{} · {}", s.employee_name, s.title)),
  ])
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.tab {
    Tab::Employees if app.search_active => ("SEARCH", "Type to search  Esc clear  Enter done"),
    Tab::Employees => (
      "EMPLOYEES",
      "↑↓/jk navigate  / search  s status  r refresh  Tab next  q quit",
    ),
    Tab::Attendance => match app.attendance_focus {
      AttendanceFocus::Departments => ("ATTENDANCE", "↑↓/jk department  Enter expand  Tab next  q quit"),
      AttendanceFocus::Records => (
        "ATTENDANCE",
        "↑↓/jk navigate  m load more  L load less  r refresh  Esc back",
      ),
    },
    Tab::Onboarding => (
      "ONBOARDING",
      "↑↓/jk navigate  s stage  r refresh  Tab next  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
