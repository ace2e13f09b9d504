//! Detail pane — right panel for the employee and onboarding tabs.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use roster_core::record::{Employee, EmploymentStatus, OnboardingStage, OnboardingStep};

// ─── Public entry ─────────────────────────────────────────────────────────────

pub fn draw_employee(f: &mut Frame, area: Rect, employee: Option<&Employee>) {
  let Some(e) = employee else {
    draw_empty(f, area, "No employee selected.");
    return;
  };

  let lines = vec![
    field("Employee no", e.employee_no.clone()),
    field("Department", e.department.clone()),
    field("Designation", e.designation.clone()),
    Line::from(vec![
      label("Status"),
      Span::styled(e.status.to_string(), Style::default().fg(status_color(e.status))),
    ]),
  ];
  draw_block(f, area, &e.full_name, lines);
}

pub fn draw_step(f: &mut Frame, area: Rect, step: Option<&OnboardingStep>) {
  let Some(s) = step else {
    draw_empty(f, area, "No step selected.");
    return;
  };

  let due = s
    .due_on
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "—".into());
  let lines = vec![
    field("Employee", format!("{} ({})", s.employee_name, s.employee_no)),
    Line::from(vec![
      label("Stage"),
      Span::styled(s.stage.to_string(), Style::default().fg(stage_color(s.stage))),
    ]),
    field("Due", due),
  ];
  draw_block(f, area, &s.title, lines);
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

pub fn status_color(status: EmploymentStatus) -> Color {
  match status {
    EmploymentStatus::Active => Color::Green,
    EmploymentStatus::Probation => Color::Yellow,
    EmploymentStatus::OnLeave => Color::Cyan,
    EmploymentStatus::Terminated => Color::Red,
  }
}

pub fn stage_color(stage: OnboardingStage) -> Color {
  match stage {
    OnboardingStage::Pending => Color::DarkGray,
    OnboardingStage::InProgress => Color::Yellow,
    OnboardingStage::Completed => Color::Green,
  }
}

fn label(name: &str) -> Span<'static> {
  Span::styled(
    format!("{name:<14}"),
    Style::default().fg(Color::DarkGray),
  )
}

fn field(name: &str, value: String) -> Line<'static> {
  Line::from(vec![label(name), Span::raw(value)])
}

fn draw_block(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
  let block = Block::default()
    .title(Span::styled(
      format!(" {title} "),
      Style::default().add_modifier(Modifier::BOLD),
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
    area,
  );
}

fn draw_empty(f: &mut Frame, area: Rect, hint: &str) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(hint.to_string()).style(Style::default().fg(Color::DarkGray)),
    inner,
  );
}
