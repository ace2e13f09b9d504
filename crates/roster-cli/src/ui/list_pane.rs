//! Paged list pane shared by every tab.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{app::ListView, client::ApiRecord};

/// Render `view` into `area`, one line per item via `row`.
///
/// The last line of the pane is a footer that reflects the session state:
/// first-page spinner, load-more spinner, the last error, or the item count.
pub fn draw<T: ApiRecord>(
  f: &mut Frame,
  area: Rect,
  title: &str,
  view: &ListView<T>,
  focused: bool,
  row: impl Fn(&T) -> Line<'static>,
) {
  let session = &view.session;
  let loaded = session.items().len();
  let title = match session.total() {
    Some(total) => format!(" {title} ({loaded}/{total}) "),
    None => format!(" {title} "),
  };

  let border = if focused { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let mut inner = block.inner(area);
  f.render_widget(block, area);
  if inner.height == 0 {
    return;
  }

  let footer_area = Rect {
    x:      inner.x,
    y:      inner.y + inner.height - 1,
    width:  inner.width,
    height: 1,
  };
  inner.height = inner.height.saturating_sub(1);
  f.render_widget(footer(view), footer_area);

  if session.is_loading_first_page() && session.items().is_empty() {
    f.render_widget(
      Paragraph::new("Loading…").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }
  if session.items().is_empty() {
    f.render_widget(
      Paragraph::new("Nothing here.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = session.items().iter().map(|item| ListItem::new(row(item))).collect();

  let mut state = ListState::default();
  state.select(Some(view.cursor));

  let highlight = if focused {
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::BOLD)
  };

  f.render_stateful_widget(
    List::new(items).highlight_style(highlight).highlight_symbol(""),
    inner,
    &mut state,
  );
}

fn footer<T: ApiRecord>(view: &ListView<T>) -> Paragraph<'static> {
  let session = &view.session;
  let (text, color) = if session.is_fetching_more() {
    ("Loading more…".to_string(), Color::Yellow)
  } else if let Some(e) = session.last_error() {
    (format!("{e}  [r] refresh"), Color::Red)
  } else if session.is_loading_first_page() {
    ("Refreshing…".to_string(), Color::Yellow)
  } else if session.has_more() {
    (format!("page {}  ↓ more", session.current_page()), Color::DarkGray)
  } else {
    (format!("page {}  end of list", session.current_page()), Color::DarkGray)
  };
  Paragraph::new(text).style(Style::default().fg(color))
}
