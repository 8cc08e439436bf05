use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use homeboard::board::{countdown_label, days_until};
use homeboard::models::{Frequency, RecurringTask};
use homeboard::schedule::describe;
use super::app::{App, InputMode, Pane};

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(border).title(title)
}

fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn highlight_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray)
}

fn recurring_row(t: &RecurringTask) -> Row<'static> {
    let style = if t.paused {
        Style::default().fg(Color::DarkGray)
    } else if t.is_chore {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(t.id.to_string()),
        Cell::from(t.text.clone()),
        Cell::from(describe(&t.schedule)),
        Cell::from(if t.paused { "Paused" } else { "Active" }),
    ])
    .style(style)
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    // Header: clock, chore and media time
    let mut header = format!(
        "{}'s board | {}",
        app.member,
        app.now.format("%a %b %d %Y %H:%M:%S")
    );
    if app.has_chores() {
        header.push_str(&format!(" | Chore: {}", app.current_chore.as_deref().unwrap_or("none")));
    }
    if app.has_media_time() {
        header.push_str(&format!(" | Media: {}/{} this week", app.media_count, app.media_cap));
    }
    let header = Paragraph::new(header)
        .style(header_style())
        .block(Block::default().borders(Borders::ALL).title("homeboard"));
    f.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(columns[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)].as_ref())
        .split(columns[1]);

    // Today
    let rows: Vec<Row> = app
        .due
        .iter()
        .map(|t| {
            let icon = if t.is_chore { "🧹" } else { "⏰" };
            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(format!("{} {}", icon, t.text)),
            ])
        })
        .collect();
    let title = if app.due.is_empty() {
        "Today - all done!".to_string()
    } else {
        format!("Today - {} open", app.due.len())
    };
    let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(20)])
        .header(Row::new(vec!["ID", "Task"]).style(header_style()).bottom_margin(1))
        .block(pane_block(title, app.pane == Pane::Today))
        .row_highlight_style(highlight_style())
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, left[0], &mut app.today_state);

    // One-off tasks
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| Row::new(vec![Cell::from(t.id.to_string()), Cell::from(t.text.clone())]))
        .collect();
    let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(20)])
        .header(Row::new(vec!["ID", "Task"]).style(header_style()).bottom_margin(1))
        .block(pane_block(format!("Tasks ({})", app.tasks.len()), app.pane == Pane::Tasks))
        .row_highlight_style(highlight_style())
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, left[1], &mut app.task_state);

    // Recurring
    let rows: Vec<Row> = app.recurring.iter().map(recurring_row).collect();
    let widths = [
        Constraint::Length(14),
        Constraint::Min(16),
        Constraint::Length(24),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Task", "Schedule", "Status"]).style(header_style()).bottom_margin(1))
        .block(pane_block("Recurring".to_string(), app.pane == Pane::Recurring))
        .row_highlight_style(highlight_style())
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, right[0], &mut app.recurring_state);

    // Important dates
    let lines: Vec<String> = app
        .dates
        .iter()
        .map(|d| {
            let label = countdown_label(days_until(d.date, app.today));
            format!("{} {}: {}", d.date.format("%b %d"), d.name, label)
        })
        .collect();
    let dates = Paragraph::new(if lines.is_empty() { "No dates".to_string() } else { lines.join("\n") })
        .block(Block::default().borders(Borders::ALL).title("Important dates"));
    f.render_widget(dates, right[1]);

    let status = Paragraph::new(app.status.as_str()).style(Style::default().fg(Color::Yellow));
    f.render_widget(status, chunks[2]);

    let help_text = match app.input_mode {
        InputMode::Normal => match app.pane {
            Pane::Today => "q: Quit | Tab: Pane | Space: Done today | a: Add | c: Next chore | m: Media time",
            Pane::Recurring => "q: Quit | Tab: Pane | Space: Done today | p: Pause/Resume | d: Del | a: Add | c: Next chore | m: Media time",
            Pane::Tasks => "q: Quit | Tab: Pane | Space: Complete | d: Del | a: Add | c: Next chore | m: Media time",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[3]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.pane {
            Pane::Tasks => "Add Task: Enter Text",
            Pane::Recurring | Pane::Today => match app.add_state.step {
                0 => "Add Recurring: Enter Text",
                1 => "Add Recurring: Frequency (daily/weekly/monthly)",
                _ => match app.add_state.frequency {
                    Some(Frequency::Weekly) => "Add Recurring: Day of Week (e.g. tue)",
                    Some(Frequency::Monthly) => "Add Recurring: Dates (e.g. 1,15,31)",
                    _ => "Add Recurring: Days (e.g. mon,wed,fri)",
                },
            },
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
