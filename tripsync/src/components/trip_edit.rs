//! Trip edit form
//!
//! Used for both adding and editing; the title tells which. While a save is
//! in flight the form ignores input and shows "Saving...".

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tripsync_core::EventKind;

use super::{Component, HelpBar, HelpBarProps, EDIT_HINTS};
use crate::ui::{EditForm, FormField, UiAction};

pub struct TripEditProps<'a> {
    pub form: &'a EditForm,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct TripEdit;

impl TripEdit {
    fn title(form: &EditForm) -> &'static str {
        if form.is_new() {
            " Add New Trip "
        } else {
            " Edit Trip "
        }
    }

    fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
        let marker = if focused { "> " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::White).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{label:<20}"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    }
}

impl Component<UiAction> for TripEdit {
    type Props<'a> = TripEditProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = UiAction> {
        if !props.is_focused || props.form.submitting {
            return None;
        }
        let Some(key) = event.as_key() else {
            return None;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => Some(UiAction::EditCancel),
            KeyCode::Enter => Some(UiAction::EditSubmit),
            KeyCode::Char('s') if ctrl => Some(UiAction::EditSubmit),
            KeyCode::Tab | KeyCode::Down => Some(UiAction::EditFocusNext),
            KeyCode::BackTab | KeyCode::Up => Some(UiAction::EditFocusPrev),
            KeyCode::Backspace => Some(UiAction::EditBackspace),
            KeyCode::Char(' ') if props.form.focus == FormField::WithCar => {
                Some(UiAction::EditToggleCar)
            }
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(UiAction::EditInput(c)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let form = props.form;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(Self::title(form))
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::vertical([
            Constraint::Length(5), // Fields
            Constraint::Length(1), // Status
            Constraint::Min(0),
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        let focus = form.focus;
        let fields = vec![
            Line::raw(""),
            Self::field_line(
                "Destination",
                form.destination.clone(),
                focus == FormField::Destination,
            ),
            Self::field_line("Budget", form.budget.clone(), focus == FormField::Budget),
            Self::field_line(
                "Date (YYYY-MM-DD)",
                form.date.clone(),
                focus == FormField::Date,
            ),
            Self::field_line(
                "With car",
                if form.with_car { "[x]" } else { "[ ]" }.to_string(),
                focus == FormField::WithCar,
            ),
        ];
        frame.render_widget(Paragraph::new(fields), chunks[0]);

        let status = if form.submitting {
            Line::from(Span::styled("  Saving...", Style::default().fg(Color::Yellow)))
        } else if let Some(error) = &form.error {
            Line::from(Span::styled(
                format!("  {error}"),
                Style::default().fg(Color::Red),
            ))
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(status), chunks[1]);

        let mut help = HelpBar;
        help.render(frame, chunks[3], HelpBarProps { hints: EDIT_HINTS });
    }
}
