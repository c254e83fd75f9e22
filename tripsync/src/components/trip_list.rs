//! Trip list screen
//!
//! One row per trip with destination, budget, date and car. The fetch
//! status (loading, error) sits above the rows; the title shows whether the
//! push channel is live.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tripsync_core::EventKind;

use super::{Component, HelpBar, HelpBarProps, LIST_HINTS};
use crate::channel::ChannelState;
use crate::model::Trip;
use crate::ui::UiAction;

pub const NO_DATE: &str = "N/A";

pub struct TripListProps<'a> {
    pub trips: &'a [Trip],
    pub fetching: bool,
    pub fetching_error: Option<&'a str>,
    pub selected: usize,
    pub channel: ChannelState,
    pub is_focused: bool,
}

#[derive(Default)]
pub struct TripList;

impl TripList {
    fn row(trip: &Trip) -> String {
        let date = trip
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NO_DATE.to_string());
        let car = if trip.with_car { "Yes" } else { "No" };
        format!(
            "{:<24} ${:<10} {:<10}  Car: {}",
            trip.destination, trip.budget, date, car
        )
    }
}

impl Component<UiAction> for TripList {
    type Props<'a> = TripListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = UiAction> {
        if !props.is_focused {
            return None;
        }
        let Some(key) = event.as_key() else {
            return None;
        };
        let last = props.trips.len().saturating_sub(1);
        let selected = props.selected.min(last);

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                Some(UiAction::ListSelect(selected.saturating_sub(1)))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                Some(UiAction::ListSelect((selected + 1).min(last)))
            }
            KeyCode::Enter => props
                .trips
                .get(selected)
                .map(|trip| UiAction::EditOpen(Some(trip.clone()))),
            KeyCode::Char('a') => Some(UiAction::EditOpen(None)),
            KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let live = match props.channel {
            ChannelState::Open => " ● live",
            ChannelState::Connecting => " ○ connecting",
            ChannelState::Closing | ChannelState::Disconnected => "",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" Trips{live} "))
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Rows
            Constraint::Length(1), // Help bar
        ])
        .split(inner);

        let mut lines = Vec::new();
        if props.fetching {
            lines.push(Line::from(Span::styled(
                "Loading trips...",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(error) = props.fetching_error {
            lines.push(Line::from(Span::styled(
                format!("Failed to load trips: {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        if props.trips.is_empty() && !props.fetching {
            lines.push(Line::from(Span::styled(
                "No trips yet. Press a to add one.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let selected = props.selected.min(props.trips.len().saturating_sub(1));
        for (index, trip) in props.trips.iter().enumerate() {
            let row = Self::row(trip);
            if index == selected {
                lines.push(Line::from(Span::styled(
                    format!("> {row}"),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(format!("  {row}")));
            }
        }

        // Keep the selection on screen
        let height = chunks[0].height as usize;
        let offset = (lines.len().saturating_sub(props.trips.len()) + selected + 1)
            .saturating_sub(height);
        let scroll = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), chunks[0]);

        let mut help = HelpBar;
        help.render(frame, chunks[1], HelpBarProps { hints: LIST_HINTS });
    }
}
