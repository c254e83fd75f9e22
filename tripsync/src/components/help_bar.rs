use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::Component;
use crate::ui::UiAction;

/// `(key, description)` pairs shown on the list screen
pub const LIST_HINTS: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("enter", "edit"),
    ("a", "add"),
    ("q", "quit"),
];

/// `(key, description)` pairs shown on the edit screen
pub const EDIT_HINTS: &[(&str, &str)] = &[
    ("tab", "next field"),
    ("space", "toggle car"),
    ("enter", "save"),
    ("esc", "cancel"),
];

pub struct HelpBar;

pub struct HelpBarProps {
    pub hints: &'static [(&'static str, &'static str)],
}

impl Component<UiAction> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let spans: Vec<Span> = props
            .hints
            .iter()
            .flat_map(|(key, description)| {
                [
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Cyan).bold()),
                    Span::styled(
                        format!(" {description} "),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
