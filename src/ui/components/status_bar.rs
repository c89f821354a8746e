use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

pub struct StatusBar<'a> {
    pub message: Option<(&'a str, StatusLevel)>,
    pub theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(message: Option<(&'a str, StatusLevel)>, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some((text, level)) = self.message else {
            return;
        };
        let fg = match level {
            StatusLevel::Info => colors.fg(),
            StatusLevel::Success => colors.success(),
            StatusLevel::Warning => colors.warning(),
            StatusLevel::Error => colors.error(),
        };
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(fg),
        )));
        line.render(area, buf);
    }
}
