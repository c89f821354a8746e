use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::QuizResult;
use crate::ui::theme::Theme;

/// Completed-quiz dashboard: final score, a fill bar, and the graded
/// question list with the denormalized term snapshots.
pub struct ScoreSummary<'a> {
    pub result: &'a QuizResult,
    pub theme: &'a Theme,
}

impl<'a> ScoreSummary<'a> {
    pub fn new(result: &'a QuizResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for ScoreSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Quiz Complete ",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let percent = if result.total_questions > 0 {
            result.score as f64 / result.total_questions as f64
        } else {
            0.0
        };
        let score_color = if percent >= 0.8 {
            colors.success()
        } else if percent >= 0.5 {
            colors.warning()
        } else {
            colors.error()
        };

        let bar_width = inner.width.saturating_sub(6).min(40) as usize;
        let filled = (percent * bar_width as f64).round() as usize;

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Score: {} / {}", result.score, result.total_questions),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw("  "),
                Span::styled("█".repeat(filled), Style::default().fg(colors.bar_filled())),
                Span::styled(
                    "░".repeat(bar_width.saturating_sub(filled)),
                    Style::default().fg(colors.bar_empty()),
                ),
                Span::styled(
                    format!("  {:.0}%", percent * 100.0),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(Span::styled(
                format!("  Scope: {}   Mode: {}", result.scope, result.mode.label()),
                Style::default().fg(colors.muted()),
            )),
            Line::from(""),
        ];

        for (i, detail) in result.details.iter().enumerate() {
            let marker = if detail.is_correct {
                Span::styled("ok", Style::default().fg(colors.success()))
            } else {
                Span::styled("xx", Style::default().fg(colors.error()))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:>2}. ", i + 1), Style::default().fg(colors.muted())),
                marker,
                Span::styled(
                    format!("  {}", detail.term),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
            ]));
            if !detail.is_correct {
                let given = detail.user_answer.as_deref().unwrap_or("(unanswered)");
                lines.push(Line::from(Span::styled(
                    format!("        you: {given}"),
                    Style::default().fg(colors.error()),
                )));
                lines.push(Line::from(Span::styled(
                    format!("        answer: {}", detail.correct_answer),
                    Style::default().fg(colors.muted()),
                )));
            }
        }

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
    }
}
