use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::session::result::QuizResult;
use crate::ui::theme::Theme;

/// Result history: newest-first rows, expandable per-question detail for
/// the selected entry, and a delete confirmation overlay.
pub struct HistoryList<'a> {
    pub results: &'a [QuizResult],
    pub selected: usize,
    pub expanded: bool,
    pub confirm_delete: bool,
    pub theme: &'a Theme,
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Quiz History ",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.results.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                "No quizzes taken yet.",
                Style::default().fg(colors.muted()),
            )));
            msg.render(inner, buf);
            return;
        }

        let (list_area, detail_area) = if self.expanded {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(inner);
            (split[0], Some(split[1]))
        } else {
            (inner, None)
        };

        let header = Line::from(Span::styled(
            "    Date              Scope           Mode                 Score",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        ));
        let mut lines = vec![header];

        let visible = list_area.height.saturating_sub(1) as usize;
        let offset = if visible == 0 || self.selected < visible {
            0
        } else {
            self.selected + 1 - visible
        };

        for (i, result) in self.results.iter().enumerate().skip(offset).take(visible.max(1)) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let date_str = result.date.format("%Y-%m-%d %H:%M").to_string();
            let row = format!(
                " {indicator}  {date_str}  {scope:<14}  {mode:<19}  {score:>2}/{total}",
                scope = clip(&result.scope, 14),
                mode = result.mode.label(),
                score = result.score,
                total = result.total_questions,
            );
            let style = if is_selected {
                Style::default().fg(colors.fg()).bg(colors.accent_dim())
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        Paragraph::new(lines).render(list_area, buf);

        if let (Some(detail_area), Some(result)) = (detail_area, self.results.get(self.selected)) {
            render_detail(result, detail_area, buf, self.theme);
        }

        if self.confirm_delete {
            let dialog_width = 38u16;
            let dialog_height = 5u16;
            let dialog_x = area.x + area.width.saturating_sub(dialog_width) / 2;
            let dialog_y = area.y + area.height.saturating_sub(dialog_height) / 2;
            let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);

            Clear.render(dialog_area, buf);
            let dialog = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Delete this quiz result? (y/n)  ",
                    Style::default().fg(colors.fg()),
                )),
            ])
            .style(Style::default().bg(colors.bg()))
            .block(
                Block::bordered()
                    .title(" Confirm ")
                    .border_style(Style::default().fg(colors.error()))
                    .style(Style::default().bg(colors.bg())),
            );
            dialog.render(dialog_area, buf);
        }
    }
}

fn render_detail(result: &QuizResult, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .title(Line::from(Span::styled(
            " Details ",
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )))
        .border_style(Style::default().fg(colors.border_focused()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, buf);

    if result.corrupt_details {
        let msg = Paragraph::new(Line::from(Span::styled(
            "Stored details could not be parsed; showing nothing.",
            Style::default().fg(colors.warning()),
        )));
        msg.render(inner, buf);
        return;
    }
    if result.details.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No per-question detail was recorded for this quiz.",
            Style::default().fg(colors.muted()),
        )));
        msg.render(inner, buf);
        return;
    }

    let mut lines = Vec::new();
    for (i, detail) in result.details.iter().enumerate() {
        let marker = if detail.is_correct {
            Span::styled("ok", Style::default().fg(colors.success()))
        } else {
            Span::styled("xx", Style::default().fg(colors.error()))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:>2}. ", i + 1), Style::default().fg(colors.muted())),
            marker,
            Span::styled(
                format!("  {}", detail.question_text),
                Style::default().fg(colors.fg()),
            ),
        ]));
        let given = detail.user_answer.as_deref().unwrap_or("(unanswered)");
        lines.push(Line::from(Span::styled(
            format!("       you: {given}   answer: {}", detail.correct_answer),
            Style::default().fg(colors.muted()),
        )));
        lines.push(Line::from(Span::styled(
            format!("       term: {} ({})", detail.term, detail.definition),
            Style::default().fg(colors.muted()),
        )));
    }
    Paragraph::new(lines).wrap(Wrap { trim: false }).render(inner, buf);
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{clipped}…")
    }
}
