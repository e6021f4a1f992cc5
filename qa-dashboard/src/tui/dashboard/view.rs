use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize as _},
    text::{Line, Span, Text},
    widgets::{Block, Cell, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::report::Outcome;

use super::{mode_titles, ApiHealth, DashboardViewModel, Focus, Mode};
use crate::tui::{input::InputView as _, StyleExt as _};

const TITLE: &str = "AI Quality Assurance Dashboard";

fn field_style(view_model: &DashboardViewModel, focus: Focus) -> Style {
    if view_model.focus() != focus {
        Style::default()
    } else if view_model.is_editing() {
        Style::active()
    } else {
        Style::focused()
    }
}

fn header(health: &ApiHealth) -> Line<'static> {
    let (label, style) = match health {
        ApiHealth::Unknown => ("API: checking…".to_string(), Style::disabled()),
        ApiHealth::Healthy => ("API: healthy".to_string(), Style::focused()),
        ApiHealth::Degraded(status) => (format!("API: {status}"), Style::alert()),
        ApiHealth::Unreachable(reason) => (format!("API: unreachable ({reason})"), Style::alert()),
    };

    Line::from(vec![
        Span::from(TITLE).bold(),
        Span::raw("  "),
        Span::styled(label, style),
    ])
}

fn help(editing: bool) -> Line<'static> {
    if editing {
        Line::from(vec![
            "Esc".bold(),
            "/".into(),
            "Enter".bold(),
            " to stop editing, ".into(),
            "Alt-Enter".bold(),
            " for a new line".into(),
        ])
    } else {
        Line::from(vec![
            "q".bold(),
            " quit  ".into(),
            "h/l".bold(),
            " mode  ".into(),
            "j/k".bold(),
            " move  ".into(),
            "Enter".bold(),
            " edit/press  ".into(),
            "a".bold(),
            " add category  ".into(),
            "s".bold(),
            " process  ".into(),
            "r".bold(),
            " health".into(),
        ])
    }
}

fn button(label: &str, style: Style) -> Paragraph<'_> {
    Paragraph::new(format!("[ {label} ]")).style(style)
}

#[extend::ext(name = DashboardView)]
pub impl<'a> Frame<'a> {
    fn dashboard_view(&mut self, parent: Rect, style: Style, view_model: &DashboardViewModel) {
        let mode = view_model.mode();
        let prompt_height = match mode {
            Mode::Generation => 6,
            Mode::Classification => 4,
        };
        let category_count = match mode {
            Mode::Generation => 0,
            Mode::Classification => view_model.categories().len(),
        };
        let add_height = u16::from(mode == Mode::Classification);
        let error_height = if view_model.error().is_some() { 3 } else { 0 };

        let constraints = [
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(prompt_height),
            Constraint::Length(3 * category_count as u16),
            Constraint::Length(add_height),
            Constraint::Length(1),
            Constraint::Length(error_height),
            Constraint::Min(0),
        ];
        let [header_area, help_area, tabs_area, prompt_area, categories_area, add_area, process_area, error_area, result_area] =
            Layout::vertical(constraints).areas(parent);

        self.render_widget(Paragraph::new(header(view_model.health())).style(style), header_area);
        self.render_widget(
            Paragraph::new(help(view_model.is_editing())).dim(),
            help_area,
        );

        let tabs = Tabs::new(mode_titles())
            .select(mode.index())
            .style(style)
            .highlight_style(Style::active().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
            .block(Block::bordered());
        self.render_widget(tabs, tabs_area);

        let prompt_title = match mode {
            Mode::Generation => "Enter Prompt",
            Mode::Classification => "Enter Text",
        };
        self.input_view(
            prompt_area,
            field_style(view_model, Focus::Prompt),
            prompt_title,
            view_model.prompt(),
            view_model.is_editing() && view_model.focus() == Focus::Prompt,
        );

        let category_areas = Layout::vertical(vec![Constraint::Length(3); category_count])
            .split(categories_area);
        for (index, (category, area)) in view_model
            .categories()
            .iter()
            .zip(category_areas.iter())
            .enumerate()
        {
            let focus = Focus::Category(index);
            self.input_view(
                *area,
                field_style(view_model, focus),
                &format!("Category {}", index + 1),
                category,
                view_model.is_editing() && view_model.focus() == focus,
            );
        }

        if mode == Mode::Classification {
            self.render_widget(
                button("Add Category", field_style(view_model, Focus::AddCategory)),
                add_area,
            );
        }

        let process_label = if view_model.is_loading() {
            "Processing…"
        } else {
            "Process"
        };
        let process_style = if view_model.can_submit() {
            field_style(view_model, Focus::Process).add_modifier(Modifier::BOLD)
        } else {
            Style::disabled()
        };
        self.render_widget(button(process_label, process_style), process_area);

        if let Some(error) = view_model.error() {
            let alert = Paragraph::new(error)
                .style(Style::alert())
                .block(Block::bordered().title("Error"));
            self.render_widget(alert, error_area);
        }

        if let Some(outcome) = view_model.outcome() {
            self.outcome_view(result_area, style, outcome);
        }
    }

    fn outcome_view(&mut self, parent: Rect, style: Style, outcome: &Outcome) {
        let metrics: Vec<Span> = outcome
            .metrics()
            .iter()
            .flat_map(|metric| [Span::raw(metric.to_string()), Span::raw("  ")])
            .collect();

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let [title_area, body_area, metrics_title_area, metrics_area] = layout.areas(parent);

        self.render_widget(
            Paragraph::new(Line::from(outcome.title()).bold()).style(style),
            title_area,
        );

        match outcome {
            Outcome::Generation(response) => {
                let text = Paragraph::new(response.response.text.as_str())
                    .style(style)
                    .wrap(Wrap { trim: false });
                self.render_widget(text, body_area);
            }
            Outcome::Classification(response) => {
                let [category_area, table_area] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(body_area);

                self.render_widget(
                    Paragraph::new(format!("Predicted Category: {}", response.category)),
                    category_area,
                );

                let rows = outcome.probability_rows().into_iter().map(|(category, p)| {
                    Row::new([
                        Cell::from(category),
                        Cell::from(Text::from(p).alignment(Alignment::Right)),
                    ])
                });
                let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
                    .header(
                        Row::new([
                            Cell::from("Category"),
                            Cell::from(Text::from("Probability").alignment(Alignment::Right)),
                        ])
                        .bold(),
                    )
                    .style(style);
                self.render_widget(table, table_area);
            }
        }

        self.render_widget(Paragraph::new(Line::from("Metrics:").bold()), metrics_title_area);
        self.render_widget(Paragraph::new(Line::from(metrics)), metrics_area);
    }
}

#[cfg(test)]
mod tests {
    use qa_client::types::ClassificationResponse;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::{api::ApiResponse, tui::event::Action};

    fn render(view_model: &DashboardViewModel) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| frame.dashboard_view(frame.area(), Style::default(), view_model))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn line_with<'a>(lines: &'a [String], needle: &str) -> Option<&'a String> {
        lines.iter().find(|line| line.contains(needle))
    }

    #[test]
    fn classification_table_rows() {
        let mut view_model = DashboardViewModel::default();
        view_model.select_mode(Mode::Classification);
        view_model.handle_action(Action::Enter);
        view_model.handle_action(Action::Unhandled('x'));
        view_model.handle_action(Action::Escape);
        view_model.submit();
        view_model.handle_response(ApiResponse::Classified(ClassificationResponse {
            category: "ham".into(),
            probabilities: [("spam", 0.12), ("ham", 0.88)].into_iter().collect(),
            confidence: 0.88,
            latency: 0.0,
        }));

        let lines = render(&view_model);

        assert!(line_with(&lines, "Predicted Category: ham").is_some());
        assert!(line_with(&lines, "Probability").is_some());
        let spam = line_with(&lines, "spam").expect("spam row");
        assert!(spam.contains("0.12"));
        let ham = lines
            .iter()
            .find(|line| line.contains("ham") && line.contains("0.88"));
        assert!(ham.is_some());
        assert!(line_with(&lines, "Confidence: 0.88").is_some());
        assert!(line_with(&lines, "Latency: 0.00s").is_some());
    }

    #[test]
    fn error_alert_and_titles() {
        let mut view_model = DashboardViewModel::default();
        view_model.handle_action(Action::Enter);
        view_model.handle_action(Action::Unhandled('x'));
        view_model.handle_action(Action::Escape);
        view_model.submit();
        view_model.handle_response(ApiResponse::Failed(Mode::Generation));

        let lines = render(&view_model);

        assert!(line_with(&lines, TITLE).is_some());
        assert!(line_with(&lines, "LLM Prompt").is_some());
        assert!(line_with(&lines, "Enter Prompt").is_some());
        assert!(line_with(&lines, "Failed to process request").is_some());
        assert!(line_with(&lines, "[ Process ]").is_some());
    }

    #[test]
    fn processing_label_while_loading() {
        let mut view_model = DashboardViewModel::default();
        view_model.handle_action(Action::Enter);
        view_model.handle_action(Action::Unhandled('x'));
        view_model.handle_action(Action::Escape);
        view_model.submit();

        let lines = render(&view_model);

        assert!(line_with(&lines, "Processing").is_some());
    }

    #[test]
    fn header_shows_unreachable_reason() {
        let mut view_model = DashboardViewModel::default();
        view_model.handle_response(ApiResponse::Unreachable("timed out".into()));

        let lines = render(&view_model);

        let header = line_with(&lines, TITLE).expect("header row");
        assert!(header.contains("API: unreachable (timed out)"));
    }
}
