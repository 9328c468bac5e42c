pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    tracker::{self, Feedback, Outcome},
    App, AppState, Profile,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
            AppState::History => render_history(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;

    let green_bold_style = Style::default().patch(bold()).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold()).fg(Color::Red);
    let dim_bold_style = Style::default().patch(bold()).add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((session.target.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if session.target.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
                Constraint::Length(2),
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(
                    ((area.height as f64 - prompt_occupied_lines as f64) / 2.0) as u16,
                ),
            ]
            .as_ref(),
        )
        .split(area);

    // countdown, tinted by the live binary correctness signal
    let typed = session.tracker.buffer();
    let countdown_style = match tracker::prefix_feedback(typed, &session.target) {
        Feedback::Match => dim_bold_style,
        Feedback::Mismatch => red_bold_style,
    };
    let timer = Paragraph::new(Span::styled(
        format!("{}", session.clock.remaining_secs()),
        countdown_style,
    ))
    .alignment(Alignment::Center);
    timer.render(chunks[1], buf);

    // typed prefix with per-character outcomes, cursor, then the dim remainder
    let target_chars: Vec<char> = session.target.chars().collect();
    let outcomes = tracker::char_outcomes(typed, &session.target);

    let mut spans = typed
        .chars()
        .zip(outcomes.iter())
        .map(|(c, outcome)| match outcome {
            Outcome::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            Outcome::Correct => Span::styled(c.to_string(), green_bold_style),
        })
        .collect::<Vec<Span>>();

    let cursor_idx = session.tracker.char_count();
    if let Some(&cursor_char) = target_chars.get(cursor_idx) {
        spans.push(Span::styled(
            cursor_char.to_string(),
            underlined_dim_bold_style,
        ));
        if cursor_idx + 1 < target_chars.len() {
            spans.push(Span::styled(
                target_chars[cursor_idx + 1..].iter().collect::<String>(),
                dim_bold_style,
            ));
        }
    }

    let widget = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            // when the prompt is small enough to fit on one line
            // centering the text gives a nice zen feeling
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });

    widget.render(chunks[2], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let result = match &app.session.result {
        Some(result) => result,
        None => return,
    };

    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    let stats_text = match app.settings.profile {
        Profile::Accuracy => format!("{:.2} wpm   {:.2}% acc", result.wpm, result.accuracy),
        Profile::HighScore => format!("{:.2} wpm   {} wpm high score", result.wpm, app.high_score()),
    };

    let stats = Paragraph::new(Span::styled(stats_text, bold())).alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let captured = Paragraph::new(Span::styled(
        format!(
            "{} chars captured over {}s",
            result.captured.chars().count(),
            result.elapsed.as_secs()
        ),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    captured.render(chunks[2], buf);

    let legend = Paragraph::new(Span::styled(
        "(r)estart / (h)istory / (esc)ape",
        italic_style,
    ));
    legend.render(chunks[4], buf);
}

fn render_history(app: &App, area: Rect, buf: &mut Buffer) {
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    let points: Vec<(f64, f64)> = app
        .records
        .iter()
        .enumerate()
        .map(|(i, r)| ((i + 1) as f64, r.wpm))
        .collect();

    if points.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No scores logged yet - finish a session to start the history",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        empty.render(chunks[0], buf);
    } else {
        let (overall_sessions, highest_wpm) = charting::compute_chart_params(&points);

        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(magenta_style)
            .graph_type(GraphType::Line)
            .data(&points)];

        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("session")
                    .bounds([1.0, overall_sessions])
                    .labels(vec![
                        Span::styled("1", bold()),
                        Span::styled(charting::format_label(overall_sessions), bold()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", bold()),
                        Span::styled(charting::format_label(highest_wpm), bold()),
                    ]),
            );

        chart.render(chunks[0], buf);
    }

    let summary = Paragraph::new(Span::styled(
        format!(
            "{} sessions   {} wpm high score",
            app.records.len(),
            app.high_score()
        ),
        bold(),
    ))
    .alignment(Alignment::Center);
    summary.render(chunks[1], buf);

    let legend = Paragraph::new(Span::styled(
        "(b)ack / (r)estart / (esc)ape",
        italic_style,
    ));
    legend.render(chunks[3], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{FileHistoryStore, ScoreRecord};
    use crate::session::Session;
    use crate::{AppState, Profile, RuntimeSettings};
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn create_test_app(dir: &tempfile::TempDir, profile: Profile) -> App {
        let settings = RuntimeSettings {
            number_of_secs: 30,
            number_of_sentences: 2,
            profile,
        };
        let history = FileHistoryStore::with_path(dir.path().join("history.csv"));
        let mut app = App::new(settings, history);
        app.session = Session::new("hello world".to_string(), Duration::from_secs(30));
        app
    }

    fn finish_session(app: &mut App, typed: &str) {
        let t0 = Instant::now();
        app.session.clock.start_at(t0);
        for c in typed.chars() {
            app.session.write(c);
        }
        app.tick_at(t0 + Duration::from_secs(30));
    }

    fn rendered_content(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_typing_view_shows_target_and_countdown() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir, Profile::Accuracy);

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("hello world"));
        assert!(rendered.contains("30") || rendered.contains("29"));
    }

    #[test]
    fn test_typing_view_with_partial_input() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::Accuracy);
        app.session.write('h');
        app.session.write('x');

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(!rendered.trim().is_empty());
    }

    #[test]
    fn test_typing_view_input_past_target_end() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::Accuracy);
        app.session = Session::new("hi".to_string(), Duration::from_secs(30));
        for c in "hi and then some".chars() {
            app.session.write(c);
        }

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(!rendered.trim().is_empty());
    }

    #[test]
    fn test_results_view_accuracy_profile() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::Accuracy);
        finish_session(&mut app, "hello world");

        assert_eq!(app.state, AppState::Results);
        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("wpm"));
        assert!(rendered.contains("acc"));
        assert!(rendered.contains("(r)estart"));
    }

    #[test]
    fn test_results_view_high_score_profile() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::HighScore);
        finish_session(&mut app, "hello world");

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("high score"));
        assert!(!rendered.contains("acc"));
    }

    #[test]
    fn test_history_view_empty() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::Accuracy);
        app.state = AppState::History;

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("No scores logged yet"));
        assert!(rendered.contains("(b)ack"));
    }

    #[test]
    fn test_history_view_with_records() {
        let dir = tempdir().unwrap();
        let mut app = create_test_app(&dir, Profile::Accuracy);
        app.records.push(ScoreRecord::now(40.0));
        app.records.push(ScoreRecord::now(55.5));
        app.state = AppState::History;

        let rendered = rendered_content(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("2 sessions"));
        assert!(rendered.contains("55 wpm high score"));
    }

    #[test]
    fn test_render_small_and_large_areas() {
        let dir = tempdir().unwrap();
        let app = create_test_app(&dir, Profile::Accuracy);

        for area in [
            Rect::new(0, 0, 20, 5),
            Rect::new(0, 0, 80, 24),
            Rect::new(0, 0, 200, 60),
        ] {
            let mut buffer = Buffer::empty(area);
            app.render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
        }
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 2);
    }
}
