use crate::app::App;
use crate::ui::capitalize_first;
use crate::ui::widgets::charts::render_genre_distribution;
use crate::ui::widgets::popup::{render_about_popup, render_loading_modal};
use genre_predict_tui::domain::SubmissionState;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(f);

    render_title_section(f, main_layout[0]);
    render_input_section(app, f, main_layout[1]);
    render_result_section(app, f, main_layout[2]);
    render_status_section(app, f, main_layout[3]);
    render_shortcuts(f, main_layout[4]);

    // Overlays go last so they sit on top
    if app.snapshot.loading_visible() {
        render_loading_modal(f, f.area(), &app.throbber_state);
    }
    if app.show_help {
        render_about_popup(f, f.area());
    }
}

fn build_main_layout(f: &Frame<'_>) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title area
            Constraint::Length(3), // URL input
            Constraint::Min(6),    // Prediction results
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)))
        .to_vec()
}

fn render_title_section(f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title(" Welcome to Top-N Music Genre Prediction ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let intro = Paragraph::new(Text::from(vec![TextLine::from(Span::styled(
        "Please enter a valid YouTube URL of the song you wish to get the AI-powered genre prediction of.",
        Style::default().fg(Color::White),
    ))]))
    .block(title_block)
    .wrap(Wrap { trim: true });

    f.render_widget(intro, area);
}

fn render_input_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let input_block = Block::default()
        .title(" YouTube URL ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let cursor = cursor_char(app.snapshot.state, app.show_help, app.animation_counter);
    let paragraph =
        Paragraph::new(input_line(app.url_input.current_value(), cursor)).block(input_block);
    f.render_widget(paragraph, area);
}

fn render_result_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let result_block = Block::default()
        .title(" Prediction ")
        .title_style(Style::default().fg(Color::Magenta))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = result_block.inner(area);
    f.render_widget(result_block, area);

    let snapshot = &app.snapshot;

    if let Some(error) = &snapshot.error {
        let paragraph = Paragraph::new(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, inner);
        return;
    }

    let title = snapshot.video_title();
    let distribution = snapshot.distribution();
    let top = snapshot.top_genre();

    if title.is_none() && distribution.is_none() && top.is_none() {
        let hint = match snapshot.state {
            SubmissionState::Succeeded => "The server returned nothing to show.",
            _ => "Results will appear here.",
        };
        let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, inner);
        return;
    }

    // Each facet gets a row only when present
    let mut constraints = Vec::new();
    if title.is_some() {
        constraints.push(Constraint::Length(2));
    }
    if distribution.is_some() {
        constraints.push(Constraint::Min(4));
    }
    if top.is_some() {
        constraints.push(Constraint::Length(1));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    // Rows are handed out in facet order, skipping absent facets
    let mut next_row = rows.iter().copied();
    let title_row = title.and_then(|title| next_row.next().map(|row| (title, row)));
    let distribution_row =
        distribution.and_then(|distribution| next_row.next().map(|row| (distribution, row)));
    let top_row = top.and_then(|top| next_row.next().map(|row| (top, row)));

    if let Some((title, row)) = title_row {
        let lines = vec![
            TextLine::from(Span::styled(
                "Genre Predictions for",
                Style::default().fg(Color::Gray),
            )),
            TextLine::from(Span::styled(
                format!("\"{title}\""),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        f.render_widget(Paragraph::new(Text::from(lines)), row);
    }

    if let Some((distribution, row)) = distribution_row {
        render_genre_distribution(distribution, &app.palette, f, row);
    }

    if let Some((top, row)) = top_row {
        let line = TextLine::from(vec![
            Span::styled("Top Prediction: ", Style::default().fg(Color::Gray)),
            Span::styled(
                capitalize_first(top),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        f.render_widget(Paragraph::new(line), row);
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let style = match app.snapshot.state {
        SubmissionState::Failed => Style::default().fg(Color::Red),
        SubmissionState::Succeeded => Style::default().fg(Color::Green),
        SubmissionState::Idle | SubmissionState::Submitting => Style::default().fg(Color::Gray),
    };

    let status_paragraph = Paragraph::new(Span::styled(app.status_message(), style))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::Gray);
    let shortcuts = TextLine::from(vec![
        Span::styled("Enter", key),
        Span::styled(" submit  ", text),
        Span::styled("Ctrl+U", key),
        Span::styled(" clear  ", text),
        Span::styled("F1", key),
        Span::styled(" help  ", text),
        Span::styled("Esc", key),
        Span::styled(" quit", text),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}

fn cursor_char(state: SubmissionState, show_help: bool, animation_counter: f64) -> &'static str {
    if show_help || state == SubmissionState::Submitting {
        return "";
    }

    if (animation_counter * 2.0).sin() > 0.0 {
        "█"
    } else {
        " "
    }
}

fn input_line(current_input: &str, cursor: &str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        format!("> {current_input}{cursor}"),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))
}
