use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState, WhichUse, BRAILLE_SIX};

pub const LOADING_TEXT: &str = "Processing audio...";
// Spinner, a space and the label
const LOADING_ROW_WIDTH: u16 = 22;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

/// Fixed-size rect in the middle of `area`, shrunk to fit when `area` is small.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Modal shown while a submission is in flight.
pub fn render_loading_modal(f: &mut Frame<'_>, area: Rect, state: &ThrobberState) {
    let modal = centered_fixed(44, 5, area);
    f.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Rgb(235, 235, 235)).fg(Color::Black));
    let inner = block.inner(modal);
    f.render_widget(block, modal);

    let row = centered_fixed(LOADING_ROW_WIDTH, 1, inner.inner(Margin::new(0, 1)));
    let throbber = Throbber::default()
        .label(LOADING_TEXT)
        .style(Style::default().fg(Color::Black))
        .throbber_style(
            Style::default()
                .fg(Color::Rgb(0x34, 0x98, 0xdb))
                .add_modifier(Modifier::BOLD),
        )
        .throbber_set(BRAILLE_SIX)
        .use_type(WhichUse::Spin);

    let mut state = state.clone();
    f.render_stateful_widget(throbber, row, &mut state);
}

/// About the project and the keys, toggled with F1.
pub fn render_about_popup(f: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let lines = vec![
        TextLine::from(Span::styled("About the Project", heading)),
        TextLine::from(
            "Give a YouTube link and a convolutional neural network trained on 23,000 labelled \
             audio clips predicts the genre of the song.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled("How It Works", heading)),
        TextLine::from(
            "The server isolates the audio, turns it into spectrogram images and feeds them to \
             the model. The per-genre scores come back and are charted here.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled("Keys", heading)),
        TextLine::from(vec![Span::styled("Enter   ", key), Span::raw("Submit the URL")]),
        TextLine::from(vec![Span::styled("Ctrl+U  ", key), Span::raw("Clear the URL")]),
        TextLine::from(vec![Span::styled("F1      ", key), Span::raw("Toggle this help")]),
        TextLine::from(vec![Span::styled("Esc     ", key), Span::raw("Close help / quit")]),
        TextLine::from(vec![Span::styled("Ctrl+C  ", key), Span::raw("Quit")]),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup);
}
