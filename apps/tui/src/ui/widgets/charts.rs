use genre_predict_tui::config::{ChartPalette, Rgb};
use genre_predict_tui::domain::GenreDistribution;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};
use ratatui::Frame;

pub const fn palette_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Ranked genre bars on the left, colour legend with shares on the right.
pub fn render_genre_distribution(
    distribution: &GenreDistribution,
    palette: &ChartPalette,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = Block::default()
        .title(" Genre Distribution ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if distribution.is_empty() {
        let paragraph = Paragraph::new("No genres in response")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    render_genre_bars(distribution, palette, f, split[0]);
    render_genre_legend(distribution, palette, f, split[1]);
}

// Bar lengths are shares in tenths of a percent so small genres stay visible
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_genre_bars(
    distribution: &GenreDistribution,
    palette: &ChartPalette,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let ranked = distribution.ranked();

    let bars: Vec<Bar<'_>> = ranked
        .iter()
        .enumerate()
        .map(|(rank, (genre, value))| {
            let share = distribution.share(*value);
            let color = palette_color(palette.color_for(genre, rank));
            Bar::default()
                .value((share * 10.0).round().max(0.0) as u64)
                .label(TextLine::from(*genre))
                .text_value(format!("{share:.1}%"))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .max(1000)
        .bar_width(1)
        .bar_gap(0);

    f.render_widget(chart, area);
}

fn render_genre_legend(
    distribution: &GenreDistribution,
    palette: &ChartPalette,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let lines: Vec<TextLine<'_>> = distribution
        .ranked()
        .into_iter()
        .enumerate()
        .map(|(rank, (genre, value))| {
            let color = palette_color(palette.color_for(genre, rank));
            TextLine::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(
                    genre.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {:.1}%", distribution.share(value)),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)), area);
}
