use nd_core::{NewsArticle, Sentiment};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans, Text};
use tui::widgets::ListItem;

/// Five-way sentiment badge color. Anything the parser does not
/// recognize renders with the neutral gray.
pub fn sentiment_color(label: &str) -> Color {
    match Sentiment::from_label(label) {
        Some(Sentiment::VeryPositive) => Color::Green,
        Some(Sentiment::Positive) => Color::LightGreen,
        Some(Sentiment::Neutral) => Color::Gray,
        Some(Sentiment::Negative) => Color::LightRed,
        Some(Sentiment::VeryNegative) => Color::Red,
        None => Color::Gray,
    }
}

fn badge_text(label: &str) -> String {
    format!(" {} ", label.replace('_', " "))
}

/// One article rendered as list-item text: title with sentiment badge,
/// summary, explanation, url, action hints. Pure presentation; every
/// side effect lives with the caller.
pub fn card_text(article: &NewsArticle, read_only: bool) -> Text<'static> {
    let badge = Span::styled(
        badge_text(&article.sentiment_label),
        Style::default()
            .bg(sentiment_color(&article.sentiment_label))
            .fg(Color::Black),
    );
    let title = Span::styled(
        article.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let actions = if read_only {
        "o open  c share"
    } else {
        "o open  s save  c share"
    };

    Text::from(vec![
        Spans::from(vec![title, Span::raw("  "), badge]),
        Spans::from(Span::raw(article.summary.clone())),
        Spans::from(Span::styled(
            article.sentiment_explanation.clone(),
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
        Spans::from(Span::styled(
            article.url.clone(),
            Style::default().fg(Color::Blue),
        )),
        Spans::from(Span::styled(
            actions.to_string(),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Spans::from(Span::raw("")),
    ])
}

pub fn card_items(articles: &[NewsArticle], read_only: bool) -> Vec<ListItem<'static>> {
    articles
        .iter()
        .map(|article| ListItem::new(card_text(article, read_only)))
        .collect()
}
