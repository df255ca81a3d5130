use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Clear, List, ListState, Paragraph, Wrap};
use tui::Frame;

use crate::app::{App, Route};
use crate::notify::NoticeLevel;
use crate::widgets::card::card_items;
use crate::widgets::preferences::{PrefField, PreferencesForm};

pub fn render<B: Backend>(f: &mut Frame<B>, app: &App) {
    match app.route {
        Route::Login => render_login(f, app),
        Route::Signup => render_signup(f, app),
        Route::Home => render_home(f, app),
        Route::Saved => render_saved(f, app),
    }
    render_notices(f, app);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

fn field<'a>(label: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(style),
    )
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn render_login<B: Backend>(f: &mut Frame<B>, app: &App) {
    use crate::views::login::LoginField;

    let area = centered_rect(50, 12, f.size());
    let block = Block::default().borders(Borders::ALL).title(" Sign In ");
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        field(
            "Email",
            app.login.email.clone(),
            app.login.focus == LoginField::Email,
        ),
        rows[0],
    );
    f.render_widget(
        field(
            "Password",
            masked(&app.login.password),
            app.login.focus == LoginField::Password,
        ),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter sign in   F2 sign up   Ctrl-Q quit",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center),
        rows[2],
    );
}

fn render_signup<B: Backend>(f: &mut Frame<B>, app: &App) {
    use crate::views::signup::SignupField;

    let area = centered_rect(50, 15, f.size());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Create Account ");
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        field(
            "Email",
            app.signup.email.clone(),
            app.signup.focus == SignupField::Email,
        ),
        rows[0],
    );
    f.render_widget(
        field(
            "Password",
            masked(&app.signup.password),
            app.signup.focus == SignupField::Password,
        ),
        rows[1],
    );
    f.render_widget(
        field(
            "Confirm Password",
            masked(&app.signup.confirm),
            app.signup.focus == SignupField::Confirm,
        ),
        rows[2],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Enter sign up   F2 back to sign in",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center),
        rows[3],
    );
}

fn navbar<'a>(title: &'a str, hints: &'a str, dimmed: bool) -> Paragraph<'a> {
    let hint_style = if dimmed {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Paragraph::new(Spans::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(hints, hint_style),
    ]))
    .block(Block::default().borders(Borders::BOTTOM))
}

fn render_article_list<B: Backend>(
    f: &mut Frame<B>,
    area: Rect,
    articles: &[nd_core::NewsArticle],
    selected: usize,
    read_only: bool,
    empty_message: &str,
) {
    if articles.is_empty() {
        f.render_widget(
            Paragraph::new(empty_message.to_string())
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
        return;
    }

    let list = List::new(card_items(articles, read_only))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_home<B: Backend>(f: &mut Frame<B>, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(f.size());

    f.render_widget(
        navbar(
            "AI News Digest",
            "j/k move   s save   c share   o open   v saved   p preferences   l logout   q quit",
            app.home.is_updating,
        ),
        rows[0],
    );

    render_article_list(
        f,
        rows[1],
        &app.home.articles,
        app.home.selected,
        false,
        "No articles yet. Press p to set your reading preferences.",
    );

    if let Some(form) = &app.home.dialog {
        render_preferences_dialog(f, form, app.home.is_updating);
    }

    if app.home.is_updating {
        render_saving_overlay(f);
    }
}

fn render_saved<B: Backend>(f: &mut Frame<B>, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(f.size());

    f.render_widget(
        navbar(
            "Saved Articles",
            "j/k move   c share   o open   Esc back   q quit",
            false,
        ),
        rows[0],
    );

    render_article_list(
        f,
        rows[1],
        &app.saved.articles,
        app.saved.selected,
        true,
        "Nothing saved yet.",
    );
}

fn render_preferences_dialog<B: Backend>(f: &mut Frame<B>, form: &PreferencesForm, saving: bool) {
    let area = centered_rect(60, 12, f.size());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" News Preferences ");
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    for (i, (label, pref)) in [
        ("Topic", PrefField::Topic),
        ("Source", PrefField::Source),
        ("Language", PrefField::Language),
    ]
    .into_iter()
    .enumerate()
    {
        let focused = form.focus == pref;
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        f.render_widget(
            Paragraph::new(Spans::from(vec![
                Span::styled(format!("{}{}: ", marker, label), style),
                Span::styled(format!("< {} >", form.display(pref)), style),
            ])),
            rows[i],
        );
    }

    let submit = if saving { "Saving..." } else { "Save Preferences" };
    f.render_widget(
        Paragraph::new(Span::styled(
            submit,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[3],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Tab field   \u{2190}/\u{2192} change   Enter save   Esc close",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center),
        rows[4],
    );
}

fn render_saving_overlay<B: Backend>(f: &mut Frame<B>) {
    let area = centered_rect(40, 3, f.size());
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new("Saving preferences...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_notices<B: Backend>(f: &mut Frame<B>, app: &App) {
    let notices = app.notifier.active();
    if notices.is_empty() {
        return;
    }

    let size = f.size();
    let width = size.width.min(44);
    let height = (notices.len() as u16).min(5);
    let area = Rect {
        x: size.width.saturating_sub(width),
        y: 0,
        width,
        height,
    };
    f.render_widget(Clear, area);

    let lines: Vec<Spans> = notices
        .iter()
        .rev()
        .take(height as usize)
        .map(|notice| {
            let color = match notice.level {
                NoticeLevel::Success => Color::Green,
                NoticeLevel::Error => Color::Red,
                NoticeLevel::Info => Color::Cyan,
            };
            Spans::from(Span::styled(
                notice.message.clone(),
                Style::default().fg(color),
            ))
        })
        .collect();
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Right), area);
}
