use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen, StatusKind};
use crate::game::{Game, MAX_MISSES};
use crate::saves::SaveSummary;
use crate::stats::{GameResult, StatsSummary};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// One drawing per miss count, 0 through `MAX_MISSES`
const GALLOWS: [&[&str]; 7] = [
    &["  +---+", "  |   |", "      |", "      |", "      |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", "      |", "      |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", "  |   |", "      |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", " /|   |", "      |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", " /|\\  |", "      |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", " /|\\  |", " /    |", "      |", "========="],
    &["  +---+", "  |   |", "  O   |", " /|\\  |", " / \\  |", "      |", "========="],
];

/// Gallows for `misses`, padded so every line has the same width
pub fn gallows_lines(misses: u32) -> Vec<String> {
    let stage = GALLOWS[(misses.min(MAX_MISSES)) as usize];
    let width = stage.iter().map(|l| l.width()).max().unwrap_or(0);
    stage
        .iter()
        .map(|l| format!("{l}{}", " ".repeat(width - l.width())))
        .collect()
}

fn counters_line(game: &Game) -> String {
    format!(
        "words guessed: {}   words left: {}   misses: {}/{}",
        game.words_guessed(),
        game.words_remaining(),
        game.misses(),
        MAX_MISSES
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = self.service.game();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // counters
                Constraint::Min(1),    // body
                Constraint::Length(1), // status
                Constraint::Length(1), // help
            ])
            .split(area);

        Paragraph::new(Span::styled(counters_line(game), dim_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let help = match self.screen {
            Screen::Playing => {
                "type a letter · tab skip word · F2 stats · F3 saves · F4 add words · esc quit"
            }
            Screen::RoundOver => "any key next word · esc quit",
            Screen::Won | Screen::Lost => "n new game · F2 stats · F3 saves · esc quit",
            Screen::Stats => "esc back",
            Screen::Saves => "↑/↓ select · enter load · esc back",
            Screen::AddWords => "enter add · esc cancel",
        };

        match self.screen {
            Screen::Playing => render_round(game, chunks[1], buf, bold_style),
            Screen::RoundOver => {
                let lines = vec![
                    Line::from(Span::styled("you got it!", green_bold_style)),
                    Line::from(""),
                    Line::from(Span::styled(
                        self.revealed_word.clone().unwrap_or_default(),
                        bold_style,
                    )),
                ];
                render_centered(lines, chunks[1], buf);
            }
            Screen::Won => {
                let lines = vec![
                    Line::from(Span::styled("you won!", green_bold_style)),
                    Line::from(""),
                    Line::from(format!("all {} words guessed", game.words_guessed())),
                ];
                render_centered(lines, chunks[1], buf);
            }
            Screen::Lost => {
                let mut lines: Vec<Line> = gallows_lines(game.misses())
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, red_bold_style)))
                    .collect();
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("game over", red_bold_style)));
                if let Some(word) = &self.revealed_word {
                    lines.push(Line::from(vec![
                        Span::raw("the word was "),
                        Span::styled(word.clone(), bold_style),
                    ]));
                }
                render_centered(lines, chunks[1], buf);
            }
            Screen::Stats => render_stats(
                &self.stats.summary,
                &self.stats.recent,
                chunks[1],
                buf,
                bold_style,
            ),
            Screen::Saves => render_saves(
                &self.saves.entries,
                self.saves.selected,
                chunks[1],
                buf,
                bold_style,
            ),
            Screen::AddWords => render_add_words(&self.prompt, chunks[1], buf, bold_style),
        }

        if let Some(status) = &self.status {
            let style = match status.kind {
                StatusKind::Info => Style::default().fg(Color::Yellow),
                StatusKind::Good => Style::default().fg(Color::Green),
                StatusKind::Bad => Style::default().fg(Color::Red),
            };
            Paragraph::new(Span::styled(status.text.clone(), style))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::ITALIC)))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}

fn render_centered(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let inner = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top),
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

fn render_round(game: &Game, area: Rect, buf: &mut Buffer, bold_style: Style) {
    let mut lines: Vec<Line> = gallows_lines(game.misses())
        .into_iter()
        .map(Line::from)
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        game.masked_word(),
        bold_style.fg(Color::Cyan),
    )));
    lines.push(Line::from(""));
    let guessed = game.guessed_letters();
    lines.push(Line::from(vec![
        Span::styled("guessed: ", Style::default().add_modifier(Modifier::DIM)),
        Span::raw(if guessed.is_empty() { "-".to_string() } else { guessed }),
    ]));
    render_centered(lines, area, buf);
}

fn render_add_words(prompt: &str, area: Rect, buf: &mut Buffer, bold_style: Style) {
    let lines = vec![
        Line::from("word file, one or more words per line:"),
        Line::from(""),
        Line::from(vec![
            Span::styled(prompt.to_string(), bold_style),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ];
    let block = Block::default().borders(Borders::ALL).title("Add words");
    let inner = block.inner(area);
    block.render(area, buf);
    render_centered(lines, inner, buf);
}

fn render_stats(
    summary: &StatsSummary,
    recent: &[GameResult],
    area: Rect,
    buf: &mut Buffer,
    bold_style: Style,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    let summary_lines = vec![
        Line::from(format!(
            "games: {}   won: {}   lost: {}   win rate: {:.1}%",
            summary.games_played(),
            summary.wins,
            summary.losses,
            summary.win_rate()
        )),
        Line::from(format!(
            "guesses: {} right, {} wrong   accuracy: {:.1}%",
            summary.correct_guesses,
            summary.wrong_guesses,
            summary.accuracy()
        )),
    ];
    Paragraph::new(summary_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .render(chunks[0], buf);

    let rows = recent.iter().map(|r| {
        let (label, color) = if r.won {
            ("won", Color::Green)
        } else {
            ("lost", Color::Red)
        };
        Row::new(vec![
            Cell::from(r.finished_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(label).style(Style::default().fg(color)),
            Cell::from(format!("{}/{}", r.words_guessed, r.total_words)),
        ])
    });

    Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(6),
            Constraint::Min(5),
        ],
    )
    .header(Row::new(vec!["finished", "result", "words"]).style(bold_style))
    .block(Block::default().borders(Borders::ALL).title("Recent games"))
    .render(chunks[1], buf);
}

fn render_saves(
    entries: &[SaveSummary],
    selected: usize,
    area: Rect,
    buf: &mut Buffer,
    bold_style: Style,
) {
    let block = Block::default().borders(Borders::ALL).title("Saved games");

    if entries.is_empty() {
        Paragraph::new("no saved games")
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
        return;
    }

    let rows = entries.iter().enumerate().map(|(idx, s)| {
        let row = Row::new(vec![
            Cell::from(format!("#{}", s.id)),
            Cell::from(s.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(s.words_guessed.to_string()),
            Cell::from(s.words_remaining.to_string()),
            Cell::from(format!("{}/{}", s.misses, MAX_MISSES)),
        ]);
        if idx == selected {
            row.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            row
        }
    });

    Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(18),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Min(6),
        ],
    )
    .header(Row::new(vec!["id", "updated", "guessed", "left", "misses"]).style(bold_style))
    .block(block)
    .render(area, buf);
}
