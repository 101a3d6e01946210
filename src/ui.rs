//! Terminal UI rendering with ratatui

use blockfall::{Board, GameController, PlayerId, ViewSnapshot, HIDDEN_ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const BLOCK: &str = "██";
const EMPTY: &str = "  ";

/// Width of the next-piece / score column
const SIDE_WIDTH: u16 = 16;
/// How long a clear bonus stays on screen
const NOTIFICATION_TIME: Duration = Duration::from_secs(1);

/// A short-lived "+points" message next to one player's board
#[derive(Debug, Clone)]
pub struct Notification {
    pub player: PlayerId,
    pub text: String,
    shown_at: Instant,
}

impl Notification {
    pub fn new(player: PlayerId, text: String) -> Self {
        Self {
            player,
            text,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTIFICATION_TIME
    }
}

/// Cell colour by piece id
fn cell_color(value: u8) -> Color {
    match value {
        1 => Color::Rgb(0, 240, 255),  // I
        2 => Color::Rgb(180, 0, 255),  // J
        3 => Color::Rgb(0, 255, 0),    // L
        4 => Color::Rgb(255, 255, 0),  // O
        5 => Color::Rgb(255, 0, 80),   // S
        6 => Color::Rgb(255, 0, 255),  // T
        7 => Color::Rgb(255, 165, 0),  // Z
        _ => Color::White,
    }
}

/// Render every player's board, plus pause and game-over overlays
pub fn render_game(frame: &mut Frame, controller: &GameController, notification: Option<&Notification>) {
    let area = frame.area();
    let players = controller.players();

    let Some(first) = controller.board(PlayerId::One) else {
        return;
    };
    let board_width = first.cols() as u16 * 2 + 2;
    let board_height = (first.rows().saturating_sub(HIDDEN_ROWS)) as u16 + 2;
    let player_width = board_width + SIDE_WIDTH;
    let total_width = player_width * players.len() as u16 + 2 * (players.len() as u16 - 1);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(board_height), Constraint::Length(1)])
        .split(center_rect(area, total_width, board_height + 1));

    let mut constraints = Vec::new();
    for (i, _) in players.iter().enumerate() {
        if i > 0 {
            constraints.push(Constraint::Length(2));
        }
        constraints.push(Constraint::Length(player_width));
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(layout[0]);

    for (i, &player) in players.iter().enumerate() {
        let Some(board) = controller.board(player) else {
            continue;
        };
        let column = columns[i * 2];
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(board_width), Constraint::Length(SIDE_WIDTH)])
            .split(column);

        let title = if controller.is_versus() {
            match player {
                PlayerId::One => " P1 ",
                PlayerId::Two => " P2 ",
            }
        } else {
            " BLOCKFALL "
        };
        render_board(frame, split[0], board, title);
        render_side(
            frame,
            split[1],
            board,
            controller,
            notification.filter(|n| n.player == player && !n.is_expired()),
        );

        if board.is_game_over() {
            render_overlay(frame, split[0], "GAME OVER", "Press N to restart");
        }
    }

    render_hint(frame, layout[1], controller.is_versus());

    if controller.is_paused() {
        render_overlay(frame, area, "PAUSED", "Press P to resume");
    }
}

/// Locked cells plus the falling piece, without the hidden rows
fn render_board(frame: &mut Frame, area: Rect, board: &Board, title: &str) {
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let grid = board.board_matrix();
    let view = board.view();

    let mut lines: Vec<Line> = Vec::new();
    for (row, cells) in grid.iter().enumerate().skip(HIDDEN_ROWS) {
        let spans: Vec<Span> = cells
            .iter()
            .enumerate()
            .map(|(col, &locked)| {
                match falling_cell(&view, row as i32, col as i32) {
                    Some(value) => Span::styled(BLOCK, Style::default().fg(cell_color(value)).bold()),
                    None if locked != 0 => Span::styled(BLOCK, Style::default().fg(cell_color(locked))),
                    None => Span::raw(EMPTY),
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Value of the falling piece at a grid cell, if it covers it
fn falling_cell(view: &ViewSnapshot, row: i32, col: i32) -> Option<u8> {
    let dr = row - view.y();
    let dc = col - view.x();
    if dr < 0 || dc < 0 {
        return None;
    }
    view.brick_data()
        .get(dr as usize)
        .and_then(|cells| cells.get(dc as usize))
        .copied()
        .filter(|&value| value != 0)
}

fn render_side(
    frame: &mut Frame,
    area: Rect,
    board: &Board,
    controller: &GameController,
    notification: Option<&Notification>,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    let next_block = Block::default()
        .title(" NEXT ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let next_inner = next_block.inner(layout[0]);
    frame.render_widget(next_block, layout[0]);
    render_preview(frame, next_inner, board.view().next_brick_data());

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let stats_inner = stats_block.inner(layout[1]);
    frame.render_widget(stats_block, layout[1]);

    let difficulty = controller.difficulty();
    let mut lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", board.score().points()),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        Line::from(Span::styled("MODE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            difficulty.name(),
            Style::default().fg(match difficulty {
                blockfall::Difficulty::Easy => Color::Green,
                blockfall::Difficulty::Hard => Color::Red,
            }),
        )),
    ];

    if let Some(notification) = notification {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            notification.text.clone(),
            Style::default().fg(Color::Magenta).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), stats_inner);
}

/// Draw the rows of a 4x4 shape that hold at least one cell
fn render_preview(frame: &mut Frame, area: Rect, shape: &[Vec<u8>]) {
    let lines: Vec<Line> = shape
        .iter()
        .filter(|row| row.iter().any(|&c| c != 0))
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&value| {
                        if value != 0 {
                            Span::styled(BLOCK, Style::default().fg(cell_color(value)))
                        } else {
                            Span::raw(EMPTY)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_hint(frame: &mut Frame, area: Rect, versus: bool) {
    let hint = if versus {
        "P1 ←→↓↑  P2 ADSW  P pause  N new  V solo  H speed  Q quit"
    } else {
        "←→ move  ↓ drop  ↑ rotate  P pause  N new  V versus  H speed  Q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::styled(hint, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 22u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
