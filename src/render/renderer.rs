use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::grid::{CellKind, grid_rows};
use crate::game::{GameState, Phase};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Two columns per cell plus the border
        let board_width = (state.grid_size as u16).saturating_mul(2).saturating_add(2);
        let board_height = (state.grid_size as u16).saturating_add(2);
        let board_area = centered(chunks[1], board_width, board_height);
        frame.render_widget(self.render_grid(state), board_area);

        if let Some(overlay) = self.render_overlay(state) {
            let popup_area = centered(board_area, board_width.min(36), 7);
            frame.render_widget(Clear, popup_area);
            frame.render_widget(overlay, popup_area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let lines: Vec<Line> = grid_rows(state)
            .into_iter()
            .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Green))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_overlay(&self, state: &GameState) -> Option<Paragraph<'_>> {
        let (title, color, lines) = match state.phase {
            Phase::Running => return None,
            Phase::NotStarted => (
                " Snake ",
                Color::Yellow,
                vec![
                    Line::from(""),
                    key_hint("Press ", "Enter", " to start", Color::Green),
                ],
            ),
            Phase::Paused => (
                " Paused ",
                Color::Blue,
                vec![
                    Line::from(""),
                    key_hint("Press ", "Space", " to continue", Color::Cyan),
                ],
            ),
            Phase::GameOver => (
                " Game Over ",
                Color::Red,
                vec![
                    Line::from(vec![
                        Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                        Span::styled(
                            state.score.to_string(),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(""),
                    key_hint("Press ", "R", " to play again", Color::Green),
                    key_hint("or ", "Q", " to quit", Color::Red),
                ],
            ),
        };

        Some(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title),
            ),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(", "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" or mouse swipe to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(cell: CellKind) -> Span<'static> {
    match cell {
        CellKind::Head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        CellKind::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
        CellKind::Food => Span::styled(
            "● ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}

fn key_hint(
    prefix: &'static str,
    key: &'static str,
    suffix: &'static str,
    color: Color,
) -> Line<'static> {
    Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Gray)),
        Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(suffix, Style::default().fg(Color::Gray)),
    ])
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
