//! Score sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use exercast::scoring::MAX_SCORE;

use crate::ui::score_color;

/// Block characters for different scores (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One column per hour, colored by score band
pub struct ScoreSparkline<'a> {
    scores: &'a [f64],
    /// Column of the current hour, drawn with the marker style
    current_position: Option<usize>,
    marker_style: Style,
}

impl<'a> ScoreSparkline<'a> {
    pub fn new(scores: &'a [f64]) -> Self {
        Self {
            scores,
            current_position: None,
            marker_style: Style::default().fg(Color::Black).bg(Color::Yellow),
        }
    }

    pub fn current_position(mut self, pos: Option<usize>) -> Self {
        self.current_position = pos;
        self
    }

    /// Fits the scores into `width` columns, averaging neighbouring hours
    /// when there are more hours than columns.
    ///
    /// Returns each column's score and whether it holds the current hour.
    fn columns(&self, width: usize) -> Vec<(f64, bool)> {
        let len = self.scores.len();
        let is_current = |range: std::ops::Range<usize>| {
            self.current_position.is_some_and(|pos| range.contains(&pos))
        };

        if len <= width {
            return self
                .scores
                .iter()
                .enumerate()
                .map(|(i, score)| (*score, is_current(i..i + 1)))
                .collect();
        }

        (0..width)
            .map(|col| {
                let start = col * len / width;
                let end = ((col + 1) * len / width).max(start + 1);
                let bucket = &self.scores[start..end];
                let mean = bucket.iter().sum::<f64>() / bucket.len() as f64;
                (mean, is_current(start..end))
            })
            .collect()
    }

    fn score_to_block(score: f64) -> char {
        let normalized = (score / MAX_SCORE).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for ScoreSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (i, (score, current)) in self.columns(area.width as usize).into_iter().enumerate() {
            let style = if current {
                self.marker_style
            } else {
                Style::default().fg(score_color(score))
            };

            if let Some(cell) = buf.cell_mut((area.x + i as u16, area.y)) {
                cell.set_char(Self::score_to_block(score)).set_style(style);
            }
        }
    }
}
