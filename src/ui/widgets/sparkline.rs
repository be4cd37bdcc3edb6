//! Compact single-line sparkline for telemetry series

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub struct MiniSparkline<'a> {
    data: &'a [u64],
    max: Option<u64>,
    style: Style,
}

impl<'a> MiniSparkline<'a> {
    pub fn new(data: &'a [u64]) -> Self {
        Self {
            data,
            max: None,
            style: Style::default().fg(Color::Cyan),
        }
    }

    /// Fixed scale ceiling; defaults to the series maximum.
    pub fn max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl<'a> Widget for MiniSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.data.is_empty() {
            return;
        }
        let max = self
            .max
            .unwrap_or_else(|| self.data.iter().copied().max().unwrap_or(1));

        // Newest samples win when the series is wider than the area.
        let shown = self.data.len().min(area.width as usize);
        let start = self.data.len() - shown;
        for (i, &value) in self.data[start..].iter().enumerate() {
            buf.get_mut(area.x + i as u16, area.y)
                .set_char(bar(value, max))
                .set_style(self.style);
        }
    }
}

/// Sparkline as plain text, `width` newest samples.
pub fn sparkline_text(data: &[u64], width: usize) -> String {
    let max = data.iter().copied().max().unwrap_or(1);
    let start = data.len().saturating_sub(width);
    data[start..].iter().map(|&value| bar(value, max)).collect()
}

fn bar(value: u64, max: u64) -> char {
    let max = max.max(1);
    let scaled = ((value.min(max) as f64 / max as f64) * 7.0).round() as usize;
    BARS[scaled.min(7)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_text_keeps_newest() {
        let text = sparkline_text(&[0, 0, 0, 8], 2);
        assert_eq!(text, "▁█");
        assert!(sparkline_text(&[], 8).is_empty());
    }

    #[test]
    fn test_widget_scales_against_fixed_max() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        MiniSparkline::new(&[0, 50, 100]).max(100).render(area, &mut buf);
        let line: String = (0..3).map(|x| buf.get(x, 0).symbol().to_string()).collect();
        assert_eq!(line, "▁▅█");
    }
}
