//! Terminal painting for the `bandview` demo host.
//!
//! Terminals have no alpha channel, so the demo composites each band's RGBA
//! brush over a configured base background and paints the result as the row
//! background. Band geometry is document-space (top = logical line, one row
//! per line); painting subtracts the scroll origin.

use crate::band::{Brush, Rgb};
use crate::model::{Band, Extent};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::collections::BTreeSet;

/// Document line numbers that currently carry a band.
pub fn banded_rows(bands: &[(Extent, Band)]) -> BTreeSet<usize> {
    bands.iter().map(|(_, band)| band.top as usize).collect()
}

/// Collapse a band brush to an opaque terminal color.
pub fn band_color(brush: Brush, base: Rgb) -> Color {
    let composed = brush.over(base);
    Color::Rgb(composed.r, composed.g, composed.b)
}

/// Everything the painter needs for one frame.
pub struct Screen<'a> {
    /// The full document, one string per logical line.
    pub lines: &'a [String],
    /// First visible document line.
    pub top_line: usize,
    /// First visible column (horizontal scroll).
    pub left_col: usize,
    /// Document lines carrying a band.
    pub banded: &'a BTreeSet<usize>,
    /// Opaque band fill.
    pub fill: Color,
}

/// Paint the visible document slice with band backgrounds.
pub fn draw(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    let width = area.width as usize;

    let mut rows: Vec<Line> = Vec::with_capacity(area.height as usize);
    for row in 0..area.height as usize {
        let doc_line = screen.top_line + row;
        let Some(text) = screen.lines.get(doc_line) else {
            rows.push(Line::from(""));
            continue;
        };
        let visible: String = text.chars().skip(screen.left_col).take(width).collect();
        if screen.banded.contains(&doc_line) {
            // Pad so the band spans the full viewport width.
            let padded = format!("{visible:<width$}");
            rows.push(Line::from(Span::styled(
                padded,
                Style::default().bg(screen.fill),
            )));
        } else {
            rows.push(Line::from(visible));
        }
    }

    frame.render_widget(Paragraph::new(rows), area);
}
