use log::debug;
use std::cmp::Ordering;
use std::io::{self, Write};

use crate::loan::{round, BalanceSeries};

pub const TITLE: &str = "Mortgage Balance by Years";

const MARKER: char = 'o';
const GRID: char = '.';
const LABEL_WIDTH: usize = 12;

/// Draws a balance series somewhere; the engine never renders anything itself.
pub trait SeriesRenderer {
    fn render(&self, series: &BalanceSeries, out: &mut dyn Write) -> io::Result<()>;
}

/// Terminal line chart: one marker per year, joined by connectors, with
/// horizontal gridlines every `grid_every` rows.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct AsciiChart {
    pub height: usize,
    pub column_width: usize,
    pub grid_every: usize,
}

impl Default for AsciiChart {
    fn default() -> Self {
        Self {
            height: 20,
            column_width: 3,
            grid_every: 5,
        }
    }
}

impl AsciiChart {
    fn rows(&self) -> usize {
        self.height.max(2)
    }

    fn column_width(&self) -> usize {
        self.column_width.max(2)
    }

    fn is_gridline(&self, row: usize) -> bool {
        self.grid_every > 0 && row % self.grid_every == 0
    }

    fn top(series: &BalanceSeries) -> f64 {
        series
            .max_balance()
            .filter(|max| *max > 0.)
            .unwrap_or(1.)
    }

    // row 0 is the top of the chart (the largest balance)
    fn row_of(&self, balance: f64, top: f64) -> usize {
        let last_row = (self.rows() - 1) as f64;
        let clamped = balance.clamp(0., top);
        ((top - clamped) / top * last_row).round() as usize
    }

    fn row_value(&self, row: usize, top: f64) -> f64 {
        let last_row = self.rows() - 1;
        top * (last_row - row) as f64 / last_row as f64
    }

    /// Plot area without axes or labels, top row first.
    fn canvas(&self, series: &BalanceSeries) -> Vec<String> {
        if series.is_empty() {
            return Vec::new();
        }
        let width = self.column_width();
        let columns = (series.len() - 1) * width + 1;
        let top = Self::top(series);

        let mut canvas: Vec<Vec<char>> = (0..self.rows())
            .map(|row| {
                let fill = if self.is_gridline(row) { GRID } else { ' ' };
                vec![fill; columns]
            })
            .collect();

        let rows: Vec<usize> = series
            .iter()
            .map(|point| self.row_of(point.balance, top))
            .collect();

        for (i, pair) in rows.windows(2).enumerate() {
            connect(&mut canvas, i * width, width, pair[0], pair[1]);
        }
        for (i, row) in rows.iter().enumerate() {
            canvas[*row][i * width] = MARKER;
        }

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect()
    }

    fn year_ticks(&self, series: &BalanceSeries) -> String {
        let width = self.column_width();
        let mut ticks = String::new();
        for (i, point) in series.iter().enumerate() {
            let x = i * width;
            if !ticks.is_empty() && ticks.len() >= x {
                continue;
            }
            while ticks.len() < x {
                ticks.push(' ');
            }
            ticks.push_str(&point.year.to_string());
        }
        ticks
    }
}

fn connect(canvas: &mut [Vec<char>], x0: usize, width: usize, from: usize, to: usize) {
    let gap = width - 1;
    let (glyph, span) = match to.cmp(&from) {
        Ordering::Equal => {
            for x in x0 + 1..x0 + width {
                canvas[from][x] = '-';
            }
            return;
        }
        Ordering::Greater => ('\\', to - from + 1),
        Ordering::Less => ('/', from - to + 1),
    };
    for step in 0..span {
        let row = if to > from { from + step } else { from - step };
        canvas[row][x0 + 1 + step * gap / span] = glyph;
    }
}

impl SeriesRenderer for AsciiChart {
    fn render(&self, series: &BalanceSeries, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", TITLE)?;
        if series.is_empty() {
            return Ok(());
        }

        let top = Self::top(series);
        let canvas = self.canvas(series);
        let columns = canvas.first().map_or(0, |row| row.chars().count());
        let last_row = canvas.len() - 1;
        debug!(
            "charting {} points on a {}x{} canvas",
            series.len(),
            columns,
            canvas.len()
        );

        writeln!(out, "{:>w$}", "Balance", w = LABEL_WIDTH)?;
        for (row, line) in canvas.iter().enumerate() {
            if self.is_gridline(row) || row == last_row {
                let label = format!("{:.2}", round(self.row_value(row, top), 2));
                writeln!(out, "{:>w$} |{}", label, line, w = LABEL_WIDTH)?;
            } else {
                writeln!(out, "{:>w$} |{}", "", line, w = LABEL_WIDTH)?;
            }
        }
        writeln!(out, "{:>w$} +{}", "", "-".repeat(columns), w = LABEL_WIDTH)?;
        writeln!(
            out,
            "{:>w$}  {}",
            "",
            self.year_ticks(series),
            w = LABEL_WIDTH
        )?;
        writeln!(
            out,
            "{:>w$}  {:^c$}",
            "",
            "Years",
            w = LABEL_WIDTH,
            c = columns
        )
    }
}

/// `year,balance` records, balance in cents precision.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct CsvExport;

impl SeriesRenderer for CsvExport {
    fn render(&self, series: &BalanceSeries, out: &mut dyn Write) -> io::Result<()> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(["year", "balance"])?;
        for point in series {
            wtr.write_record([
                point.year.to_string(),
                format!("{:.2}", round(point.balance, 2)),
            ])?;
        }
        wtr.flush()
    }
}
