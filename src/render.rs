//! Projection of a [`TrialDataset`] into table rows and chart series.
//!
//! [`render`] is pure: the same dataset always yields the same output, and the
//! result is meant to replace whatever the surface showed before, never to be
//! merged into it.

use crate::trials::TrialDataset;

/// Key of the measured-distance series.
pub const MEASURED_SERIES: &str = "measured";
/// Key of the reference-distance series.
pub const REAL_SERIES: &str = "real";

/// Fixed table columns.
pub const TABLE_COLUMNS: [&str; 4] = [
    "Trial No.",
    "Time",
    "Distance to measure (cm)",
    "Distance (cm)",
];

/// One table row, cells already formatted for display.
pub type TableRow = [String; 4];

/// One `(trialIndex, distanceCm)` chart point.
pub type ChartPoint = [f64; 2];

/// The two chart lines, aligned with the table rows by position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub measured: Vec<ChartPoint>,
    pub real: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Look a series up by its key.
    pub fn get(&self, key: &str) -> Option<&[ChartPoint]> {
        match key {
            MEASURED_SERIES => Some(&self.measured),
            REAL_SERIES => Some(&self.real),
            _ => None,
        }
    }

    /// `(key, points)` pairs in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[ChartPoint])> {
        [
            (MEASURED_SERIES, self.measured.as_slice()),
            (REAL_SERIES, self.real.as_slice()),
        ]
        .into_iter()
    }
}

/// Table and chart content for one dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedDataset {
    pub header_labels: Vec<String>,
    pub table_rows: Vec<TableRow>,
    pub chart_series: ChartSeries,
}

impl RenderedDataset {
    /// The header labels as one banner line, e.g. `Ensaio | Hora | Medir | Real`.
    pub fn header_banner(&self) -> String {
        self.header_labels.join(" | ")
    }
}

/// Format a float the locale-independent way, always with a decimal part
/// (`12.5`, `13.0`, `1e-7`).
pub fn format_float(v: f64) -> String {
    // `Debug` is the shortest round-trip representation and keeps the `.0`.
    format!("{v:?}")
}

pub fn render(dataset: &TrialDataset) -> RenderedDataset {
    let rows = dataset.rows();
    let mut table_rows = Vec::with_capacity(rows.len());
    let mut series = ChartSeries {
        measured: Vec::with_capacity(rows.len()),
        real: Vec::with_capacity(rows.len()),
    };
    for row in rows {
        table_rows.push([
            row.trial_index.to_string(),
            row.captured_at.clone(),
            format_float(row.measured_distance_cm),
            format_float(row.real_distance_cm),
        ]);
        let x = f64::from(row.trial_index);
        series.measured.push([x, row.measured_distance_cm]);
        series.real.push([x, row.real_distance_cm]);
    }
    RenderedDataset {
        header_labels: dataset.header_labels().to_vec(),
        table_rows,
        chart_series: series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trials::load_from_reader;
    use std::path::Path;

    const EXAMPLE: &str = "Ensaio,Hora,Medir,Real\n(ignored secondary header line)\n0,10:00:00,12.5,12.0\n1,10:00:01,13.0,12.8\n";

    fn example() -> RenderedDataset {
        render(&load_from_reader(EXAMPLE.as_bytes(), Path::new("example.csv")).unwrap())
    }

    #[test]
    fn renders_table_cells_as_text() {
        let out = example();
        assert_eq!(
            out.table_rows,
            vec![
                ["0", "10:00:00", "12.5", "12.0"].map(String::from),
                ["1", "10:00:01", "13.0", "12.8"].map(String::from),
            ]
        );
        assert_eq!(out.header_banner(), "Ensaio | Hora | Medir | Real");
    }

    #[test]
    fn chart_series_follow_table_order() {
        let out = example();
        assert_eq!(out.chart_series.measured, vec![[0.0, 12.5], [1.0, 13.0]]);
        assert_eq!(out.chart_series.real, vec![[0.0, 12.0], [1.0, 12.8]]);
        assert_eq!(out.chart_series.get(MEASURED_SERIES).unwrap().len(), 2);
        assert!(out.chart_series.get("other").is_none());
        let keys: Vec<&str> = out.chart_series.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, [MEASURED_SERIES, REAL_SERIES]);
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(example(), example());
    }

    #[test]
    fn float_formatting_keeps_decimal_point() {
        assert_eq!(format_float(13.0), "13.0");
        assert_eq!(format_float(12.8), "12.8");
        assert_eq!(format_float(-0.5), "-0.5");
    }
}
