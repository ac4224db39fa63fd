use std::{
    fmt::{self, Display},
    fs,
    path::Path,
};

use log::info;

use crate::{Result, RfErr, layers::LayerRecord};

/// Column headers, in the order `LayerRecord::cells` renders them.
pub const HEADERS: [&str; LayerRecord::COLUMNS] = [
    "Layer",
    "Kernel",
    "Stride",
    "Padding",
    "InputSize",
    "OutputSize",
    "ReceptiveField",
];

/// A markdown pipe table over a set of layer records.
///
/// Every column is two characters wider than its longest cell (header included),
/// headers are centered and values right aligned with one trailing space.
pub struct Table<'a> {
    records: &'a [LayerRecord],
}

impl<'a> Table<'a> {
    pub fn new(records: &'a [LayerRecord]) -> Self {
        Self { records }
    }

    /// Computes the width of each column for the current records.
    pub fn column_widths(&self) -> [usize; LayerRecord::COLUMNS] {
        let mut widths = HEADERS.map(|header| header.len() + 2);

        for record in self.records {
            for (width, cell) in widths.iter_mut().zip(record.cells()) {
                *width = (*width).max(cell.chars().count() + 2);
            }
        }

        widths
    }

    /// Renders the header, the alignment row and one row per record.
    ///
    /// Header and alignment rows end in a newline, data rows are newline separated.
    pub fn render(&self) -> String {
        let widths = self.column_widths();

        let header = HEADERS
            .iter()
            .zip(widths)
            .map(|(name, width)| format!("{name:^width$}"))
            .collect::<Vec<_>>();

        let align = widths
            .iter()
            .map(|width| format!("{}:", "-".repeat(width - 1)))
            .collect::<Vec<_>>();

        let rows = self
            .records
            .iter()
            .map(|record| {
                let cells = record
                    .cells()
                    .iter()
                    .zip(widths)
                    .map(|(value, width)| format!("{value:>w$} ", w = width - 1))
                    .collect::<Vec<_>>();
                format!("|{}|", cells.join("|"))
            })
            .collect::<Vec<_>>();

        format!(
            "|{}|\n|{}|\n{}",
            header.join("|"),
            align.join("|"),
            rows.join("\n")
        )
    }

    /// Writes the rendered table to `path` as UTF-8, creating any missing parent
    /// directory and truncating an existing file.
    ///
    /// # Errors
    /// `RfErr::Path` if the directory or the file couldn't be written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let path_err = |source| RfErr::Path {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(path_err)?;
        }

        fs::write(path, self.render()).map_err(path_err)?;
        info!("wrote {} layer(s) to {}", self.records.len(), path.display());
        Ok(())
    }
}

impl Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
