use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lift_tables::Tables;
use lift_types::Table;
use tracing::debug;

/// Write `table` to `<dir>/<name>.csv` with a header row.
pub fn write_table(dir: &Path, table: &Table) -> Result<PathBuf> {
    write_table_as(dir, table.name(), table)
}

/// Write `table` to `<dir>/<file_stem>.csv`.
pub fn write_table_as(dir: &Path, file_stem: &str, table: &Table) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format!("{file_stem}.csv"));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("open {}", path.display()))?;
    writer
        .write_record(table.columns())
        .with_context(|| format!("write header to {}", path.display()))?;
    for (idx, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("write row {} to {}", idx + 1, path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(path)
}

/// Write every table of a conversion; the example table only when present.
pub fn write_tables(dir: &Path, tables: &Tables) -> Result<Vec<PathBuf>> {
    tables.iter().map(|table| write_table(dir, table)).collect()
}
