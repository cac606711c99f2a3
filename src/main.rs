//! build-weeks: Assemble weekly course notebooks
//!
//! Reads a YAML manifest of weeks and merges each week's upstream notebooks
//! into one notebook with banner cells and provenance metadata.

use anyhow::Result;

fn main() -> Result<()> {
    build_weeks::cli::run()
}
