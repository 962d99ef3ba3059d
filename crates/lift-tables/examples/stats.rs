use std::env;
use std::path::PathBuf;

use lift_tables::{ConvertConfig, LiftDocument, LoadMode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lift_file = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: cargo run -p lift-tables --example stats -- <lexicon.lift>")?;

    let lift = LiftDocument::load_with_mode(&lift_file, LoadMode::Mmap)?;
    let tables = lift.convert(&ConvertConfig::default())?;

    println!("Lexicon: {}", lift_file.display());
    for table in tables.iter() {
        println!("{:<20} {:>6} rows, {} columns", table.name(), table.len(), table.columns().len());
    }

    let variants = tables
        .morphs
        .column("ID")
        .unwrap_or_default()
        .iter()
        .zip(tables.morphs.column("Morpheme_ID").unwrap_or_default())
        .filter(|(id, owner)| !id.starts_with(&format!("{owner}-")))
        .count();
    println!("Morphs folded in from variant entries: {variants}");

    let empty = tables
        .senses
        .column("Description")
        .unwrap_or_default()
        .iter()
        .filter(|d| d.is_empty())
        .count();
    println!("Senses without gloss or definition: {empty}");

    Ok(())
}
