use anyhow::{Context, Result};
use autoplan_core::{save_network, NetworkData};
use std::path::Path;

pub fn handle(out: &Path) -> Result<()> {
    let data = NetworkData::quarterly_baseline();
    save_network(out, &data)
        .with_context(|| format!("writing reference quarter to '{}'", out.display()))?;
    println!("Reference quarter written to {} ({} rows)", out.display(), data.row_count());
    Ok(())
}
