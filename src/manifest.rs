//! Writes the audit manifest: one `<name>, <download_url>` line per item.
//! The file is produced before downloads begin and never read back.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

use crate::catalog::VodItem;

pub fn write_manifest(items: &[VodItem], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create manifest file: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    for item in items {
        let Some(url) = item.download_url.as_deref() else {
            warn!(name = %item.name, "item has no download url, not listed in manifest");
            continue;
        };
        writeln!(writer, "{}, {}", item.name, url)
            .with_context(|| format!("Failed to write manifest entry for {}", item.name))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush manifest file: {:?}", path))?;

    Ok(())
}
