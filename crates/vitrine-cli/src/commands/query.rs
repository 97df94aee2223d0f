//! The `query` command: one-shot substring search over image names.

use crate::app::App;
use crate::OutputFormat;
use std::path::PathBuf;
use vitrine_core::Config;

pub fn run(
    config: Config,
    manifest: Option<PathBuf>,
    pattern: &str,
    limit: usize,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let app = App::new(config, manifest)?;

    let matches = app.index.query(pattern);

    // present in store (render) order, like the gallery grid does
    let records: Vec<_> = app
        .store
        .iter()
        .filter(|record| matches.contains(&record.id))
        .take(limit)
        .collect();

    match output {
        OutputFormat::Text => {
            for record in &records {
                println!(
                    "{:>6}  {:<30} {:>5}x{:<5} {}",
                    record.id.as_u64(),
                    record.name,
                    record.width,
                    record.height,
                    record.path
                );
            }
            println!(
                "\n{} of {} images match \"{}\"",
                matches.len(),
                app.store.len(),
                pattern
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
