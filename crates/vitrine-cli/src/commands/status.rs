//! The `status` command: gallery statistics.

use crate::app::App;
use std::path::PathBuf;
use vitrine_core::Config;

pub fn run(config: Config, manifest: Option<PathBuf>) -> anyhow::Result<()> {
    let app = App::new(config, manifest)?;

    let total_pixels: u64 = app
        .store
        .iter()
        .map(|record| record.width as u64 * record.height as u64)
        .sum();
    let newest = app.store.iter().map(|record| record.time).max();

    println!("Gallery Status");
    println!("==============");
    println!("Images:        {}", app.store.len());
    println!("Indexed names: {}", app.index.len());
    println!(
        "Total pixels:  {:.1} MP",
        total_pixels as f64 / 1_000_000.0
    );
    if let Some(newest) = newest {
        println!("Newest upload: {}", newest.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(())
}
