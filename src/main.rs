use asset_squeeze::{Driver, OptimizerConfig};
use log::LevelFilter;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let driver = Driver::new(OptimizerConfig::default())?;
    let summary = driver.run();

    log::debug!(
        "Run finished: {} directories processed, {} missing",
        summary.directories.len(),
        summary.missing.len()
    );

    Ok(())
}
