use std::io;
use tracing::info;

use cef::runtime::{boot, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let config = boot::boot()?;

    let stats = run::run(io::stdin().lock(), io::stdout().lock(), &config)?;
    info!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        skipped = stats.skipped,
        "Finished parsing input"
    );
    Ok(())
}
