//! Cube under a projective transform with its edges extended along each axis.

use quadview::{AppConfig, Lab, LoggingConfig};

fn main() -> anyhow::Result<()> {
    quadview::init_logging(LoggingConfig::default());
    quadview::run(AppConfig::new().lab(Lab::ProjectiveEdges).size(1024, 768))?;
    Ok(())
}
