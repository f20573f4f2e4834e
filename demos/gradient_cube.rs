//! Gradient-mapped cube: top and back views, an isometric tilt and a perspective camera.

use quadview::{AppConfig, Lab, LoggingConfig};

fn main() -> anyhow::Result<()> {
    quadview::init_logging(LoggingConfig::default());
    quadview::run(AppConfig::new().lab(Lab::GradientCube).size(1024, 768))?;
    Ok(())
}
