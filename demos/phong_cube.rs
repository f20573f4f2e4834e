//! Phong-shaded cube seen from the front, top, side and an isometric corner.

use quadview::{AppConfig, Lab, LoggingConfig};

fn main() -> anyhow::Result<()> {
    quadview::init_logging(LoggingConfig::default());
    quadview::run(AppConfig::new().lab(Lab::PhongCube).size(1024, 768))?;
    Ok(())
}
