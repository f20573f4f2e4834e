use anyhow::{Context, Result};
use clap::Parser;
use quadview::{
    AppConfig, FrameContext, Lab, LabConfig, LoggingConfig, RecordingRenderer, RenderCommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quadview")]
#[command(about = "Four-quadrant viewer for the orthographic projection labs")]
struct Cli {
    /// Lab to run
    #[arg(short, long, value_enum, default_value = "phong-cube")]
    lab: Lab,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,

    /// STL model for the model-views lab
    #[arg(short, long, default_value = "models/teapot.stl")]
    model: PathBuf,

    /// Start with the scenes spinning (toggle with R)
    #[arg(long, default_value = "false")]
    rotate: bool,

    /// Log filter, e.g. "debug" or "quadview=debug,wgpu=warn"
    #[arg(long)]
    log: Option<String>,

    /// Print the renderer calls of one frame instead of opening a window
    #[arg(long, default_value = "false")]
    trace: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &cli.log {
        logging = logging.filter(filter.as_str());
    }
    quadview::init_logging(logging);

    if cli.trace {
        trace_frame(&cli);
        return Ok(());
    }

    let config = AppConfig::new()
        .size(cli.width, cli.height)
        .lab(cli.lab)
        .model_path(cli.model)
        .rotate_scenes(cli.rotate);

    quadview::run(config).context("viewer stopped")
}

fn trace_frame(cli: &Cli) {
    let setup = cli.lab.build(&LabConfig {
        aspect: cli.width as f32 / cli.height.max(1) as f32,
        model_path: cli.model.clone(),
        ..LabConfig::default()
    });
    let (mut scenes, mut cameras) = (setup.scenes, setup.cameras);
    let mut renderer = RecordingRenderer::new(cli.width, cli.height);

    let mut ctx = FrameContext {
        scenes: &mut scenes,
        cameras: &mut cameras,
        rotate_scenes: cli.rotate,
        dt: 0.0,
    };
    setup.viewer.render_frame(&mut renderer, &mut ctx);

    println!("{} ({}x{})", cli.lab.title(), cli.width, cli.height);
    for command in renderer.commands() {
        match command {
            RenderCommand::Render {
                scene,
                pose,
                viewport,
                objects,
                ..
            } => println!(
                "  render {scene:<10} viewport {viewport:?} from {:?} ({objects} objects)",
                pose.position
            ),
            other => println!("  {other:?}"),
        }
    }
}
