//! LED Matrix Studio CLI - Create, inspect and export matrix animation projects.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::info;

use led_matrix_studio::{
    compute::{Quadrant, encode_frame, export_loop, file_stem, hex_preview},
    schema::{Frame, Project, Shape},
    sink::{BinarySink, BundleReader, BundleSink, CompressionType, FolderSink},
};

#[derive(Parser, Debug)]
#[command(name = "led-matrix-studio", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new project file.
    New(NewArgs),
    /// Encode a project into four quadrant EEPROM images.
    Export(ExportArgs),
    /// Print the encoded bytes of one frame.
    Inspect(InspectArgs),
    /// Extract the images stored in a bundle.
    Unpack(UnpackArgs),
    /// Print an example project document.
    Example,
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Project name.
    name: String,

    /// Output project JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Preset shape for the first frame.
    #[arg(long)]
    shape: Option<Shape>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    project: PathBuf,

    /// Output directory for the `.bin` files (default: `<name>_binaries`).
    #[arg(long, conflicts_with = "bundle")]
    out_dir: Option<PathBuf>,

    /// Write a single `.lmsb` bundle instead of a folder.
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Override the project's loop size.
    #[arg(long, allow_hyphen_values = true)]
    loop_size: Option<i32>,

    /// Compress bundle entries with LZ4.
    #[arg(long, default_value_t = false, requires = "bundle")]
    lz4: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input project JSON.
    project: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: usize,
}

#[derive(Parser, Debug)]
struct UnpackArgs {
    /// Input bundle.
    bundle: PathBuf,

    /// Directory to extract into.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::New(args) => cmd_new(args),
        Command::Export(args) => cmd_export(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Unpack(args) => cmd_unpack(args),
        Command::Example => cmd_example(),
    }
}

fn load_project(path: &Path) -> anyhow::Result<Project> {
    Project::load(path).with_context(|| format!("load project '{}'", path.display()))
}

fn cmd_new(args: NewArgs) -> anyhow::Result<()> {
    let mut project = Project::new(args.name);
    if let Some(shape) = args.shape {
        project.frames[0].grid = shape.generate();
    }

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    project
        .save(&args.out)
        .with_context(|| format!("write project '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let project = load_project(&args.project)?;

    let mut config = project.export_config;
    if let Some(loop_size) = args.loop_size {
        config.loop_size = loop_size;
    }
    config.validate().context("invalid export configuration")?;

    println!("LED Matrix Export");
    println!("=================");
    println!("Project: {}", project.name);
    println!(
        "Frames: {} ({} ms per cycle)",
        project.frames.len(),
        project.total_duration_ms()
    );
    println!("Loop size: {}", config.target_len());
    println!(
        "Bit reversal: {}, flip X: {}, flip Y: {}, invert: {}, offset Y: {}",
        config.bit_reversal, config.flip_x, config.flip_y, config.invert_output, config.offset_y
    );
    println!();

    let images = export_loop(&project.frames, &config).context("encode frames")?;
    let stem = file_stem(&project.name);
    let buffers = images.into_named_buffers(&stem);

    let report = match args.bundle {
        Some(path) => {
            let compression = if args.lz4 {
                CompressionType::Lz4
            } else {
                CompressionType::None
            };
            BundleSink::new(&path)
                .with_compression(compression)
                .write(&buffers)
                .with_context(|| format!("write bundle '{}'", path.display()))?
        }
        None => {
            let dir = args
                .out_dir
                .unwrap_or_else(|| PathBuf::from(format!("{stem}_binaries")));
            FolderSink::new(&dir)
                .write(&buffers)
                .with_context(|| format!("write binaries to '{}'", dir.display()))?
        }
    };

    for file in &report.files {
        println!("  {}", file.display());
    }
    println!();
    println!("Exported {report}");
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let project = load_project(&args.project)?;
    let frame = project.frames.get(args.frame).with_context(|| {
        format!(
            "frame {} out of range ({} frames)",
            args.frame,
            project.frames.len()
        )
    })?;

    println!("Frame {} ({} ms)", args.frame, frame.duration);
    println!("{:?}", frame.grid);

    let blocks = encode_frame(&frame.grid, &project.export_config);
    for (quadrant, block) in Quadrant::ALL.iter().zip(blocks.iter()) {
        println!("{}: {}", quadrant.suffix(), hex_preview(block, block.len()));
    }
    Ok(())
}

fn cmd_unpack(args: UnpackArgs) -> anyhow::Result<()> {
    let mut reader = BundleReader::open(&args.bundle)
        .with_context(|| format!("open bundle '{}'", args.bundle.display()))?;
    info!(
        "Bundle {} holds {} entries ({:?})",
        args.bundle.display(),
        reader.len(),
        reader.header().compression
    );

    let buffers = reader
        .read_all()
        .with_context(|| format!("read bundle '{}'", args.bundle.display()))?;
    let report = FolderSink::new(&args.out_dir)
        .write(&buffers)
        .with_context(|| format!("extract to '{}'", args.out_dir.display()))?;

    println!("Unpacked {report}");
    Ok(())
}

fn cmd_example() -> anyhow::Result<()> {
    let mut project = Project::new("Example");
    let duration = project.playback_speed;
    project.frames = Shape::ALL
        .iter()
        .map(|shape| Frame::new(shape.generate(), duration))
        .collect();

    println!("{}", project.to_json()?);
    Ok(())
}
