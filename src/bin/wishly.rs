use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wishly::persist::design::DesignDoc;
use wishly::placement::model::PlacementModel;
use wishly::{CardRenderer, EngineConfig, FileStore, NoShareTarget, Session, Surface};

#[derive(Parser, Debug)]
#[command(name = "wishly", version)]
struct Cli {
    /// Engine config JSON. `WISHLY_*` environment variables are applied on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a design document to a PNG.
    Render(RenderArgs),
    /// Change one field of the saved design (e.g. `edit toName "Ada"`).
    Edit(EditArgs),
    /// Place an image on the saved design; no path clears it.
    Image(ImageArgs),
    /// Export the saved design as `{name}_wish.png`.
    Export(ExportArgs),
    /// Manage recurring reminders.
    Remind {
        #[command(subcommand)]
        cmd: RemindCommand,
    },
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input design JSON (same shape as the saved design).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Image to place instead of the document's snapshot.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Display width the surface should cover.
    #[arg(long)]
    display_width: Option<u32>,
}

#[derive(Parser, Debug)]
struct EditArgs {
    field: String,
    /// New value; omit to clear.
    #[arg(default_value = "")]
    value: String,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    path: Option<PathBuf>,

    /// Image scale factor.
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output directory.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Share instead of plain export (falls back to export without a share target).
    #[arg(long, default_value_t = false)]
    share: bool,
}

#[derive(Subcommand, Debug)]
enum RemindCommand {
    /// Save the current design as a reminder.
    Add,
    /// List reminders, soonest first.
    List,
    /// Delete all reminders.
    Clear,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wishly=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::from_env(),
    };
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Edit(args) => cmd_edit(config, args),
        Command::Image(args) => cmd_image(config, args),
        Command::Export(args) => cmd_export(config, args),
        Command::Remind { cmd } => cmd_remind(config, cmd),
    }
}

fn open_session(config: EngineConfig) -> anyhow::Result<Session> {
    let dir = config.storage_dir();
    let store = FileStore::open(&dir)?;
    tracing::debug!(dir = %dir.display(), "opened store");
    Ok(Session::restore(config, Box::new(store))?)
}

fn cmd_render(config: EngineConfig, args: RenderArgs) -> anyhow::Result<()> {
    config.validate()?;
    let raw = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read design '{}'", args.in_path.display()))?;
    let doc: DesignDoc = serde_json::from_str(&raw)
        .with_context(|| format!("parse design '{}'", args.in_path.display()))?;
    let restored = doc.restore();

    let surface = Surface::for_card(
        config.base_width,
        args.display_width,
        restored.design.card_ratio,
    )?;
    let mut placement = PlacementModel::new(config.placement);
    match (args.image.as_deref(), restored.image) {
        (Some(path), _) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
            placement.load_image(&bytes, surface)?;
        }
        (None, Some(img)) => placement.restore(img.source, img.placement, surface),
        (None, None) => {}
    }

    let mut renderer = CardRenderer::new(config.load_fonts()?, config.speckles)?;
    let mut rng = match config.speckle_seed {
        Some(seed) => rand_pcg::Pcg64::seed_from_u64(seed),
        None => rand_pcg::Pcg64::seed_from_u64(rand::random()),
    };
    let frame = renderer.render(&restored.design, placement.image(), surface, &mut rng)?;

    write_png(&args.out, &frame.encode_png()?)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_png(out: &Path, png: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, png).with_context(|| format!("write png '{}'", out.display()))
}

fn cmd_edit(config: EngineConfig, args: EditArgs) -> anyhow::Result<()> {
    let mut sess = open_session(config)?;
    let edit = wishly::Edit::from_field(&args.field, &args.value)?;
    sess.apply_edit(edit)?;
    eprintln!("updated {}", args.field);
    Ok(())
}

fn cmd_image(config: EngineConfig, args: ImageArgs) -> anyhow::Result<()> {
    let mut sess = open_session(config)?;
    match args.path {
        Some(path) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
            let p = sess.load_image(&bytes)?;
            eprintln!("placed {}x{} at ({}, {})", p.base_w, p.base_h, p.x, p.y);
        }
        None => {
            sess.clear_image()?;
            eprintln!("image cleared");
        }
    }
    if let Some(scale) = args.scale {
        let applied = sess.set_scale(scale)?;
        eprintln!("scale {applied}");
    }
    Ok(())
}

fn cmd_export(config: EngineConfig, args: ExportArgs) -> anyhow::Result<()> {
    let mut sess = open_session(config)?;
    std::fs::create_dir_all(&args.dir)
        .with_context(|| format!("create output dir '{}'", args.dir.display()))?;
    if args.share {
        let outcome = sess.share(&mut NoShareTarget, &args.dir)?;
        eprintln!("{outcome:?}");
    } else {
        let path = sess.export(&args.dir)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_remind(config: EngineConfig, cmd: RemindCommand) -> anyhow::Result<()> {
    let mut sess = open_session(config)?;
    let now = chrono::Local::now().naive_local();
    match cmd {
        RemindCommand::Add => {
            let r = sess.save_reminder(now)?;
            match r.next {
                Some(next) => eprintln!("saved reminder for {} ({next})", r.name),
                None => eprintln!("saved reminder for {} (no date)", r.name),
            }
        }
        RemindCommand::List => {
            let rows = sess.upcoming(now);
            if rows.is_empty() {
                println!("No saved reminders yet.");
            }
            for row in rows {
                println!(
                    "{:>5}  {} • {}  {}",
                    row.countdown, row.name, row.occasion, row.caption
                );
            }
        }
        RemindCommand::Clear => {
            sess.clear_reminders()?;
            eprintln!("reminders cleared");
        }
    }
    Ok(())
}
