use caption_overlay::config::{self, OverlayConfig};
use caption_overlay::imaging::{GlyphBackend, load_image, save_canvas};
use caption_overlay::overlay::{CaptionMode, Overlay};
use caption_overlay::{fonts, logging, output, process};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caption-overlay")]
#[command(about = "Paint auto-fitted captions onto photo cards")]
#[command(long_about = "\
Paint auto-fitted captions onto photo cards

Every photo is stretched to a fixed canvas (360x740 by default), classified
by brightness and adjusted, then captioned:

  title        black text on a yellow band in the upper half
  description  text centered on the photo, yellow on dark photos and
               red on light ones

Captions are wrapped to the canvas width and shrunk one pixel at a time
until they fit. Captions that cannot fit even at the minimum font size are
painted anyway and reported as OVERFLOW.

Run 'caption-overlay gen-config' to generate a documented overlay.toml.")]
#[command(version)]
struct Cli {
    /// Config file (stock defaults when missing)
    #[arg(long, default_value = "overlay.toml", global = true)]
    config: PathBuf,

    /// Directory holding the font files, overrides [fonts] dir
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Log fitting and classification details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Paint one caption onto one photo
    Render {
        /// Source photo
        #[arg(long)]
        input: PathBuf,
        /// Card to write; format follows the extension
        #[arg(long)]
        output: PathBuf,
        /// Caption text
        #[arg(long)]
        text: String,
        #[arg(long, value_enum, default_value_t = CaptionMode::Title)]
        mode: CaptionMode,
    },
    /// Paint a title band and a description onto one photo
    Card {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Render many cards in parallel
    #[command(group(ArgGroup::new("jobs_source").required(true).args(["jobs", "input_dir"])))]
    Batch {
        /// TOML file of [[job]] entries
        #[arg(long)]
        jobs: Option<PathBuf>,
        /// Caption every supported photo under this directory
        #[arg(long, requires_all = ["output_dir", "text"])]
        input_dir: Option<PathBuf>,
        /// Where directory-mode cards go, mirroring the input tree
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Caption for directory mode
        #[arg(long)]
        text: Option<String>,
        #[arg(long, value_enum, default_value_t = CaptionMode::Title)]
        mode: CaptionMode,
        /// Write a JSON report of every job
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print a stock overlay.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Render {
            input,
            output: out,
            text,
            mode,
        } => {
            let (config, backend) = load_setup(&cli.config, cli.fonts_dir)?;
            let overlay = Overlay::new(&config, &backend)?;
            let source = load_image(&input)?;
            let outcome = overlay.render(&source, &text, mode)?;
            save_canvas(&outcome.canvas, &out)?;
            output::print_render_output(&outcome, &out);
        }
        Command::Card {
            input,
            output: out,
            title,
            description,
        } => {
            let (config, backend) = load_setup(&cli.config, cli.fonts_dir)?;
            let overlay = Overlay::new(&config, &backend)?;
            let source = load_image(&input)?;
            let outcome = overlay.render_card(&source, &title, &description)?;
            save_canvas(&outcome.canvas, &out)?;
            output::print_render_output(&outcome, &out);
        }
        Command::Batch {
            jobs,
            input_dir,
            output_dir,
            text,
            mode,
            report,
        } => {
            let (config, backend) = load_setup(&cli.config, cli.fonts_dir)?;
            let overlay = Overlay::new(&config, &backend)?;
            init_thread_pool(&config.processing);

            let jobs = match (jobs, input_dir, output_dir, text) {
                (Some(path), _, _, _) => process::load_jobs(&path)?,
                (None, Some(input_dir), Some(output_dir), Some(text)) => {
                    process::collect_dir_jobs(&input_dir, &output_dir, &text, mode)?
                }
                _ => return Err("batch needs --jobs or --input-dir, --output-dir and --text".into()),
            };
            println!("==> Rendering {} cards", jobs.len());

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::run_batch(&overlay, &jobs, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            if let Some(path) = report {
                result.write_json(&path)?;
            }
            output::print_batch_summary(&result);
            if result.failed > 0 {
                return Err(format!("{} of {} jobs failed", result.failed, result.jobs.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config and every font style it names.
fn load_setup(
    config_path: &std::path::Path,
    fonts_dir: Option<PathBuf>,
) -> Result<(OverlayConfig, GlyphBackend), Box<dyn std::error::Error>> {
    let mut config = config::load_config(config_path)?;
    if let Some(dir) = fonts_dir {
        config.fonts.dir = dir;
    }
    let backend = fonts::load_backend(
        &config.fonts,
        &[config.title.style.as_str(), config.description.style.as_str()],
    )?;
    Ok((config, backend))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
