//! QTC Motif Miner
//!
//! Turns Captury motion captures into QTC sequences and approach-diverge
//! gesture motifs for a set of joint pairs.

use qtc_motif::app::cli::{Cli, Commands, ConfigAction};
use qtc_motif::app::config::Config;
use qtc_motif::capture::captury::CapturyReader;
use qtc_motif::capture::types::MotionCapture;
use qtc_motif::workflow::analyzer::{MotionAnalyzer, PairAnalysis};
use qtc_motif::workflow::export::SessionExporter;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let creates_config = matches!(
        cli.command,
        Commands::Init { .. }
            | Commands::Config {
                action: ConfigAction::Reset { .. }
            }
    );
    let config = match &cli.config {
        Some(path) if path.exists() => Config::load(path)?,
        Some(_) if creates_config => Config::default(),
        Some(path) => anyhow::bail!("Config file not found: {:?}", path),
        None => Config::load_default()?,
    };

    match cli.command {
        Commands::Analyze {
            input,
            output,
            threshold,
            min_duration,
            max_motifs,
        } => {
            let mut config = config;
            if let Some(t) = threshold {
                config.analysis.threshold_mm = t;
            }
            if let Some(d) = min_duration {
                config.analysis.min_motif_duration_s = d;
            }
            if let Some(m) = max_motifs {
                config.analysis.max_motifs_per_pair = m;
            }
            config.validate()?;
            run_analyze(&input, output, &config)?;
        }
        Commands::Inspect { input, pair } => {
            run_inspect(&input, pair.as_deref(), &config)?;
        }
        Commands::Pairs => {
            run_pairs(&config);
        }
        Commands::Init { force } => {
            run_init(force, &config_path)?;
        }
        Commands::Config { action } => {
            run_config(action, &config, &config_path)?;
        }
    }

    Ok(())
}

fn load_capture(input: &Path) -> anyhow::Result<MotionCapture> {
    if !input.exists() {
        anyhow::bail!("Capture file not found: {:?}", input);
    }

    let capture = CapturyReader::new().read_path(input)?;
    if capture.is_empty() {
        anyhow::bail!("No usable frames in {:?}", input);
    }
    Ok(capture)
}

fn run_analyze(input: &Path, output: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let capture = load_capture(input)?;
    let analyzer = MotionAnalyzer::new(config.analyzer_config());
    let session = analyzer.analyze(&capture, &config.joint_pairs())?;

    let document = SessionExporter::from_config(config).build(&capture, &session)?;
    let output_path = output.unwrap_or_else(|| Cli::default_output(input));
    document.write(&output_path)?;

    println!("\nAnalysis Complete!");
    println!("  Frames: {} ({:.1}s at {} fps)", capture.len(), capture.duration_secs(), capture.sample_rate);
    println!("  Pairs: {}", session.pairs.len());
    for pair in &session.pairs {
        println!("    {:<16} {} motifs", pair.pair_id(), pair.motifs.len());
    }
    println!("  Exported motifs: {}", document.sam_motifs.len());
    println!("  Output: {:?}", output_path);

    Ok(())
}

fn run_inspect(input: &Path, only: Option<&str>, config: &Config) -> anyhow::Result<()> {
    let capture = load_capture(input)?;
    let session = MotionAnalyzer::new(config.analyzer_config()).analyze(&capture, &config.joint_pairs())?;

    let selected: Vec<&PairAnalysis> = match only {
        Some(pair_id) => match session.get(pair_id) {
            Some(pair) => vec![pair],
            None => anyhow::bail!("Pair '{}' is not configured. See 'qtc-mine pairs'.", pair_id),
        },
        None => session.pairs.iter().collect(),
    };

    for pair in selected {
        print_pair(pair);
    }
    info!(motifs = session.motif_count(), "Inspection complete");

    Ok(())
}

fn print_pair(pair: &PairAnalysis) {
    let d = &pair.distribution;
    println!("{} ({})", pair.pair_id(), pair.pair.label);
    println!(
        "  approach {:>5.1}%  diverge {:>5.1}%  stationary {:>5.1}%  cross {:>5.1}%",
        d.approach * 100.0,
        d.diverge * 100.0,
        d.stationary * 100.0,
        d.cross * 100.0
    );
    if pair.motifs.is_empty() {
        println!("  (no motifs)");
    }
    for motif in &pair.motifs {
        println!(
            "  {}  {:>7.2}s - {:>7.2}s  ({:.2}s)",
            motif.id,
            motif.start_time,
            motif.end_time,
            motif.duration()
        );
    }
    println!();
}

fn run_pairs(config: &Config) {
    if config.pairs.is_empty() {
        println!("No joint pairs configured");
        return;
    }

    println!("Joint pairs:");
    for pair in &config.pairs {
        println!(
            "  {:<16} {}  ({} label templates)",
            pair.joint_pair().pair_id(),
            pair.label,
            pair.label_templates.len()
        );
    }
}

fn run_init(force: bool, config_path: &PathBuf) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    let config = Config::default();
    config.save(config_path)?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config, config_path: &PathBuf) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", config_path);
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Get { key } => match config.get_value(&key)? {
            Some(v) => println!("{} = {}", key, v),
            None => anyhow::bail!("Configuration key '{}' not found", key),
        },
        ConfigAction::Set { key, value } => {
            if !config_path.exists() {
                anyhow::bail!("No config file found. Run 'qtc-mine init' first.");
            }

            let mut updated = config.clone();
            updated.set_value(&key, &value)?;
            updated.save(config_path)?;
            println!("Set {} = {}", key, value);
        }
        ConfigAction::Reset { force } => {
            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save(config_path)?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}
