use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use whiff::cli::{Args, Command, ExamineArgs, OutputFormat};
use whiff::config::{self, WhiffConfig};
use whiff::smell::{DetectorRegistry, SmellDescriptor};
use whiff::warning::SmellWarning;
use whiff::{ExamineStrategy, Examiner};

fn main() -> ExitCode {
    whiff::telemetry::init_tracing();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Some(Command::ListDetectors) => {
            list_detectors();
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Explain { detector }) => {
            explain_detector(&detector)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Examine(examine)) => examine_command(examine),
        None => examine_command(args.examine),
    }
}

fn list_detectors() {
    let registry = DetectorRegistry::default_detectors();
    let mut descriptors: Vec<&'static SmellDescriptor> = registry.descriptors().collect();
    descriptors.sort_by_key(|d| (d.smell_class, d.smell_subclass));

    for d in descriptors {
        println!("{}\t{}\t{}", d.smell_subclass, d.smell_class, d.description);
    }
}

fn explain_detector(name: &str) -> anyhow::Result<()> {
    let registry = DetectorRegistry::default_detectors();
    let Some(d) = registry.find_descriptor(name) else {
        anyhow::bail!("unknown detector: {name}");
    };

    println!("name: {}", d.smell_subclass);
    println!("class: {}", d.smell_class);
    println!("description: {}", d.description);
    Ok(())
}

fn examine_command(args: ExamineArgs) -> anyhow::Result<ExitCode> {
    let registry = DetectorRegistry::default_detectors_filtered(&args.only, &args.skip)?;
    let strategy = if args.show_all {
        ExamineStrategy::ShowAll
    } else {
        ExamineStrategy::ActiveSmellsOnly
    };

    // Config is validated against the full battery so a config file may
    // mention detectors excluded by --only/--skip.
    let known: Vec<&'static SmellDescriptor> =
        DetectorRegistry::default_detectors().descriptors().collect();

    let mut warnings: Vec<SmellWarning> = Vec::new();

    if args.paths.is_empty() {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        let cwd = std::env::current_dir()?;
        let layers = load_layers_for(&args, &cwd, &known)?;
        let examiner = Examiner::from_source("<stdin>", &text, &layers, &registry, strategy);
        warnings.extend(examiner.into_smells());
    } else {
        for path in collect_dump_files(&args.paths)? {
            let text = std::fs::read_to_string(&path)?;
            let start_dir = path.parent().unwrap_or(Path::new("."));
            let layers = load_layers_for(&args, start_dir, &known)?;
            let examiner =
                Examiner::from_source(&path.display().to_string(), &text, &layers, &registry, strategy);
            warnings.extend(examiner.into_smells());
        }
    }

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&warnings)?);
        }
        OutputFormat::Pretty => {
            for w in &warnings {
                let line = w.lines.first().copied().unwrap_or(0);
                if w.context.is_empty() {
                    println!(
                        "{}:{}: [{}/{}] {}",
                        w.source, line, w.smell_class, w.smell_subclass, w.message
                    );
                } else {
                    println!(
                        "{}:{}: {}: [{}/{}] {}",
                        w.source, line, w.context, w.smell_class, w.smell_subclass, w.message
                    );
                }
            }
            if !warnings.is_empty() {
                println!("{} warning(s) found", warnings.len());
            }
        }
    }

    if warnings.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

fn load_layers_for(
    args: &ExamineArgs,
    start_dir: &Path,
    known: &[&'static SmellDescriptor],
) -> anyhow::Result<Vec<WhiffConfig>> {
    Ok(config::load_layers(
        args.config.as_deref(),
        start_dir,
        known,
    )?)
}

/// Collect `.sexp` dump files from the given paths, recursing into
/// directories, in a stable order. Explicitly named files are examined
/// whatever their extension.
fn collect_dump_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        collect_into(path, &mut files, true)?;
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_into(path: &Path, files: &mut Vec<PathBuf>, explicit: bool) -> anyhow::Result<()> {
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            collect_into(&entry?.path(), files, false)?;
        }
    } else if explicit {
        if !path.exists() {
            anyhow::bail!("no such file: {}", path.display());
        }
        files.push(path.to_path_buf());
    } else if path.extension().is_some_and(|ext| ext == "sexp") {
        files.push(path.to_path_buf());
    }
    Ok(())
}
