//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sourceflow_core::{Config, DirectoryExplorer, FileAnalysis, FileAnalyzer, SidecarAnalyzer};
use sourceflow_graph::{AnalysisCache, AnalysisSummary, RecordStamp, RelationshipBuilder};
use sourceflow_render::{DiagramKind, Format, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const ANALYSIS_FILE: &str = "analysis_data.json";
const RESULTS_DIR: &str = "results";
const CACHE_DIR: &str = ".cache";

/// Write a default config for a project.
pub fn init(path: &Path) -> Result<()> {
    if !Config::write_default(path)? {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    println!("{} Initialized SourceFlow in {}", "✓".green(), path.display());
    println!("  Edit {} to tune discovery", Config::path(path).display());
    println!(
        "  Run {} to build the graph",
        "sourceflow analyze . --records <dir>".cyan()
    );

    Ok(())
}

/// List discovered code files and per-extension counts.
pub fn scan(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let files = config.explorer().explore(path)?;

    for file in &files {
        println!("  {}", relative_path(path, file));
    }

    println!();
    println!("{}", "Files by extension".cyan().bold());
    for (ext, count) in DirectoryExplorer::file_stats(&files) {
        let ext = if ext.is_empty() { "(none)".to_string() } else { format!(".{}", ext) };
        println!("  {} {}", format!("{}:", ext).dimmed(), count);
    }
    println!("{} {} code files", "✓".green(), files.len().to_string().cyan());

    Ok(())
}

/// Analyze a project, export the summary and write diagrams.
///
/// With `skip_analysis`, a previous `analysis_data.json` in the output
/// directory is replayed as is.
pub fn analyze(
    root: &Path,
    records: &Path,
    output: Option<&Path>,
    skip_analysis: bool,
    max_nodes: Option<usize>,
    formats: &[Format],
) -> Result<()> {
    let config = Config::load(root)?;
    let out_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.join(RESULTS_DIR));
    fs::create_dir_all(&out_dir)?;
    let export_path = out_dir.join(ANALYSIS_FILE);

    let replayed = if skip_analysis {
        replay(&export_path)?
    } else {
        None
    };

    let summary = match replayed {
        Some(summary) => summary,
        None => {
            let summary = analyze_cached(root, &config, records, &out_dir.join(CACHE_DIR))?;
            export_summary(&summary, &export_path)?;
            summary
        }
    };

    write_diagrams(&summary, &out_dir, &render_options(&config, max_nodes), formats)?;

    Ok(())
}

/// Regenerate diagrams from an exported summary.
///
/// Ranking settings come from the config of `project` when given.
pub fn render(
    input: &Path,
    output: Option<&Path>,
    project: Option<&Path>,
    max_nodes: Option<usize>,
    formats: &[Format],
) -> Result<()> {
    let summary = read_summary(input)?;
    let config = match project {
        Some(project) => Config::load(project)?,
        None => Config::default(),
    };

    let out_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    fs::create_dir_all(&out_dir)?;

    write_diagrams(&summary, &out_dir, &render_options(&config, max_nodes), formats)?;

    Ok(())
}

/// Command-line limit first, then the configured one.
fn render_options(config: &Config, max_nodes: Option<usize>) -> RenderOptions {
    RenderOptions {
        max_nodes: max_nodes.or(config.max_nodes),
        entry_point_bonus: config.entry_point_bonus,
    }
}

fn read_summary(path: &Path) -> Result<AnalysisSummary> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Ok(AnalysisSummary::from_json(&text)?)
}

fn replay(export_path: &Path) -> Result<Option<AnalysisSummary>> {
    if !export_path.is_file() {
        warn!("No previous analysis at {}, analyzing", export_path.display());
        return Ok(None);
    }

    let summary = read_summary(export_path)?;
    println!(
        "{} Loaded previous analysis from {} ({} files, {} functions)",
        "✓".green(),
        export_path.display(),
        summary.total_files,
        summary.total_functions
    );
    Ok(Some(summary))
}

/// Merges the project's records, reusing the cached summary when no record
/// changed since it was built.
fn analyze_cached(
    root: &Path,
    config: &Config,
    records: &Path,
    cache_dir: &Path,
) -> Result<AnalysisSummary> {
    let files = config.explorer().explore(root)?;
    let analyzer = SidecarAnalyzer::new(records);
    let stamps: Vec<RecordStamp> = files
        .iter()
        .map(|file| RecordStamp::of(relative_path(root, file), &analyzer.record_path(root, file)))
        .collect();

    let cache = AnalysisCache::open(cache_dir)?;
    if let Some(summary) = cache.lookup(&stamps)? {
        println!(
            "{} Records unchanged, reusing cached analysis ({} files, {} functions)",
            "✓".green(),
            summary.total_files,
            summary.total_functions
        );
        return Ok(summary);
    }

    let summary = build_summary(root, &files, &analyzer)?;
    cache.insert(&stamps, &summary)?;
    Ok(summary)
}

fn build_summary(
    root: &Path,
    files: &[PathBuf],
    analyzer: &impl FileAnalyzer,
) -> Result<AnalysisSummary> {
    println!("{}", "Analyzing codebase...".cyan());
    let start = Instant::now();

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(80));

    let mut builder = RelationshipBuilder::new();
    let mut failures = Vec::new();

    for file in files {
        let relative = relative_path(root, file);
        bar.set_message(relative.clone());

        let analysis = match analyzer.analyze(root, file) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Failed to analyze {}: {}", relative, e);
                failures.push((relative.clone(), e.to_string()));
                FileAnalysis::failed(e)
            }
        };
        builder.add_file_analysis(&relative, &analysis);
        bar.inc(1);
    }

    bar.finish_and_clear();

    let summary = builder.summary();
    println!(
        "{} Analyzed {} files ({} functions, {} entry points) in {}ms",
        "✓".green(),
        summary.total_files.to_string().cyan(),
        summary.total_functions.to_string().cyan(),
        summary.entry_points.len().to_string().cyan(),
        start.elapsed().as_millis()
    );

    if !failures.is_empty() {
        println!("\n{} files without analysis:", "⚠".yellow());
        for (file, error) in failures.iter().take(5) {
            println!("  {} - {}", file.red(), error);
        }
        if failures.len() > 5 {
            println!("  ... and {} more", failures.len() - 5);
        }
    }

    let collisions = builder.collisions();
    if !collisions.is_empty() {
        println!(
            "\n{} {} function names defined in more than one file; the last definition wins",
            "⚠".yellow(),
            collisions.len()
        );
    }

    Ok(summary)
}

fn export_summary(summary: &AnalysisSummary, path: &Path) -> Result<()> {
    fs::write(path, summary.to_json_pretty()?)?;
    println!("{} Exported to {}", "✓".green(), path.display());
    Ok(())
}

fn write_diagrams(
    summary: &AnalysisSummary,
    out_dir: &Path,
    options: &RenderOptions,
    formats: &[Format],
) -> Result<()> {
    if let Some(limit) = options.max_nodes {
        info!("Limiting diagrams to {} nodes", limit);
    }

    for format in formats {
        for kind in DiagramKind::ALL {
            let text = sourceflow_render::render(summary, kind, *format, options);
            let path = out_dir.join(format!("{}.{}", kind.file_stem(), format.extension()));
            fs::write(&path, text)?;
            println!("{} Wrote {} diagram to {}", "✓".green(), kind, path.display());
        }
    }

    Ok(())
}

/// Path relative to the project root with forward slashes, as used for
/// `file_path` in the summary.
fn relative_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
