use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use dupescope_core::storage::{find_contact, load_contacts, save_contacts};
use dupescope_core::{
    ConfidenceClass, ContactRecord, DupescopeError, EngineConfig, ExitCode, MergeStrategy,
};
use dupescope_match::{
    DetectionReport, DuplicateDetector, MatchTiers, MergeOutcome, Normalizer, PairwiseMatcher,
    phonetic_code,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "dupescope",
    about = "Find and merge duplicate contacts",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting DUPESCOPE_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect duplicate groups in a contact file and propose merges.
    Scan {
        /// JSON file holding an array of contact records.
        file: PathBuf,
        /// Minimum confidence class kept as a group edge.
        #[arg(long)]
        threshold: Option<String>,
        /// conservative, most-complete or interactive.
        #[arg(long)]
        strategy: Option<String>,
        /// Compare every pair instead of only records sharing a key.
        #[arg(long)]
        no_blocking: bool,
        /// Scoring threads (0 = one per core).
        #[arg(long)]
        workers: Option<usize>,
        /// Write the records with every non-conflicting merge applied.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show how two records in a file compare.
    Match {
        file: PathBuf,
        id_a: String,
        id_b: String,
    },

    /// Print the phonetic code of each word.
    Phonetic {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration.
    List,
    /// Show where the config file is read from.
    Path,
    /// Write the default configuration to the config path.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DUPESCOPE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Env var overrides ──────────────────────────────────────────────────
    let json_output = cli.json || std::env::var("DUPESCOPE_JSON").as_deref() == Ok("1");

    let mut config = EngineConfig::load()?;
    debug!(path = %EngineConfig::config_path().display(), "config loaded");

    match cli.command {
        // ── Scan ───────────────────────────────────────────────────────────
        Commands::Scan {
            file,
            threshold,
            strategy,
            no_blocking,
            workers,
            output,
        } => {
            if let Some(threshold) = threshold {
                config.grouping.threshold = threshold.parse::<ConfidenceClass>()?;
            }
            if let Some(strategy) = strategy {
                config.merge.strategy = strategy.parse::<MergeStrategy>()?;
            }
            if no_blocking {
                config.grouping.blocking = false;
            }
            if let Some(workers) = workers {
                config.grouping.workers = workers;
            }

            let records = read_records(&file, json_output, start)?;
            let detector = DuplicateDetector::new(config)?;
            let report = detector.run(records.clone())?;

            let written = match &output {
                Some(path) => {
                    let applied = report.apply(records);
                    save_contacts(path, &applied)?;
                    Some(applied.len())
                }
                None => None,
            };

            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": {
                        "report": report,
                        "summary_line": report.summary.to_string(),
                        "written": written,
                        "generated_at": chrono::Utc::now().to_rfc3339(),
                    },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_report(&report);
                if let (Some(path), Some(count)) = (&output, written) {
                    println!("Wrote {count} records to {}", path.display());
                }
            }
        }

        // ── Match ──────────────────────────────────────────────────────────
        Commands::Match { file, id_a, id_b } => {
            if id_a == id_b {
                return fail(
                    json_output,
                    start,
                    ExitCode::GeneralError,
                    "invalid_argument",
                    "A record is never matched against itself".to_string(),
                );
            }

            let records = read_records(&file, json_output, start)?;
            let (a, b) = match (find_contact(&records, &id_a), find_contact(&records, &id_b)) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(DupescopeError::ContactNotFound(id)), _)
                | (_, Err(DupescopeError::ContactNotFound(id))) => {
                    return fail(
                        json_output,
                        start,
                        ExitCode::NotFound,
                        "not_found",
                        format!("Contact {id} not found"),
                    );
                }
                (Err(e), _) | (_, Err(e)) => return Err(e.into()),
            };

            config.validate()?;
            let normalizer = Normalizer::for_records(&records, &config.matching);
            let matcher = PairwiseMatcher::new(&config.matching);
            let result = matcher.match_pair(&normalizer.normalize(a), &normalizer.normalize(b));
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":result,"meta":{"duration_ms":dur}}))?;
            } else {
                println!("{} ~ {}", result.left, result.right);
                println!("  exact name:      {}", yes_no(result.tiers.exact_name));
                println!("  contact overlap: {}", yes_no(result.tiers.contact_overlap));
                println!("  fuzzy name:      {:.3}", result.tiers.fuzzy_similarity);
                println!("  phonetic:        {}", yes_no(result.tiers.phonetic_match));
                println!("  confidence:      {} ({})", result.class, result.score);
            }
        }

        // ── Phonetic ───────────────────────────────────────────────────────
        Commands::Phonetic { words } => {
            let codes: Vec<(String, String)> = words
                .into_iter()
                .map(|word| {
                    let code = phonetic_code(&word).as_str().to_string();
                    (word, code)
                })
                .collect();
            let dur = start.elapsed().as_millis();

            if json_output {
                let items: Vec<serde_json::Value> = codes
                    .iter()
                    .map(|(word, code)| serde_json::json!({"word":word,"code":code}))
                    .collect();
                print_json(&serde_json::json!({"status":"ok","data":items,"meta":{"duration_ms":dur}}))?;
            } else {
                for (word, code) in &codes {
                    let shown = if code.is_empty() { "-" } else { code.as_str() };
                    println!("{shown:<6}{word}");
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => {
            let path = EngineConfig::config_path();
            match action {
                ConfigAction::List => {
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":config,"meta":{"duration_ms":dur}}))?;
                    } else {
                        print!("{}", toml::to_string_pretty(&config)?);
                    }
                }
                ConfigAction::Path => {
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status":"ok",
                            "data":{"path":path.to_string_lossy(),"exists":path.exists()},
                            "meta":{"duration_ms":dur}
                        }))?;
                    } else {
                        println!("{}", path.display());
                    }
                }
                ConfigAction::Init { force } => {
                    if path.exists() && !force {
                        return fail(
                            json_output,
                            start,
                            ExitCode::GeneralError,
                            "already_exists",
                            format!("{} already exists (use --force to overwrite)", path.display()),
                        );
                    }
                    EngineConfig::default().save()?;
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"path":path.to_string_lossy()},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("Wrote default config to {}", path.display());
                    }
                }
            }
        }

        // ── Version ────────────────────────────────────────────────────────
        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("dupescope v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

/// Report an error in the active output mode and exit with `code`.
fn fail(json_output: bool, start: Instant, code: ExitCode, error: &str, message: String) -> Result<()> {
    if json_output {
        let dur = start.elapsed().as_millis();
        print_json(&serde_json::json!({"status":"error","error":error,"message":message,"meta":{"duration_ms":dur}}))?;
    } else {
        eprintln!("{message}");
    }
    std::process::exit(code as i32);
}

fn read_records(path: &Path, json_output: bool, start: Instant) -> Result<Vec<ContactRecord>> {
    if !path.exists() {
        fail(
            json_output,
            start,
            ExitCode::NotFound,
            "not_found",
            format!("File {} not found", path.display()),
        )?;
    }
    Ok(load_contacts(path)?)
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn describe_tiers(tiers: &MatchTiers) -> String {
    let mut parts = Vec::new();
    if tiers.exact_name {
        parts.push("exact name".to_string());
    }
    if tiers.contact_overlap {
        parts.push("shared contact info".to_string());
    }
    if tiers.fuzzy_similarity > 0.0 && !tiers.exact_name {
        parts.push(format!("fuzzy {:.2}", tiers.fuzzy_similarity));
    }
    if tiers.phonetic_match {
        parts.push("sounds alike".to_string());
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn print_report(report: &DetectionReport) {
    println!(
        "Scanned {} records, {} candidate pairs, {} edges at or above {}",
        report.records_considered, report.candidate_pairs, report.retained_edges, report.threshold
    );
    for rejected in &report.validation.rejected {
        println!(
            "  skipped record #{} ({:?}): {}",
            rejected.index,
            rejected.id,
            rejected.reason.message()
        );
    }

    if report.groups.is_empty() {
        println!("No duplicates found.");
    }

    for (idx, (group, decision)) in report.groups.iter().zip(&report.decisions).enumerate() {
        println!();
        println!(
            "Group {}: {} (weakest: {})",
            idx + 1,
            group.members.join(", "),
            group.min_class
        );
        for edge in &group.edges {
            println!(
                "  {} ~ {}  {} ({})  {}",
                edge.left,
                edge.right,
                edge.class,
                edge.score,
                describe_tiers(&edge.tiers)
            );
        }

        match &decision.outcome {
            MergeOutcome::Merged { record } => {
                println!("  -> merge into {} [{}]", record.id, decision.strategy);
                for field in &decision.field_decisions {
                    let source = field.source.as_deref().unwrap_or("all");
                    println!("     {}: {} (from {source})", field.field, field.chosen);
                }
                if !decision.conflicts.is_empty() {
                    let names: Vec<&str> = decision.conflicts.iter().map(|f| f.as_str()).collect();
                    println!("     conflicts: {}", names.join(", "));
                }
            }
            MergeOutcome::NeedsReview { reason, .. } => {
                println!("  -> needs review: {reason}");
            }
        }
    }

    println!();
    println!("{}", report.summary);
}
