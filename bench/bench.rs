//! Benchmark record extraction on synthetic Wiktextract data.
//!
//! Usage:
//!   cargo run --release --bin bench_lexcollect                      # extract + pipeline
//!   cargo run --release --bin bench_lexcollect -- extract           # in-memory extraction only
//!   cargo run --release --bin bench_lexcollect -- pipeline -n 50000 # JSONL file to output tables

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;
use serde_json::{Value, json};

use lexcollect::config::WiktionaryConfig;
use lexcollect::query::RuleSet;
use lexcollect::storage::Category;
use lexcollect::wiktionary::{Collector, format_count, run_wiktionary};

// --- CLI ---

#[derive(Parser)]
#[command(about = "Benchmark lexcollect extraction on generated Wiktextract records.")]
struct Args {
    /// Mode: extract, pipeline, or omit for all
    #[arg(default_value = "all")]
    mode: String,

    /// Number of generated records
    #[arg(short = 'n', long, default_value_t = 20_000)]
    records: usize,

    /// Timed runs per mode; the fastest is reported
    #[arg(long, default_value_t = 3)]
    runs: u32,

    /// Keep the generated files in this directory instead of a temp directory
    #[arg(long)]
    work_dir: Option<PathBuf>,
}

// --- Synthetic data ---

const LANGUAGES: &[&str] = &["ja", "ru", "zh", "ko", "en", "ar", "el", "hi"];
const WORDS: &[&str] = &["猫", "кот", "茶", "고양이", "cat", "قطة", "γάτα", "बिल्ली"];
const ROMANIZATIONS: &[&str] = &["neko", "kot", "chá", "goyang-i", "kat", "qiṭṭa", "gáta", "billī"];
const IPAS: &[&str] = &["/ne̞ko̞/", "[kot]", "/ʈʂʰa˧˥/", "[ko̞jaŋi]", "/kæt/", "/ˈqit.tˤa/", "/ˈɣa.ta/", "/bɪlːiː/"];

/// One record in the shape Wiktextract produces, varied by `n` so that
/// every rule finds something to match now and then.
fn record(n: usize) -> Value {
    let i = n % LANGUAGES.len();
    let word = format!("{}{}", WORDS[i], n % 97);
    let roman = format!("{}{}", ROMANIZATIONS[i], n % 97);
    json!({
        "lang_code": LANGUAGES[i],
        "word": word,
        "sounds": [
            {"ipa": IPAS[i]},
            {"ipa": "/-x/"},
            {"enpr": "x", "tags": ["US"]},
        ],
        "forms": [
            {"form": word, "tags": ["canonical"]},
            {"form": roman, "tags": ["romanization"]},
            {"form": format!("{word}s"), "roman": format!("{roman}s"), "tags": ["plural"]},
        ],
        "senses": [
            {
                "glosses": ["a small domesticated carnivore"],
                "examples": [{"text": format!("{word} {word}"), "roman": format!("{roman} {roman}")}],
                "synonyms": [{"word": WORDS[(i + 1) % WORDS.len()], "roman": ROMANIZATIONS[(i + 1) % WORDS.len()]}],
            },
            {"tags": ["slang"], "alt_of": [{"word": roman}]},
        ],
        "translations": [
            {"code": LANGUAGES[(i + 2) % LANGUAGES.len()], "word": WORDS[(i + 2) % WORDS.len()], "roman": ROMANIZATIONS[(i + 2) % WORDS.len()]},
        ],
    })
}

fn write_input(path: &Path, records: usize) {
    let file = fs::File::create(path).unwrap();
    let mut out = BufWriter::new(file);
    for n in 0..records {
        writeln!(out, "{}", record(n)).unwrap();
    }
    out.flush().unwrap();
}

// --- Helpers ---

fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.2}s")
    } else {
        let ms = seconds * 1000.0;
        format!("{ms:.0}ms")
    }
}

fn format_rate(records: usize, seconds: f64) -> String {
    if seconds <= 0.0 {
        return "-".to_string();
    }
    format!("{}/s", format_count((records as f64 / seconds) as usize))
}

struct BenchResult {
    mode: &'static str,
    best: f64,
    entries: usize,
}

// --- Modes ---

fn bench_extract(args: &Args, rules: &RuleSet) -> BenchResult {
    eprintln!("Generating {} records...", format_count(args.records));
    let documents: Vec<Value> = (0..args.records).map(record).collect();
    let latin: HashSet<String> = ["en".to_string()].into_iter().collect();

    let mut best = f64::MAX;
    let mut entries = 0;
    for run in 1..=args.runs {
        let start = Instant::now();
        let mut collector = Collector::new(rules, &latin, 20);
        for document in &documents {
            collector.collect_document(document);
        }
        let elapsed = start.elapsed().as_secs_f64();
        let storage = collector.into_storage();
        entries = Category::ALL.iter().map(|&c| storage.count(c)).sum();
        eprintln!("  extract run {run}: {}", format_time(elapsed));
        best = best.min(elapsed);
    }

    BenchResult {
        mode: "extract",
        best,
        entries,
    }
}

fn bench_pipeline(args: &Args, rules: &RuleSet, work_dir: &Path) -> BenchResult {
    fs::create_dir_all(work_dir).unwrap();
    let input = work_dir.join("records.jsonl");
    eprintln!("Writing {}...", input.display());
    write_input(&input, args.records);

    let config = WiktionaryConfig {
        logging_period: 0,
        ..WiktionaryConfig::default()
    };

    let mut best = f64::MAX;
    for run in 1..=args.runs {
        let output = work_dir.join(format!("out{run}"));
        let _ = fs::remove_dir_all(&output);
        let start = Instant::now();
        run_wiktionary(&input, &output, &config, rules).unwrap();
        let elapsed = start.elapsed().as_secs_f64();
        eprintln!("  pipeline run {run}: {}", format_time(elapsed));
        best = best.min(elapsed);
    }

    BenchResult {
        mode: "pipeline",
        best,
        entries: 0,
    }
}

fn report(args: &Args, results: &[BenchResult]) -> String {
    let mut md = String::new();
    writeln!(md, "| Mode | Records | Best | Rate | Entries |").unwrap();
    writeln!(md, "|------|--------:|-----:|-----:|--------:|").unwrap();
    for result in results {
        let entries = if result.entries > 0 {
            format_count(result.entries)
        } else {
            "-".to_string()
        };
        writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            result.mode,
            format_count(args.records),
            format_time(result.best),
            format_rate(args.records, result.best),
            entries
        )
        .unwrap();
    }
    md
}

// --- Main ---

fn main() {
    let args = Args::parse();
    let rules = RuleSet::standard().unwrap();
    let work_dir = args
        .work_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("bench_lexcollect"));

    let results = match args.mode.as_str() {
        "extract" => vec![bench_extract(&args, &rules)],
        "pipeline" => vec![bench_pipeline(&args, &rules, &work_dir)],
        "all" => vec![
            bench_extract(&args, &rules),
            bench_pipeline(&args, &rules, &work_dir),
        ],
        other => {
            eprintln!("Unknown mode: {other}. Use: extract, pipeline, or all.");
            std::process::exit(1);
        }
    };

    print!("{}", report(&args, &results));

    if args.work_dir.is_none() {
        let _ = fs::remove_dir_all(&work_dir);
    }
}
