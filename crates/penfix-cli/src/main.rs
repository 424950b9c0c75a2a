//! penfix command line.
//!
//! Provides the `penfix` binary with subcommands to repair, check and
//! linearize generated graph text, clean and split corpus files, and score
//! predictions. Machine-readable results go to stdout; logs go to stderr.
//!
//! Exit codes: 0 = success, 1 = the input could not be processed (decode
//! failure, malformed record), 2 = structural defects found by `check`,
//! 3 = I/O error.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use penfix_check::{check_prepared, check_text};
use penfix_core::{actions_from_text, decode, encode, encode_one_line};
use penfix_corpus::{
    aligned_graphs, read_corpus, split_blocks, split_train_test, write_blocks, write_corpus,
    write_jsonl,
};
use penfix_repair::{Preset, ReentrancyPolicy, RepairOptions, RoleFilter};
use penfix_score::{evaluate_pairs, score_parallel, Evaluation, RewardWeights, TripleMatcher};

/// Repair, validate and score generated PENMAN graphs.
#[derive(Parser)]
#[command(name = "penfix", about = "Repair, validate and score generated PENMAN graphs")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Repair graph text and print the result.
    Repair {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        #[command(flatten)]
        repair: RepairArgs,

        /// Print a JSON trace of the passes that changed the text.
        #[arg(long)]
        trace: bool,
    },

    /// Run the structural checks and print a JSON report.
    Check {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Repair with the default pipeline before checking.
        #[arg(long)]
        repair: bool,
    },

    /// Linearize a graph into SHIFT / ARC / REDUCE actions.
    Actions {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Repair with the default pipeline before decoding.
        #[arg(long)]
        repair: bool,

        /// Print JSON instead of one action per line.
        #[arg(long)]
        json: bool,
    },

    /// Decode and re-encode a graph in the indented layout.
    Format {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Print on one line instead.
        #[arg(long)]
        one_line: bool,
    },

    /// Repair and normalize a corpus file, dropping blocks that fail.
    Clean {
        /// Corpus file in `#::snt` block format.
        input: PathBuf,

        /// Output file.
        #[arg(short, long)]
        output: PathBuf,

        /// Write JSONL records instead of blocks.
        #[arg(long)]
        jsonl: bool,
    },

    /// Shuffle corpus blocks into train and test files.
    Split {
        /// Corpus files; their blocks are split independently and merged.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(long)]
        train: PathBuf,

        #[arg(long)]
        test: PathBuf,

        /// Share of each file's blocks that goes to the test set.
        #[arg(long, default_value_t = 0.2)]
        test_ratio: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Average triple-overlap scores of predicted against gold corpora.
    Evaluate {
        #[arg(long)]
        predict_file: PathBuf,

        #[arg(long)]
        gold_file: PathBuf,
    },

    /// Score completions against answers (JSONL with `completion` and
    /// `answer` fields) and print one JSON breakdown per line.
    Reward {
        /// Input file; stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Worker threads, each with its own matcher.
        #[arg(short, long, default_value_t = 1)]
        workers: usize,

        /// JSON file with reward weights; missing fields keep defaults.
        #[arg(long)]
        weights: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Sanitize,
    Scoring,
    Corpus,
    Inference,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReentrancyArg {
    Strip,
    KeepFirst,
}

/// Pipeline selection shared by the repairing subcommands.
#[derive(clap::Args)]
struct RepairArgs {
    #[arg(long, value_enum, default_value = "sanitize")]
    preset: PresetArg,

    /// Deduplicate repeated `:role var` pairs.
    #[arg(long)]
    dedup: bool,

    /// Restrict deduplication to these roles (repeatable).
    #[arg(long = "dedup-role", requires = "dedup")]
    dedup_roles: Vec<String>,

    /// Remove leaf attachments.
    #[arg(long)]
    prune: bool,

    /// Restrict leaf removal to these roles (repeatable).
    #[arg(long = "prune-role", requires = "prune")]
    prune_roles: Vec<String>,

    /// How to treat variables that are both declared and referenced.
    #[arg(long, value_enum)]
    reentrancy: Option<ReentrancyArg>,
}

fn role_filter(roles: &[String]) -> RoleFilter {
    if roles.is_empty() {
        RoleFilter::AllRoles
    } else {
        RoleFilter::only(roles)
    }
}

impl RepairArgs {
    fn options(&self) -> RepairOptions {
        RepairOptions {
            preset: match self.preset {
                PresetArg::Sanitize => Preset::Sanitize,
                PresetArg::Scoring => Preset::Scoring,
                PresetArg::Corpus => Preset::Corpus,
                PresetArg::Inference => Preset::Inference,
            },
            dedup_roles: self.dedup.then(|| role_filter(&self.dedup_roles)),
            prune_leaves: self.prune.then(|| role_filter(&self.prune_roles)),
            reentrancy: self.reentrancy.map(|r| match r {
                ReentrancyArg::Strip => ReentrancyPolicy::StripConflicting,
                ReentrancyArg::KeepFirst => ReentrancyPolicy::KeepFirstDefinition,
            }),
        }
    }
}

/// One line of `reward` input.
#[derive(Deserialize)]
struct RewardRecord {
    completion: String,
    answer: String,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    let exit_code = match cli.command {
        Commands::Repair {
            input,
            repair,
            trace,
        } => run_repair(input.as_deref(), &repair, trace),
        Commands::Check { input, repair } => run_check(input.as_deref(), repair),
        Commands::Actions {
            input,
            repair,
            json,
        } => run_actions(input.as_deref(), repair, json),
        Commands::Format { input, one_line } => run_format(input.as_deref(), one_line),
        Commands::Clean {
            input,
            output,
            jsonl,
        } => run_clean(&input, &output, jsonl),
        Commands::Split {
            inputs,
            train,
            test,
            test_ratio,
            seed,
        } => run_split(&inputs, &train, &test, test_ratio, seed),
        Commands::Evaluate {
            predict_file,
            gold_file,
        } => run_evaluate(&predict_file, &gold_file),
        Commands::Reward {
            input,
            workers,
            weights,
        } => run_reward(input.as_deref(), workers, weights.as_deref()),
    };
    process::exit(exit_code);
}

/// Reads `path`, or stdin when it is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .map_err(|e| format!("failed to read '{}': {}", p.display(), e)),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

/// Execute the repair subcommand.
fn run_repair(input: Option<&Path>, args: &RepairArgs, trace: bool) -> i32 {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let pipeline = args.options().build();
    if trace {
        print_json(&pipeline.run_traced(&text));
    } else {
        println!("{}", pipeline.run(&text));
    }
    0
}

/// Execute the check subcommand. Returns 2 when any graph check fails.
fn run_check(input: Option<&Path>, repair: bool) -> i32 {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let report = if repair {
        check_prepared(&text, penfix_repair::sanitize)
    } else {
        check_text(&text)
    };
    print_json(&report);
    if report.is_clean() {
        0
    } else {
        2
    }
}

/// Execute the actions subcommand.
fn run_actions(input: Option<&Path>, repair: bool, json: bool) -> i32 {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let text = if repair {
        penfix_repair::sanitize(&text)
    } else {
        text
    };
    match actions_from_text(&text) {
        Ok(actions) if json => {
            print_json(&actions);
            0
        }
        Ok(actions) => {
            for action in &actions {
                println!("{}", action);
            }
            0
        }
        Err(e) => {
            eprintln!("Decode error: {}", e);
            1
        }
    }
}

/// Execute the format subcommand.
fn run_format(input: Option<&Path>, one_line: bool) -> i32 {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    match decode(&text) {
        Ok(decoded) => {
            for warning in &decoded.warnings {
                tracing::warn!(%warning, "decode warning");
            }
            if one_line {
                println!("{}", encode_one_line(&decoded.tree));
            } else {
                println!("{}", encode(&decoded.tree));
            }
            0
        }
        Err(e) => {
            eprintln!("Decode error: {}", e);
            1
        }
    }
}

/// Execute the clean subcommand.
fn run_clean(input: &Path, output: &Path, jsonl: bool) -> i32 {
    let report = match read_corpus(input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 3;
        }
    };
    for dropped in &report.dropped {
        eprintln!("dropped '{}': {}", dropped.sentence, dropped.error);
    }
    let written = if jsonl {
        write_jsonl(output, &report.entries)
    } else {
        write_corpus(output, &report.entries)
    };
    if let Err(e) = written {
        eprintln!("Error: {}", e);
        return 3;
    }
    print_json(&serde_json::json!({
        "kept": report.entries.len(),
        "dropped": report.dropped.len(),
    }));
    0
}

/// Execute the split subcommand.
fn run_split(inputs: &[PathBuf], train: &Path, test: &Path, test_ratio: f64, seed: u64) -> i32 {
    let mut train_blocks = Vec::new();
    let mut test_blocks = Vec::new();

    for input in inputs {
        let text = match read_input(Some(input)) {
            Ok(t) => t,
            Err(msg) => {
                eprintln!("Error: {}", msg);
                return 3;
            }
        };
        match split_train_test(split_blocks(&text), test_ratio, seed) {
            Ok(split) => {
                train_blocks.extend(split.train);
                test_blocks.extend(split.test);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    for (path, blocks) in [(train, &train_blocks), (test, &test_blocks)] {
        let graphs: Vec<String> = blocks.iter().map(|b| b.graph_text()).collect();
        let text = write_blocks(
            blocks
                .iter()
                .zip(&graphs)
                .map(|(b, g)| (b.sentence.as_str(), g.as_str())),
        );
        if let Err(e) = fs::write(path, text) {
            eprintln!("Error: failed to write '{}': {}", path.display(), e);
            return 3;
        }
    }

    print_json(&serde_json::json!({
        "train": train_blocks.len(),
        "test": test_blocks.len(),
    }));
    0
}

/// Execute the evaluate subcommand.
fn run_evaluate(predict_file: &Path, gold_file: &Path) -> i32 {
    let read = (fs::read_to_string(predict_file), fs::read_to_string(gold_file));
    let (predicted, gold) = match read {
        (Ok(p), Ok(g)) => (p, g),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return 3;
        }
    };
    print_json(&evaluate_corpora(&predicted, &gold));
    0
}

/// Pairs the two corpora block by block before anything is decoded, so a
/// prediction that fails to decode is scored as zero against its own gold
/// graph instead of shifting every later pair.
fn evaluate_corpora(predicted: &str, gold: &str) -> Evaluation {
    let predicted = aligned_graphs(predicted);
    let gold = aligned_graphs(gold);
    if predicted.len() != gold.len() {
        tracing::warn!(
            predictions = predicted.len(),
            golds = gold.len(),
            "corpus sizes differ, comparing the common prefix"
        );
    }

    let pairs = predicted
        .iter()
        .zip(&gold)
        .map(|(p, g)| (p.as_str(), g.as_str()));
    evaluate_pairs(&mut TripleMatcher::new(), pairs)
}

fn load_weights(path: Option<&Path>) -> Result<RewardWeights, String> {
    let Some(path) = path else {
        return Ok(RewardWeights::default());
    };
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid weights in '{}': {}", path.display(), e))
}

fn parse_records(text: &str) -> Result<Vec<(String, String)>, String> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str::<RewardRecord>(line)
                .map(|r| (r.completion, r.answer))
                .map_err(|e| format!("line {}: {}", n + 1, e))
        })
        .collect()
}

/// Execute the reward subcommand.
fn run_reward(input: Option<&Path>, workers: usize, weights: Option<&Path>) -> i32 {
    let text = match read_input(input) {
        Ok(t) => t,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let weights = match load_weights(weights) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 3;
        }
    };
    let pairs = match parse_records(&text) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 1;
        }
    };

    let scores = score_parallel(&pairs, workers, weights, TripleMatcher::new);
    for score in &scores {
        match serde_json::to_string(score) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                eprintln!("Error: failed to serialize score: {}", e);
                return 1;
            }
        }
    }
    if !scores.is_empty() {
        let mean = scores.iter().map(|s| s.total).sum::<f64>() / scores.len() as f64;
        eprintln!("scored {} completions, mean reward {:.4}", scores.len(), mean);
    }
    0
}
