//! `zapzap-sim` - runs `RunBatch` from the command line for manual strategy
//! comparison and benchmarking, without wiring up the HTTP layer.

use clap::Parser;

use zapzap_engine::simulator::{benchmark_dqn_inference, benchmark_feature_extraction, run_batch, BatchConfig, StrategyKind};

#[derive(Parser)]
#[command(author, version, about = "ZapZap batch simulator", long_about = None)]
enum Command {
    /// Play a batch of matches between the given strategies.
    #[command(alias = "batch")]
    RunBatch {
        /// One strategy per seat, e.g. `hard,hard,easy,thibot`.
        #[arg(required = true, value_delimiter = ',')]
        strategies: Vec<String>,
        #[arg(long, default_value_t = 1000)]
        matches: u32,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Time `n` feature-extraction calls.
    BenchFeatures {
        #[arg(long, default_value_t = 100_000)]
        n: u32,
    },
    /// Time `n` bandit inference calls.
    BenchDqn {
        #[arg(long, default_value_t = 100_000)]
        n: u32,
    },
}

fn parse_strategy(name: &str) -> Option<StrategyKind> {
    match name.trim().to_lowercase().as_str() {
        "easy" => Some(StrategyKind::Easy),
        "medium" => Some(StrategyKind::Medium),
        "hard" => Some(StrategyKind::Hard),
        "thibot" => Some(StrategyKind::Thibot),
        "bandit" => Some(StrategyKind::Bandit),
        "mcts" => Some(StrategyKind::Mcts),
        _ => None,
    }
}

fn main() {
    zapzap_engine::init_tracing();

    match Command::parse() {
        Command::RunBatch { strategies, matches, seed } => {
            let kinds: Vec<StrategyKind> = strategies
                .iter()
                .map(|s| parse_strategy(s).unwrap_or_else(|| panic!("unknown strategy: {s}")))
                .collect();

            let result = run_batch(&BatchConfig { seed, strategies: kinds, matches });

            println!("matches: {matches}");
            println!("avg rounds: {:.2}", result.avg_rounds);
            println!("total time: {:.1}ms", result.total_ms);
            println!("matches/sec: {:.0}", matches as f64 / (result.total_ms / 1000.0));
            for (i, wins) in result.wins_by_index.iter().enumerate() {
                let rate = *wins as f64 / matches as f64 * 100.0;
                println!("  player {i} ({}): {wins} wins ({rate:.1}%)", strategies[i]);
            }
        }
        Command::BenchFeatures { n } => {
            let total_ms = benchmark_feature_extraction(n);
            println!("{n} extractions in {total_ms:.2}ms ({:.3}us/call)", total_ms * 1000.0 / n as f64);
        }
        Command::BenchDqn { n } => {
            let total_ms = benchmark_dqn_inference(n);
            println!("{n} inferences in {total_ms:.2}ms ({:.3}us/call)", total_ms * 1000.0 / n as f64);
        }
    }
}
