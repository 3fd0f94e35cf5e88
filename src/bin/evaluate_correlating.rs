//! Evaluate a [`CorrelatingPredictor`] against one or more traces.
//!
//! With no trace files, a synthetic trace is generated instead. Set
//! `RUST_LOG=trace` to see every predictor event.

use corrbp::*;
use corrbp::replay::Replay;
use corrbp::stats::*;
use corrbp::trace::synthetic::SyntheticConfig;

use std::env;
use std::error::Error;

const BTB_ENTRIES: usize = 4096;

fn run_test<P: DirectionPredictor>(p: P, shift: u32, records: &[BranchRecord])
    -> BranchStats
{
    let name = p.name();
    let mut replay = Replay::new(p, SimpleBTB::new(BTB_ENTRIES, shift));
    replay.run(records);
    let stat = replay.stat;
    println!("  {:20} Global hit rate: {}/{} ({:.2}% correct) ({} misses, {} btb misses)",
        name,
        stat.global_hits(),
        stat.global_brns(),
        stat.hit_rate() * 100.0,
        stat.global_miss(),
        stat.btb_misses,
    );
    stat
}

fn evaluate(cfg: CorrelatingConfig, name: &str, records: &[BranchRecord])
    -> Result<(), Box<dyn Error>>
{
    println!("[*] {}, {} records", name, records.len());

    let mut pred = cfg.build()?;
    if log::log_enabled!(log::Level::Trace) {
        pred.set_observer(Some(Box::new(LogObserver)));
    }
    let stat = run_test(pred, cfg.inst_shift, records);
    run_test(TakenPredictor, cfg.inst_shift, records);
    run_test(NotTakenPredictor, cfg.inst_shift, records);
    run_test(RandomPredictor, cfg.inst_shift, records);

    println!("  Unique branches: {}", stat.num_unique_branches());
    println!("  Low hit-rate branches:");
    for (pc, data) in stat.get_low_rate_branches(4, 0.55) {
        println!("    {:016x} {:8}/{:8} {:.4}",
            pc, data.hits, data.occ, data.hit_rate()
        );
    }
    println!();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.first().is_some_and(|a| a == "-h" || a == "--help") {
        println!("usage: evaluate_correlating [config.json] [trace files]");
        return Ok(());
    }

    let cfg = if args.first().is_some_and(|a| a.ends_with(".json")) {
        let path = args.remove(0);
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str::<CorrelatingConfig>(&text)?
    } else {
        CorrelatingConfig::default()
    };
    cfg.validate()?;

    println!("[*] {} history entries x {} history bits, {}-bit counters ({} bits)",
        cfg.history_entries, cfg.history_bits, cfg.ctr.bits, cfg.storage_bits()
    );

    if args.is_empty() {
        let syn = SyntheticConfig::default();
        return evaluate(cfg, "synthetic", &syn.generate());
    }

    for trace in BinaryTraceSet::new_from_slice(&args) {
        let trace = trace?;
        evaluate(cfg, trace.name(), trace.as_slice())?;
    }
    Ok(())
}
