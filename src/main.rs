use std::fs;
use std::process;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use assemblies::brain::Brain;
use assemblies::config::{BrainConfig, LearningConfig};
use assemblies::learning::{CallableDataSet, LearningArchitecture, LearningModel};
use assemblies::observer::BrainAdapter;

/// Everything the demo needs, loadable from one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    brain: BrainConfig,
    learning: LearningConfig,

    domain_size: usize,
    function: String,
    noise: f64,

    stimulus_k: usize,
    area_n: usize,
    area_k: usize,
    area_beta: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            brain: BrainConfig::with_p(0.1).with_seed(7),
            learning: LearningConfig::default(),
            domain_size: 2,
            function: "first-bit".to_string(),
            noise: 0.0,
            stimulus_k: 50,
            area_n: 1000,
            area_k: 40,
            area_beta: 0.05,
        }
    }
}

fn print_help() {
    println!("assemblies - binary function learning with neuron assemblies\n");
    println!("Usage: assemblies [--config <file.json>] [--snapshot]\n");
    println!("Options:");
    println!("  --config <file>   Load demo/brain/learning settings from JSON");
    println!("  --snapshot        Print a JSON snapshot of the brain after testing");
    println!("  --print-config    Print the effective configuration and exit");
    println!("  -h, --help        Show this help\n");
    println!("Functions: first-bit, parity, and, or");
    println!("Log level is read from RUST_LOG (default: info).");
}

type TargetFn = Box<dyn Fn(u32) -> u32>;

fn target_function(name: &str, domain_size: usize) -> Option<TargetFn> {
    let all_ones = 1u32
        .checked_shl(domain_size as u32)
        .map_or(u32::MAX, |v| v - 1);
    match name {
        "first-bit" => Some(Box::new(|x: u32| x & 1)),
        "parity" => Some(Box::new(|x: u32| x.count_ones() % 2)),
        "and" => Some(Box::new(move |x: u32| u32::from(x == all_ones))),
        "or" => Some(Box::new(|x: u32| u32::from(x != 0))),
        _ => None,
    }
}

fn run(cfg: &DemoConfig, snapshot: bool) -> Result<(), Box<dyn std::error::Error>> {
    let target = || {
        target_function(&cfg.function, cfg.domain_size)
            .ok_or_else(|| format!("unknown function `{}`", cfg.function))
    };

    let mut brain = Brain::new(cfg.brain)?;
    for i in 0..cfg.domain_size * 2 {
        brain.add_stimulus(&format!("bit{}_{}", i / 2, i % 2), cfg.stimulus_k)?;
    }
    brain.add_area("intermediate", cfg.area_n, cfg.area_k, cfg.area_beta)?;
    let architecture = LearningArchitecture::fan_in(&brain, "intermediate");

    let mut model = LearningModel::new(brain, cfg.domain_size, architecture, cfg.learning)?;
    let data_set = CallableDataSet::new(target()?, cfg.domain_size)?.with_noise(cfg.noise, 11);
    let test_set = CallableDataSet::new(target()?, cfg.domain_size)?;

    info!(function = %cfg.function, domain_size = cfg.domain_size, "training");
    model.train_model(&data_set)?;
    let accuracy = model.test_model(&test_set)?;
    println!("function={} accuracy={:.2}", cfg.function, accuracy);

    if snapshot {
        let snap = BrainAdapter::new(model.brain()).snapshot();
        println!("{}", serde_json::to_string_pretty(&snap)?);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cfg = DemoConfig::default();
    let mut snapshot = false;
    let mut print_config = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" | "help" => {
                print_help();
                return;
            }
            "--snapshot" => snapshot = true,
            "--print-config" => print_config = true,
            "--config" => {
                let Some(path) = args.get(i + 1) else {
                    eprintln!("--config needs a path");
                    process::exit(2);
                };
                cfg = match fs::read_to_string(path)
                    .map_err(|e| e.to_string())
                    .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
                {
                    Ok(cfg) => cfg,
                    Err(e) => {
                        eprintln!("Could not load config {path}: {e}");
                        process::exit(2);
                    }
                };
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_help();
                process::exit(2);
            }
        }
        i += 1;
    }

    if print_config {
        match serde_json::to_string_pretty(&cfg) {
            Ok(s) => println!("{s}"),
            Err(e) => error!("could not serialize config: {e}"),
        }
        return;
    }

    if let Err(e) = run(&cfg, snapshot) {
        error!("{e}");
        process::exit(1);
    }
}
