use glyphfield::{bench_targets, bench_tick, run_view, Scenario, ScenarioConfig};

use clap::Parser;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run the micro-benchmarks instead of the viewer
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    //println!("{:?}", scenario_cfg);

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.bench {
        bench_tick();
        bench_targets();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg);
    run_view(scenario);

    Ok(())
}
