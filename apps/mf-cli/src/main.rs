use clap::{Parser, Subcommand};
use mf_app::{AppResult, MixtureResult, resolve};
use mf_core::parse::{parse_flow_rate, parse_temperature};
use mf_core::units::{in_kelvin, in_mlpm};
use mf_mixture::Mixture;
use mf_project::{SourceStore, load_config};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(about = "MixFlow CLI - Gas mixture resolution and MFC calibration tool", long_about = None)]
struct Cli {
    /// Path to the configuration YAML/JSON file
    #[arg(short, long, global = true, default_value = "mixflow.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate supply flow rates to obtain a target gas mixture
    Mix {
        /// Target mixture, e.g. "CH4=3200ppm,O2=10%,N2=*"
        mixture: String,
        /// Volumetric flow rate of the final mixture
        #[arg(short = 'V', long, default_value = "1.0L/min")]
        flowrate: String,
        /// Temperature of the mixed flow
        #[arg(short = 'T', long, default_value = "293K")]
        temperature: String,
    },
    /// Calculate the conversion factor (CF) of a gas mixture at 273 K
    Cf {
        /// Mixture, e.g. "CH4=3200ppm,O2=10%,N2=*"
        mixture: String,
    },
    /// Manage the stored source gas mixtures
    #[command(subcommand)]
    Source(SourceCommands),
    /// Validate a configuration file
    Validate,
}

#[derive(Subcommand)]
enum SourceCommands {
    /// List the stored source gas mixtures
    List {
        /// Source store file (defaults to .sources.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Add a source gas mixture, e.g. "NO=5000ppm,N2=*"
    Add {
        mixture: String,
        /// Name of the mixture; synthesized from the species if omitted
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Remove a source gas mixture by its list index
    Remove {
        /// Index (#) of the mixture to remove
        #[arg(short, long)]
        id: Option<usize>,
        /// Remove all stored mixtures
        #[arg(long)]
        all: bool,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mix {
            mixture,
            flowrate,
            temperature,
        } => cmd_mix(&cli.config, &mixture, &flowrate, &temperature),
        Commands::Cf { mixture } => cmd_cf(&mixture),
        Commands::Source(source_cmd) => match source_cmd {
            SourceCommands::List { file } => cmd_source_list(file.as_deref()),
            SourceCommands::Add {
                mixture,
                name,
                file,
            } => cmd_source_add(&mixture, name, file.as_deref()),
            SourceCommands::Remove { id, all, file } => cmd_source_remove(id, all, file.as_deref()),
        },
        Commands::Validate => cmd_validate(&cli.config),
    }
}

fn cmd_mix(
    config_path: &Path,
    mixture: &str,
    flowrate: &str,
    temperature: &str,
) -> AppResult<()> {
    let config = load_config(config_path)?;
    let target = Mixture::parse(mixture)?;
    let flowrate = parse_flow_rate(flowrate)?;
    let temperature = parse_temperature(temperature)?;

    println!("Calculating supply flow rates for: {target}");
    println!(
        "Target flow rate: {:.2} ml/min @ {:.2} K",
        in_mlpm(flowrate),
        in_kelvin(temperature)
    );
    println!();

    let result = resolve(&config, &target, flowrate, temperature)?;
    print_mix_report(&result);
    Ok(())
}

fn print_mix_report(result: &MixtureResult) {
    println!(
        "{:<12} {:<28} {:>10} {:>16} {:<10} {:>9}",
        "line", "gas", "weight", "flow rate", "MFC", "setpoint"
    );
    for component in &result.components {
        let setpoint = match component.setpoint {
            Some(s) => format!("{:.2}%", s * 100.0),
            None => "-".to_string(),
        };
        println!(
            "{:<12} {:<28} {:>10.4} {:>10.2} ml/min {:<10} {:>9}",
            component.line,
            component.gas.label(),
            component.weight,
            in_mlpm(component.flowrate),
            component.mfc.as_deref().unwrap_or("-"),
            setpoint
        );
    }
    println!();

    let total: f64 = result.components.iter().map(|c| c.weight).sum();
    println!("Resulting mixture: {}", result.mixture);
    if result.success {
        println!("✓ Supply weights are consistent (sum = {total:.4})");
    } else {
        println!(
            "✗ Inconsistent result: supply weights sum to {total:.4}. The target \
             mixture cannot be blended from the configured supply lines."
        );
    }
}

fn cmd_cf(mixture: &str) -> AppResult<()> {
    let mixture = Mixture::parse(mixture)?;
    let cf = mixture.conversion_factor()?;
    println!("Calculating conversion factor for: {mixture}");
    println!("Conversion factor (CF): {cf:.4} (referred to N2 at 273 K)");
    Ok(())
}

fn cmd_source_list(file: Option<&Path>) -> AppResult<()> {
    let store = SourceStore::open(file)?;
    print_store(&store)
}

fn cmd_source_add(mixture: &str, name: Option<String>, file: Option<&Path>) -> AppResult<()> {
    let mut mixture = Mixture::parse(mixture)?;
    if let Some(name) = name {
        mixture = mixture.with_name(name);
    }

    let mut store = SourceStore::open(file)?;
    store.add(mixture);
    store.save()?;
    print_store(&store)
}

fn cmd_source_remove(id: Option<usize>, all: bool, file: Option<&Path>) -> AppResult<()> {
    let mut store = SourceStore::open(file)?;
    if let Some(id) = id {
        if store.remove(id).is_none() {
            println!("No source gas with index {id}");
        }
    }
    if all {
        store.clear();
    }
    store.save()?;
    print_store(&store)
}

fn print_store(store: &SourceStore) -> AppResult<()> {
    if store.is_empty() {
        println!("No source gases stored in {}", store.path().display());
        return Ok(());
    }

    println!("{:>3}  {:<16} {:<32} {:>6}", "#", "name", "composition", "CF");
    for (k, gas) in store.gases().iter().enumerate() {
        let cf = gas.conversion_factor()?;
        let composition = gas
            .iter()
            .map(|(species, amount)| format!("{species}={amount}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:>3}  {:<16} {:<32} {:>6.3}", k, gas.label(), composition, cf);
    }
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = load_config(config_path)?;
    println!(
        "✓ Configuration is valid ({} lines, {} controllers)",
        config.lines().len(),
        config.controllers().len()
    );
    Ok(())
}
