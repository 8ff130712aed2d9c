//! cosim-graph entry point: CLI wiring and composition of the scenario graph.

use std::path::Path;
use std::process;

use cosim_graph::compose::{document, Composition};
use cosim_graph::registry::ModelRegistry;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    defaults_path: Option<String>,
    dump: bool,
}

fn print_help() {
    eprintln!("cosim-graph — composes a co-simulation graph from layered YAML scenarios");
    eprintln!();
    eprintln!("Usage: cosim-graph --scenario <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>   Scenario document to compose (required)");
    eprintln!("  --defaults <path>   Defaults document (built-in defaults if omitted)");
    eprintln!("  --dump              Print the full composed graph as YAML");
    eprintln!("  --help              Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        defaults_path: None,
        dump: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--defaults" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --defaults requires a path argument");
                    process::exit(1);
                }
                cli.defaults_path = Some(args[i].clone());
            }
            "--dump" => {
                cli.dump = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_summary(composition: &Composition) {
    let settings = &composition.settings;
    println!(
        "scenario {} | start {} | end {}",
        settings.scenario, settings.start_time, settings.end_time
    );

    let mut names: Vec<&String> = composition.models.keys().collect();
    names.sort();
    println!("\nmodel instances ({}):", names.len());
    for name in names {
        let model = &composition.models[name];
        let capability = model.capability.as_deref().unwrap_or("<unresolved>");
        println!(
            "  {name:<24} type={:<12} mode={:<10} step={:>4} min  capability={capability}",
            model.model_type, model.model_mode, model.step_size
        );
    }

    println!("\nconnections ({}):", composition.connections.len());
    for connection in &composition.connections {
        println!("  {} -> {}", connection.from, connection.to);
    }

    println!("\nmonitors ({}):", composition.monitors.len());
    for monitor in &composition.monitors {
        println!("  {monitor}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    let Some(ref scenario_path) = cli.scenario_path else {
        eprintln!("error: --scenario <path> is required");
        print_help();
        process::exit(1);
    };

    let defaults = match cli.defaults_path {
        Some(ref path) => document::load_document(Path::new(path)),
        None => document::builtin_defaults(),
    }
    .unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let scenario = document::load_document(Path::new(scenario_path)).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let registry = ModelRegistry::builtin();
    let composition = Composition::compose(&defaults, &scenario, &registry).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if cli.dump {
        match serde_yaml::to_string(&composition) {
            Ok(yaml) => print!("{yaml}"),
            Err(e) => {
                eprintln!("error: failed to serialize composition: {e}");
                process::exit(1);
            }
        }
    } else {
        print_summary(&composition);
    }
}
