//! pybridge - command-line harness for the Python bridge
//!
//! Drives an in-memory host through the same property changes the node-graph
//! host would send, so a module can be checked without the host running.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use py_bridge::host::{FixedInput, Output};
use py_bridge::{logging, BridgeConfig, MemoryHost, Parameter, PythonBridge, TypedValue};

#[derive(Parser)]
#[command(name = "pybridge")]
#[command(about = "Inspect and call Python functions through the host bridge", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/pybridge.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the parameters discovered for a function
    Inspect {
        #[command(flatten)]
        target: Target,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Call a function and show the outputs
    Call {
        #[command(flatten)]
        target: Target,

        /// Argument value, may be repeated
        #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        args: Vec<(String, String)>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct Target {
    /// Module to import
    #[arg(short, long)]
    module: String,

    /// Function to call in the module
    #[arg(short, long)]
    function: String,

    /// Directory appended to the module search path
    #[arg(short, long)]
    path: Option<String>,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    module: &'a str,
    function: &'a str,
    found: bool,
    parameters: &'a [Parameter],
}

#[derive(Serialize)]
struct CallReport {
    found: bool,
    ran: bool,
    error: String,
    output: String,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// Assign an input and hand the stored value to the bridge, like the host does.
fn apply(
    bridge: &mut PythonBridge,
    host: &mut MemoryHost,
    index: usize,
    value: TypedValue,
) -> Result<()> {
    let stored = host.set_input(index, value)?;
    debug!(index, value = %stored, "input changed");
    bridge.handle_input_change(host, index, &stored);
    Ok(())
}

fn select(bridge: &mut PythonBridge, host: &mut MemoryHost, target: &Target) -> Result<bool> {
    if let Some(path) = &target.path {
        apply(bridge, host, FixedInput::Path.index(), path.as_str().into())?;
    }
    apply(bridge, host, FixedInput::Module.index(), target.module.as_str().into())?;
    apply(bridge, host, FixedInput::Function.index(), target.function.as_str().into())?;
    Ok(bridge.state().found())
}

fn inspect(bridge: &mut PythonBridge, host: &mut MemoryHost, target: &Target, json: bool) -> Result<ExitCode> {
    let found = select(bridge, host, target)?;
    let state = bridge.state();
    if json {
        let report = InspectReport {
            module: state.module(),
            function: state.function(),
            found,
            parameters: state.parameters(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if found {
        for parameter in state.parameters() {
            println!("{parameter}");
        }
    } else {
        eprintln!("function '{}' not found in module '{}'", target.function, target.module);
    }
    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn call(
    bridge: &mut PythonBridge,
    host: &mut MemoryHost,
    target: &Target,
    args: &[(String, String)],
    json: bool,
) -> Result<ExitCode> {
    let found = select(bridge, host, target)?;
    if found {
        apply(bridge, host, FixedInput::GetArgs.index(), true.into())?;
        for (name, raw) in args {
            let index = host
                .find_argument(name)
                .ok_or_else(|| anyhow!("'{}' has no parameter named '{name}'", target.function))?;
            let kind = host
                .input(index)
                .map(|slot| slot.def.kind())
                .ok_or_else(|| anyhow!("argument input {index} disappeared"))?;
            // Argument inputs accept any type; keep text that does not parse.
            let value = TypedValue::parse(kind, raw).unwrap_or_else(|| raw.as_str().into());
            apply(bridge, host, index, value)?;
        }
        apply(bridge, host, FixedInput::Trigger.index(), true.into())?;
    }

    let report = CallReport {
        found: host.output(Output::FunctionFound).is_on(),
        ran: host.pulses(Output::FunctionRan) > 0,
        error: host.output(Output::Error).to_string(),
        output: host.output(Output::Result).to_string(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("function_found: {}", report.found);
        println!("function_ran:   {}", report.ran);
        println!("error:          {}", report.error);
        println!("output:         {}", report.output);
    }

    let ok = report.found && report.ran && report.error.is_empty();
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BridgeConfig::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => BridgeConfig::load().context("failed to load configuration")?,
    };
    logging::init(&config.logging)?;

    let mut bridge = PythonBridge::new(config.interpreter);
    let mut host = MemoryHost::new();

    match cli.command {
        Commands::Inspect { target, json } => inspect(&mut bridge, &mut host, &target, json),
        Commands::Call { target, args, json } => call(&mut bridge, &mut host, &target, &args, json),
    }
}
