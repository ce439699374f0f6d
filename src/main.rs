// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-sh CLI - run a JavaScript file as a shell script

use clap::Parser;
use owo_colors::OwoColorize;
use spacey_sh_runtime::{script_path, RuntimeOptions, ScriptRuntime, VERSION};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "spacey-sh",
    about = "Run JavaScript files as shell scripts",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// JavaScript file to execute
    script: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Arguments passed to the script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "spacey_sh=debug,spacey_sh_runtime=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), format!("{e:#}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let script = script_path(cli.script.as_deref())?;
    let runner = std::env::args().next().unwrap_or_else(|| "spacey-sh".to_string());
    let absolute = std::env::current_dir()?.join(&script);

    tracing::debug!(script = %absolute.display(), args = ?cli.args, "starting spacey-sh");

    let options = RuntimeOptions::for_script(runner, &absolute, &cli.args);
    let mut runtime = ScriptRuntime::new(options)?;
    runtime.run_file(&absolute)?;
    Ok(())
}
