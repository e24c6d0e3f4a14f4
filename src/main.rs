//! jinjautils' command-line entry point.
//! Binds the template directory, loads and renders the template, then writes the
//! result to the output directory.

use anyhow::Context;
use jinjautils::{
    cli::{get_args, Args},
    config::{load_context, parse_assignment, SessionConfig, Variables},
    logger::{init_logger, LogFacadeSink},
    OutputRequest, TemplateSession,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

/// Collects variables from the variables file, then applies `--set` assignments on top.
fn collect_variables(args: &Args) -> anyhow::Result<Variables> {
    let mut variables = match &args.vars {
        Some(path) => load_context(path)
            .with_context(|| format!("failed to read variables from {}", path.display()))?,
        None => Variables::new(),
    };
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        variables.insert(key, value);
    }

    Ok(variables)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = SessionConfig {
        trim_blocks: !args.no_trim_blocks,
        lstrip_blocks: !args.no_lstrip_blocks,
        verbose: args.verbose,
    };
    let mut session = TemplateSession::with_config(config, Some(Box::new(LogFacadeSink)));
    let variables = collect_variables(&args)?;

    if let Some(template_dir) = &args.template_dir {
        session.bind_directory(template_dir)?;
    }
    session.load(&args.template)?;
    session.render(&variables)?;

    let request =
        OutputRequest::new(&args.output_dir, &args.output_file).backup(!args.no_backup);
    let target = session.write(&request)?;

    println!("Rendered '{}' to '{}'.", session.loaded(), target.display());
    Ok(())
}
