use std::env;
use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

use mangolo::{export, Project};

fn main() {
    let matches = Command::new("mangolo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Load a mangolo project: read mangolo.tree and parse every component it lists")
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .help("Project directory (defaults to the current directory)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output and print the loaded project as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    init_logging(verbose);

    let project_dir = match matches.get_one::<PathBuf>("project") {
        Some(dir) => dir.clone(),
        None => match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Error: could not determine current directory: {}", e);
                process::exit(1);
            }
        },
    };

    let project = match Project::load(&project_dir) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("\nFailed to load project.");
            process::exit(1);
        }
    };

    for warning in &project.warnings {
        eprintln!("{}", warning);
    }

    if verbose {
        match export::project_to_json(&project) {
            Ok(json) => println!("\nProject Data:\n{}", json),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    println!("\nProject loaded successfully!");
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
