use std::env;

use tracing_subscriber::EnvFilter;

use aibackend_cli::{run, CheckArgs, USAGE};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return;
    }
    let outcome = CheckArgs::parse(args).and_then(|args| run(&args));
    match outcome {
        Ok(report) => print!("{report}"),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}
