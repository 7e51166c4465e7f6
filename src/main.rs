use std::io;

use clap::Parser;

use sockowner::cli::Cli;
use sockowner::error::SockOwnerError;
use sockowner::output;
use sockowner::resolver::{ConnectionResolver, Resolution};

const EXIT_FOUND: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_INVALID_ENDPOINT: i32 = 2;
const EXIT_TABLE_UNAVAILABLE: i32 = 3;
const EXIT_FAILURE: i32 = 4;

fn exit_code(result: &Result<Resolution, SockOwnerError>) -> i32 {
    match result {
        Ok(Resolution::Found(_)) => EXIT_FOUND,
        Ok(Resolution::NotFound) => EXIT_NOT_FOUND,
        Err(SockOwnerError::InvalidEndpoint { .. }) => EXIT_INVALID_ENDPOINT,
        Err(SockOwnerError::TableUnavailable { .. }) => EXIT_TABLE_UNAVAILABLE,
        Err(_) => EXIT_FAILURE,
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = run(&cli);
    if let Err(e) = &result {
        eprintln!("error: {e}");
    }
    std::process::exit(exit_code(&result));
}

fn run(cli: &Cli) -> Result<Resolution, SockOwnerError> {
    let target = cli.target()?;
    let unparsed = target.unparsed_fields();
    if !unparsed.is_empty() {
        log::warn!(
            "could not parse {} of {target}; it will not match any connection",
            unparsed.join(", ")
        );
    }

    let config = cli.resolver_config();
    log::info!(
        "resolving {target} via {} and {}",
        config.tcp_table.display(),
        cli.proc_root.display()
    );

    let resolver = ConnectionResolver::new(config, cli.lookup());
    let resolution = resolver.resolve(&target)?;

    let mut stdout = io::stdout().lock();
    output::write_resolution(&target, &resolution, cli.format, &mut stdout)?;

    Ok(resolution)
}
