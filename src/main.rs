use std::env;

use anyhow::{Context, Result};
use tracing::info;

use nodecfg::help;
use nodecfg::logging::{init_tracing, Channel};
use nodecfg::status::ExitStatus;
use nodecfg::version::{package_version, safe_int_version_to_string};
use nodecfg::{ArgumentStore, NodeContext};

/// Entry point
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    let tokens: Vec<String> = env::args().skip(1).collect();

    let result = run(&tokens);
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }
    ExitStatus::from(&result)
}

fn run(tokens: &[String]) -> Result<()> {
    // Informational switches never touch the data directory.
    let quick = ArgumentStore::from_tokens(tokens);
    if quick.is_set("-?") || quick.is_set("-h") || quick.is_set("-help") {
        print!("{}", help::usage());
        return Ok(());
    }
    if quick.is_set("-version") {
        let packed = package_version().context("Packaged version is malformed")?;
        println!("{} v{}", env!("CARGO_PKG_NAME"), safe_int_version_to_string(packed));
        return Ok(());
    }

    let ctx = NodeContext::init(tokens).context("Failed to initialize")?;
    init_tracing(ctx.logger_arc(), "info");

    let mut startup = ctx.logger().stream(Channel::Primary);
    startup.print("\n\n\n\n\n");
    startup.print(&format!("{} version v{}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
    info!(datadir = %ctx.datadir().get(false)?.display(), "Startup");

    if ctx.store().is_set("-pid") {
        ctx.write_pid_file().context("Failed to write pid file")?;
    }

    if ctx.store().is_set("-printsettings") {
        for (key, value) in ctx.store().snapshot() {
            println!("{}={}", key, value);
        }
    }

    ctx.shutdown();
    Ok(())
}
