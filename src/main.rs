//! Telemetry codec benchmark CLI
//!
//! Runs the codec comparison once and prints one size line per combination.
//! Any failure is reported on stderr and the process exits non-zero.

use clap::Parser;
use color_eyre::eyre::WrapErr;
use telemetry_codec_bench::config::HarnessConfig;
use telemetry_codec_bench::harness::Harness;
use telemetry_codec_bench::logging;
use telemetry_codec_bench::report::JsonReporter;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = HarnessConfig::parse();

    // RUST_LOG wins over --verbose
    logging::subscriber(config.log_filter()).init();

    let harness = Harness::new(&config.schema).wrap_err("cannot start without a schema")?;
    let report = harness.run(&config)?;

    if config.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(dir) = &config.output {
        JsonReporter::new(dir)?.save(&report)?;
    }

    Ok(())
}
