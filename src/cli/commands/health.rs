//! Upstream reachability command.

use tokio::runtime::Runtime;

use super::build_pipeline;
use crate::config::Config;
use crate::error::Result;

/// Probe both upstream sources and report reachability.
///
/// Exits non-zero when either source is unreachable, so the command
/// works as a scriptable readiness check.
pub fn cmd_health(rt: &Runtime) -> anyhow::Result<()> {
    let config = Config::from_env();
    let pipeline = build_pipeline(&config)?;

    println!("Checking upstream sources...\n");

    let healthy = rt.block_on(async {
        let (pollution, summaries) =
            futures::future::join(pipeline.probe_pollution(), pipeline.probe_summaries()).await;

        report("Pollution API", &pollution);
        report("Summary API", &summaries);
        pollution.is_ok() && summaries.is_ok()
    });

    if !healthy {
        std::process::exit(1);
    }
    Ok(())
}

fn report(name: &str, outcome: &Result<()>) {
    match outcome {
        Ok(()) => println!("✓ {}: reachable", name),
        Err(e) => println!("✗ {}: {}", name, e),
    }
}
