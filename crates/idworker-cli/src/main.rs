mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Config};
use idworker::{CallerTag, FlakeId, GatedIdWorker, IdWorker};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let worker = IdWorker::new(config.worker_id, config.datacenter_id, config.epoch)?
        .with_spin_policy(config.spin);
    let epoch_millis = worker.epoch_millis();

    let mut out = BufWriter::new(std::io::stdout().lock());
    let worker = match &config.caller {
        Some(tag) => {
            let gate = GatedIdWorker::new(worker, CallerTag);
            write_ids(&mut out, config.count, config.explain, epoch_millis, || {
                gate.get_id(tag)
            })?;
            gate.into_inner()
        }
        None => {
            write_ids(&mut out, config.count, config.explain, epoch_millis, || {
                worker.next_id()
            })?;
            worker
        }
    };
    out.flush()?;

    tracing::debug!(
        generated = worker.generated_count(),
        errors = worker.error_count(),
        "done"
    );
    Ok(())
}

fn log_startup_info(config: &Config) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting ID worker with full config: {:#?}", config);
    } else {
        tracing::info!(
            worker_id = config.worker_id,
            datacenter_id = config.datacenter_id,
            count = config.count,
            "Starting ID worker"
        );
    }
}

/// Writes `count` IDs from `next`, one per line. Stops at the first error.
fn write_ids<W, F>(
    out: &mut W,
    count: usize,
    explain: bool,
    epoch_millis: i64,
    mut next: F,
) -> anyhow::Result<()>
where
    W: Write,
    F: FnMut() -> idworker::Result<u64>,
{
    for _ in 0..count {
        let raw = next().inspect_err(|e| tracing::error!("ID generation failed: {e}"))?;
        if explain {
            let id = FlakeId::from_raw(raw);
            writeln!(
                out,
                "{raw}\tunix_ms={} datacenter={} worker={} sequence={}",
                id.unix_millis(epoch_millis),
                id.datacenter_id(),
                id.worker_id(),
                id.sequence()
            )?;
        } else {
            writeln!(out, "{raw}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use idworker::{TWITTER_EPOCH, epoch_instant};

    #[test]
    fn writes_one_id_per_line() {
        let worker = IdWorker::new(1, 2, epoch_instant(TWITTER_EPOCH)).unwrap();
        let mut out = Vec::new();
        write_ids(&mut out, 5, false, 0, || worker.next_id()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let ids: Vec<u64> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn explain_prints_fields() {
        let id = FlakeId::from_parts(1_000, 3, 4, 5).to_raw();
        let mut out = Vec::new();
        write_ids(&mut out, 1, true, 10, || Ok(id)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!("{id}\tunix_ms=1010 datacenter=3 worker=4 sequence=5\n")
        );
    }

    #[test]
    fn rejected_caller_stops_output() {
        let worker = IdWorker::new(0, 0, epoch_instant(TWITTER_EPOCH)).unwrap();
        let gate = GatedIdWorker::new(worker, CallerTag);
        let mut out = Vec::new();
        let err = write_ids(&mut out, 3, false, 0, || gate.get_id("9lives")).unwrap_err();

        assert!(err.to_string().contains("invalid caller tag"));
        assert!(out.is_empty());
        assert_eq!(gate.worker().error_count(), 1);
    }
}
