use anyhow::bail;
use clap::Parser;
use idworker::{
    FlakeId, SpinPolicy, SystemClock, TWITTER_EPOCH, TimeSource, epoch_instant,
    validate_identifiers,
};
use std::time::{Duration, SystemTime};

/// Runtime configuration for the `idworker` binary.
///
/// The worker and datacenter identifiers must be assigned out of band (static
/// config, deployment manifest, ...) so that no two live processes share a
/// pair. All values are parsed from CLI arguments or environment variables,
/// and a `.env` file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "idworker",
    version,
    about = "Mint time-ordered 64-bit Snowflake IDs for one worker"
)]
pub struct CliArgs {
    /// Worker identifier within the datacenter (0-31).
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID")]
    pub worker_id: u8,

    /// Datacenter identifier (0-31).
    ///
    /// Environment variable: `DATACENTER_ID`
    #[arg(long, env = "DATACENTER_ID")]
    pub datacenter_id: u8,

    /// Epoch as milliseconds since 1970-01-01 UTC. Every process that mints
    /// comparable IDs must use the same value. Defaults to the Twitter epoch.
    ///
    /// Environment variable: `EPOCH_MILLIS`
    #[arg(long, env = "EPOCH_MILLIS", default_value_t = TWITTER_EPOCH.as_millis() as u64)]
    pub epoch_millis: u64,

    /// Number of IDs to print.
    ///
    /// Environment variable: `COUNT`
    #[arg(short = 'n', long, env = "COUNT", default_value_t = 1)]
    pub count: usize,

    /// Caller tag checked by the admission gate before any ID is minted. The
    /// tag must start with an ASCII letter.
    ///
    /// Environment variable: `CALLER_TAG`
    #[arg(long, env = "CALLER_TAG")]
    pub caller: Option<String>,

    /// Give up after this many clock samples if the sequence is exhausted and
    /// the clock does not advance. Unbounded when unset.
    ///
    /// Environment variable: `MAX_SPINS`
    #[arg(long, env = "MAX_SPINS")]
    pub max_spins: Option<u64>,

    /// Print the decoded fields next to each ID.
    #[arg(short, long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub worker_id: u8,
    pub datacenter_id: u8,
    pub epoch: SystemTime,
    pub count: usize,
    pub caller: Option<String>,
    pub spin: SpinPolicy,
    pub explain: bool,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        validate_identifiers(args.worker_id, args.datacenter_id)?;

        if args.count == 0 {
            bail!("COUNT must be greater than 0");
        }

        let now = SystemClock.current_millis();
        let Ok(epoch) = i64::try_from(args.epoch_millis) else {
            bail!("EPOCH_MILLIS ({}) is out of range", args.epoch_millis);
        };
        if epoch > now {
            bail!("EPOCH_MILLIS ({epoch}) is in the future (now = {now})");
        }
        let elapsed = now.abs_diff(epoch);
        if elapsed > FlakeId::MAX_TIMESTAMP {
            bail!(
                "EPOCH_MILLIS ({epoch}) is too old: {elapsed} ms elapsed, limit is {} ms",
                FlakeId::MAX_TIMESTAMP
            );
        }

        let spin = match args.max_spins {
            Some(max) => SpinPolicy::Bounded(max),
            None => SpinPolicy::Unbounded,
        };

        Ok(Self {
            worker_id: args.worker_id,
            datacenter_id: args.datacenter_id,
            epoch: epoch_instant(Duration::from_millis(args.epoch_millis)),
            count: args.count,
            caller: args.caller,
            spin,
            explain: args.explain,
        })
    }
}
