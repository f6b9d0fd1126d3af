//! Command-line surface: argument tree and validation into a `RunConfig`.

use std::path::PathBuf;

use clap::{Arg, ArgMatches, Command};
use loadgen_core::{units, Error, Result, RunConfig};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("loadgen")
        .about("Insert-throughput benchmark for LMDB")
        .arg(
            Arg::new("path")
                .required(true)
                .help("Directory for the LMDB environment"),
        )
        .arg(
            Arg::new("size")
                .required(true)
                .help("Environment map size, human-readable (e.g. 10g)"),
        )
        .arg(
            Arg::new("num_users")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Number of synthetic users"),
        )
        .arg(
            Arg::new("num_rows_per_user")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Rows inserted per user"),
        )
        .arg(
            Arg::new("num_rows_per_commit")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Rows per transaction before committing"),
        )
        .arg(
            Arg::new("sync_interval_seconds")
                .required(true)
                .value_parser(clap::value_parser!(u64))
                .help("Seconds between forced syncs; 0 disables the sync loop"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(clap::value_parser!(u64))
                .help("Seed for the workload permutation pools (default: random)"),
        )
}

/// Validate parsed matches into a `RunConfig`.
pub fn config_from_matches(matches: &ArgMatches) -> Result<RunConfig> {
    let path: &String = arg(matches, "path")?;
    let size: &String = arg(matches, "size")?;
    let map_size = units::parse_size(size)?;
    let map_size = usize::try_from(map_size).map_err(|_| Error::InvalidSize {
        input: size.clone(),
        reason: "exceeds the addressable size".to_string(),
    })?;

    Ok(RunConfig {
        path: PathBuf::from(path),
        map_size,
        num_users: *arg(matches, "num_users")?,
        rows_per_user: *arg(matches, "num_rows_per_user")?,
        rows_per_commit: *arg(matches, "num_rows_per_commit")?,
        sync_interval_secs: *arg(matches, "sync_interval_seconds")?,
        seed: matches
            .get_one::<u64>("seed")
            .copied()
            .unwrap_or_else(rand::random::<u64>),
    })
}

fn arg<'m, T>(matches: &'m ArgMatches, name: &str) -> Result<&'m T>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .get_one::<T>(name)
        .ok_or_else(|| Error::InvalidArgument(format!("{name} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RunConfig> {
        let matches = build_cli()
            .try_get_matches_from(args)
            .map_err(|e| Error::InvalidArgument(e.to_string()))?;
        config_from_matches(&matches)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_full_argument_set() {
        let config = parse(&["loadgen", "/tmp/db", "10g", "1000", "500", "100", "5"]).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/db"));
        assert_eq!(config.map_size, 10 << 30);
        assert_eq!(config.num_users, 1000);
        assert_eq!(config.rows_per_user, 500);
        assert_eq!(config.rows_per_commit, 100);
        assert_eq!(config.sync_interval_secs, 5);
    }

    #[test]
    fn test_seed_flag() {
        let config =
            parse(&["loadgen", "/tmp/db", "1g", "10", "10", "10", "0", "--seed", "7"]).unwrap();
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(parse(&["loadgen", "/tmp/db", "10g"]).is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(parse(&["loadgen", "/tmp/db", "10g", "0", "500", "100", "5"]).is_err());
        assert!(parse(&["loadgen", "/tmp/db", "10g", "1000", "0", "100", "5"]).is_err());
        assert!(parse(&["loadgen", "/tmp/db", "10g", "1000", "500", "0", "5"]).is_err());
    }

    #[test]
    fn test_zero_sync_interval_allowed() {
        let config = parse(&["loadgen", "/tmp/db", "10g", "10", "10", "10", "0"]).unwrap();
        assert!(!config.sync_enabled());
    }

    #[test]
    fn test_bad_size_is_a_validation_error() {
        let err = parse(&["loadgen", "/tmp/db", "10q", "10", "10", "10", "0"]).unwrap_err();
        assert!(err.is_validation());
    }
}
