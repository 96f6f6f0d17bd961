use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Unit suffix appended to every displayed count.
pub const COUNT_SUFFIX: &str = "件";

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    // stdout carries the report, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_count(count: usize) -> String {
    format!("{}{}", count, COUNT_SUFFIX)
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.top == 0 {
        anyhow::bail!("--top must be greater than 0");
    }

    if args.max_errors == 0 {
        anyhow::bail!("--max-errors must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;

    #[test]
    fn counts_carry_suffix() {
        assert_eq!(format_count(0), "0件");
        assert_eq!(format_count(1234), "1234件");
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(validate_args(&Args::default()).is_ok());
        let args = Args {
            top: 0,
            ..Args::default()
        };
        assert!(validate_args(&args).is_err());
        let args = Args {
            max_errors: 0,
            ..Args::default()
        };
        assert!(validate_args(&args).is_err());
    }
}
