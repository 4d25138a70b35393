use std::path::PathBuf;

use clap::Parser;

use speedup_graph::DEFAULT_TRIALS;

/// Plot parallel speedup against thread count from a benchmark timing log
#[derive(Debug, Clone, Parser)]
#[command(name = "speedup-graph", version)]
pub struct Args {
    /// Timing log with `s,<size>,<time>` and `p,<size>,<threads>,<time>` lines
    #[arg(default_value = "slurm/out/speed_output.txt")]
    pub input: PathBuf,
    /// Where to write the PNG chart
    #[arg(short, long, default_value = "speedup_graph_output.png")]
    pub output: PathBuf,
    /// Samples per configuration before its average is taken
    #[arg(short, long, default_value_t = DEFAULT_TRIALS, value_parser = parse_trials)]
    pub trials: usize,
}

fn parse_trials(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["speedup-graph"]);
        assert_eq!(args.input, PathBuf::from("slurm/out/speed_output.txt"));
        assert_eq!(args.output, PathBuf::from("speedup_graph_output.png"));
        assert_eq!(args.trials, DEFAULT_TRIALS);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["speedup-graph", "runs.txt", "-o", "out.png", "--trials", "3"]);
        assert_eq!(args.input, PathBuf::from("runs.txt"));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.trials, 3);
    }

    #[test]
    fn test_zero_trials_rejected() {
        assert!(Args::try_parse_from(["speedup-graph", "-t", "0"]).is_err());
    }
}
