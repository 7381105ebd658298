//! Command-line options and simulation config loading.

use std::path::{Path, PathBuf};

use evileye_sim::SimConfig;

/// Ticks simulated by a headless run when `--ticks` is not given (five minutes).
pub const DEFAULT_HEADLESS_TICKS: u64 = 60 * 60 * 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// JSON file with a [`SimConfig`]; missing fields use defaults.
    pub config_path: Option<PathBuf>,
    /// Overrides the seed from the config file.
    pub seed: Option<u64>,
    pub ticks: u64,
    /// Pace the loop at 60Hz on a background thread instead of running flat out.
    pub realtime: bool,
    pub autopilot: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            seed: None,
            ticks: DEFAULT_HEADLESS_TICKS,
            realtime: false,
            autopilot: false,
        }
    }
}

impl RunOptions {
    /// Parse options from arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().ok_or("--config requires a path")?;
                    options.config_path = Some(PathBuf::from(path));
                }
                "--seed" => {
                    let value = args.next().ok_or("--seed requires a value")?;
                    let seed = value
                        .parse()
                        .map_err(|e| format!("invalid --seed '{}': {}", value, e))?;
                    options.seed = Some(seed);
                }
                "--ticks" => {
                    let value = args.next().ok_or("--ticks requires a value")?;
                    options.ticks = value
                        .parse()
                        .map_err(|e| format!("invalid --ticks '{}': {}", value, e))?;
                }
                "--realtime" => options.realtime = true,
                "--autopilot" => options.autopilot = true,
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }

        Ok(options)
    }

    /// Resolve the simulation config: file (if any), then CLI overrides.
    pub fn sim_config(&self) -> Result<SimConfig, String> {
        let mut config = match &self.config_path {
            Some(path) => load_sim_config(path)?,
            None => SimConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

pub fn load_sim_config(path: &Path) -> Result<SimConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    parse_sim_config(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

pub fn parse_sim_config(text: &str) -> Result<SimConfig, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_args() {
        let options = RunOptions::parse(Vec::<String>::new()).unwrap();
        assert_eq!(options, RunOptions::default());
        assert_eq!(options.sim_config().unwrap(), SimConfig::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let options = RunOptions::parse([
            "--ticks",
            "600",
            "--seed",
            "7",
            "--autopilot",
            "--realtime",
            "--config",
            "run.json",
        ])
        .unwrap();
        assert_eq!(options.ticks, 600);
        assert_eq!(options.seed, Some(7));
        assert!(options.autopilot);
        assert!(options.realtime);
        assert_eq!(options.config_path, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(RunOptions::parse(["--ticks"]).is_err());
        assert!(RunOptions::parse(["--ticks", "many"]).is_err());
        assert!(RunOptions::parse(["--turbo"]).is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_sim_config(r#"{"seed": 99, "auto_start": true}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert!(config.auto_start);
        assert_eq!(config.starting_money, SimConfig::default().starting_money);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_sim_config(Path::new("/nonexistent/evileye.json")).unwrap_err();
        assert!(err.contains("Failed to read config"));
    }
}
