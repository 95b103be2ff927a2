//! Command line entry point for the dashboard renderer.

use anyhow::{Context, Result};
use clap::Parser;
use power_dashboard::config::DashboardConfig;
use power_dashboard::dashboard;
use power_dashboard::data::DataLoader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "power_dashboard")]
#[command(about = "Render an energy indicator dashboard from a CSV table", long_about = None)]
struct Args {
    /// CSV with `Indicator Name`, `Year` and one column per country.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// JSON config; fields left out keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the dashboard image.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also write each chart on its own into this directory.
    #[arg(long, value_name = "DIR")]
    charts_dir: Option<PathBuf>,

    /// Do not open the dashboard after saving it.
    #[arg(long)]
    no_display: bool,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn into_config(self) -> Result<(DashboardConfig, Option<PathBuf>, bool)> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.no_display {
            config.display = false;
        }
        Ok((config, self.charts_dir, self.print_config))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (config, charts_dir, print_config) = Args::parse().into_config()?;
    if print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let dataset = DataLoader::load_csv(&config.input)
        .with_context(|| format!("loading dataset {}", config.input.display()))?;

    if let Some(dir) = charts_dir {
        let written = dashboard::render_individual_charts(&dataset, &config, &dir)
            .context("rendering individual charts")?;
        log::info!("Wrote {} charts to {}", written.len(), dir.display());
    }

    let output = dashboard::render_dashboard(&dataset, &config).context("rendering dashboard")?;
    log::info!("Dashboard written to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "power_dashboard",
            "--input",
            "data/energy.csv",
            "--output",
            "out/board.png",
            "--no-display",
            "--charts-dir",
            "out/charts",
        ]);
        let (config, charts_dir, print_config) = args.into_config().unwrap();

        assert_eq!(config.input, PathBuf::from("data/energy.csv"));
        assert_eq!(config.output, PathBuf::from("out/board.png"));
        assert!(!config.display);
        assert_eq!(charts_dir, Some(PathBuf::from("out/charts")));
        assert!(!print_config);
    }

    #[test]
    fn flags_win_over_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "input": "from_file.csv", "output": "from_file.png", "display": true }"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "power_dashboard",
            "--config",
            path.to_str().unwrap(),
            "--output",
            "from_flag.png",
        ]);
        let (config, _, _) = args.into_config().unwrap();

        assert_eq!(config.input, PathBuf::from("from_file.csv"));
        assert_eq!(config.output, PathBuf::from("from_flag.png"));
        assert!(config.display);
    }

    #[test]
    fn no_flags_keep_defaults() {
        let (config, charts_dir, _) = Args::parse_from(["power_dashboard"])
            .into_config()
            .unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert!(charts_dir.is_none());
    }
}
