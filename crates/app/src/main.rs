mod app;
mod sky_window;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use engine::{SkyConfig, render_snapshot};

use crate::app::App;

/// Arguments de la ligne de commande : `sky-viewer [CONFIG] [--snapshot OUT.png]`.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--snapshot" => {
                    let out = args.next().context("--snapshot expects an output path")?;
                    parsed.snapshot = Some(PathBuf::from(out));
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                path => {
                    if parsed.config.is_some() {
                        bail!("unexpected argument {path}");
                    }
                    parsed.config = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config_path = args
        .config
        .unwrap_or_else(|| PathBuf::from(SkyConfig::DEFAULT_PATH));

    let config = SkyConfig::load_or_default(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if let Some(out) = args.snapshot {
        render_snapshot(&config)
            .save_png(&out)
            .with_context(|| format!("writing snapshot {}", out.display()))?;
        log::info!("Snapshot written to {}", out.display());
        return Ok(());
    }

    let mut app = App::new(config);
    app.run()?;

    Ok(())
}
