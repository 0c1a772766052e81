//! typegrid - compute baseline-grid typography tokens from font files

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use typegrid::config::{self, Config, ConfigWatcher};
use typegrid::font::load_families;

/// Poll interval for --watch
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Print help message
fn print_help() {
    println!(
        r#"typegrid {} - baseline grid typography tokens

USAGE:
    typegrid [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -c, --config <PATH>     Config file to use
    -o, --out <PATH>        Write tokens here (overrides output.tokens)
    -w, --watch             Regenerate whenever the config file changes
    --init-config[=PATH]    Generate a commented config file
    -f, --force             Overwrite an existing config file

EXAMPLES:
    typegrid                               Print tokens for ./typegrid.toml
    typegrid -c site.toml -o tokens.json   Write tokens to a file
    typegrid --init-config=typegrid.toml   Generate a starter config
    typegrid --watch -o tokens.json        Rebuild on every save

CONFIG FILE (first found):
    --config, $TYPEGRID_CONFIG, ./typegrid.toml, ~/.config/typegrid/config.toml

Set RUST_LOG=info to see how font names were resolved.
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Value following a flag (`-o x`) or attached to it (`--out=x`)
fn flag_value(args: &[String], short: &str, long: &str) -> Result<Option<String>> {
    let prefix = format!("{}=", long);
    for (i, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Ok(Some(value.to_string()));
        }
        if arg == short || arg == long {
            return args
                .get(i + 1)
                .cloned()
                .map(Some)
                .ok_or_else(|| anyhow!("{} requires a value", long));
        }
    }
    Ok(None)
}

/// Load, validate and write tokens once
fn generate(explicit: Option<&Path>, out: Option<&Path>) -> Result<()> {
    let cfg = Config::load(explicit)?;
    cfg.validate()?;

    let families = load_families(&cfg);
    let tokens = typegrid::build_tokens(&cfg, &families)?;
    let json = tokens.to_json(cfg.output.pretty)?;

    let target = out
        .map(Path::to_path_buf)
        .or_else(|| (!cfg.output.tokens.is_empty()).then(|| cfg.base_dir().join(&cfg.output.tokens)));
    match target {
        Some(path) => {
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("Failed to write tokens: {}", path.display()))?;
            info!("Wrote {} tokens to {}", tokens.elements.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("typegrid {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    // --init-config or --init-config=PATH
    if let Some(arg) = args.iter().find(|a| a.starts_with("--init-config")) {
        let path = match arg.split_once('=') {
            Some((_, p)) if !p.is_empty() => PathBuf::from(p),
            _ => config::default_config_path()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?,
        };
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        let path = Config::write_default_config(&path, force)?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    let explicit = flag_value(&args, "-c", "--config")?.map(PathBuf::from);
    let out = flag_value(&args, "-o", "--out")?.map(PathBuf::from);
    let watch = args.iter().any(|a| a == "--watch" || a == "-w");

    if !watch {
        return generate(explicit.as_deref(), out.as_deref());
    }

    let config_path = Config::config_path(explicit.as_deref())
        .ok_or_else(|| anyhow!("--watch needs a config file (none found)"))?;
    let watcher = ConfigWatcher::new(&config_path)?;
    info!("Watching {}", config_path.display());

    // Errors while watching are reported and the previous output kept
    if let Err(e) = generate(Some(&config_path), out.as_deref()) {
        warn!("{:#}", e);
    }
    loop {
        std::thread::sleep(WATCH_POLL_INTERVAL);
        if watcher.check_reload() {
            info!("Config changed, regenerating");
            match generate(Some(&config_path), out.as_deref()) {
                Ok(()) => eprintln!("[OK] tokens regenerated"),
                Err(e) => eprintln!("Error: {:#}", e),
            }
        }
    }
}
