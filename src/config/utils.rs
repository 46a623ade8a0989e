#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;

use std::{
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::Local;
use eyre::{Context, Result};
use log::{LevelFilter, Record};
use regex::{Captures, Regex};

use super::{
    APP_NAME, Configuration, LogConfig,
    constants::{API_KEY_ENV, LOG_ENV},
};

/// Load the configuration at `path`, or the first file found by
/// [`lookup_config_path`] when no path is given. Without any file the
/// defaults are used. Environment fallbacks are applied in every case.
pub fn load_or_default(path: Option<&str>) -> Result<Configuration> {
    let path = path.map(PathBuf::from).or_else(lookup_config_path);
    let mut config = match path {
        Some(path) => load_configuration(&path)?,
        None => Configuration::default(),
    };
    apply_env(&mut config);
    Ok(config)
}

pub fn load_configuration(path: &Path) -> Result<Configuration> {
    let raw = std::fs::read_to_string(path).wrap_err(format!("reading {}", path.display()))?;
    toml::from_str(&raw).wrap_err(format!("parsing {}", path.display()))
}

/// A blank `api_key` counts as unset. An unset key is taken from
/// `GEMINI_API_KEY`.
pub fn apply_env(config: &mut Configuration) {
    let configured = config.backend.api_key.take().filter(|key| !key.trim().is_empty());
    config.backend.api_key = configured.or_else(|| {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
    });
}

/// Route `log` records into the configured file. `GEMCHAT_LOG` uses the
/// `env_logger` filter syntax and overrides the configured levels.
pub fn init_logger(config: &LogConfig) -> Result<()> {
    let path = resolve_path(&config.file.path)?;
    ensure_parent_dir(&path)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .append(config.file.append)
        .truncate(!config.file.append)
        .open(&path)
        .wrap_err(format!("opening log file {}", path))?;

    let level = LevelFilter::from_str(config.level.as_deref().unwrap_or("info"))
        .wrap_err("parsing log level")?;

    let mut builder = env_logger::Builder::new();
    builder.filter(None, level);
    for filter in config.filters.iter().flatten() {
        let module_level = match filter.level.as_deref() {
            Some(raw) => LevelFilter::from_str(raw)
                .wrap_err(format!("parsing log level of {:?}", filter.module))?,
            None => level,
        };
        let module = filter.module.as_deref().map(qualify_module);
        builder.filter(module.as_deref(), module_level);
    }
    builder.parse_env(env_logger::Env::new().filter(LOG_ENV));

    builder
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
            writeln!(buf, "{}", format_record(record, &timestamp))
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .try_init()
        .wrap_err("installing logger")
}

/// `<timestamp> <LEVEL> [<module>] <message>`. The crate prefix is dropped
/// from our own modules, others keep their full path.
fn format_record(record: &Record<'_>, timestamp: &str) -> String {
    let target = record.target();
    let module = target
        .strip_prefix(APP_NAME)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(target);
    format!(
        "{} {:<5} [{}] {}",
        timestamp,
        record.level(),
        module,
        record.args()
    )
}

/// Filters may name our modules without the crate prefix, e.g. `backend`.
fn qualify_module(module: &str) -> String {
    if module == APP_NAME || module.starts_with(&format!("{}::", APP_NAME)) {
        module.to_string()
    } else {
        format!("{}::{}", APP_NAME, module)
    }
}

/// Expand `~/`, `$VAR` and `${VAR}` and make the result absolute. Unset
/// variables expand to nothing.
pub fn resolve_path(path: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .wrap_err("compiling env var pattern")?;
    let expanded = pattern.replace_all(path, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_default()
    });

    let expanded = match expanded.strip_prefix("~/") {
        Some(rest) => format!("{}/{}", std::env::var("HOME").unwrap_or_default(), rest),
        None => expanded.into_owned(),
    };

    let absolute =
        std::path::absolute(&expanded).wrap_err(format!("resolving path {}", expanded))?;
    Ok(absolute.to_string_lossy().into_owned())
}

/// Places searched for a configuration file, most specific first. Locations
/// whose environment variable is unset are left out.
pub fn config_candidates() -> Vec<PathBuf> {
    let xdg = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);

    let mut candidates = vec![];
    if let Some(xdg) = xdg {
        candidates.push(xdg.join(APP_NAME).join("config.toml"));
    }
    if let Some(home) = home {
        candidates.push(home.join(".config").join(APP_NAME).join("config.toml"));
        candidates.push(home.join(format!(".{}.toml", APP_NAME)));
    }
    candidates
}

pub fn lookup_config_path() -> Option<PathBuf> {
    config_candidates().into_iter().find(|path| path.is_file())
}

pub(crate) fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        std::fs::create_dir_all(dir).wrap_err(format!("creating directory {}", dir.display()))?;
    }
    Ok(())
}
