use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, qr::QrParams, Result};

/// Typed configuration for the plugin core.
///
/// Everything is read from the environment (with an optional `.env` file) so
/// host processes can run the plugin without a config file format of its own.
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory all ephemeral image files live in.
    pub temp_dir: PathBuf,

    /// Wait before the first deferred deletion attempt.
    pub cleanup_initial_delay: Duration,
    /// Wait between a failed deletion attempt and the single retry.
    pub cleanup_retry_delay: Duration,

    /// Whether the decode command is served in this deployment.
    pub decode_enabled: bool,

    /// QR symbol version and module pixel size.
    pub qr: QrParams,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let temp_dir =
            env_path("QRBOT_TEMP_DIR").unwrap_or_else(|| env::temp_dir().join("qrbot"));

        let cleanup_initial_delay =
            Duration::from_millis(env_u64("QRBOT_CLEANUP_INITIAL_DELAY_MS").unwrap_or(1_000));
        let cleanup_retry_delay =
            Duration::from_millis(env_u64("QRBOT_CLEANUP_RETRY_DELAY_MS").unwrap_or(2_000));

        let decode_enabled = env_bool("QRBOT_DECODE_ENABLED").unwrap_or(true);

        let version = env_u8("QRBOT_QR_VERSION").unwrap_or(1);
        if !(1..=40).contains(&version) {
            return Err(Error::Config(format!(
                "QRBOT_QR_VERSION must be between 1 and 40, got {version}"
            )));
        }

        let module_px = env_u32("QRBOT_QR_MODULE_PX").unwrap_or(10);
        if module_px == 0 {
            return Err(Error::Config(
                "QRBOT_QR_MODULE_PX must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            temp_dir,
            cleanup_initial_delay,
            cleanup_retry_delay,
            decode_enabled,
            qr: QrParams { version, module_px },
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| {
        matches!(
            s.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_u8(key: &str) -> Option<u8> {
    env_str(key).and_then(|s| s.trim().parse::<u8>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}
