use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::info;

const LOG_FILE_NAME: &str = "guidmark.log";
const OLD_LOG_FILE_NAME: &str = "guidmark.old.log";
const MAX_LOG_BYTES: u64 = 2 * 1024 * 1024;

static LOG_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Install the `env_logger` backend. Filter defaults to `info` and can be
/// changed through `RUST_LOG`. With `log_dir`, records are appended to
/// `guidmark.log` there instead of stderr. Only the first call has any effect.
pub fn init(log_dir: Option<&Path>) {
    LOG_PATH.get_or_init(|| {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{}] {:<5} {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });

        let log_path = log_dir.and_then(|dir| match open_log_file(dir) {
            Ok((path, file)) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
                Some(path)
            }
            Err(e) => {
                eprintln!("[guidmark] Could not open log file in {}: {}", dir.display(), e);
                None
            }
        });

        if builder.try_init().is_err() {
            return None;
        }

        info!("=== guidmark v{} started ===", env!("CARGO_PKG_VERSION"));
        info!("OS: {}", std::env::consts::OS);
        info!("Arch: {}", std::env::consts::ARCH);
        if let Some(path) = &log_path {
            info!("Log file: {}", path.display());
        }
        log_path
    });
}

/// Path of the active log file, if logging goes to one.
pub fn log_path() -> Option<String> {
    LOG_PATH
        .get()
        .and_then(|p| p.as_ref().map(|p| p.display().to_string()))
}

fn open_log_file(dir: &Path) -> std::io::Result<(PathBuf, std::fs::File)> {
    std::fs::create_dir_all(dir)?;
    let log_path = dir.join(LOG_FILE_NAME);
    rotate_if_large(&log_path, &dir.join(OLD_LOG_FILE_NAME), MAX_LOG_BYTES)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    Ok((log_path, file))
}

/// Move `path` to `old_path` once it grows past `max_bytes`. Returns whether it moved.
fn rotate_if_large(path: &Path, old_path: &Path, max_bytes: u64) -> std::io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > max_bytes => {
            std::fs::rename(path, old_path)?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
