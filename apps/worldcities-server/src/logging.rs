use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

// -------- rotating writer for files --------
#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log writer poisoned").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().expect("log writer poisoned").flush()
    }
}

/// Resolve a log file path against `base_dir`. Absolute paths are kept
/// as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer(cfg: &LoggingConfig, base_dir: &Path) -> Option<RotWriter> {
    if cfg.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&cfg.file, base_dir);
    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("cannot create log directory {}: {e}", parent.display());
            return None;
        }
    }

    let max_bytes = cfg.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(cfg.max_backups.unwrap_or(3))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None, // file permissions (Unix only)
    );
    Some(RotWriter(Arc::new(Mutex::new(rot))))
}

/// Install the console layer and, when configured, the rotating file
/// layer. Safe to call more than once; later calls are no-ops.
pub fn init_logging(cfg: &LoggingConfig, base_dir: &Path) {
    let console_layer = parse_tracing_level(&cfg.console_level).map(|level| {
        fmt::layer()
            .with_target(true)
            .with_filter(LevelFilter::from_level(level))
    });

    let file_layer = parse_tracing_level(&cfg.file_level).and_then(|level| {
        create_rotating_writer(cfg, base_dir).map(|writer| {
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::from_level(level))
        })
    });

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
