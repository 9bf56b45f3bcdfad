//! Configuration loading and parsing.
//!
//! Parses `quadgrid.toml` (or an override path provided by the binary):
//! * `[drag]` edge proximity thresholds in layout units (pixels),
//! * `[terminal]` how many layout units one terminal cell spans,
//! * `[panels.<slot>]` title and optional text source per panel slot.
//!
//! `load_from` is lenient: a missing file or parse error yields defaults (the
//! parse error is logged). `load_strict` surfaces a typed `ConfigError` so
//! `--check-config` can report it. Unknown fields are ignored.
//!
//! Raw thresholds are retained; `Config::apply_context` derives effective
//! ones for the current terminal so a resize can re-clamp.

use anyhow::Result;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "quadgrid.toml";
pub const DEFAULT_THRESHOLD: f64 = 15.0;
pub const DEFAULT_CELL_WIDTH: f64 = 8.0;
pub const DEFAULT_CELL_HEIGHT: f64 = 16.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for `{field}`: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Terminal dimensions the effective thresholds are derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_columns: u16,
    pub viewport_rows: u16,
    pub toolbar_rows: u16,
    pub status_rows: u16,
}

impl ConfigContext {
    pub fn new(viewport_columns: u16, viewport_rows: u16, toolbar_rows: u16, status_rows: u16) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
            toolbar_rows,
            status_rows,
        }
    }

    /// Rows left for the panel grid.
    pub fn grid_rows(&self) -> u16 {
        let reserved = self.toolbar_rows.saturating_add(self.status_rows);
        self.viewport_rows.saturating_sub(reserved)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DragConfig {
    #[serde(default = "DragConfig::default_threshold")]
    pub mouse_threshold: f64,
    #[serde(default = "DragConfig::default_threshold")]
    pub touch_threshold: f64,
    #[serde(default = "DragConfig::default_threshold")]
    pub hover_threshold: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            mouse_threshold: DEFAULT_THRESHOLD,
            touch_threshold: DEFAULT_THRESHOLD,
            hover_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl DragConfig {
    const fn default_threshold() -> f64 {
        DEFAULT_THRESHOLD
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TerminalConfig {
    #[serde(default = "TerminalConfig::default_cell_width")]
    pub cell_width: f64,
    #[serde(default = "TerminalConfig::default_cell_height")]
    pub cell_height: f64,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
        }
    }
}

impl TerminalConfig {
    const fn default_cell_width() -> f64 {
        DEFAULT_CELL_WIDTH
    }
    const fn default_cell_height() -> f64 {
        DEFAULT_CELL_HEIGHT
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct PanelConfig {
    #[serde(default)]
    pub title: Option<String>,
    /// Text file shown in the panel.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct PanelsConfig {
    #[serde(default)]
    pub top_left: PanelConfig,
    #[serde(default)]
    pub top_right: PanelConfig,
    #[serde(default)]
    pub bottom_left: PanelConfig,
    #[serde(default)]
    pub bottom_right: PanelConfig,
}

impl PanelsConfig {
    /// Slot order: top-left, top-right, bottom-left, bottom-right.
    pub fn in_slot_order(&self) -> [&PanelConfig; 4] {
        [
            &self.top_left,
            &self.top_right,
            &self.bottom_left,
            &self.bottom_right,
        ]
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub drag: DragConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub panels: PanelsConfig,
}

impl ConfigFile {
    /// Reject values no host could use (non-finite, negative thresholds,
    /// non-positive cell sizes).
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let thresholds = [
            ("drag.mouse_threshold", self.drag.mouse_threshold),
            ("drag.touch_threshold", self.drag.touch_threshold),
            ("drag.hover_threshold", self.drag.hover_threshold),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    value,
                    reason: "expected a finite, non-negative number",
                });
            }
        }
        let cells = [
            ("terminal.cell_width", self.terminal.cell_width),
            ("terminal.cell_height", self.terminal.cell_height),
        ];
        for (field, value) in cells {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    value,
                    reason: "expected a finite, positive number",
                });
            }
        }
        Ok(())
    }
}

/// Thresholds after context clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveThresholds {
    pub mouse: f64,
    pub touch: f64,
    pub hover: f64,
}

impl Default for EffectiveThresholds {
    fn default() -> Self {
        Self {
            mouse: DEFAULT_THRESHOLD,
            touch: DEFAULT_THRESHOLD,
            hover: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub path: Option<PathBuf>,
    pub effective: EffectiveThresholds,
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quadgrid").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Lenient load: any problem falls back to defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match parse(&path, &content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
            path: Some(path),
            effective: EffectiveThresholds::default(), // computed later
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_fallback_defaults");
            Ok(Config::default())
        }
    }
}

/// Strict load used by `--check-config`: a missing file, parse error or
/// invalid value is an error.
pub fn load_strict(path: Option<PathBuf>) -> std::result::Result<Config, ConfigError> {
    let path = path.unwrap_or_else(discover);
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let file = parse(&path, &content)?;
    Ok(Config {
        raw: Some(content),
        file,
        path: Some(path),
        effective: EffectiveThresholds::default(),
    })
}

fn parse(path: &Path, content: &str) -> std::result::Result<ConfigFile, ConfigError> {
    let file = toml::from_str::<ConfigFile>(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    file.validate()?;
    Ok(file)
}

impl Config {
    /// Smallest threshold that keeps a divider grabbable: every cell center
    /// within half a cell of the divider must fall strictly inside it.
    pub fn min_grab_threshold(&self) -> f64 {
        self.file
            .terminal
            .cell_width
            .max(self.file.terminal.cell_height)
            / 2.0
            + 1.0
    }

    /// Derive effective thresholds for the current terminal. Each threshold is
    /// raised to `min_grab_threshold` and capped at a quarter of the smaller
    /// grid dimension (never below the grab minimum). Returns the result.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> EffectiveThresholds {
        let min = self.min_grab_threshold();
        let grid_width = f64::from(ctx.viewport_columns) * self.file.terminal.cell_width;
        let grid_height = f64::from(ctx.grid_rows()) * self.file.terminal.cell_height;
        let max = (grid_width.min(grid_height) / 4.0).max(min);
        let raw = &self.file.drag;
        let mut clamp = |name: &'static str, value: f64| -> f64 {
            let clamped = value.clamp(min, max);
            if clamped != value {
                info!(
                    target: "config",
                    threshold = name,
                    raw = value,
                    clamped,
                    min,
                    max,
                    viewport_columns = ctx.viewport_columns,
                    viewport_rows = ctx.viewport_rows,
                    grid_rows = ctx.grid_rows(),
                    "drag_threshold_clamped"
                );
            }
            clamped
        };
        let effective = EffectiveThresholds {
            mouse: clamp("mouse", raw.mouse_threshold),
            touch: clamp("touch", raw.touch_threshold),
            hover: clamp("hover", raw.hover_threshold),
        };
        self.effective = effective;
        effective
    }

    /// Recompute on a terminal resize. Returns `Some(new)` when the effective
    /// thresholds changed, else `None`.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<EffectiveThresholds> {
        let prev = self.effective;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    fn roomy() -> ConfigContext {
        ConfigContext::new(120, 42, 1, 1)
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let mut cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.apply_context(roomy()), EffectiveThresholds::default());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            "[drag]\nmouse_threshold = 20.0\ntouch_threshold = 30.0\n\
             [terminal]\ncell_width = 10.0\ncell_height = 20.0\n\
             [panels.top_left]\ntitle = \"Notes\"\nsource = \"notes.txt\"\n\
             [panels.bottom_right]\ntitle = \"Summary\"\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.drag.mouse_threshold, 20.0);
        assert_eq!(cfg.file.drag.touch_threshold, 30.0);
        assert_eq!(cfg.file.drag.hover_threshold, DEFAULT_THRESHOLD);
        assert_eq!(cfg.file.terminal.cell_width, 10.0);
        assert_eq!(cfg.file.panels.top_left.title.as_deref(), Some("Notes"));
        assert_eq!(
            cfg.file.panels.top_left.source,
            Some(PathBuf::from("notes.txt"))
        );
        let order = cfg.file.panels.in_slot_order();
        assert_eq!(order[3].title.as_deref(), Some("Summary"));
        assert!(order[1].title.is_none());
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = write_config("[drag]\nmouse_threshold = 12.0\nfancy = true\n[extra]\nx = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.drag.mouse_threshold, 12.0);
    }

    #[test]
    fn parse_error_falls_back_to_defaults_but_strict_reports_it() {
        let tmp = write_config("[drag\nmouse_threshold = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        let err = load_strict(Some(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn strict_rejects_invalid_values_and_missing_file() {
        let tmp = write_config("[terminal]\ncell_width = 0.0\n");
        let err = load_strict(Some(tmp.path().to_path_buf())).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "terminal.cell_width"),
            other => panic!("unexpected error: {other}"),
        }
        let tmp = write_config("[drag]\nhover_threshold = -1.0\n");
        assert!(load_strict(Some(tmp.path().to_path_buf())).is_err());
        let missing = load_strict(Some(PathBuf::from("__missing_quadgrid__.toml")));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn small_threshold_is_raised_to_grab_minimum() {
        let tmp = write_config("[drag]\nmouse_threshold = 2.0\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        // 8x16 cells: half the taller dimension plus one.
        let eff = cfg.apply_context(roomy());
        assert_eq!(eff.mouse, 9.0);
        assert_eq!(eff.touch, DEFAULT_THRESHOLD);
    }

    #[test]
    fn tiny_grid_caps_large_threshold() {
        let tmp = write_config("[drag]\ntouch_threshold = 200.0\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.apply_context(roomy()).touch, 200.0);
        // 20 cols x 10 grid rows -> 160 x 160 px -> cap 40.
        let changed = cfg.recompute_with_context(ConfigContext::new(20, 12, 1, 1));
        assert_eq!(changed.map(|e| e.touch), Some(40.0));
        assert_eq!(cfg.recompute_with_context(ConfigContext::new(20, 12, 1, 1)), None);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[drag]\nhover_threshold = 1.0\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            cfg.apply_context(roomy());
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("drag_threshold_clamped"));
        assert_eq!(cfg.effective.hover, 9.0);
    }
}
