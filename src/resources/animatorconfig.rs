//! Animator configuration resource.
//!
//! Manages sheet geometry, display placement, frame rates and action options
//! loaded from an INI configuration file. Defaults match the stock Memao sheet
//! so the animator runs without any file present.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sheet]
//! cell_width = 48
//! cell_height = 48
//! marker = _$(memao)
//! layout = ./assets/layout.json
//!
//! [display]
//! scale_pct = 150
//! crisp_pixels = true
//! x_offset = 0
//! y_offset = 5
//!
//! [timing]
//! ticks_per_second = 60
//! walk_fps = 7
//! idle_fps = 3
//! run_fps = 9
//! action_fps = 8
//! walk_hold_frames = 6
//! idle_hold_frames = 4
//! rescan_interval = 20
//!
//! [actions]
//! pingpong = water
//!
//! [aliases]
//! dig = hoe
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use rustc_hash::FxHashSet;

use crate::components::animationstate::ActionName;
use crate::resources::actionaliases::ActionAliases;

/// Default safe values for startup
const DEFAULT_CELL_WIDTH: u32 = 48;
const DEFAULT_CELL_HEIGHT: u32 = 48;
const DEFAULT_MARKER: &str = "_$(memao)";
const DEFAULT_SCALE_PCT: u32 = 150;
const DEFAULT_CRISP_PIXELS: bool = true;
const DEFAULT_X_OFFSET: f32 = 0.0;
const DEFAULT_Y_OFFSET: f32 = 5.0;
const DEFAULT_TICKS_PER_SECOND: u32 = 60;
const DEFAULT_WALK_FPS: u32 = 7;
const DEFAULT_IDLE_FPS: u32 = 3;
const DEFAULT_RUN_FPS: u32 = 9;
const DEFAULT_ACTION_FPS: u32 = 8;
const DEFAULT_WALK_HOLD_FRAMES: u32 = 6;
const DEFAULT_IDLE_HOLD_FRAMES: u32 = 4;
const DEFAULT_RESCAN_INTERVAL: u32 = 20;
const DEFAULT_PINGPONG_ACTION: &str = "water";
const DEFAULT_CONFIG_PATH: &str = "./memao.ini";

/// Animator configuration resource.
///
/// Read once at startup; systems treat it as static.
#[derive(Resource, Debug, Clone)]
pub struct AnimatorConfig {
    /// Width of one sheet cell in pixels.
    pub cell_width: u32,
    /// Height of one sheet cell in pixels.
    pub cell_height: u32,
    /// Case-insensitive suffix marking a character graphic as Memao-style.
    pub marker: String,
    /// Optional JSON override for the sheet layout.
    pub layout_path: Option<PathBuf>,
    /// Display scale in percent (150 = 1.5x).
    pub scale_pct: u32,
    /// Round the sprite position to whole pixels.
    pub crisp_pixels: bool,
    pub x_offset: f32,
    /// Vertical offset, applied after scaling.
    pub y_offset: f32,
    /// Render ticks per second the animator is driven at.
    pub ticks_per_second: u32,
    pub walk_fps: u32,
    pub idle_fps: u32,
    pub run_fps: u32,
    pub action_fps: u32,
    /// Ticks a character keeps counting as moving after movement stops.
    pub walk_hold_frames: u32,
    /// Extra copies of the first idle frame.
    pub idle_hold_frames: u32,
    /// Ticks between graphic re-scans.
    pub rescan_interval: u32,
    /// Actions played forward then backward.
    pub pingpong_actions: FxHashSet<String>,
    /// Extra (alias, canonical) pairs from the `[aliases]` section.
    pub aliases: Vec<(String, String)>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        let mut pingpong_actions = FxHashSet::default();
        pingpong_actions.insert(DEFAULT_PINGPONG_ACTION.to_string());
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            marker: DEFAULT_MARKER.to_string(),
            layout_path: None,
            scale_pct: DEFAULT_SCALE_PCT,
            crisp_pixels: DEFAULT_CRISP_PIXELS,
            x_offset: DEFAULT_X_OFFSET,
            y_offset: DEFAULT_Y_OFFSET,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            walk_fps: DEFAULT_WALK_FPS,
            idle_fps: DEFAULT_IDLE_FPS,
            run_fps: DEFAULT_RUN_FPS,
            action_fps: DEFAULT_ACTION_FPS,
            walk_hold_frames: DEFAULT_WALK_HOLD_FRAMES,
            idle_hold_frames: DEFAULT_IDLE_HOLD_FRAMES,
            rescan_interval: DEFAULT_RESCAN_INTERVAL,
            pingpong_actions,
            aliases: Vec::new(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [sheet] section
        if let Some(w) = read_uint(config, "sheet", "cell_width") {
            self.cell_width = w;
        }
        if let Some(h) = read_uint(config, "sheet", "cell_height") {
            self.cell_height = h;
        }
        if let Some(marker) = config.get("sheet", "marker") {
            self.marker = marker;
        }
        if let Some(layout) = config.get("sheet", "layout") {
            self.layout_path = Some(PathBuf::from(layout));
        }

        // [display] section
        if let Some(scale) = read_uint(config, "display", "scale_pct") {
            self.scale_pct = scale;
        }
        if let Some(crisp) = config.getbool("display", "crisp_pixels").ok().flatten() {
            self.crisp_pixels = crisp;
        }
        if let Some(x) = config.getfloat("display", "x_offset").ok().flatten() {
            self.x_offset = x as f32;
        }
        if let Some(y) = config.getfloat("display", "y_offset").ok().flatten() {
            self.y_offset = y as f32;
        }

        // [timing] section
        if let Some(tps) = read_uint(config, "timing", "ticks_per_second") {
            self.ticks_per_second = tps;
        }
        if let Some(fps) = read_uint(config, "timing", "walk_fps") {
            self.walk_fps = fps;
        }
        if let Some(fps) = read_uint(config, "timing", "idle_fps") {
            self.idle_fps = fps;
        }
        if let Some(fps) = read_uint(config, "timing", "run_fps") {
            self.run_fps = fps;
        }
        if let Some(fps) = read_uint(config, "timing", "action_fps") {
            self.action_fps = fps;
        }
        if let Some(hold) = read_uint(config, "timing", "walk_hold_frames") {
            self.walk_hold_frames = hold;
        }
        if let Some(hold) = read_uint(config, "timing", "idle_hold_frames") {
            self.idle_hold_frames = hold;
        }
        if let Some(interval) = read_uint(config, "timing", "rescan_interval") {
            self.rescan_interval = interval;
        }

        // [actions] section
        if let Some(list) = config.get("actions", "pingpong") {
            self.pingpong_actions = list
                .split(',')
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // [aliases] section
        if let Some(section) = config.get_map_ref().get("aliases") {
            for (alias, canonical) in section {
                match canonical {
                    Some(canonical) if !canonical.trim().is_empty() => {
                        self.aliases.push((alias.clone(), canonical.trim().to_string()));
                    }
                    _ => warn!("Alias '{}' has no target action, ignored", alias),
                }
            }
        }

        info!(
            "Loaded config: {}x{} cells, scale={}%, fps walk/idle/run/action={}/{}/{}/{}, tps={}",
            self.cell_width,
            self.cell_height,
            self.scale_pct,
            self.walk_fps,
            self.idle_fps,
            self.run_fps,
            self.action_fps,
            self.ticks_per_second
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("sheet", "cell_width", Some(self.cell_width.to_string()));
        config.set("sheet", "cell_height", Some(self.cell_height.to_string()));
        config.set("sheet", "marker", Some(self.marker.clone()));
        if let Some(layout) = &self.layout_path {
            config.set("sheet", "layout", Some(layout.display().to_string()));
        }

        config.set("display", "scale_pct", Some(self.scale_pct.to_string()));
        config.set("display", "crisp_pixels", Some(self.crisp_pixels.to_string()));
        config.set("display", "x_offset", Some(self.x_offset.to_string()));
        config.set("display", "y_offset", Some(self.y_offset.to_string()));

        let timing = [
            ("ticks_per_second", self.ticks_per_second),
            ("walk_fps", self.walk_fps),
            ("idle_fps", self.idle_fps),
            ("run_fps", self.run_fps),
            ("action_fps", self.action_fps),
            ("walk_hold_frames", self.walk_hold_frames),
            ("idle_hold_frames", self.idle_hold_frames),
            ("rescan_interval", self.rescan_interval),
        ];
        for (key, value) in timing {
            config.set("timing", key, Some(value.to_string()));
        }

        let mut pingpong: Vec<&str> = self.pingpong_actions.iter().map(String::as_str).collect();
        pingpong.sort_unstable();
        config.set("actions", "pingpong", Some(pingpong.join(",")));

        for (alias, canonical) in &self.aliases {
            config.set("aliases", alias, Some(canonical.clone()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Display scale as a factor.
    pub fn scale(&self) -> f32 {
        self.scale_pct as f32 / 100.0
    }

    pub fn y_offset_scaled(&self) -> f32 {
        self.y_offset * self.scale()
    }

    /// Ticks each frame stays on screen at `fps`, never below one.
    pub fn ticks_per_frame(&self, fps: u32) -> f32 {
        (self.ticks_per_second as f32 / fps.max(1) as f32).max(1.0)
    }

    pub fn is_pingpong(&self, action: &ActionName) -> bool {
        self.pingpong_actions.contains(action.as_str())
    }

    /// Whether a character graphic name carries the Memao marker.
    pub fn is_memao_name(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.marker.to_lowercase())
    }

    /// Stock aliases extended with the configured ones.
    pub fn build_aliases(&self) -> ActionAliases {
        let mut aliases = ActionAliases::default();
        for (alias, canonical) in &self.aliases {
            aliases.insert(alias, canonical);
        }
        aliases
    }
}

fn read_uint(config: &Ini, section: &str, key: &str) -> Option<u32> {
    match config.getuint(section, key) {
        Ok(Some(value)) => match u32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring [{}] {}: {} is out of range", section, key, value);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Ignoring [{}] {}: {}", section, key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_sheet() {
        let config = AnimatorConfig::new();
        assert_eq!((config.cell_width, config.cell_height), (48, 48));
        assert_eq!(config.walk_fps, 7);
        assert_eq!(config.idle_fps, 3);
        assert_eq!(config.run_fps, 9);
        assert_eq!(config.action_fps, 8);
        assert!(config.is_pingpong(&ActionName::new("water")));
        assert!(!config.is_pingpong(&ActionName::new("hoe")));
    }

    #[test]
    fn test_load_from_str_overrides_and_keeps_defaults() {
        let mut config = AnimatorConfig::new();
        config
            .load_from_str(
                "[sheet]\ncell_width = 32\nlayout = custom.json\n\
                 [timing]\nidle_fps = 4\n\
                 [actions]\npingpong = Water, hoe\n\
                 [aliases]\ndig = hoe\n",
            )
            .unwrap();
        assert_eq!(config.cell_width, 32);
        assert_eq!(config.cell_height, 48);
        assert_eq!(config.idle_fps, 4);
        assert_eq!(config.walk_fps, 7);
        assert_eq!(config.layout_path, Some(PathBuf::from("custom.json")));
        assert!(config.is_pingpong(&ActionName::new("water")));
        assert!(config.is_pingpong(&ActionName::new("hoe")));
        assert_eq!(config.build_aliases().normalize("Dig").as_str(), "hoe");
    }

    #[test]
    fn test_out_of_range_uint_keeps_default() {
        let mut config = AnimatorConfig::new();
        config
            .load_from_str("[timing]\nwalk_fps = 4294967303\nidle_fps = 5\n")
            .unwrap();
        assert_eq!(config.walk_fps, 7);
        assert_eq!(config.idle_fps, 5);
    }

    #[test]
    fn test_ticks_per_frame() {
        let config = AnimatorConfig::new();
        assert_eq!(config.ticks_per_frame(3), 20.0);
        assert_eq!(config.ticks_per_frame(0), 60.0);
        assert_eq!(config.ticks_per_frame(240), 1.0);
    }

    #[test]
    fn test_memao_marker_is_case_insensitive_suffix() {
        let config = AnimatorConfig::new();
        assert!(config.is_memao_name("teo_$(memao)"));
        assert!(config.is_memao_name("$Teo_$(MEMAO)"));
        assert!(!config.is_memao_name("teo_$(memao).old"));
        assert!(!config.is_memao_name("Actor1"));
    }

    #[test]
    fn test_scale_and_offsets() {
        let config = AnimatorConfig::new();
        assert!((config.scale() - 1.5).abs() < f32::EPSILON);
        assert!((config.y_offset_scaled() - 7.5).abs() < f32::EPSILON);
    }
}
