use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Result,
    overlay::{dismiss::DismissConfig, placement::Placement, trigger::Trigger},
};

/// Stage-wide defaults. Every field may be omitted from a settings file;
/// missing fields take their default value. Per-overlay options override
/// these at mount time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay between pointer-leave and close in hover mode.
    pub hover_leave_delay_ms: u64,
    /// Exit transition length before a closed static instance is unmounted.
    pub exit_delay_ms: u64,
    /// Gap between reference and content, in cells.
    pub offset: u32,
    /// Close on Escape.
    pub close_on_esc: bool,
    /// Close on outside pointer-down.
    pub close_on_backdrop: bool,
    /// Default placement.
    pub placement: Placement,
    /// Default trigger mode.
    pub trigger: Trigger,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hover_leave_delay_ms: 100,
            exit_delay_ms: 150,
            offset: 1,
            close_on_esc: true,
            close_on_backdrop: true,
            placement: Placement::Top,
            trigger: Trigger::Click,
        }
    }
}

impl Settings {
    /// Parse settings from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), ?settings, "settings loaded");
        Ok(settings)
    }

    /// Hover leave delay.
    pub fn hover_leave_delay(&self) -> Duration {
        Duration::from_millis(self.hover_leave_delay_ms)
    }

    /// Exit transition length.
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    /// Default dismissal gates.
    pub fn dismiss(&self) -> DismissConfig {
        DismissConfig {
            close_on_backdrop: self.close_on_backdrop,
            close_on_esc: self.close_on_esc,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_fields_take_defaults() {
        let s = Settings::from_json(r#"{"trigger": "hover", "placement": "right-end"}"#).unwrap();
        assert_eq!(s.trigger, Trigger::Hover);
        assert_eq!(s.placement, Placement::RightEnd);
        assert_eq!(s.hover_leave_delay(), Duration::from_millis(100));
        assert_eq!(s.exit_delay_ms, 150);
        assert!(s.dismiss().close_on_esc);

        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn bad_input_is_a_config_error() {
        assert!(matches!(
            Settings::from_json(r#"{"trigger": "sideways"}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::load("/nonexistent/parasol/settings.json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let path = env::temp_dir().join(format!("parasol-settings-{}.json", process::id()));
        fs::write(&path, r#"{"offset": 3, "close_on_backdrop": false}"#).unwrap();
        let s = Settings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(s.offset, 3);
        assert!(!s.dismiss().close_on_backdrop);
        assert!(s.dismiss().close_on_esc);
    }
}
