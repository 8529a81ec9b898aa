//! Listener configuration.
//!
//! Options deserialize from YAML or JSON. Both the snake_case field names and
//! the camelCase names used by JavaScript callers are accepted.

use crate::error::{ConfigError, ConfigResult};
use crate::event::EventGroup;
use crate::region::RegionRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which DOM event names belong to each group.
///
/// A group with an empty list is inactive: its events are never listened for
/// and are dropped if fed to a session directly.
///
/// A config that is present replaces the default as a whole; groups it leaves
/// out are empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default, alias = "mouseEvents")]
    pub mouse_events: Vec<String>,
    #[serde(default, alias = "touchEvents")]
    pub touch_events: Vec<String>,
    #[serde(default, alias = "focusEvents")]
    pub focus_events: Vec<String>,
    #[serde(default, alias = "keyboardEvents")]
    pub keyboard_events: Vec<String>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            mouse_events: vec!["mousedown".into()],
            touch_events: vec!["touchstart".into()],
            focus_events: Vec::new(),
            keyboard_events: Vec::new(),
        }
    }
}

impl EventConfig {
    /// No groups active.
    pub fn none() -> Self {
        Self {
            mouse_events: Vec::new(),
            touch_events: Vec::new(),
            focus_events: Vec::new(),
            keyboard_events: Vec::new(),
        }
    }

    pub fn names(&self, group: EventGroup) -> &[String] {
        match group {
            EventGroup::Pointer => &self.mouse_events,
            EventGroup::Touch => &self.touch_events,
            EventGroup::Focus => &self.focus_events,
            EventGroup::Keyboard => &self.keyboard_events,
        }
    }

    pub fn is_active(&self, group: EventGroup) -> bool {
        !self.names(group).is_empty()
    }

    /// Event names to register, in group order, each once.
    pub fn listener_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for group in EventGroup::ALL {
            for name in self.names(group) {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Names whose kind does not classify into the group they are listed under.
    /// Such events are listened for but never reach the callback through that group.
    pub fn unrecognized_names(&self) -> Vec<&str> {
        EventGroup::ALL
            .into_iter()
            .flat_map(move |group| {
                self.names(group)
                    .iter()
                    .filter(move |name| EventGroup::classify(name) != Some(group))
                    .map(String::as_str)
            })
            .collect()
    }

    pub fn with_mouse_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mouse_events = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_touch_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.touch_events = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_focus_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_events = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keyboard_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyboard_events = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Serializable listener options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerOptions {
    /// Drop every event and register no listeners.
    pub disabled: bool,

    #[serde(alias = "eventConfig")]
    pub event_config: EventConfig,

    /// Coalescing delay before the callback runs (milliseconds). 0 = immediate.
    #[serde(alias = "debounceTimeout")]
    pub debounce_timeout_ms: u64,

    /// Pointer movement allowed between events, in pixels. 0 disables the check.
    #[serde(alias = "clickTolerance")]
    pub click_tolerance: f64,

    /// Register no platform listeners; events are fed in by hand.
    #[serde(alias = "testMode")]
    pub test_mode: bool,
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            event_config: EventConfig::default(),
            debounce_timeout_ms: 0,
            click_tolerance: 5.0,
            test_mode: false,
        }
    }
}

impl ListenerOptions {
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let options: Self = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let options: Self = serde_yaml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.click_tolerance.is_finite() || self.click_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "click_tolerance must be a finite distance >= 0, got {}",
                self.click_tolerance
            )));
        }
        Ok(())
    }

    pub fn debounce_timeout(&self) -> Duration {
        Duration::from_millis(self.debounce_timeout_ms)
    }

    /// Whether platform listeners should be registered at all.
    pub fn registers_listeners(&self) -> bool {
        !self.disabled && !self.test_mode
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_event_config(mut self, event_config: EventConfig) -> Self {
        self.event_config = event_config;
        self
    }

    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_timeout_ms = ms;
        self
    }

    pub fn with_click_tolerance(mut self, tolerance: f64) -> Self {
        self.click_tolerance = tolerance;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

/// Full registration config: the serializable options plus the runtime
/// exclusion handles.
#[derive(Debug, Clone)]
pub struct ClickAwayConfig<N> {
    pub options: ListenerOptions,
    pub exclude: Vec<RegionRef<N>>,
}

impl<N> ClickAwayConfig<N> {
    pub fn new(options: ListenerOptions) -> Self {
        Self {
            options,
            exclude: Vec::new(),
        }
    }

    pub fn with_exclusions(mut self, exclude: Vec<RegionRef<N>>) -> Self {
        self.exclude = exclude;
        self
    }
}

impl<N> Default for ClickAwayConfig<N> {
    fn default() -> Self {
        Self::new(ListenerOptions::default())
    }
}

impl<N> From<ListenerOptions> for ClickAwayConfig<N> {
    fn from(options: ListenerOptions) -> Self {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ListenerOptions::default();
        assert!(!options.disabled);
        assert!(!options.test_mode);
        assert_eq!(options.click_tolerance, 5.0);
        assert_eq!(options.debounce_timeout(), Duration::ZERO);
        assert_eq!(options.event_config.listener_names(), vec!["mousedown", "touchstart"]);
        assert!(options.event_config.is_active(EventGroup::Pointer));
        assert!(!options.event_config.is_active(EventGroup::Keyboard));
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
debounce_timeout_ms: 200
event_config:
  mouse_events: [mouseup]
  keyboard_events: [keydown]
"#;
        let options = ListenerOptions::from_yaml(yaml).unwrap();
        assert_eq!(options.debounce_timeout(), Duration::from_millis(200));
        assert_eq!(options.click_tolerance, 5.0);
        // A present event_config replaces the default; omitted groups are empty.
        assert!(options.event_config.touch_events.is_empty());
        assert!(!options.event_config.is_active(EventGroup::Touch));
        assert_eq!(options.event_config.listener_names(), vec!["mouseup", "keydown"]);
    }

    #[test]
    fn test_absent_event_config_uses_defaults() {
        let options = ListenerOptions::from_json(r#"{ "debounceTimeout": 50 }"#).unwrap();
        assert_eq!(options.event_config, EventConfig::default());

        let options = ListenerOptions::from_json(r#"{ "eventConfig": {} }"#).unwrap();
        assert_eq!(options.event_config, EventConfig::none());
    }

    #[test]
    fn test_from_json_camel_case() {
        let json = r#"{
            "clickTolerance": 0,
            "testMode": true,
            "eventConfig": { "mouseEvents": ["click"], "touchEvents": [] }
        }"#;
        let options = ListenerOptions::from_json(json).unwrap();
        assert_eq!(options.click_tolerance, 0.0);
        assert!(options.test_mode);
        assert!(!options.registers_listeners());
        assert_eq!(options.event_config.listener_names(), vec!["click"]);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let err = ListenerOptions::from_json(r#"{ "click_tolerance": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(ListenerOptions::from_json("{ not json").is_err());
    }

    #[test]
    fn test_listener_names_dedup() {
        let config = EventConfig::none()
            .with_mouse_events(["mousedown", "mouseup", "mousedown"])
            .with_touch_events(["touchstart"]);
        assert_eq!(config.listener_names(), vec!["mousedown", "mouseup", "touchstart"]);
    }

    #[test]
    fn test_unrecognized_names() {
        let config = EventConfig::none()
            .with_mouse_events(["mousedown", "touchend"])
            .with_keyboard_events(["keypress"]);
        assert_eq!(config.unrecognized_names(), vec!["touchend", "keypress"]);
        assert!(EventConfig::default().unrecognized_names().is_empty());
    }

    #[test]
    fn test_empty_config_registers_nothing() {
        assert!(EventConfig::none().listener_names().is_empty());
        for group in EventGroup::ALL {
            assert!(!EventConfig::none().is_active(group));
        }
    }
}
