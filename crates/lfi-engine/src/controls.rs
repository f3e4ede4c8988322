//! Descriptions of the selection controls a host renders.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

pub const TOPIC_CONTROL: &str = "measures";
pub const CLASSIFICATION_CONTROL: &str = "classification";
pub const REGION_CONTROL: &str = "region";
pub const REGION_TYPE_CONTROL: &str = "region-type";

/// Control id of the filter for persisted key `key`.
pub fn filter_control_id(key: &str) -> String {
    format!("{key}-filter")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOption {
    pub value: String,
    pub label: String,
    /// Option group heading (region control only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlSpec {
    pub id: String,
    pub label: String,
    pub options: Vec<ControlOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    pub searchable: bool,
    /// A control with at most one choice is shown but not interactive.
    pub disabled: bool,
}

impl ControlSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Vec<ControlOption>) -> Self {
        let disabled = options.len() <= 1;
        Self {
            id: id.into(),
            label: label.into(),
            options,
            selected: None,
            searchable: false,
            disabled,
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn with_selected(mut self, value: impl Into<String>) -> Self {
        self.selected = Some(value.into());
        self
    }
}

/// Capability to render selectable controls and move their selection.
pub trait ControlSurface: Send {
    /// Create or replace a control.
    fn populate(&mut self, spec: ControlSpec);
    /// Move a control's selection without notifying back.
    fn select(&mut self, control: &str, value: &str);
    /// Show or hide a control.
    fn set_visible(&mut self, control: &str, visible: bool);
}

/// Surface for headless sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullControls;

impl ControlSurface for NullControls {
    fn populate(&mut self, _spec: ControlSpec) {}

    fn select(&mut self, _control: &str, _value: &str) {}

    fn set_visible(&mut self, _control: &str, _visible: bool) {}
}

#[derive(Debug, Default)]
struct RecordedControls {
    specs: BTreeMap<String, ControlSpec>,
    selections: Vec<(String, String)>,
    visible: BTreeMap<String, bool>,
}

/// Keeps the latest spec per control and every selection. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingControls {
    inner: Arc<Mutex<RecordedControls>>,
}

impl RecordingControls {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RecordedControls> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn spec(&self, id: &str) -> Option<ControlSpec> {
        self.lock().specs.get(id).cloned()
    }

    pub fn specs(&self) -> Vec<ControlSpec> {
        self.lock().specs.values().cloned().collect()
    }

    pub fn selections(&self) -> Vec<(String, String)> {
        self.lock().selections.clone()
    }

    /// Last visibility reported for a control; `None` if it was never reported.
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.lock().visible.get(id).copied()
    }

    /// Value a control currently shows: the last selection, else the selection of its `ControlSpec`.
    pub fn current(&self, id: &str) -> Option<String> {
        let inner = self.lock();
        inner
            .selections
            .iter()
            .rev()
            .find(|(control, _)| control == id)
            .map(|(_, value)| value.clone())
            .or_else(|| inner.specs.get(id).and_then(|s| s.selected.clone()))
    }
}

impl ControlSurface for RecordingControls {
    fn populate(&mut self, spec: ControlSpec) {
        let mut inner = self.lock();
        inner.selections.retain(|(control, _)| *control != spec.id);
        inner.specs.insert(spec.id.clone(), spec);
    }

    fn select(&mut self, control: &str, value: &str) {
        self.lock()
            .selections
            .push((control.to_string(), value.to_string()));
    }

    fn set_visible(&mut self, control: &str, visible: bool) {
        self.lock().visible.insert(control.to_string(), visible);
    }
}
