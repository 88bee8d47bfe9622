//! Undo hook.

use meshpick_core::ObjectId;

/// Receives a notification before the tool mutates any selection.
///
/// Hosts snapshot whatever they need for the named objects; the tool never
/// reads anything back.
pub trait UndoRecorder {
    /// Called once per user action, before the selection changes.
    fn record_selection(&mut self, label: &str, objects: &[ObjectId]);
}

/// A recorder that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl UndoRecorder for NullRecorder {
    fn record_selection(&mut self, _label: &str, _objects: &[ObjectId]) {}
}

/// A recorder that keeps every label and object list it receives.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    entries: Vec<(String, Vec<ObjectId>)>,
}

impl UndoLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> &[(String, Vec<ObjectId>)] {
        &self.entries
    }

    /// Labels of the recorded entries, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Forgets every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl UndoRecorder for UndoLog {
    fn record_selection(&mut self, label: &str, objects: &[ObjectId]) {
        log::trace!("undo: {label} over {} objects", objects.len());
        self.entries.push((label.to_string(), objects.to_vec()));
    }
}
