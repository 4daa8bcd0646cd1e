//! Per-frame label validation

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::dynamic_label::DynamicLabel;
use super::services::LabelServices;

/// Weak registry of labels validated once per frame
///
/// Labels are held weakly, so dropping the last strong handle removes a
/// label from the registry on the next update.
#[derive(Debug, Default)]
pub struct LabelTracker {
    labels: Vec<Weak<RefCell<DynamicLabel>>>,
}

impl LabelTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Start validating `label` every frame; tracking twice is a no-op
    pub fn track(&mut self, label: &Rc<RefCell<DynamicLabel>>) {
        let weak = Rc::downgrade(label);
        if !self.labels.iter().any(|tracked| tracked.ptr_eq(&weak)) {
            self.labels.push(weak);
        }
    }

    /// Stop validating `label`
    pub fn untrack(&mut self, label: &Rc<RefCell<DynamicLabel>>) {
        let weak = Rc::downgrade(label);
        self.labels.retain(|tracked| !tracked.ptr_eq(&weak));
    }

    /// Number of tracked labels, including ones dropped since the last update
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Validate every live label and forget dropped ones
    ///
    /// Returns the number of labels validated. A label that is borrowed
    /// elsewhere during the update is skipped until the next frame.
    pub fn update(&mut self, services: &mut LabelServices) -> usize {
        let mut validated = 0;

        for index in (0..self.labels.len()).rev() {
            let Some(label) = self.labels[index].upgrade() else {
                self.labels.swap_remove(index);
                continue;
            };

            let Ok(mut label) = label.try_borrow_mut() else {
                log::warn!("Label borrowed during validation; skipped this frame");
                continue;
            };
            label.validate(services);
            validated += 1;
        }

        validated
    }
}
