use std::any::Any;
use std::sync::mpsc;

use eframe::egui;

/// Fan-out half of a change notification: every registered subscriber gets
/// one payload-less message per emission. Senders whose receiver is gone are
/// simply ignored; rows die together with their listeners.
pub struct ChangeSignal {
    subscribers: Vec<mpsc::Sender<()>>,
}

impl ChangeSignal {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn connect(&mut self, tx: mpsc::Sender<()>) {
        self.subscribers.push(tx);
    }

    pub fn emit(&self) {
        for tx in &self.subscribers {
            let _ = tx.send(());
        }
    }
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One input widget inside a filter row. Elements expose their own state and
/// a local change signal; they never know about rows or the panel.
pub trait FilterElement {
    /// Per-frame rendering. Emits change signals from within when the user
    /// edits the value.
    fn show(&mut self, ui: &mut egui::Ui);

    /// Current value(s) as an ordered sequence of strings: the chosen subset
    /// for multi-selects, `[start, end]` for the date range.
    fn values(&self) -> Vec<String>;

    /// Register a change listener. Multiple listeners may be registered;
    /// there is no unregistration.
    fn on_change(&mut self, tx: mpsc::Sender<()>);

    /// Access to the concrete widget behind the capability.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
