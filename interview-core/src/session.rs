//! Values the panel publishes for collaborators outside it.
//!
//! Each value has exactly one writer (the panel) and any number of readers.
//! Readers always see the latest value; nothing is queued.

use tokio::sync::watch;

#[derive(Debug)]
pub struct SharedSession {
    code: watch::Sender<String>,
    highlighted: watch::Sender<String>,
    output: watch::Sender<String>,
}

impl SharedSession {
    pub fn new(initial_code: &str) -> Self {
        Self {
            code: watch::Sender::new(initial_code.to_string()),
            highlighted: watch::Sender::new(String::new()),
            output: watch::Sender::new(String::new()),
        }
    }

    pub fn code(&self) -> String {
        self.code.borrow().clone()
    }

    pub fn highlighted(&self) -> String {
        self.highlighted.borrow().clone()
    }

    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }

    pub fn subscribe_code(&self) -> watch::Receiver<String> {
        self.code.subscribe()
    }

    pub fn subscribe_highlighted(&self) -> watch::Receiver<String> {
        self.highlighted.subscribe()
    }

    pub fn subscribe_output(&self) -> watch::Receiver<String> {
        self.output.subscribe()
    }

    pub(crate) fn publish_code(&self, code: String) {
        self.code.send_replace(code);
    }

    pub(crate) fn publish_highlighted(&self, fragment: String) {
        self.highlighted.send_replace(fragment);
    }

    pub(crate) fn publish_output(&self, output: String) {
        self.output.send_replace(output);
    }
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new("")
    }
}
