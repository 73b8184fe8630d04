//! Navigation for the headless shell: leaving the page ends the session.

use interview_core::Navigator;
use tokio::sync::mpsc;

#[derive(Debug)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) -> anyhow::Result<()> {
        self.tx
            .send(route.to_string())
            .map_err(|_| anyhow::anyhow!("shell is gone, cannot navigate to {}", route))
    }
}
