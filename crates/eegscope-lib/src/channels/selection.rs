use serde::{Deserialize, Serialize};

/// Channels currently shown, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelSelection(Vec<String>);

impl ChannelSelection {
    pub fn all<S: AsRef<str>>(channels: &[S]) -> Self {
        let mut selection = Self::default();
        for channel in channels {
            if !selection.contains(channel.as_ref()) {
                selection.0.push(channel.as_ref().to_string());
            }
        }
        selection
    }

    /// Remove the channel if selected, otherwise append it.
    pub fn toggle(&mut self, channel: &str) {
        match self.0.iter().position(|selected| selected == channel) {
            Some(idx) => {
                self.0.remove(idx);
            }
            None => self.0.push(channel.to_string()),
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.0.iter().any(|selected| selected == channel)
    }

    pub fn channels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
