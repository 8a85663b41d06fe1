//! Tracks which channel is talking and how much, for the quiet-channel
//! nudge and the `last` command.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::core::config::QuietChannelRule;

/// Snapshot of the running conversation counter.
#[derive(Debug, Clone, Default)]
pub struct ChannelActivity {
    pub last_channel: Option<u64>,
    pub count: u64,
    pub warned: bool,
}

/// Injected state holder for channel activity. One writer per inbound
/// message event; the counter resets whenever the active channel changes or
/// a message carried links (which means the bot likely just posted art).
pub struct ActivityTracker {
    state: Mutex<ChannelActivity>,
    quiet_channels: HashMap<u64, QuietChannelRule>,
}

impl ActivityTracker {
    pub fn new(quiet_channels: HashMap<u64, QuietChannelRule>) -> Self {
        Self {
            state: Mutex::new(ChannelActivity::default()),
            quiet_channels,
        }
    }

    /// Record one inbound message. Returns `true` exactly once per quiet
    /// streak, when a quiet channel crosses its chatter threshold.
    pub async fn note_message(&self, channel_id: u64, had_links: bool) -> bool {
        let mut state = self.state.lock().await;

        if state.last_channel != Some(channel_id) || had_links {
            state.last_channel = Some(channel_id);
            state.count = 0;
            state.warned = false;
        }
        state.count += 1;

        if let Some(rule) = self.quiet_channels.get(&channel_id) {
            if !state.warned && state.count >= rule.max_messages_without_embeds {
                state.warned = true;
                return true;
            }
        }
        false
    }

    pub async fn snapshot(&self) -> ChannelActivity {
        self.state.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_rule(channel_id: u64, threshold: u64) -> ActivityTracker {
        let mut rules = HashMap::new();
        rules.insert(
            channel_id,
            QuietChannelRule {
                max_messages_without_embeds: threshold,
            },
        );
        ActivityTracker::new(rules)
    }

    #[tokio::test]
    async fn test_counts_messages_in_one_channel() {
        let tracker = ActivityTracker::new(HashMap::new());
        tracker.note_message(10, false).await;
        tracker.note_message(10, false).await;
        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.last_channel, Some(10));
        assert_eq!(snapshot.count, 2);
    }

    #[tokio::test]
    async fn test_channel_change_resets_count() {
        let tracker = ActivityTracker::new(HashMap::new());
        tracker.note_message(10, false).await;
        tracker.note_message(10, false).await;
        tracker.note_message(11, false).await;
        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.last_channel, Some(11));
        assert_eq!(snapshot.count, 1);
    }

    #[tokio::test]
    async fn test_links_reset_the_streak() {
        let tracker = tracker_with_rule(10, 3);
        assert!(!tracker.note_message(10, false).await);
        assert!(!tracker.note_message(10, false).await);
        // A message with links resets the counter before incrementing.
        assert!(!tracker.note_message(10, true).await);
        assert_eq!(tracker.snapshot().await.count, 1);
    }

    #[tokio::test]
    async fn test_warns_exactly_once_per_streak() {
        let tracker = tracker_with_rule(10, 3);
        assert!(!tracker.note_message(10, false).await);
        assert!(!tracker.note_message(10, false).await);
        assert!(tracker.note_message(10, false).await);
        // Past the threshold but already warned.
        assert!(!tracker.note_message(10, false).await);
        // A reset starts a new streak that can warn again.
        tracker.note_message(10, true).await;
        assert!(!tracker.note_message(10, false).await);
        assert!(tracker.note_message(10, false).await);
    }

    #[tokio::test]
    async fn test_non_quiet_channels_never_warn() {
        let tracker = tracker_with_rule(10, 1);
        assert!(!tracker.note_message(99, false).await);
        assert!(!tracker.note_message(99, false).await);
    }
}
