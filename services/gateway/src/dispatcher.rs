use dashmap::DashMap;
use swipe_session::{BroadcastDispatcher, Outbound};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};
use types::ids::{ParticipantId, RoomId};

/// Routes room events to the sockets of their recipients
///
/// Each socket registers an unbounded sender; dispatching serializes the
/// event once and hands the text to every recipient's writer task.
pub struct ChannelDispatcher {
    // Maps participant id to that socket's outbound queue
    connections: DashMap<ParticipantId, UnboundedSender<String>>,
}

impl ChannelDispatcher {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, participant_id: ParticipantId, sender: UnboundedSender<String>) {
        self.connections.insert(participant_id, sender);
    }

    pub fn unregister(&self, participant_id: &ParticipantId) {
        self.connections.remove(participant_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl BroadcastDispatcher for ChannelDispatcher {
    fn dispatch(&self, room_id: &RoomId, outbound: Outbound) {
        let text = match serde_json::to_string(&outbound.event) {
            Ok(text) => text,
            Err(e) => {
                error!(room_id = %room_id, error = %e, "Failed to encode room event");
                return;
            }
        };

        for participant_id in &outbound.recipients {
            let Some(sender) = self.connections.get(participant_id) else {
                debug!(participant_id = %participant_id, "Recipient has no open socket");
                continue;
            };
            if sender.send(text.clone()).is_err() {
                debug!(participant_id = %participant_id, "Recipient socket closed");
            }
        }

        debug!(
            room_id = %room_id,
            event = outbound.event.event_type_label(),
            recipients = outbound.recipients.len(),
            "Room event dispatched"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe_session::RoomEvent;
    use tokio::sync::mpsc;

    #[test]
    fn test_dispatch_reaches_only_recipients() {
        let dispatcher = ChannelDispatcher::new();
        let p1 = ParticipantId::new();
        let p2 = ParticipantId::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        dispatcher.register(p1, tx1);
        dispatcher.register(p2, tx2);

        dispatcher.dispatch(
            &RoomId::new("4821"),
            Outbound::to(p1, RoomEvent::Matches { matches: Vec::new() }),
        );

        let text = rx1.try_recv().unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["event"], "matches");
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn test_unregistered_recipient_is_skipped() {
        let dispatcher = ChannelDispatcher::new();
        let p1 = ParticipantId::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        dispatcher.register(p1, tx1);
        dispatcher.unregister(&p1);
        assert_eq!(dispatcher.connection_count(), 0);

        dispatcher.dispatch(
            &RoomId::new("4821"),
            Outbound::to(p1, RoomEvent::Matches { matches: Vec::new() }),
        );
        assert!(rx1.try_recv().is_err());
    }
}
