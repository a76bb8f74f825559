use shaderloop_common::Message;

/// Single-slot-per-kind message buffer between the host and the loop.
///
/// Absolute messages (pointer, scroll, resize) coalesce to the latest value.
/// Relative messages (drag, zoom) coalesce by summing, so a burst of motion
/// between two ticks is not lost.
#[derive(Debug, Default)]
pub struct Inbox {
    slots: [Option<Message>; Message::SLOTS],
    coalesced: u64,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, msg: Message) {
        let slot = &mut self.slots[msg.slot()];
        let merged = match (*slot, msg) {
            (
                Some(Message::Dragged { dx: ax, dy: ay }),
                Message::Dragged { dx, dy },
            ) => Message::Dragged {
                dx: ax + dx,
                dy: ay + dy,
            },
            (Some(Message::Zoomed { steps: a }), Message::Zoomed { steps }) => {
                Message::Zoomed { steps: a + steps }
            }
            _ => msg,
        };
        if slot.is_some() {
            self.coalesced += 1;
        }
        *slot = Some(merged);
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of messages folded into an occupied slot since creation.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Take all pending messages in slot order: pointer, scroll, resize,
    /// drag, zoom.
    pub fn drain(&mut self) -> std::vec::IntoIter<Message> {
        let taken: Vec<Message> = self.slots.iter_mut().filter_map(Option::take).collect();
        taken.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use shaderloop_common::Viewport;

    #[test]
    fn last_pointer_wins() {
        let mut inbox = Inbox::new();
        for i in 0..10 {
            inbox.post(Message::PointerMoved(Vec2::splat(i as f32 / 10.0)));
        }
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(drained, vec![Message::PointerMoved(Vec2::splat(0.9))]);
        assert_eq!(inbox.coalesced(), 9);
        assert!(inbox.is_empty());
    }

    #[test]
    fn kinds_do_not_overwrite_each_other() {
        let mut inbox = Inbox::new();
        inbox.post(Message::Scrolled { fraction: 0.2 });
        inbox.post(Message::Resized(Viewport::new(640, 480, 1.0)));
        inbox.post(Message::PointerMoved(Vec2::ZERO));
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(matches!(drained[0], Message::PointerMoved(_)));
        assert!(matches!(drained[2], Message::Resized(_)));
    }

    #[test]
    fn drag_deltas_accumulate() {
        let mut inbox = Inbox::new();
        inbox.post(Message::Dragged { dx: 2.0, dy: 1.0 });
        inbox.post(Message::Dragged { dx: 3.0, dy: -1.0 });
        inbox.post(Message::Zoomed { steps: 1.0 });
        inbox.post(Message::Zoomed { steps: 1.0 });
        let drained: Vec<_> = inbox.drain().collect();
        assert_eq!(
            drained,
            vec![
                Message::Dragged { dx: 5.0, dy: 0.0 },
                Message::Zoomed { steps: 2.0 }
            ]
        );
    }

    #[test]
    fn drain_empty_inbox() {
        let mut inbox = Inbox::new();
        assert_eq!(inbox.drain().count(), 0);
    }
}
