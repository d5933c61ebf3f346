use quest_core::model::{Course, Lives, User};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 32;

/// A persisted slot changed. Carries the new value so subscribers do not
/// have to read the store again.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    UserChanged(Option<User>),
    CoursesChanged(Vec<Course>),
    LivesChanged(Lives),
}

/// Broadcasts state changes to any number of subscribers.
///
/// Publishing with nobody listening is not an error.
#[derive(Debug, Clone)]
pub struct StateEvents {
    tx: broadcast::Sender<StateChange>,
}

impl Default for StateEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.tx.subscribe()
    }

    pub fn publish(&self, change: StateChange) {
        let _ = self.tx.send(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::time::fixed_today;

    #[test]
    fn subscribers_receive_published_changes() {
        let events = StateEvents::new();
        let mut rx = events.subscribe();

        events.publish(StateChange::LivesChanged(Lives::full(fixed_today())));
        events.publish(StateChange::UserChanged(None));

        assert_eq!(
            rx.try_recv().unwrap(),
            StateChange::LivesChanged(Lives::full(fixed_today()))
        );
        assert_eq!(rx.try_recv().unwrap(), StateChange::UserChanged(None));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        StateEvents::new().publish(StateChange::CoursesChanged(Vec::new()));
    }
}
