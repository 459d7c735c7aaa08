/// Toasts disappear this long after being raised.
pub const NOTIFICATION_TTL_MS: u64 = 3_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub raised_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifications {
    items: Vec<Notification>,
    next_id: u64,
}

impl Notifications {
    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>, now_ms: u64) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            raised_at_ms: now_ms,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drop every toast older than the TTL. Returns whether any expired.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| now_ms.saturating_sub(item.raised_at_ms) < NOTIFICATION_TTL_MS);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_ttl() {
        let mut toasts = Notifications::default();
        toasts.push(NotificationLevel::Error, "first", 0);
        toasts.push(NotificationLevel::Info, "second", 2_000);

        assert!(!toasts.expire(3_499));
        assert!(toasts.expire(3_500));
        assert_eq!(toasts.items().len(), 1);
        assert_eq!(toasts.items()[0].message, "second");
    }

    #[test]
    fn dismiss_by_id() {
        let mut toasts = Notifications::default();
        let id = toasts.push(NotificationLevel::Success, "done", 0);
        assert!(toasts.dismiss(id));
        assert!(!toasts.dismiss(id));
        assert!(toasts.items().is_empty());
    }
}
