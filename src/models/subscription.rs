use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One saved subscription, identifying a single provider query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Subscription {
    /// Unique identifier for the subscription
    pub id: Uuid,
    /// User the subscription belongs to
    pub owner: String,
    /// Topic to match (e.g. "Ringlstetter")
    pub topic: String,
    /// Optional channel to match (e.g. "BR")
    pub channel: Option<String>,
    /// Optional minimum video duration in minutes
    pub duration: Option<i64>,
}

impl Subscription {
    /// Creates a new subscription for the given owner
    pub fn new(owner: String, topic: String, channel: Option<String>, duration: Option<i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            topic,
            channel,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscription() {
        let subscription = Subscription::new(
            "auth0|user1".to_string(),
            "Ringlstetter".to_string(),
            Some("BR".to_string()),
            Some(30),
        );
        assert_eq!(subscription.owner, "auth0|user1");
        assert_eq!(subscription.topic, "Ringlstetter");
        assert_eq!(subscription.channel.as_deref(), Some("BR"));
        assert_eq!(subscription.duration, Some(30));
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let subscription =
            Subscription::new("auth0|user1".to_string(), "Tagesschau".to_string(), None, None);
        assert_eq!(subscription.channel, None);
        assert_eq!(subscription.duration, None);
    }
}
