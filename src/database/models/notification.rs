use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ComplexId, NotificationId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub complex_id: ComplexId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub complex_id: ComplexId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
}
