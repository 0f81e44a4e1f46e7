pub mod sms;

use serde::Serialize;

use crate::recommendation::Priority;

/// A ready-to-send SMS payload for one high-priority service. Delivery is the
/// platform's job; we only build the message and the deep link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsAlert {
    pub service_id: i64,
    pub service_name: String,
    pub priority: Priority,
    pub message: String,
    pub action_link: String,
    pub phone: String,
}

pub use sms::build_sms_alerts;
