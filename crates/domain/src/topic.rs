//! MQTT topic layout.
//!
//! All topics live under `<base>/device/value`:
//!
//! | Topic | Direction | Meaning |
//! |-------|-----------|---------|
//! | `<base>/device/value/<id>` | out | current device value (and target position) |
//! | `<base>/device/value/current/<id>` | out | continuous position report |
//! | `<base>/device/value/update/<id>` | in / out | set a device value |

use crate::error::{BridgeError, ValidationError};
use crate::id::DeviceId;

/// Default first topic level, kept for compatibility with existing setups.
pub const DEFAULT_BASE_TOPIC: &str = "schellenberg";

const VALUE_PATH: &str = "device/value";
const CURRENT_LEVEL: &str = "current";
const UPDATE_LEVEL: &str = "update";

/// A recognized inbound topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundTopic {
    /// `<base>/device/value/update/<id>`: set the value of a device.
    Update(DeviceId),
}

/// Builds and parses the bridge's topics for a given base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScheme {
    prefix: String,
}

impl TopicScheme {
    /// Create a scheme rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Validation`] if `base` is empty, starts or ends
    /// with `/`, or contains MQTT wildcards.
    pub fn new(base: &str) -> Result<Self, BridgeError> {
        if base.is_empty()
            || base.starts_with('/')
            || base.ends_with('/')
            || base.contains(['#', '+'])
        {
            return Err(ValidationError::InvalidBaseTopic.into());
        }
        Ok(Self {
            prefix: format!("{base}/{VALUE_PATH}"),
        })
    }

    /// Subscription filter covering every bridge topic.
    #[must_use]
    pub fn subscription_filter(&self) -> String {
        format!("{}/#", self.prefix)
    }

    /// Primary status topic of a device.
    #[must_use]
    pub fn status(&self, id: DeviceId) -> String {
        format!("{}/{id}", self.prefix)
    }

    /// Continuous position report topic.
    #[must_use]
    pub fn current(&self, id: DeviceId) -> String {
        format!("{}/{CURRENT_LEVEL}/{id}", self.prefix)
    }

    /// Command topic that sets a device value.
    #[must_use]
    pub fn update(&self, id: DeviceId) -> String {
        format!("{}/{UPDATE_LEVEL}/{id}", self.prefix)
    }

    /// Parse an inbound topic.
    ///
    /// Only `<base>/device/value/update/<id>` with a purely numeric id and no
    /// further levels is recognized; everything else yields `None`.
    #[must_use]
    pub fn parse(&self, topic: &str) -> Option<InboundTopic> {
        let rest = topic.strip_prefix(&self.prefix)?.strip_prefix('/')?;
        let id = rest.strip_prefix(UPDATE_LEVEL)?.strip_prefix('/')?;
        id.parse().ok().map(InboundTopic::Update)
    }
}

impl Default for TopicScheme {
    fn default() -> Self {
        Self {
            prefix: format!("{DEFAULT_BASE_TOPIC}/{VALUE_PATH}"),
        }
    }
}
