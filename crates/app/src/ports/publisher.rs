//! Publisher port — fire-and-forget publishing to the MQTT broker.

use std::future::Future;

use sfbridge_domain::error::BridgeError;
use sfbridge_domain::message::Publication;

/// Publishes messages to the broker.
///
/// Implementations must not wait for a broker acknowledgement: publications
/// are sent at most once.
pub trait MessagePublisher {
    /// Hand `publication` to the broker connection.
    fn publish(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

impl<T: MessagePublisher + Send + Sync> MessagePublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        (**self).publish(publication)
    }
}
