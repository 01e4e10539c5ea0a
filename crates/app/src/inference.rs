//! Cover-state inference — turns one hub update into the publications it
//! implies.
//!
//! Besides the device's own status, two derived rules apply:
//!
//! - **Target position**: a `Schalter` reporting the `open` or `close`
//!   payload means every `Position` sibling is heading to `0` or `100`.
//! - **Current position / auto-stop**: a position report is mirrored on the
//!   `current/<id>` topic, and on reaching 0 or 100 every `Schalter` sibling
//!   is sent the `stop` payload through its `update/<id>` topic.
//!
//! Both rules are evaluated for every update. Siblings are those sharing the
//! update's `master_device_id`, visited in ascending id order.

use sfbridge_domain::command::{Command, CommandMapping};
use sfbridge_domain::device::{Device, DeviceMap, DeviceRole};
use sfbridge_domain::event::DeviceUpdate;
use sfbridge_domain::id::DeviceId;
use sfbridge_domain::message::Publication;
use sfbridge_domain::topic::TopicScheme;

/// Compute every publication caused by `update`, in publish order.
///
/// Updates carrying an empty value produce nothing. An update from a device
/// missing in `devices` still gets its status and position publications,
/// but no target position is inferred for it.
#[must_use]
pub fn derive_publications(
    update: &DeviceUpdate,
    devices: &DeviceMap,
    mapping: &CommandMapping,
    topics: &TopicScheme,
) -> Vec<Publication> {
    if update.value.is_empty() {
        return Vec::new();
    }

    let payload = update.value.encode();
    let mut publications = vec![Publication::retained(
        topics.status(update.device_id),
        payload.clone(),
    )];

    match devices.get(&update.device_id) {
        Some(source) if source.role() == DeviceRole::Switch => {
            if let Some(target) = mapping
                .command_for(&payload)
                .and_then(Command::target_position)
            {
                publications.extend(
                    siblings(devices, update.master_device_id, DeviceRole::Position)
                        .map(|id| Publication::retained(topics.status(id), target)),
                );
            }
        }
        Some(_) => {}
        None => {
            tracing::debug!(
                device_id = %update.device_id,
                "device not in registry, skipping target position"
            );
        }
    }

    if update.float_value {
        publications.push(Publication::retained(
            topics.current(update.device_id),
            payload,
        ));

        if update.is_at_end_stop() {
            let stop = mapping.payload(Command::Stop);
            publications.extend(
                siblings(devices, update.master_device_id, DeviceRole::Switch)
                    .map(|id| Publication::retained(topics.update(id), stop)),
            );
        }
    }

    publications
}

fn siblings(
    devices: &DeviceMap,
    master_device_id: Option<DeviceId>,
    role: DeviceRole,
) -> impl Iterator<Item = DeviceId> {
    let mut ids: Vec<DeviceId> = devices
        .values()
        .filter(|device| device.is_sibling_of(master_device_id) && device.role() == role)
        .map(|device: &Device| device.id)
        .collect();
    ids.sort_unstable();
    ids.into_iter()
}
