use crate::models::slots::{DateSlotMap, SlotRecord};

/// Keys each record's slots by its date. Should two records share a date the
/// later one in `records` wins.
pub fn combine_slots(records: &[SlotRecord]) -> DateSlotMap {
    let mut combined = DateSlotMap::default();
    for record in records {
        combined.0.insert(record.date.clone(), record.slots.clone());
    }
    combined
}
