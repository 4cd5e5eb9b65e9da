/// Entity identifiers are opaque strings assigned by the storage layer.
pub type EntityId = String;

/// Allocate a fresh identifier for an entity created inside the core.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4().to_string()
}

/// Round to two decimal places, the precision used for every derived score.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
