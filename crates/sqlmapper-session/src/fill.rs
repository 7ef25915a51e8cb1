//! Automatic field filling before inserts and updates.

use sqlmapper_core::{Entity, EntityInfo, FieldInfo, Result, Value};

/// Which write is about to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPhase {
    Insert,
    Update,
}

impl FillPhase {
    /// Whether a field with this fill policy is filled in this phase.
    pub const fn applies_to(&self, field: &FieldInfo) -> bool {
        match self {
            FillPhase::Insert => field.fill.on_insert(),
            FillPhase::Update => field.fill.on_update(),
        }
    }
}

/// Supplies values for fields declared with a `FieldFill` policy.
///
/// The handler is asked about persisted fields whose policy matches the
/// phase. A field that already holds a value is skipped unless
/// [`replaces`](FillHandler::replaces) says otherwise, which is how an
/// `updatedAt` column gets refreshed on every update. Returning `None` from
/// [`fill`](FillHandler::fill) leaves the field alone.
///
/// ```ignore
/// struct Timestamps;
///
/// impl FillHandler for Timestamps {
///     fn fill(&self, _phase: FillPhase, _entity: &'static str, field: &'static FieldInfo) -> Option<Value> {
///         matches!(field.name, "createdAt" | "updatedAt").then(|| Value::BigInt(now_millis()))
///     }
/// }
/// ```
pub trait FillHandler: Send + Sync {
    fn fill(&self, phase: FillPhase, entity: &'static str, field: &'static FieldInfo)
    -> Option<Value>;

    /// Whether `field` is filled even when it already holds a value.
    fn replaces(&self, _phase: FillPhase, _field: &'static FieldInfo) -> bool {
        false
    }
}

/// Apply `handler` to one entity. Returns how many fields were written.
pub fn apply_fill<E: Entity>(
    handler: &dyn FillHandler,
    phase: FillPhase,
    entity: &mut E,
) -> Result<usize> {
    let info = EntityInfo::of::<E>()?;
    let mut filled = 0;
    for field in info.persisted_fields().filter(|f| phase.applies_to(f)) {
        let current = entity.get_value(field.name).unwrap_or_default();
        if !current.is_null() && !handler.replaces(phase, field) {
            continue;
        }
        if let Some(value) = handler.fill(phase, info.name(), field) {
            entity.set_value(field.name, value)?;
            filled += 1;
        }
    }
    if filled > 0 {
        tracing::debug!(entity = info.name(), ?phase, filled, "Auto-filled fields");
    }
    Ok(filled)
}
