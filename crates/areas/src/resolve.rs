//! Object reference resolution

use aurora_core::ObjectRef;

/// Substitute the self sentinel with the current caller
///
/// The caller is returned as is, whatever state the world is in. Liveness
/// is checked later by [`World::resolve`](crate::World::resolve).
pub fn resolve_ref(object: ObjectRef, caller: ObjectRef) -> ObjectRef {
    match object.or_caller(caller) {
        // A caller that is itself the sentinel names nobody
        ObjectRef::Caller => ObjectRef::None,
        other => other,
    }
}
