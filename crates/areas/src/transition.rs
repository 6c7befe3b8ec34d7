//! Area transitions
//!
//! Moving an object between areas streams its model in or out when it
//! crosses the border of the rendered area. The streaming decision is taken
//! from the area the object is leaving, and the whole visibility, area and
//! position update happens under one frame lock.

use crate::area::Area;
use crate::graphics::Renderer;
use crate::object::Object;
use aurora_core::{DiagnosticSink, ObjectHandle, Vector3};

/// What a transition did to the object's model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Streaming {
    /// Stayed on the same side of the rendered area
    None,
    /// Left the rendered area: hidden and unloaded
    Out,
    /// Entered the rendered area: loaded and shown
    In,
}

/// Outcome of a successful move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ObjectHandle,
    pub to: ObjectHandle,
    pub streaming: Streaming,
}

impl Transition {
    pub fn changed_area(&self) -> bool {
        self.from != self.to
    }
}

/// Move an object into `target` at `position`
///
/// # Arguments
/// * `gfx` - Renderer whose frame lock brackets the update
/// * `diagnostics` - Receives the warning when the move is rejected
/// * `object` - Object to move; must currently be in an area
/// * `target` - Destination area
/// * `visible_area` - Area currently rendered (the player's)
/// * `position` - New position within `target`
///
/// # Returns
/// `None` if the object has no area or there is no target. Nothing is
/// changed in that case.
pub fn move_object(
    gfx: &dyn Renderer,
    diagnostics: &dyn DiagnosticSink,
    object: &Object,
    target: Option<&Area>,
    visible_area: Option<ObjectHandle>,
    position: Vector3,
) -> Option<Transition> {
    let (from, target) = match (object.area(), target) {
        (Some(from), Some(target)) => (from, target),
        (from, target) => {
            diagnostics.warning(&format!(
                "jump_to(): No area?!? ({}, {})",
                from.is_some() as i32,
                target.is_some() as i32
            ));
            return None;
        }
    };

    let to = target.handle();
    let mut streaming = Streaming::None;

    {
        let _frame = gfx.frame_lock().acquire();

        if from != to {
            if visible_area == Some(from) {
                object.hide(gfx);
                object.unload_model(gfx);
                streaming = Streaming::Out;
            } else if visible_area == Some(to) {
                object.load_model(gfx);
                object.show(gfx);
                streaming = Streaming::In;
            }

            object.set_area(Some(to));
        }

        object.set_position(position);
    }

    tracing::debug!(
        "Moved \"{}\" to \"{}\" at {} ({:?})",
        object.tag(),
        target.resref(),
        position,
        streaming
    );

    Some(Transition { from, to, streaming })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{HeadlessRenderer, RenderOp};
    use crate::world::World;
    use aurora_core::{ObjectType, RecordedDiagnostics};

    struct Fixture {
        world: World,
        gfx: HeadlessRenderer,
        diagnostics: RecordedDiagnostics,
    }

    fn fixture() -> Fixture {
        Fixture {
            world: World::new(),
            gfx: HeadlessRenderer::new(),
            diagnostics: RecordedDiagnostics::new(),
        }
    }

    #[test]
    fn test_leaving_visible_area_streams_out() {
        let f = fixture();
        let a = f.world.create_area("a", "A");
        let b = f.world.create_area("b", "B");
        let goblin = f.world.spawn(ObjectType::Creature, "goblin", Some(a.handle()), Vector3::ZERO);
        f.world.show_area(&a, &f.gfx);
        f.gfx.clear();

        let target = Vector3::new(4.0, 5.0, 6.0);
        let transition = move_object(&f.gfx, &f.diagnostics, &goblin, Some(&b), Some(a.handle()), target).unwrap();

        assert_eq!(transition.streaming, Streaming::Out);
        assert!(transition.changed_area());
        assert_eq!(
            f.gfx.ops(),
            vec![RenderOp::Hide(goblin.handle()), RenderOp::UnloadModel(goblin.handle())]
        );
        assert!(f.gfx.all_locked());
        assert!(!goblin.is_visible());
        assert!(!goblin.is_model_loaded());
        assert_eq!(goblin.area(), Some(b.handle()));
        assert_eq!(goblin.position(), target);
        assert!(f.diagnostics.is_empty());
    }

    #[test]
    fn test_entering_visible_area_streams_in() {
        let f = fixture();
        let a = f.world.create_area("a", "A");
        let b = f.world.create_area("b", "B");
        let goblin = f.world.spawn(ObjectType::Creature, "goblin", Some(a.handle()), Vector3::ZERO);

        let transition = move_object(&f.gfx, &f.diagnostics, &goblin, Some(&b), Some(b.handle()), Vector3::ZERO).unwrap();

        assert_eq!(transition.streaming, Streaming::In);
        assert_eq!(
            f.gfx.ops(),
            vec![RenderOp::LoadModel(goblin.handle()), RenderOp::Show(goblin.handle())]
        );
        assert!(goblin.is_visible());
    }

    #[test]
    fn test_same_area_only_moves() {
        let f = fixture();
        let a = f.world.create_area("a", "A");
        let chest = f.world.spawn(ObjectType::Placeable, "chest", Some(a.handle()), Vector3::ZERO);

        let target = Vector3::new(1.0, 1.0, 0.0);
        let transition = move_object(&f.gfx, &f.diagnostics, &chest, Some(&a), Some(a.handle()), target).unwrap();

        assert_eq!(transition.streaming, Streaming::None);
        assert!(!transition.changed_area());
        assert!(f.gfx.ops().is_empty());
        assert_eq!(chest.position(), target);
    }

    #[test]
    fn test_missing_target_is_a_no_op() {
        let f = fixture();
        let a = f.world.create_area("a", "A");
        let start = Vector3::new(2.0, 2.0, 2.0);
        let chest = f.world.spawn(ObjectType::Placeable, "chest", Some(a.handle()), start);

        let result = move_object(&f.gfx, &f.diagnostics, &chest, None, Some(a.handle()), Vector3::ZERO);

        assert!(result.is_none());
        assert_eq!(chest.area(), Some(a.handle()));
        assert_eq!(chest.position(), start);
        assert_eq!(f.diagnostics.messages(), vec!["jump_to(): No area?!? (1, 0)"]);
    }

    #[test]
    fn test_object_without_area_is_rejected() {
        let f = fixture();
        let b = f.world.create_area("b", "B");
        let ghost = f.world.spawn(ObjectType::Creature, "ghost", None, Vector3::ZERO);

        assert!(move_object(&f.gfx, &f.diagnostics, &ghost, Some(&b), None, Vector3::ZERO).is_none());
        assert_eq!(ghost.area(), None);
        assert_eq!(f.diagnostics.messages(), vec!["jump_to(): No area?!? (0, 1)"]);
    }
}
