//! # Module Runtime
//!
//! The module owns everything belonging to the currently loaded game
//! module: its areas and objects, the player character, resources added to
//! the resource manager, the event FIFO and the delayed action queue.
//!
//! ## Tick
//! 1. Handle the events queued before the tick
//! 2. Resume every delayed script that is due, one at a time
//! 3. Carry out a pending module switch

use crate::actions::{ActionQueue, ScheduledAction};
use crate::content::{ChangeId, ContentLoader, ModuleInfo};
use crate::events::{Event, EventConsumer, EventKind, EventQueue};
use aurora_areas::{move_object, Area, Object, Renderer, Transition, World};
use aurora_core::{AuroraError, DiagnosticSink, ObjectHandle, ObjectRef, ObjectType, Result, Vector3};
use aurora_scripting::{ScriptHost, ScriptState, ScriptVm};
use std::sync::Arc;

/// Lifecycle of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Nothing loaded
    Unloaded,
    /// Loaded and ready to be entered
    Loaded,
    /// Entered; the player is in the world
    Running,
}

/// Module switch waiting for the end of the tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingModule {
    pub module: String,
    pub entry_location: Option<String>,
}

/// Top-level game state for one loaded module
pub struct Module {
    world: World,
    content: Box<dyn ContentLoader>,
    gfx: Arc<dyn Renderer>,
    diagnostics: Arc<dyn DiagnosticSink>,

    state: ModuleState,
    exit: bool,

    /// Name of the loaded module
    name: String,
    /// Tag of the object the player enters at
    entry_location: Option<String>,
    pending: Option<PendingModule>,

    /// The module itself, as scripts see it
    object: Option<ObjectHandle>,
    resources: Option<ChangeId>,
    ifo: Option<ModuleInfo>,
    areas: Vec<Arc<Area>>,
    current_area: Option<Arc<Area>>,
    pc: Option<Arc<Object>>,
    walkable_surfaces: Vec<bool>,

    /// Requested texture pack and the one actually added
    texture_pack: u8,
    textures: Option<(u8, ChangeId)>,

    events: EventQueue,
    actions: ActionQueue,

    /// Game clock, in milliseconds
    now: u64,
    moved_pc_count: u64,
}

impl Module {
    pub fn new(
        content: Box<dyn ContentLoader>,
        gfx: Arc<dyn Renderer>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        tracing::debug!("Creating Module");

        Self {
            world: World::new(),
            content,
            gfx,
            diagnostics,
            state: ModuleState::Unloaded,
            exit: false,
            name: String::new(),
            entry_location: None,
            pending: None,
            object: None,
            resources: None,
            ifo: None,
            areas: Vec::new(),
            current_area: None,
            pc: None,
            walkable_surfaces: Vec::new(),
            texture_pack: 2,
            textures: None,
            events: EventQueue::new(),
            actions: ActionQueue::new(),
            now: 0,
            moved_pc_count: 0,
        }
    }

    // --- State

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state != ModuleState::Unloaded
    }

    pub fn is_running(&self) -> bool {
        self.state == ModuleState::Running
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    /// Ask the main loop to stop
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ifo(&self) -> Option<&ModuleInfo> {
        self.ifo.as_ref()
    }

    pub fn pending_module(&self) -> Option<&PendingModule> {
        self.pending.as_ref()
    }

    pub fn current_area(&self) -> Option<&Arc<Area>> {
        self.current_area.as_ref()
    }

    pub fn areas(&self) -> &[Arc<Area>] {
        &self.areas
    }

    pub fn pc(&self) -> Option<&Arc<Object>> {
        self.pc.as_ref()
    }

    pub fn pc_ref(&self) -> ObjectRef {
        self.pc.as_ref().map(|pc| pc.handle()).into()
    }

    /// The module as a script object
    pub fn module_ref(&self) -> ObjectRef {
        self.object.into()
    }

    pub fn walkable_surfaces(&self) -> &[bool] {
        &self.walkable_surfaces
    }

    pub fn texture_pack(&self) -> u8 {
        self.texture_pack
    }

    /// Select the texture pack used from the next load on
    pub fn set_texture_pack(&mut self, pack: u8) {
        self.texture_pack = pack.min(3);
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// How often the player has been reported as moved
    pub fn moved_pc_count(&self) -> u64 {
        self.moved_pc_count
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn renderer(&self) -> &dyn Renderer {
        &*self.gfx
    }

    pub fn actions(&self) -> &ActionQueue {
        &self.actions
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    // --- Loading

    /// Load a module
    ///
    /// While a module is running the switch is only recorded and carried
    /// out at the end of the current tick.
    pub fn load(&mut self, module: &str, entry_location: Option<String>) -> Result<()> {
        if self.is_running() {
            self.change_module(module, entry_location);
            return Ok(());
        }

        self.load_module(module, entry_location)
    }

    fn change_module(&mut self, module: &str, entry_location: Option<String>) {
        tracing::info!("Scheduling switch to module \"{}\"", module);
        self.pending = Some(PendingModule {
            module: module.to_string(),
            entry_location,
        });
    }

    fn load_module(&mut self, module: &str, entry_location: Option<String>) -> Result<()> {
        self.unload(false);

        if module.is_empty() {
            return Err(AuroraError::Module("Tried to load an empty module".into()));
        }

        self.name = module.to_string();
        self.entry_location = entry_location;

        if let Err(err) = self.load_parts() {
            tracing::error!("Failed loading module \"{}\": {}", module, err);
            self.unload(false);
            return Err(err);
        }

        self.pending = None;
        self.state = ModuleState::Loaded;
        tracing::info!("Loaded module \"{}\" ({} areas)", self.name, self.areas.len());
        Ok(())
    }

    fn load_parts(&mut self) -> Result<()> {
        self.resources = Some(self.content.add_module_resources(&self.name)?);

        let ifo = self.content.load_ifo(&self.name)?;
        self.object = Some(
            self.world
                .spawn(ObjectType::Module, self.name.clone(), None, Vector3::ZERO)
                .handle(),
        );

        let mut resrefs = ifo.areas.clone();
        if !ifo.entry_area.is_empty() && !resrefs.contains(&ifo.entry_area) {
            resrefs.push(ifo.entry_area.clone());
        }
        self.ifo = Some(ifo);

        for resref in &resrefs {
            self.load_area(resref)?;
        }

        self.load_texture_pack()?;
        self.walkable_surfaces = self.content.load_surface_types()?;
        Ok(())
    }

    fn load_area(&mut self, resref: &str) -> Result<()> {
        let template = self.content.load_area(resref)?;
        let area = self.world.create_area(resref, template.name);

        for placed in template.objects {
            let object = self
                .world
                .spawn(placed.object_type, placed.tag, Some(area.handle()), placed.position);
            object.set_orientation(placed.orientation);
        }

        self.areas.push(area);
        Ok(())
    }

    fn load_texture_pack(&mut self) -> Result<()> {
        if matches!(self.textures, Some((pack, _)) if pack == self.texture_pack) {
            return Ok(());
        }

        self.unload_texture_pack();
        let change = self.content.add_texture_pack(self.texture_pack)?;
        self.textures = Some((self.texture_pack, change));
        tracing::debug!("Using texture pack {}", self.texture_pack);
        Ok(())
    }

    // --- Unloading

    /// Unload the current module
    ///
    /// # Arguments
    /// * `complete` - Also drop the player character and texture pack.
    ///   When `false` both survive for transfer into the next module.
    pub fn unload(&mut self, complete: bool) {
        if self.is_running() {
            self.leave_area();
        }

        self.events.clear();
        self.actions.clear();

        let pc = self.pc.as_ref().map(|pc| pc.handle());
        for area in std::mem::take(&mut self.areas) {
            for object in self.world.objects_in(area.handle()) {
                if Some(object.handle()) == pc {
                    let _frame = self.gfx.frame_lock().acquire();
                    object.set_area(None);
                    continue;
                }
                self.world.destroy(object.handle());
            }
            self.world.destroy(area.handle());
        }
        self.current_area = None;

        if let Some(object) = self.object.take() {
            self.world.destroy(object);
        }

        self.ifo = None;
        self.walkable_surfaces.clear();

        if let Some(change) = self.resources.take() {
            self.content.remove_resources(change);
        }

        if complete {
            self.unload_pc();
            self.unload_texture_pack();
            self.pending = None;
        }

        if self.state != ModuleState::Unloaded {
            tracing::info!("Unloaded module \"{}\"", self.name);
        }

        self.state = ModuleState::Unloaded;
        self.name.clear();
        self.entry_location = None;
    }

    fn unload_pc(&mut self) {
        if let Some(pc) = self.pc.take() {
            self.world.destroy(pc.handle());
        }
    }

    fn unload_texture_pack(&mut self) {
        if let Some((_, change)) = self.textures.take() {
            self.content.remove_resources(change);
        }
    }

    // --- Player

    /// Create the player character
    pub fn use_pc(&mut self, tag: &str) -> Arc<Object> {
        self.unload_pc();

        let pc = self.world.spawn(ObjectType::Creature, tag, None, Vector3::ZERO);
        tracing::debug!("Using player character \"{}\" {}", tag, pc.handle());
        self.pc = Some(pc.clone());
        pc
    }

    pub fn is_pc(&self, handle: ObjectHandle) -> bool {
        self.pc.as_ref().is_some_and(|pc| pc.handle() == handle)
    }

    // --- Running

    /// Enter the loaded module with the player character
    pub fn enter(&mut self) -> Result<()> {
        if !self.is_loaded() {
            return Err(AuroraError::Module("No module loaded".into()));
        }
        if self.is_running() {
            return Ok(());
        }

        let pc = self
            .pc
            .clone()
            .ok_or_else(|| AuroraError::Module("No player character".into()))?;

        let (area, position, orientation) = self.entry_point()?;
        let mut objects = self.world.objects_in(area.handle());
        if !objects.iter().any(|object| object.handle() == pc.handle()) {
            objects.push(pc.clone());
        }

        // The player appears in the entry area in the same frame the area does
        {
            let frame = self.gfx.frame_lock().acquire();
            pc.set_area(Some(area.handle()));
            pc.set_position(position);
            pc.set_orientation(orientation);
            World::show_objects(&area, &objects, &*self.gfx, &frame);
        }
        tracing::debug!("Showing area \"{}\" ({} objects)", area.resref(), objects.len());
        self.current_area = Some(area);
        self.state = ModuleState::Running;
        self.exit = false;

        let scripts = self
            .ifo
            .as_ref()
            .map(|ifo| [ifo.on_module_load.clone(), ifo.on_client_enter.clone()])
            .unwrap_or_default();
        let owner = self.module_ref();
        let triggerer = self.pc_ref();
        for script in scripts.into_iter().flatten() {
            self.delay_script(&script, ScriptState::empty(), owner, triggerer, 0);
        }

        tracing::info!("Entered module \"{}\" at {}", self.name, position);
        Ok(())
    }

    /// Stop running the module and request exit
    pub fn leave(&mut self) {
        if !self.is_running() {
            return;
        }

        self.leave_area();
        self.state = ModuleState::Loaded;
        self.exit = true;
        tracing::info!("Left module \"{}\"", self.name);
    }

    fn entry_point(&self) -> Result<(Arc<Area>, Vector3, f32)> {
        if let Some(tag) = &self.entry_location {
            let found = self.world.find_by_tag(tag, 0).and_then(|object| {
                let area = self.world.area(object.area()?)?;
                Some((area, object.position(), object.orientation()))
            });
            match found {
                Some(entry) => return Ok(entry),
                None => tracing::warn!("Entry location \"{}\" not found, using module entry point", tag),
            }
        }

        let ifo = self
            .ifo
            .as_ref()
            .ok_or_else(|| AuroraError::Module("No module descriptor".into()))?;
        let area = self
            .areas
            .iter()
            .find(|area| area.resref() == ifo.entry_area)
            .cloned()
            .ok_or_else(|| AuroraError::NotFound(format!("entry area \"{}\"", ifo.entry_area)))?;

        Ok((area, ifo.entry_position, ifo.entry_orientation))
    }

    fn enter_area(&mut self, area: Arc<Area>) {
        self.world.show_area(&area, &*self.gfx);
        self.current_area = Some(area);
    }

    fn leave_area(&mut self) {
        if let Some(area) = self.current_area.take() {
            self.world.hide_area(&area, &*self.gfx);
        }
    }

    /// Notification that the player character was moved
    ///
    /// Makes the player's area the rendered one if it changed.
    pub fn moved_pc(&mut self) {
        self.moved_pc_count += 1;

        let Some(pc_area) = self.pc.as_ref().and_then(|pc| pc.area()) else {
            return;
        };
        if self.current_area.as_ref().map(|area| area.handle()) == Some(pc_area) {
            return;
        }

        self.leave_area();
        if let Some(area) = self.world.area(pc_area) {
            tracing::debug!("Player moved into area \"{}\"", area.resref());
            self.enter_area(area);
        }
    }

    /// Move an object into an area, streaming it in or out of view
    pub fn jump_to(&mut self, object: &Object, area: Option<&Area>, position: Vector3) -> Option<Transition> {
        let visible_area = self.pc.as_ref().and_then(|pc| pc.area());
        let transition = move_object(
            &*self.gfx,
            &*self.diagnostics,
            object,
            area,
            visible_area,
            position,
        )?;

        if self.is_pc(object.handle()) {
            self.moved_pc();
        }

        Some(transition)
    }

    /// Move the player within the current area
    pub fn move_pc(&mut self, position: Vector3) {
        let (Some(pc), Some(area)) = (self.pc.clone(), self.current_area.clone()) else {
            return;
        };
        self.jump_to(&pc, Some(&*area), position);
    }

    /// Move the player to a tagged object, switching module if needed
    pub fn move_pc_to(&mut self, module: &str, object: &str) {
        if !module.is_empty() && module != self.name {
            self.change_module(module, Some(object.to_string()));
            return;
        }

        let Some(pc) = self.pc.clone() else {
            return;
        };
        let Some(target) = self.world.find_by_tag(object, 0) else {
            tracing::warn!("move_pc_to(): no object \"{}\"", object);
            return;
        };

        let area = target.area().and_then(|handle| self.world.area(handle));
        if self.jump_to(&pc, area.as_deref(), target.position()).is_some() {
            let _frame = self.gfx.frame_lock().acquire();
            pc.set_orientation(target.orientation());
        }
    }

    // --- Scheduling

    /// Resume `script` with `state` after `delay` milliseconds
    pub fn delay_script(
        &mut self,
        script: &str,
        state: ScriptState,
        owner: ObjectRef,
        triggerer: ObjectRef,
        delay: u64,
    ) {
        let timestamp = self.now.saturating_add(delay);
        tracing::trace!("Delaying \"{}\" until {}", script, timestamp);

        self.actions.push(ScheduledAction {
            timestamp,
            script: script.to_string(),
            state,
            owner,
            triggerer,
        });
    }

    /// Drop every pending action owned by `owner`
    pub fn clear_actions(&mut self, owner: ObjectRef) -> usize {
        self.actions.remove_owned_by(owner)
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Run one tick at game time `now` (ms)
    pub fn process(&mut self, now: u64, vm: &mut dyn ScriptVm<Module>, consumer: &mut dyn EventConsumer) {
        self.now = self.now.max(now);

        self.handle_events(consumer);
        self.handle_actions(vm);

        if self.pending.is_some() {
            self.replace_module();
        }
    }

    fn handle_events(&mut self, consumer: &mut dyn EventConsumer) {
        for event in self.events.take_batch() {
            if event.kind == EventKind::Quit {
                tracing::info!("Quit requested");
                self.exit();
                continue;
            }
            consumer.handle_event(self, event);
        }
    }

    fn handle_actions(&mut self, vm: &mut dyn ScriptVm<Module>) {
        let scheduled_before = self.actions.next_sequence();
        while let Some(action) = self.actions.pop_ready(self.now, scheduled_before) {
            let (Some(owner), Some(triggerer)) = (self.revalidate(action.owner), self.revalidate(action.triggerer)) else {
                tracing::trace!("Dropping \"{}\": object gone", action.script);
                continue;
            };

            if let Err(err) = vm.run(self, &action.script, &action.state, owner, triggerer) {
                tracing::warn!("Script \"{}\" failed: {}", action.script, err);
            }
        }
    }

    /// Re-resolve a reference captured earlier. `None` if it named an
    /// object that is gone.
    fn revalidate(&self, object: ObjectRef) -> Option<ObjectRef> {
        match object {
            ObjectRef::Handle(_) => self
                .world
                .resolve(object, ObjectRef::None)
                .map(|object| ObjectRef::Handle(object.handle())),
            ObjectRef::None | ObjectRef::Caller => Some(ObjectRef::None),
        }
    }

    fn replace_module(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        tracing::info!("Switching from \"{}\" to \"{}\"", self.name, pending.module);
        self.leave();

        let result = match self.load_module(&pending.module, pending.entry_location) {
            Ok(()) => self.enter(),
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            tracing::error!("Module switch to \"{}\" failed: {}", pending.module, err);
            self.exit = true;
        }
    }
}

impl ScriptHost for Module {
    fn object_tag(&self, object: ObjectRef, caller: ObjectRef) -> Option<String> {
        self.world
            .resolve(object, caller)
            .map(|object| object.tag().to_string())
    }

    fn diagnostics(&self) -> &dyn DiagnosticSink {
        &*self.diagnostics
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::{AreaTemplate, PlacedObject, StaticContent};
    use crate::events::EventOrigin;
    use aurora_areas::HeadlessRenderer;
    use aurora_core::RecordedDiagnostics;
    use std::time::Duration;

    /// VM that records every script it is asked to run
    #[derive(Default)]
    pub(crate) struct RecordingVm {
        pub runs: Vec<(String, ObjectRef, ObjectRef)>,
    }

    impl ScriptVm<Module> for RecordingVm {
        fn run(
            &mut self,
            _host: &mut Module,
            script: &str,
            _state: &ScriptState,
            owner: ObjectRef,
            triggerer: ObjectRef,
        ) -> aurora_scripting::Result<()> {
            self.runs.push((script.to_string(), owner, triggerer));
            Ok(())
        }
    }

    impl RecordingVm {
        pub fn scripts(&self) -> Vec<&str> {
            self.runs.iter().map(|(script, _, _)| script.as_str()).collect()
        }
    }

    /// Records like [`RecordingVm`]; a script named "clear" drops the
    /// remaining actions of its owner
    #[derive(Default)]
    struct ClearingVm {
        inner: RecordingVm,
    }

    impl ScriptVm<Module> for ClearingVm {
        fn run(
            &mut self,
            host: &mut Module,
            script: &str,
            state: &ScriptState,
            owner: ObjectRef,
            triggerer: ObjectRef,
        ) -> aurora_scripting::Result<()> {
            self.inner.run(host, script, state, owner, triggerer)?;
            if script == "clear" {
                host.clear_actions(owner);
            }
            Ok(())
        }
    }

    /// Consumer that raises one follow-up event per event it handles
    #[derive(Default)]
    struct EchoConsumer {
        seen: Vec<EventKind>,
    }

    impl EventConsumer for EchoConsumer {
        fn handle_event(&mut self, module: &mut Module, event: Event) {
            if let EventKind::Custom(name) = &event.kind {
                module.add_event(Event::new(EventOrigin::World, EventKind::Custom(format!("{}+", name))));
            }
            self.seen.push(event.kind);
        }
    }

    fn placed(object_type: ObjectType, tag: &str, position: Vector3) -> PlacedObject {
        PlacedObject {
            object_type,
            tag: tag.to_string(),
            position,
            orientation: 0.0,
        }
    }

    pub(crate) fn content() -> StaticContent {
        StaticContent::new()
            .with_module(
                "m1",
                ModuleInfo {
                    name: "Module One".into(),
                    areas: vec!["a".into(), "b".into()],
                    entry_area: "a".into(),
                    entry_position: Vector3::new(1.0, 1.0, 0.0),
                    entry_orientation: 90.0,
                    on_module_load: Some("m1_load".into()),
                    on_client_enter: Some("m1_enter".into()),
                },
            )
            .with_module(
                "m2",
                ModuleInfo {
                    name: "Module Two".into(),
                    areas: vec!["c".into()],
                    entry_area: "c".into(),
                    ..Default::default()
                },
            )
            .with_module(
                "broken",
                ModuleInfo {
                    areas: vec!["a".into(), "missing".into()],
                    entry_area: "a".into(),
                    ..Default::default()
                },
            )
            .with_area(
                "a",
                AreaTemplate {
                    name: "Area A".into(),
                    objects: vec![placed(ObjectType::Creature, "guard", Vector3::new(3.0, 0.0, 0.0))],
                },
            )
            .with_area(
                "b",
                AreaTemplate {
                    name: "Area B".into(),
                    objects: vec![placed(ObjectType::Waypoint, "wp_b", Vector3::new(9.0, 9.0, 0.0))],
                },
            )
            .with_area(
                "c",
                AreaTemplate {
                    name: "Area C".into(),
                    objects: vec![placed(ObjectType::Waypoint, "wp_arrive", Vector3::new(5.0, 5.0, 0.0))],
                },
            )
    }

    pub(crate) struct Fixture {
        pub module: Module,
        pub gfx: Arc<HeadlessRenderer>,
        pub diagnostics: Arc<RecordedDiagnostics>,
    }

    pub(crate) fn fixture() -> Fixture {
        let gfx = Arc::new(HeadlessRenderer::new());
        let diagnostics = Arc::new(RecordedDiagnostics::new());
        let module = Module::new(Box::new(content()), gfx.clone(), diagnostics.clone());
        Fixture {
            module,
            gfx,
            diagnostics,
        }
    }

    /// Loaded, entered `m1` with the start scripts already drained
    pub(crate) fn running() -> Fixture {
        let mut f = fixture();
        f.module.use_pc("player");
        f.module.load("m1", None).unwrap();
        f.module.enter().unwrap();
        f.module.process(0, &mut RecordingVm::default(), &mut EchoConsumer::default());
        f
    }

    #[test]
    fn test_load_and_enter() {
        let mut f = fixture();
        let pc = f.module.use_pc("player");
        f.module.load("m1", None).unwrap();
        assert_eq!(f.module.state(), ModuleState::Loaded);
        assert_eq!(f.module.areas().len(), 2);

        f.module.enter().unwrap();
        assert!(f.module.is_running());
        assert_eq!(f.module.current_area().unwrap().resref(), "a");
        assert!(f.module.current_area().unwrap().is_visible());
        assert_eq!(pc.position(), Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(pc.orientation(), 90.0);
        assert!(pc.is_visible());

        let mut vm = RecordingVm::default();
        f.module.process(0, &mut vm, &mut EchoConsumer::default());
        assert_eq!(vm.scripts(), vec!["m1_load", "m1_enter"]);
        assert_eq!(vm.runs[0].1, f.module.module_ref());
        assert_eq!(vm.runs[0].2, f.module.pc_ref());
    }

    #[test]
    fn test_enter_places_pc_under_frame_lock() {
        let mut f = fixture();
        let pc = f.module.use_pc("player");
        f.module.load("m1", None).unwrap();
        let gfx = f.gfx.clone();
        let module = &mut f.module;

        let seen_while_locked = std::thread::scope(|scope| {
            let frame = gfx.frame_lock().acquire();
            let entering = scope.spawn(move || module.enter());
            std::thread::sleep(Duration::from_millis(50));
            let seen = (pc.area(), pc.position());
            drop(frame);
            entering.join().unwrap().unwrap();
            seen
        });

        assert_eq!(seen_while_locked, (None, Vector3::ZERO));
        assert_eq!(pc.area(), Some(f.module.current_area().unwrap().handle()));
        assert_eq!(pc.position(), Vector3::new(1.0, 1.0, 0.0));
        assert!(pc.is_visible());
        assert!(f.gfx.all_locked());
    }

    #[test]
    fn test_unload_detaches_pc_under_frame_lock() {
        let mut f = running();
        let pc = f.module.pc().unwrap().clone();
        let gfx = f.gfx.clone();
        let module = &mut f.module;

        let seen_while_locked = std::thread::scope(|scope| {
            let frame = gfx.frame_lock().acquire();
            let unloading = scope.spawn(move || module.unload(false));
            std::thread::sleep(Duration::from_millis(50));
            let seen = pc.area();
            drop(frame);
            unloading.join().unwrap();
            seen
        });

        assert!(seen_while_locked.is_some());
        assert_eq!(pc.area(), None);
        assert!(f.module.pc().is_some());
    }

    #[test]
    fn test_cleared_actions_do_not_run_later_in_the_same_tick() {
        let mut f = running();
        let pc = f.module.pc_ref();
        f.module.delay_script("clear", ScriptState::empty(), pc, ObjectRef::None, 5);
        f.module.delay_script("cancelled", ScriptState::empty(), pc, ObjectRef::None, 5);
        f.module.delay_script("unrelated", ScriptState::empty(), ObjectRef::None, ObjectRef::None, 5);

        let mut vm = ClearingVm::default();
        f.module.process(5, &mut vm, &mut EchoConsumer::default());

        assert_eq!(vm.inner.scripts(), vec!["clear", "unrelated"]);
        assert!(f.module.actions().is_empty());
    }

    #[test]
    fn test_enter_needs_module_and_pc() {
        let mut f = fixture();
        assert!(f.module.enter().is_err());

        f.module.load("m1", None).unwrap();
        assert!(f.module.enter().is_err());
        assert!(!f.module.is_running());
    }

    #[test]
    fn test_failed_load_leaves_nothing_behind() {
        let mut f = fixture();
        f.module.use_pc("player");

        assert!(f.module.load("broken", None).is_err());
        assert!(!f.module.is_loaded());
        assert!(f.module.areas().is_empty());
        assert_eq!(f.module.module_ref(), ObjectRef::None);
        // only the player survives
        assert_eq!(f.module.world().len(), 1);

        assert!(f.module.load("", None).is_err());
        assert!(f.module.load("nope", None).is_err());
    }

    #[test]
    fn test_entry_location_by_tag() {
        let mut f = fixture();
        let pc = f.module.use_pc("player");
        f.module.load("m1", Some("wp_b".into())).unwrap();
        f.module.enter().unwrap();

        assert_eq!(f.module.current_area().unwrap().resref(), "b");
        assert_eq!(pc.position(), Vector3::new(9.0, 9.0, 0.0));
    }

    #[test]
    fn test_scheduler_ordering() {
        let mut f = running();
        for (delay, script) in [(5, "five"), (3, "three_a"), (3, "three_b"), (8, "eight")] {
            f.module.delay_script(script, ScriptState::empty(), ObjectRef::None, ObjectRef::None, delay);
        }

        let mut vm = RecordingVm::default();
        f.module.process(2, &mut vm, &mut EchoConsumer::default());
        assert!(vm.runs.is_empty());

        f.module.process(8, &mut vm, &mut EchoConsumer::default());
        assert_eq!(vm.scripts(), vec!["three_a", "three_b", "five", "eight"]);
        assert!(f.module.actions().is_empty());

        f.module.process(9, &mut vm, &mut EchoConsumer::default());
        assert_eq!(vm.runs.len(), 4);
    }

    #[test]
    fn test_action_with_destroyed_owner_is_dropped() {
        let mut f = running();
        let guard = f.module.world().find_by_tag("guard", 0).unwrap();
        let owner = ObjectRef::Handle(guard.handle());
        f.module.delay_script("guard_idle", ScriptState::empty(), owner, ObjectRef::None, 10);
        f.module.delay_script("still_here", ScriptState::empty(), f.module.pc_ref(), owner, 10);
        f.module.delay_script("ok", ScriptState::empty(), f.module.pc_ref(), ObjectRef::None, 10);

        f.module.world().destroy(guard.handle());
        f.diagnostics.clear();

        let mut vm = RecordingVm::default();
        f.module.process(10, &mut vm, &mut EchoConsumer::default());
        assert_eq!(vm.scripts(), vec!["ok"]);
        assert!(f.diagnostics.is_empty());
        assert!(f.module.actions().is_empty());
    }

    #[test]
    fn test_events_raised_during_drain_wait_a_tick() {
        let mut f = running();
        let mut consumer = EchoConsumer::default();
        let mut vm = RecordingVm::default();

        f.module.add_event(Event::new(EventOrigin::Input, EventKind::Custom("click".into())));
        f.module.process(1, &mut vm, &mut consumer);
        assert_eq!(consumer.seen, vec![EventKind::Custom("click".into())]);
        assert_eq!(f.module.events().len(), 1);

        f.module.process(2, &mut vm, &mut consumer);
        assert_eq!(consumer.seen.len(), 2);
        assert_eq!(consumer.seen[1], EventKind::Custom("click+".into()));
    }

    #[test]
    fn test_quit_event_requests_exit() {
        let mut f = running();
        f.module.add_event(Event::quit());
        assert!(!f.module.exit_requested());

        let mut consumer = EchoConsumer::default();
        f.module.process(1, &mut RecordingVm::default(), &mut consumer);
        assert!(f.module.exit_requested());
        assert!(consumer.seen.is_empty());
    }

    #[test]
    fn test_module_switch_is_deferred() {
        let mut f = running();
        let pc = f.module.pc().unwrap().clone();

        f.module.load("m2", Some("wp_arrive".into())).unwrap();
        assert_eq!(f.module.name(), "m1");
        assert_eq!(f.module.pending_module().unwrap().module, "m2");

        let mut vm = RecordingVm::default();
        f.module.process(5, &mut vm, &mut EchoConsumer::default());

        assert_eq!(f.module.name(), "m2");
        assert!(f.module.is_running());
        assert!(!f.module.exit_requested());
        assert!(f.module.pending_module().is_none());
        assert_eq!(f.module.pc().unwrap().handle(), pc.handle());
        assert_eq!(f.module.current_area().unwrap().resref(), "c");
        assert_eq!(pc.position(), Vector3::new(5.0, 5.0, 0.0));
        assert!(f.module.world().find_by_tag("guard", 0).is_none());
    }

    #[test]
    fn test_failed_switch_requests_exit() {
        let mut f = running();
        f.module.load("nope", None).unwrap();
        f.module.process(5, &mut RecordingVm::default(), &mut EchoConsumer::default());

        assert!(!f.module.is_loaded());
        assert!(f.module.exit_requested());
    }

    #[test]
    fn test_pc_jump_switches_visible_area() {
        let mut f = running();
        let pc = f.module.pc().unwrap().clone();
        let guard = f.module.world().find_by_tag("guard", 0).unwrap();
        let b = f.module.areas()[1].clone();
        let before = f.module.moved_pc_count();

        let transition = f.module.jump_to(&pc, Some(&*b), Vector3::new(2.0, 2.0, 0.0)).unwrap();
        assert!(transition.changed_area());

        assert_eq!(f.module.moved_pc_count(), before + 1);
        assert_eq!(f.module.current_area().unwrap().handle(), b.handle());
        assert!(b.is_visible());
        assert!(!guard.is_visible());
        assert!(pc.is_visible());
        assert!(f.gfx.all_locked());
    }

    #[test]
    fn test_jump_without_area_changes_nothing() {
        let mut f = running();
        let guard = f.module.world().find_by_tag("guard", 0).unwrap();
        let before = guard.position();

        assert!(f.module.jump_to(&guard, None, Vector3::ZERO).is_none());
        assert_eq!(guard.position(), before);
        assert_eq!(f.diagnostics.messages(), vec!["jump_to(): No area?!? (1, 0)"]);
        assert_eq!(f.module.moved_pc_count(), 0);
    }

    #[test]
    fn test_move_pc_to_tag_in_module() {
        let mut f = running();
        f.module.move_pc_to("", "wp_b");
        let pc = f.module.pc().unwrap();
        assert_eq!(pc.position(), Vector3::new(9.0, 9.0, 0.0));
        assert_eq!(f.module.current_area().unwrap().resref(), "b");

        f.module.move_pc(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(f.module.pc().unwrap().position(), Vector3::new(1.0, 2.0, 3.0));

        f.module.move_pc_to("m2", "wp_arrive");
        assert_eq!(f.module.pending_module().unwrap().entry_location.as_deref(), Some("wp_arrive"));
    }

    #[test]
    fn test_unload_keeps_pc_for_transfer() {
        let mut f = running();
        let pc = f.module.pc().unwrap().clone();

        f.module.unload(false);
        assert!(!f.module.is_loaded());
        assert!(f.module.world().get(pc.handle()).is_some());
        assert_eq!(pc.area(), None);
        assert!(!pc.is_visible());

        f.module.unload(true);
        assert!(f.module.pc().is_none());
        assert!(f.module.world().is_empty());
    }

    #[test]
    fn test_leave() {
        let mut f = running();
        f.module.leave();
        assert_eq!(f.module.state(), ModuleState::Loaded);
        assert!(f.module.exit_requested());
        assert!(f.module.current_area().is_none());
    }
}
