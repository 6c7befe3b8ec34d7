//! Headless script playback
//!
//! Stands in for a real script VM: every script is an ordered list of host
//! calls read from the content file. Actions passed to `DelayCommand` or
//! `AssignCommand` name another call list, which runs when the action is
//! resumed.

use anyhow::Context;
use aurora_core::ObjectRef;
use aurora_module::{Module, StaticContent};
use aurora_scripting::{CallSite, CallTable, Result, ScriptState, ScriptVm, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Object argument of a recorded call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectArg {
    #[serde(rename = "self")]
    Caller,
    Invalid,
    Pc,
    Module,
    Tag(String),
}

/// Argument of a recorded call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arg {
    Int(i32),
    Float(f32),
    String(String),
    Vector([f32; 3]),
    Object(ObjectArg),
    /// Deferred action: the name of the call list to run later
    Action(String),
}

/// One host call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptCall {
    pub function: String,
    #[serde(default)]
    pub args: Vec<Arg>,
}

/// Saved frame of a deferred action
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActionFrame(String);

/// Everything the runner reads from its content file
#[derive(Debug, Default, Deserialize)]
pub struct RunnerContent {
    #[serde(flatten)]
    pub content: StaticContent,
    #[serde(default)]
    pub scripts: HashMap<String, Vec<ScriptCall>>,
}

impl RunnerContent {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing content")
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading content file {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Script VM replaying recorded host calls
pub struct PlaybackVm {
    call_table: Arc<CallTable<Module>>,
    scripts: HashMap<String, Vec<ScriptCall>>,
    calls: u64,
}

impl PlaybackVm {
    pub fn new(call_table: Arc<CallTable<Module>>, scripts: HashMap<String, Vec<ScriptCall>>) -> Self {
        Self {
            call_table,
            scripts,
            calls: 0,
        }
    }

    /// Host calls made so far
    pub fn calls(&self) -> u64 {
        self.calls
    }

    fn to_value(arg: &Arg, module: &Module) -> Value {
        match arg {
            Arg::Int(v) => Value::Int(*v),
            Arg::Float(v) => Value::Float(*v),
            Arg::String(v) => Value::String(v.clone()),
            Arg::Vector(v) => Value::Vector((*v).into()),
            Arg::Object(object) => Value::Object(match object {
                ObjectArg::Caller => ObjectRef::Caller,
                ObjectArg::Invalid => ObjectRef::None,
                ObjectArg::Pc => module.pc_ref(),
                ObjectArg::Module => module.module_ref(),
                ObjectArg::Tag(tag) => module
                    .world()
                    .find_by_tag(tag, 0)
                    .map(|object| object.handle())
                    .into(),
            }),
            Arg::Action(name) => Value::ScriptState(ScriptState::new(ActionFrame(name.clone()))),
        }
    }
}

impl ScriptVm<Module> for PlaybackVm {
    fn run(
        &mut self,
        host: &mut Module,
        script: &str,
        state: &ScriptState,
        owner: ObjectRef,
        triggerer: ObjectRef,
    ) -> Result<()> {
        let name = state
            .downcast_ref::<ActionFrame>()
            .map(|frame| frame.0.as_str())
            .unwrap_or(script);

        let Some(calls) = self.scripts.get(name) else {
            tracing::debug!("No script \"{}\"", name);
            return Ok(());
        };

        tracing::debug!("Running \"{}\" ({} calls)", name, calls.len());
        for call in calls {
            let args = call.args.iter().map(|arg| Self::to_value(arg, host)).collect();
            let site = CallSite::new(script, owner, triggerer);

            self.calls += 1;
            if let Err(err) = self.call_table.invoke_by_name(host, &call.function, args, site) {
                tracing::warn!("{}: {}", name, err);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"{
        "modules": {
            "demo": {
                "name": "Demo",
                "areas": ["yard"],
                "entry_area": "yard",
                "on_client_enter": "greet"
            }
        },
        "areas": {
            "yard": {
                "name": "Yard",
                "objects": [{"type": "placeable", "tag": "well", "position": {"x": 4.0, "y": 0.0, "z": 0.0}}]
            }
        },
        "scripts": {
            "greet": [
                {"function": "PrintString", "args": [{"string": "hello"}]},
                {"function": "DelayCommand", "args": [{"float": 1.0}, {"action": "later"}]}
            ],
            "later": [
                {"function": "AssignCommand", "args": [{"object": "pc"}, {"action": "walk"}]}
            ],
            "walk": [
                {"function": "JumpToObject", "args": [{"object": {"tag": "well"}}]}
            ]
        }
    }"#;

    #[test]
    fn test_parse_content() {
        let content = RunnerContent::from_json(CONTENT).unwrap();
        assert!(content.content.modules.contains_key("demo"));
        assert_eq!(content.scripts["greet"].len(), 2);
        assert_eq!(
            content.scripts["later"][0].args[0],
            Arg::Object(ObjectArg::Pc)
        );
        assert_eq!(
            content.scripts["walk"][0].args[0],
            Arg::Object(ObjectArg::Tag("well".into()))
        );
    }

    #[test]
    fn test_self_object_arg() {
        let arg: Arg = serde_json::from_str(r#"{"object": "self"}"#).unwrap();
        assert_eq!(arg, Arg::Object(ObjectArg::Caller));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, CONTENT).unwrap();
        assert!(RunnerContent::load(&path).is_ok());
        assert!(RunnerContent::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_playback_runs_delayed_action() {
        use aurora_areas::HeadlessRenderer;
        use aurora_core::{RecordedDiagnostics, Vector3};
        use aurora_module::{Engine, LoggingConsumer};

        let content = RunnerContent::from_json(CONTENT).unwrap();
        let call_table = Arc::new(CallTable::new());
        let vm = PlaybackVm::new(call_table.clone(), content.scripts);
        let module = Module::new(
            Box::new(content.content),
            Arc::new(HeadlessRenderer::new()),
            Arc::new(RecordedDiagnostics::new()),
        );
        let mut engine = Engine::new(call_table, module, Box::new(vm), Box::new(LoggingConsumer)).unwrap();

        engine.start("demo", None, "player").unwrap();
        assert!(engine.tick(0));
        assert_eq!(engine.module().actions().len(), 1);

        // The assigned action lands at 1000 too, but only runs next tick
        assert!(engine.tick(1000));
        assert_eq!(engine.module().actions().len(), 1);

        assert!(engine.tick(1001));
        assert!(engine.module().actions().is_empty());
        assert_eq!(
            engine.module().pc().unwrap().position(),
            Vector3::new(4.0, 0.0, 0.0)
        );
    }
}
