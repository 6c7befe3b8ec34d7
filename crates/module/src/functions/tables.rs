//! Host-function catalogue
//!
//! Three rows per function, co-indexed by ID. Entries without a native
//! implementation are bound to the diagnostic stub.

use super::{commands, math, movement, objects, output};
use crate::module::Module;
use aurora_scripting::{Catalogue, DefaultValue, FunctionDefaults, FunctionPointer, FunctionSignature, ValueType};

const VOID: ValueType = ValueType::Void;
const INT: ValueType = ValueType::Int;
const FLOAT: ValueType = ValueType::Float;
const STRING: ValueType = ValueType::String;
const OBJECT: ValueType = ValueType::Object;
const VECTOR: ValueType = ValueType::Vector;
const ENGINE: ValueType = ValueType::EngineType;
const ACTION: ValueType = ValueType::ScriptState;

const TRUE: DefaultValue = DefaultValue::Int(1);
const FALSE: DefaultValue = DefaultValue::Int(0);
const SELF: DefaultValue = DefaultValue::OBJECT_SELF;

pub const FUNCTION_POINTERS: &[FunctionPointer<Module>] = &[
    FunctionPointer { id: 0, name: "Random", func: Some(math::random) },
    FunctionPointer { id: 1, name: "PrintString", func: Some(output::print_string) },
    FunctionPointer { id: 2, name: "PrintFloat", func: Some(output::print_float) },
    FunctionPointer { id: 3, name: "FloatToString", func: Some(output::float_to_string) },
    FunctionPointer { id: 4, name: "PrintInteger", func: Some(output::print_integer) },
    FunctionPointer { id: 5, name: "PrintObject", func: Some(output::print_object) },
    FunctionPointer { id: 6, name: "AssignCommand", func: Some(commands::assign_command) },
    FunctionPointer { id: 7, name: "DelayCommand", func: Some(commands::delay_command) },
    FunctionPointer { id: 8, name: "ExecuteScript", func: Some(commands::execute_script) },
    FunctionPointer { id: 9, name: "ClearAllActions", func: Some(commands::clear_all_actions) },
    FunctionPointer { id: 10, name: "SetFacing", func: Some(objects::set_facing) },
    FunctionPointer { id: 11, name: "GetTag", func: Some(objects::get_tag) },
    FunctionPointer { id: 12, name: "GetIsObjectValid", func: Some(objects::get_is_object_valid) },
    FunctionPointer { id: 13, name: "GetPosition", func: Some(objects::get_position) },
    FunctionPointer { id: 14, name: "GetArea", func: Some(objects::get_area) },
    FunctionPointer { id: 15, name: "GetModule", func: Some(objects::get_module) },
    FunctionPointer { id: 16, name: "GetFirstPC", func: Some(objects::get_first_pc) },
    FunctionPointer { id: 17, name: "GetDistanceBetween", func: Some(objects::get_distance_between) },
    FunctionPointer { id: 18, name: "JumpToObject", func: Some(movement::jump_to_object) },
    FunctionPointer { id: 19, name: "JumpToLocation", func: Some(movement::jump_to_location) },
    FunctionPointer { id: 20, name: "Location", func: Some(movement::location) },
    FunctionPointer { id: 21, name: "GetLocation", func: Some(movement::get_location) },
    FunctionPointer { id: 22, name: "GetObjectByTag", func: Some(objects::get_object_by_tag) },
    FunctionPointer { id: 23, name: "d20", func: Some(math::d20) },
    FunctionPointer { id: 24, name: "d6", func: Some(math::d6) },
    FunctionPointer { id: 25, name: "IntToString", func: Some(output::int_to_string) },
    FunctionPointer { id: 26, name: "StartNewModule", func: Some(movement::start_new_module) },
    FunctionPointer { id: 27, name: "Vector", func: Some(math::vector) },
    FunctionPointer { id: 28, name: "SetLocalInt", func: None },
    FunctionPointer { id: 29, name: "GetLocalInt", func: None },
    FunctionPointer { id: 30, name: "PlaySound", func: None },
    FunctionPointer { id: 31, name: "SpeakString", func: None },
    FunctionPointer { id: 32, name: "ActionMoveToObject", func: None },
    FunctionPointer { id: 33, name: "GetNearestObjectByTag", func: None },
    FunctionPointer { id: 34, name: "ApplyEffectToObject", func: None },
];

pub const FUNCTION_SIGNATURES: &[FunctionSignature] = &[
    FunctionSignature { id: 0, return_type: INT, parameters: &[INT] },
    FunctionSignature { id: 1, return_type: VOID, parameters: &[STRING] },
    FunctionSignature { id: 2, return_type: VOID, parameters: &[FLOAT, INT, INT] },
    FunctionSignature { id: 3, return_type: STRING, parameters: &[FLOAT, INT, INT] },
    FunctionSignature { id: 4, return_type: VOID, parameters: &[INT] },
    FunctionSignature { id: 5, return_type: VOID, parameters: &[OBJECT] },
    FunctionSignature { id: 6, return_type: VOID, parameters: &[OBJECT, ACTION] },
    FunctionSignature { id: 7, return_type: VOID, parameters: &[FLOAT, ACTION] },
    FunctionSignature { id: 8, return_type: VOID, parameters: &[STRING, OBJECT] },
    FunctionSignature { id: 9, return_type: VOID, parameters: &[INT] },
    FunctionSignature { id: 10, return_type: VOID, parameters: &[FLOAT] },
    FunctionSignature { id: 11, return_type: STRING, parameters: &[OBJECT] },
    FunctionSignature { id: 12, return_type: INT, parameters: &[OBJECT] },
    FunctionSignature { id: 13, return_type: VECTOR, parameters: &[OBJECT] },
    FunctionSignature { id: 14, return_type: OBJECT, parameters: &[OBJECT] },
    FunctionSignature { id: 15, return_type: OBJECT, parameters: &[] },
    FunctionSignature { id: 16, return_type: OBJECT, parameters: &[] },
    FunctionSignature { id: 17, return_type: FLOAT, parameters: &[OBJECT, OBJECT] },
    FunctionSignature { id: 18, return_type: VOID, parameters: &[OBJECT, INT] },
    FunctionSignature { id: 19, return_type: VOID, parameters: &[ENGINE] },
    FunctionSignature { id: 20, return_type: ENGINE, parameters: &[OBJECT, VECTOR, FLOAT] },
    FunctionSignature { id: 21, return_type: ENGINE, parameters: &[OBJECT] },
    FunctionSignature { id: 22, return_type: OBJECT, parameters: &[STRING, INT] },
    FunctionSignature { id: 23, return_type: INT, parameters: &[INT] },
    FunctionSignature { id: 24, return_type: INT, parameters: &[INT] },
    FunctionSignature { id: 25, return_type: STRING, parameters: &[INT] },
    FunctionSignature { id: 26, return_type: VOID, parameters: &[STRING] },
    FunctionSignature { id: 27, return_type: VECTOR, parameters: &[FLOAT, FLOAT, FLOAT] },
    FunctionSignature { id: 28, return_type: VOID, parameters: &[OBJECT, STRING, INT] },
    FunctionSignature { id: 29, return_type: INT, parameters: &[OBJECT, STRING] },
    FunctionSignature { id: 30, return_type: VOID, parameters: &[STRING] },
    FunctionSignature { id: 31, return_type: VOID, parameters: &[STRING, INT] },
    FunctionSignature { id: 32, return_type: VOID, parameters: &[OBJECT, INT, FLOAT] },
    FunctionSignature { id: 33, return_type: OBJECT, parameters: &[STRING, OBJECT, INT] },
    FunctionSignature { id: 34, return_type: VOID, parameters: &[INT, ENGINE, OBJECT, FLOAT] },
];

pub const FUNCTION_DEFAULTS: &[FunctionDefaults] = &[
    FunctionDefaults { id: 0, defaults: &[] },
    FunctionDefaults { id: 1, defaults: &[] },
    FunctionDefaults { id: 2, defaults: &[Some(DefaultValue::Int(18)), Some(DefaultValue::Int(9))] },
    FunctionDefaults { id: 3, defaults: &[Some(DefaultValue::Int(18)), Some(DefaultValue::Int(9))] },
    FunctionDefaults { id: 4, defaults: &[] },
    FunctionDefaults { id: 5, defaults: &[] },
    FunctionDefaults { id: 6, defaults: &[] },
    FunctionDefaults { id: 7, defaults: &[] },
    FunctionDefaults { id: 8, defaults: &[Some(SELF)] },
    FunctionDefaults { id: 9, defaults: &[Some(FALSE)] },
    FunctionDefaults { id: 10, defaults: &[] },
    FunctionDefaults { id: 11, defaults: &[] },
    FunctionDefaults { id: 12, defaults: &[] },
    FunctionDefaults { id: 13, defaults: &[Some(SELF)] },
    FunctionDefaults { id: 14, defaults: &[Some(SELF)] },
    FunctionDefaults { id: 15, defaults: &[] },
    FunctionDefaults { id: 16, defaults: &[] },
    FunctionDefaults { id: 17, defaults: &[Some(SELF)] },
    FunctionDefaults { id: 18, defaults: &[Some(TRUE)] },
    FunctionDefaults { id: 19, defaults: &[] },
    FunctionDefaults { id: 20, defaults: &[] },
    FunctionDefaults { id: 21, defaults: &[] },
    FunctionDefaults { id: 22, defaults: &[Some(FALSE)] },
    FunctionDefaults { id: 23, defaults: &[Some(TRUE)] },
    FunctionDefaults { id: 24, defaults: &[Some(TRUE)] },
    FunctionDefaults { id: 25, defaults: &[] },
    FunctionDefaults { id: 26, defaults: &[] },
    FunctionDefaults {
        id: 27,
        defaults: &[Some(DefaultValue::Float(0.0)), Some(DefaultValue::Float(0.0)), Some(DefaultValue::Float(0.0))],
    },
    FunctionDefaults { id: 28, defaults: &[] },
    FunctionDefaults { id: 29, defaults: &[] },
    FunctionDefaults { id: 30, defaults: &[] },
    FunctionDefaults { id: 31, defaults: &[Some(FALSE)] },
    FunctionDefaults { id: 32, defaults: &[Some(FALSE), Some(DefaultValue::Float(1.0))] },
    FunctionDefaults { id: 33, defaults: &[Some(SELF), Some(TRUE)] },
    FunctionDefaults { id: 34, defaults: &[Some(DefaultValue::Float(0.0))] },
];

/// The engine's complete catalogue
pub fn catalogue() -> Catalogue<'static, Module> {
    Catalogue::new(FUNCTION_POINTERS, FUNCTION_SIGNATURES, FUNCTION_DEFAULTS)
}
