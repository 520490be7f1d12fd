use crate::config::Config;
use crate::error::EngineError;
use crate::types::{JsObject, JsString, JsSymbol, JsValue, PropertyKey};
use std::cell::RefCell;
use std::rc::Rc;

pub mod completion;
pub use completion::{Completion, JsResult, assert_normal};
pub(crate) use completion::propagate;

mod types;
pub use types::*;

mod helpers;
pub(crate) use helpers::*;

pub mod realm;
pub use realm::{Intrinsic, Realm};

mod object_ops;
pub use object_ops::PreferredType;

pub mod iteration;
pub use iteration::{IteratorHint, IteratorRecord};

pub mod async_iteration;
pub use async_iteration::{AsyncCloseStep, AwaitHost, PendingAsyncClose, SynchronousAwait};

mod builtins;

const FIRST_USER_SYMBOL_ID: u64 = 64;

/// Object store plus realm. Every operation in the core takes the interpreter
/// as its explicit context; nothing is global.
pub struct Interpreter {
    objects: Vec<Rc<RefCell<JsObjectData>>>,
    realm: Realm,
    config: Config,
    next_symbol_id: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// An interpreter bounded by `config`, which must pass [`Config::validate`].
    pub fn with_config(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let mut interp = Self {
            objects: Vec::new(),
            realm: Realm::default(),
            config,
            next_symbol_id: FIRST_USER_SYMBOL_ID,
        };
        interp.setup_intrinsics();
        interp
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn realm(&self) -> &Realm {
        &self.realm
    }

    pub fn intrinsic(&self, name: Intrinsic) -> Option<JsObject> {
        self.realm.get(name)
    }

    fn intrinsic_data(&self, name: Intrinsic) -> Option<Rc<RefCell<JsObjectData>>> {
        self.realm.get(name).and_then(|o| self.get_object(o.id))
    }

    pub(crate) fn get_object(&self, id: u64) -> Option<Rc<RefCell<JsObjectData>>> {
        self.objects.get(id as usize).cloned()
    }

    pub(crate) fn allocate_object_slot(&mut self, obj: Rc<RefCell<JsObjectData>>) -> JsObject {
        let id = self.objects.len() as u64;
        obj.borrow_mut().id = Some(id);
        self.objects.push(obj);
        JsObject { id }
    }

    /// ObjectCreate / OrdinaryObjectCreate with an explicit prototype
    /// (`None` for a null prototype).
    pub fn create_object_with_proto(&mut self, kind: ObjectKind, proto: Option<JsObject>) -> JsObject {
        let mut data = JsObjectData::new();
        data.kind = kind;
        data.prototype = proto.and_then(|p| self.get_object(p.id));
        if kind == ObjectKind::Array {
            data.array_elements = Some(ArrayElements::default());
        }
        self.allocate_object_slot(Rc::new(RefCell::new(data)))
    }

    /// A fresh ordinary object inheriting from `%Object.prototype%`.
    pub fn create_object(&mut self) -> JsObject {
        let proto = self.intrinsic(Intrinsic::ObjectPrototype);
        self.create_object_with_proto(ObjectKind::Ordinary, proto)
    }

    pub fn create_array(&mut self, elements: Vec<JsValue>) -> JsObject {
        let proto = self.intrinsic(Intrinsic::ArrayPrototype);
        let arr = self.create_object_with_proto(ObjectKind::Array, proto);
        if let Some(data) = self.get_object(arr.id) {
            data.borrow_mut().array_elements = Some(ArrayElements::from_values(elements));
        }
        arr
    }

    /// CreateBuiltinFunction (§10.3.4) with SetFunctionName / SetFunctionLength.
    pub fn create_function(&mut self, func: JsFunction) -> JsValue {
        let mut obj_data = JsObjectData::new();
        obj_data.prototype = self.intrinsic_data(Intrinsic::FunctionPrototype);
        obj_data.insert_property(
            "length",
            PropertyDescriptor::data(JsValue::Number(func.arity as f64), false, false, true),
        );
        obj_data.insert_property(
            "name",
            PropertyDescriptor::data(JsValue::string(&func.name), false, false, true),
        );
        obj_data.callable = Some(func);
        JsValue::Object(self.allocate_object_slot(Rc::new(RefCell::new(obj_data))))
    }

    pub fn create_symbol(&mut self, description: Option<&str>) -> JsValue {
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        JsValue::Symbol(JsSymbol {
            id,
            description: description.map(JsString::from_str),
        })
    }

    fn create_error(&mut self, proto: Intrinsic, msg: &str) -> JsValue {
        let proto = self.intrinsic(proto);
        let err = self.create_object_with_proto(ObjectKind::Error, proto);
        if let Some(data) = self.get_object(err.id) {
            data.borrow_mut()
                .insert_builtin("message", JsValue::string(msg));
        }
        JsValue::Object(err)
    }

    pub fn create_type_error(&mut self, msg: &str) -> JsValue {
        self.create_error(Intrinsic::TypeErrorPrototype, msg)
    }

    pub fn create_range_error(&mut self, msg: &str) -> JsValue {
        self.create_error(Intrinsic::RangeErrorPrototype, msg)
    }

    pub fn throw_type_error(&mut self, msg: &str) -> Completion {
        Completion::Throw(self.create_type_error(msg))
    }

    /// Whether `val` is a TypeError object created by this interpreter.
    pub fn is_type_error(&self, val: &JsValue) -> bool {
        self.error_prototype_is(val, Intrinsic::TypeErrorPrototype)
    }

    pub fn is_range_error(&self, val: &JsValue) -> bool {
        self.error_prototype_is(val, Intrinsic::RangeErrorPrototype)
    }

    fn error_prototype_is(&self, val: &JsValue, proto: Intrinsic) -> bool {
        let (Some(o), Some(expected)) = (val.as_object(), self.intrinsic_data(proto)) else {
            return false;
        };
        self.get_object(o.id).is_some_and(|data| {
            let data = data.borrow();
            data.kind == ObjectKind::Error
                && data
                    .prototype
                    .as_ref()
                    .is_some_and(|p| Rc::ptr_eq(p, &expected))
        })
    }

    /// Human-readable rendering of a thrown value for host diagnostics.
    /// Reads data properties only; never runs script code.
    pub fn describe_thrown(&self, val: &JsValue) -> String {
        if let Some(o) = val.as_object()
            && let Some(data) = self.get_object(o.id)
        {
            let name_key = PropertyKey::from("name");
            let message_key = PropertyKey::from("message");
            let mut name = None;
            let mut message = None;
            let mut current = Some(data);
            while let Some(obj) = current {
                let b = obj.borrow();
                if name.is_none() {
                    name = b.get_property_value(&name_key);
                }
                if message.is_none() {
                    message = b.get_property_value(&message_key);
                }
                current = b.prototype.clone();
            }
            let name = name.and_then(|v| primitive_to_string(&v)).unwrap_or_default();
            let message = message
                .and_then(|v| primitive_to_string(&v))
                .unwrap_or_default();
            return match (name.is_empty(), message.is_empty()) {
                (true, _) => "[object]".to_string(),
                (false, true) => name,
                (false, false) => format!("{name}: {message}"),
            };
        }
        match val {
            JsValue::Symbol(s) => s.descriptive_string(),
            other => primitive_to_string(other).unwrap_or_default(),
        }
    }

    /// Hands a completion to the host: the value of a normal completion, or an
    /// `EngineError` for anything abrupt.
    pub fn completion_into_host(&self, completion: Completion) -> Result<JsValue, EngineError> {
        match completion {
            Completion::Normal(v) => Ok(v),
            Completion::Throw(e) => Err(EngineError::Uncaught(self.describe_thrown(&e))),
            other => Err(EngineError::EscapedControlTransfer(other.kind_name())),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsics_are_registered() {
        let interp = Interpreter::new();
        for name in [
            Intrinsic::ObjectPrototype,
            Intrinsic::FunctionPrototype,
            Intrinsic::IteratorPrototype,
            Intrinsic::AsyncIteratorPrototype,
            Intrinsic::AsyncFromSyncIteratorPrototype,
            Intrinsic::ObjProtoToString,
            Intrinsic::ObjProtoValueOf,
        ] {
            assert!(interp.intrinsic(name).is_some(), "missing {}", name.name());
        }
    }

    #[test]
    fn type_errors_render_for_the_host() {
        let mut interp = Interpreter::new();
        let err = interp.create_type_error("boom");
        assert!(interp.is_type_error(&err));
        assert!(!interp.is_range_error(&err));
        assert_eq!(interp.describe_thrown(&err), "TypeError: boom");
        let host = interp.completion_into_host(Completion::Throw(err));
        assert!(matches!(host, Err(EngineError::Uncaught(ref m)) if m == "TypeError: boom"));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let zero = Config::default().with_max_prototype_chain_depth(0);
        assert!(matches!(Interpreter::with_config(zero), Err(EngineError::Config(_))));
        let interp = Interpreter::with_config(Config::default().with_max_prototype_chain_depth(5))
            .unwrap();
        assert_eq!(interp.config().max_prototype_chain_depth, 5);
    }

    #[test]
    fn symbols_render_with_their_description() {
        let mut interp = Interpreter::new();
        let sym = interp.create_symbol(Some("tag"));
        assert_eq!(interp.describe_thrown(&sym), "Symbol(tag)");
        let anonymous = interp.create_symbol(None);
        assert_eq!(interp.describe_thrown(&anonymous), "Symbol()");
    }

    #[test]
    fn user_symbols_never_collide_with_well_known_ones() {
        let mut interp = Interpreter::new();
        let JsValue::Symbol(sym) = interp.create_symbol(Some("Symbol.iterator")) else {
            panic!("expected a symbol");
        };
        assert_ne!(sym.to_property_key(), crate::types::WellKnownSymbol::Iterator.key());
    }

    #[test]
    fn escaped_break_is_a_host_error() {
        let interp = Interpreter::new();
        let host = interp.completion_into_host(Completion::Break(None, None));
        assert!(matches!(host, Err(EngineError::EscapedControlTransfer("break"))));
    }

    #[test]
    fn builtin_functions_carry_name_and_length() {
        let mut interp = Interpreter::new();
        let f = interp.create_function(JsFunction::native("probe", 2, |_, _, _| {
            Completion::Normal(JsValue::Undefined)
        }));
        let o = f.as_object().unwrap();
        let length = assert_normal(interp.get_own_property(&o, "length")).unwrap();
        assert!(matches!(length.value, Some(JsValue::Number(n)) if n == 2.0));
        assert_eq!(length.writable, Some(false));
        assert_eq!(length.enumerable, Some(false));
        assert_eq!(length.configurable, Some(true));
        let name = assert_normal(interp.get_own_property(&o, "name")).unwrap();
        assert!(matches!(name.value, Some(JsValue::String(ref s)) if s.to_string() == "probe"));
    }
}
