use super::Interpreter;
use super::completion::Completion;
use super::helpers::same_value;
use super::iteration::IteratorRecord;
use crate::types::{JsValue, PropertyKey};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub type NativeFn = Rc<dyn Fn(&mut Interpreter, &JsValue, &[JsValue]) -> Completion>;

/// Behavior attached to a callable object, plus the `name`/`length`
/// metadata installed on it at creation.
#[derive(Clone)]
pub struct JsFunction {
    pub name: String,
    pub arity: usize,
    pub behavior: NativeFn,
}

impl JsFunction {
    pub fn native(
        name: impl Into<String>,
        arity: usize,
        f: impl Fn(&mut Interpreter, &JsValue, &[JsValue]) -> Completion + 'static,
    ) -> Self {
        JsFunction {
            name: name.into(),
            arity,
            behavior: Rc::new(f),
        }
    }
}

impl std::fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JsFunction::Native({:?}, {})", self.name, self.arity)
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub get: Option<JsValue>,
    pub set: Option<JsValue>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            get: None,
            set: None,
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    pub fn data_default(value: JsValue) -> Self {
        Self::data(value, true, true, true)
    }

    pub fn accessor(
        get: Option<JsValue>,
        set: Option<JsValue>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            value: None,
            writable: None,
            get: Some(get.unwrap_or(JsValue::Undefined)),
            set: Some(set.unwrap_or(JsValue::Undefined)),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    pub fn is_enumerable(&self) -> bool {
        self.enumerable == Some(true)
    }

    // Fill absent fields with their defaults (§6.2.6 default attribute values)
    fn completed(mut self) -> Self {
        if self.is_accessor_descriptor() {
            self.get.get_or_insert(JsValue::Undefined);
            self.set.get_or_insert(JsValue::Undefined);
        } else {
            self.value.get_or_insert(JsValue::Undefined);
            self.writable.get_or_insert(false);
        }
        self.enumerable.get_or_insert(false);
        self.configurable.get_or_insert(false);
        self
    }

    fn merged_with(mut self, desc: PropertyDescriptor) -> Self {
        if self.is_data_descriptor() && desc.is_accessor_descriptor() {
            self.value = None;
            self.writable = None;
            self.get = Some(JsValue::Undefined);
            self.set = Some(JsValue::Undefined);
        } else if self.is_accessor_descriptor() && desc.is_data_descriptor() {
            self.get = None;
            self.set = None;
            self.value = Some(JsValue::Undefined);
            self.writable = Some(false);
        }
        if desc.value.is_some() {
            self.value = desc.value;
        }
        if desc.writable.is_some() {
            self.writable = desc.writable;
        }
        if desc.get.is_some() {
            self.get = desc.get;
        }
        if desc.set.is_some() {
            self.set = desc.set;
        }
        if desc.enumerable.is_some() {
            self.enumerable = desc.enumerable;
        }
        if desc.configurable.is_some() {
            self.configurable = desc.configurable;
        }
        self
    }
}

// ValidateAndApplyPropertyDescriptor (§10.1.6.3), validation half
pub(crate) fn is_compatible_descriptor(
    current: &PropertyDescriptor,
    desc: &PropertyDescriptor,
) -> bool {
    if current.configurable != Some(false) {
        return true;
    }
    if desc.configurable == Some(true) {
        return false;
    }
    if desc.enumerable.is_some() && desc.enumerable != current.enumerable {
        return false;
    }
    if !desc.is_data_descriptor() && !desc.is_accessor_descriptor() {
        return true;
    }
    if current.is_data_descriptor() != desc.is_data_descriptor() {
        return false;
    }
    let unchanged = |cur: &Option<JsValue>, new: &Option<JsValue>| match (cur, new) {
        (_, None) => true,
        (Some(c), Some(n)) => same_value(c, n),
        (None, Some(_)) => false,
    };
    if current.is_accessor_descriptor() {
        return unchanged(&current.get, &desc.get) && unchanged(&current.set, &desc.set);
    }
    if current.writable == Some(false) {
        if desc.writable == Some(true) {
            return false;
        }
        return unchanged(&current.value, &desc.value);
    }
    true
}

/// Closed set of object variants. The object-tag algorithm in
/// `Object.prototype.toString` matches on these in a fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Ordinary,
    Array,
    String,
    Arguments,
    Error,
    Boolean,
    Number,
    Symbol,
    BigInt,
    Date,
    RegExp,
}

/// Element storage of an Array exotic object. Indices are dense up to the
/// first gap; anything past a gap lives in `sparse`. `length` is tracked on
/// its own and may exceed every stored index.
#[derive(Debug, Clone, Default)]
pub struct ArrayElements {
    dense: Vec<JsValue>,
    sparse: BTreeMap<u32, JsValue>,
    length: u32,
}

impl ArrayElements {
    pub fn from_values(values: Vec<JsValue>) -> Self {
        Self {
            length: u32::try_from(values.len()).unwrap_or(u32::MAX),
            dense: values,
            sparse: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn get(&self, index: u32) -> Option<&JsValue> {
        self.dense
            .get(index as usize)
            .or_else(|| self.sparse.get(&index))
    }

    // `index` is an array index (< 2^32 - 1), so `index + 1` fits.
    pub fn set(&mut self, index: u32, value: JsValue) {
        let at = index as usize;
        if at < self.dense.len() {
            self.dense[at] = value;
        } else if at == self.dense.len() {
            self.dense.push(value);
            while let Some(next) = self.sparse.remove(&(self.dense.len() as u32)) {
                self.dense.push(next);
            }
        } else {
            self.sparse.insert(index, value);
        }
        self.length = self.length.max(index + 1);
    }

    /// ArraySetLength without the attribute checks: drops every element at or
    /// past `length`.
    pub fn set_len(&mut self, length: u32) {
        self.dense.truncate(length as usize);
        self.sparse.retain(|&index, _| index < length);
        self.length = length;
    }
}

#[derive(Debug, Clone)]
pub enum IteratorState {
    List {
        list: Rc<[JsValue]>,
        next_index: usize,
    },
    AsyncFromSync {
        sync: IteratorRecord,
    },
}

pub struct JsObjectData {
    pub id: Option<u64>,
    pub properties: FxHashMap<PropertyKey, PropertyDescriptor>,
    pub property_order: Vec<PropertyKey>,
    pub prototype: Option<Rc<RefCell<JsObjectData>>>,
    pub callable: Option<JsFunction>,
    pub array_elements: Option<ArrayElements>,
    pub kind: ObjectKind,
    pub extensible: bool,
    pub primitive_value: Option<JsValue>,
    pub iterator_state: Option<IteratorState>,
}

impl JsObjectData {
    pub(crate) fn new() -> Self {
        Self {
            id: None,
            properties: FxHashMap::default(),
            property_order: Vec::new(),
            prototype: None,
            callable: None,
            array_elements: None,
            kind: ObjectKind::Ordinary,
            extensible: true,
            primitive_value: None,
            iterator_state: None,
        }
    }

    pub fn get_own_property(&self, key: &PropertyKey) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    // OrdinaryDefineOwnProperty over the property table
    pub fn define_own_property(&mut self, key: PropertyKey, desc: PropertyDescriptor) -> bool {
        match self.properties.get(&key) {
            Some(current) => {
                if !is_compatible_descriptor(current, &desc) {
                    return false;
                }
                let merged = current.clone().merged_with(desc);
                self.properties.insert(key, merged);
                true
            }
            None => {
                if !self.extensible {
                    return false;
                }
                self.property_order.push(key.clone());
                self.properties.insert(key, desc.completed());
                true
            }
        }
    }

    pub fn insert_builtin(&mut self, key: impl Into<PropertyKey>, value: JsValue) {
        self.insert_property(key, PropertyDescriptor::data(value, true, false, true));
    }

    pub fn insert_property(&mut self, key: impl Into<PropertyKey>, desc: PropertyDescriptor) {
        let key = key.into();
        if !self.properties.contains_key(&key) {
            self.property_order.push(key.clone());
        }
        self.properties.insert(key, desc);
    }

    pub fn get_property_value(&self, key: &PropertyKey) -> Option<JsValue> {
        self.properties.get(key).and_then(|d| d.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_property_defaults_are_false() {
        let mut obj = JsObjectData::new();
        let partial = PropertyDescriptor {
            value: Some(JsValue::Number(1.0)),
            writable: None,
            get: None,
            set: None,
            enumerable: None,
            configurable: None,
        };
        assert!(obj.define_own_property("x".into(), partial));
        let desc = obj.get_own_property(&"x".into()).unwrap();
        assert_eq!(desc.writable, Some(false));
        assert_eq!(desc.enumerable, Some(false));
        assert_eq!(desc.configurable, Some(false));
    }

    #[test]
    fn frozen_property_rejects_changes() {
        let mut obj = JsObjectData::new();
        obj.insert_property(
            "x",
            PropertyDescriptor::data(JsValue::Number(1.0), false, false, false),
        );
        assert!(!obj.define_own_property(
            "x".into(),
            PropertyDescriptor::data(JsValue::Number(2.0), false, false, false)
        ));
        assert!(obj.define_own_property(
            "x".into(),
            PropertyDescriptor::data(JsValue::Number(1.0), false, false, false)
        ));
    }

    #[test]
    fn partial_update_keeps_other_attributes() {
        let mut obj = JsObjectData::new();
        obj.insert_builtin("m", JsValue::Null);
        let only_value = PropertyDescriptor {
            value: Some(JsValue::Boolean(true)),
            writable: None,
            get: None,
            set: None,
            enumerable: None,
            configurable: None,
        };
        assert!(obj.define_own_property("m".into(), only_value));
        let desc = obj.get_own_property(&"m".into()).unwrap();
        assert!(matches!(desc.value, Some(JsValue::Boolean(true))));
        assert_eq!(desc.writable, Some(true));
        assert_eq!(desc.enumerable, Some(false));
    }

    #[test]
    fn non_extensible_object_rejects_new_keys() {
        let mut obj = JsObjectData::new();
        obj.extensible = false;
        assert!(!obj.define_own_property(
            "y".into(),
            PropertyDescriptor::data_default(JsValue::Undefined)
        ));
        assert!(obj.property_order.is_empty());
    }

    #[test]
    fn symbol_and_string_keys_are_separate_slots() {
        let mut obj = JsObjectData::new();
        let sym = PropertyKey::Symbol(3);
        obj.insert_builtin(sym.clone(), JsValue::Boolean(true));
        obj.insert_builtin("[Symbol #3]", JsValue::Boolean(false));
        assert!(matches!(obj.get_property_value(&sym), Some(JsValue::Boolean(true))));
        assert_eq!(obj.property_order.len(), 2);
    }

    #[test]
    fn array_elements_fill_gaps_from_the_sparse_side() {
        let mut elems = ArrayElements::from_values(vec![JsValue::Number(0.0)]);
        elems.set(2, JsValue::Number(2.0));
        assert_eq!(elems.len(), 3);
        assert!(elems.get(1).is_none());
        elems.set(1, JsValue::Number(1.0));
        assert_eq!(elems.dense.len(), 3);
        assert!(elems.sparse.is_empty());
    }

    #[test]
    fn array_elements_accept_the_largest_index() {
        let mut elems = ArrayElements::default();
        elems.set(u32::MAX - 1, JsValue::Null);
        assert_eq!(elems.len(), u32::MAX);
        assert!(elems.dense.is_empty());
        elems.set_len(10);
        assert!(elems.get(u32::MAX - 1).is_none());
        assert_eq!(elems.len(), 10);
        assert!(!elems.is_empty());
    }
}
