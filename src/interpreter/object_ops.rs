use super::*;
use crate::types::WellKnownSymbol;

/// Hint passed to ToPrimitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String,
    Number,
}

impl PreferredType {
    fn as_str(self) -> &'static str {
        match self {
            PreferredType::String => "string",
            PreferredType::Number => "number",
        }
    }
}

fn value_only(value: JsValue) -> PropertyDescriptor {
    PropertyDescriptor {
        value: Some(value),
        writable: None,
        get: None,
        set: None,
        enumerable: None,
        configurable: None,
    }
}

// Array exotic [[GetOwnProperty]] for `length` and element indices (§10.4.2)
fn array_own_property(data: &JsObjectData, key: &PropertyKey) -> Option<PropertyDescriptor> {
    let elems = data.array_elements.as_ref()?;
    let key = key.as_str()?;
    if key == "length" {
        return Some(PropertyDescriptor::data(
            JsValue::Number(f64::from(elems.len())),
            true,
            false,
            false,
        ));
    }
    elems
        .get(array_index(key)?)
        .map(|v| PropertyDescriptor::data_default(v.clone()))
}

// Elements are always writable/enumerable/configurable data;
// definitions that need any other shape are rejected.
fn array_define_own_property(
    data: &mut JsObjectData,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> Option<bool> {
    let current = array_own_property(data, key);
    let key = key.as_str()?;
    let elems = data.array_elements.as_mut()?;
    if key == "length" {
        let current = current?;
        if !is_compatible_descriptor(&current, desc) || desc.writable == Some(false) {
            return Some(false);
        }
        if let Some(value) = &desc.value {
            let JsValue::Number(n) = value else {
                return Some(false);
            };
            if *n < 0.0 || n.fract() != 0.0 || *n > f64::from(u32::MAX) {
                return Some(false);
            }
            elems.set_len(*n as u32);
        }
        return Some(true);
    }
    let idx = array_index(key)?;
    let plain = !desc.is_accessor_descriptor()
        && desc.writable != Some(false)
        && desc.enumerable != Some(false)
        && desc.configurable != Some(false);
    if !plain {
        return Some(false);
    }
    let value = desc
        .value
        .clone()
        .or_else(|| current.and_then(|d| d.value))
        .unwrap_or_default();
    elems.set(idx, value);
    Some(true)
}

// String exotic [[GetOwnProperty]] (§10.4.3.1)
fn string_own_property(data: &JsObjectData, key: &PropertyKey) -> Option<PropertyDescriptor> {
    let Some(JsValue::String(s)) = &data.primitive_value else {
        return None;
    };
    let key = key.as_str()?;
    if key == "length" {
        return Some(PropertyDescriptor::data(
            JsValue::Number(s.len() as f64),
            false,
            false,
            false,
        ));
    }
    let idx = array_index(key)? as usize;
    if idx >= s.len() {
        return None;
    }
    Some(PropertyDescriptor::data(
        JsValue::String(s.slice_utf16(idx, idx + 1)),
        false,
        true,
        false,
    ))
}

impl Interpreter {
    fn prototype_chain_too_deep(&mut self) -> Completion {
        tracing::debug!(
            target: "jsse::object",
            limit = self.config.max_prototype_chain_depth,
            "prototype chain depth limit hit"
        );
        Completion::Throw(self.create_range_error("Maximum prototype chain depth exceeded"))
    }

    pub(crate) fn check_chain_depth(&mut self, depth: usize) -> JsResult<()> {
        if depth > self.config.max_prototype_chain_depth {
            return Err(self.prototype_chain_too_deep());
        }
        Ok(())
    }

    // §10.1.1 [[GetPrototypeOf]]
    pub fn get_prototype_of(&mut self, o: &JsObject) -> JsResult<Option<JsObject>> {
        Ok(self.get_object(o.id).and_then(|data| {
            data.borrow()
                .prototype
                .as_ref()
                .and_then(|p| p.borrow().id)
                .map(|id| JsObject { id })
        }))
    }

    // §10.1.2 [[SetPrototypeOf]]
    pub fn set_prototype_of(&mut self, o: &JsObject, proto: Option<JsObject>) -> JsResult<bool> {
        let Some(data) = self.get_object(o.id) else {
            return Ok(false);
        };
        let current = self.get_prototype_of(o)?;
        if current == proto {
            return Ok(true);
        }
        if !data.borrow().extensible {
            return Ok(false);
        }
        let mut link = proto;
        let mut depth = 0;
        while let Some(p) = link {
            if p == *o {
                return Ok(false);
            }
            depth += 1;
            self.check_chain_depth(depth)?;
            link = self.get_prototype_of(&p)?;
        }
        data.borrow_mut().prototype = proto.and_then(|p| self.get_object(p.id));
        Ok(true)
    }

    fn own_property(&self, o: &JsObject, key: &PropertyKey) -> Option<PropertyDescriptor> {
        let data = self.get_object(o.id)?;
        let data = data.borrow();
        let exotic = match data.kind {
            ObjectKind::Array => array_own_property(&data, key),
            ObjectKind::String => string_own_property(&data, key),
            _ => None,
        };
        exotic.or_else(|| data.get_own_property(key).cloned())
    }

    // §10.1.5 [[GetOwnProperty]]
    pub fn get_own_property(
        &mut self,
        o: &JsObject,
        key: impl Into<PropertyKey>,
    ) -> JsResult<Option<PropertyDescriptor>> {
        Ok(self.own_property(o, &key.into()))
    }

    // §10.1.6 [[DefineOwnProperty]]
    pub fn define_own_property(
        &mut self,
        o: &JsObject,
        key: impl Into<PropertyKey>,
        desc: PropertyDescriptor,
    ) -> JsResult<bool> {
        let key = key.into();
        let Some(data) = self.get_object(o.id) else {
            return Ok(false);
        };
        let mut data = data.borrow_mut();
        match data.kind {
            ObjectKind::Array => {
                if let Some(result) = array_define_own_property(&mut data, &key, &desc) {
                    return Ok(result);
                }
            }
            ObjectKind::String => {
                if let Some(current) = string_own_property(&data, &key) {
                    return Ok(is_compatible_descriptor(&current, &desc));
                }
            }
            _ => {}
        }
        Ok(data.define_own_property(key, desc))
    }

    // §7.3.12 HasOwnProperty
    pub fn has_own_property(&mut self, o: &JsObject, key: impl Into<PropertyKey>) -> JsResult<bool> {
        Ok(self.own_property(o, &key.into()).is_some())
    }

    // §10.1.8 [[Get]] (OrdinaryGet)
    pub fn get(
        &mut self,
        o: &JsObject,
        key: impl Into<PropertyKey>,
        receiver: &JsValue,
    ) -> JsResult<JsValue> {
        let key = key.into();
        let mut current = *o;
        let mut depth = 0;
        loop {
            if let Some(desc) = self.own_property(&current, &key) {
                if desc.is_accessor_descriptor() {
                    let getter = desc.get.unwrap_or(JsValue::Undefined);
                    if getter.is_undefined() {
                        return Ok(JsValue::Undefined);
                    }
                    return self.call(&getter, receiver, &[]);
                }
                return Ok(desc.value.unwrap_or(JsValue::Undefined));
            }
            match self.get_prototype_of(&current)? {
                Some(p) => current = p,
                None => return Ok(JsValue::Undefined),
            }
            depth += 1;
            self.check_chain_depth(depth)?;
        }
    }

    // §10.1.9 [[Set]] (OrdinarySet)
    pub fn set(
        &mut self,
        o: &JsObject,
        key: impl Into<PropertyKey>,
        value: JsValue,
        receiver: &JsValue,
    ) -> JsResult<bool> {
        let key = key.into();
        let mut found = None;
        let mut current = Some(*o);
        let mut depth = 0;
        while let Some(obj) = current {
            if let Some(desc) = self.own_property(&obj, &key) {
                found = Some(desc);
                break;
            }
            current = self.get_prototype_of(&obj)?;
            depth += 1;
            self.check_chain_depth(depth)?;
        }
        let own_desc =
            found.unwrap_or_else(|| PropertyDescriptor::data_default(JsValue::Undefined));
        if own_desc.is_data_descriptor() {
            if own_desc.writable == Some(false) {
                return Ok(false);
            }
            let JsValue::Object(receiver_obj) = receiver else {
                return Ok(false);
            };
            return match self.own_property(receiver_obj, &key) {
                Some(existing) => {
                    if existing.is_accessor_descriptor() || existing.writable == Some(false) {
                        return Ok(false);
                    }
                    self.define_own_property(receiver_obj, key, value_only(value))
                }
                None => self.create_data_property(receiver_obj, key, value),
            };
        }
        let setter = own_desc.set.unwrap_or(JsValue::Undefined);
        if setter.is_undefined() {
            return Ok(false);
        }
        self.call(&setter, receiver, &[value])?;
        Ok(true)
    }

    // §7.3.5 CreateDataProperty
    pub fn create_data_property(
        &mut self,
        o: &JsObject,
        key: impl Into<PropertyKey>,
        value: JsValue,
    ) -> JsResult<bool> {
        self.define_own_property(o, key, PropertyDescriptor::data_default(value))
    }

    // §7.3.3 GetV
    pub fn get_v(&mut self, v: &JsValue, key: impl Into<PropertyKey>) -> JsResult<JsValue> {
        let o = self.to_object(v)?;
        self.get(&o, key, v)
    }

    // §7.3.11 GetMethod. `None` stands for undefined.
    pub fn get_method(
        &mut self,
        v: &JsValue,
        key: impl Into<PropertyKey>,
    ) -> JsResult<Option<JsValue>> {
        let key = key.into();
        let func = self.get_v(v, &key)?;
        if func.is_nullish() {
            return Ok(None);
        }
        if !self.is_callable(&func) {
            return Err(self.throw_type_error(&format!("{key} is not a function")));
        }
        Ok(Some(func))
    }

    // §7.2.3 IsCallable
    pub fn is_callable(&self, val: &JsValue) -> bool {
        val.as_object()
            .and_then(|o| self.get_object(o.id))
            .is_some_and(|data| data.borrow().callable.is_some())
    }

    // §7.2.2 IsArray
    pub fn is_array(&mut self, val: &JsValue) -> JsResult<bool> {
        Ok(val
            .as_object()
            .and_then(|o| self.get_object(o.id))
            .is_some_and(|data| data.borrow().kind == ObjectKind::Array))
    }

    /// [[Call]] returning the raw completion, for callers that must inspect it.
    pub fn call_function(&mut self, func: &JsValue, this: &JsValue, args: &[JsValue]) -> Completion {
        let behavior = func
            .as_object()
            .and_then(|o| self.get_object(o.id))
            .and_then(|data| data.borrow().callable.as_ref().map(|f| f.behavior.clone()));
        let Some(behavior) = behavior else {
            return self.throw_type_error("value is not a function");
        };
        match behavior(self, this, args) {
            Completion::Return(v) => Completion::Normal(v),
            other => other,
        }
    }

    // §7.3.14 Call
    pub fn call(&mut self, func: &JsValue, this: &JsValue, args: &[JsValue]) -> JsResult<JsValue> {
        self.call_function(func, this, args).into_result()
    }

    // §7.3.21 Invoke
    pub fn invoke(
        &mut self,
        v: &JsValue,
        key: impl Into<PropertyKey>,
        args: &[JsValue],
    ) -> JsResult<JsValue> {
        let func = self.get_v(v, key)?;
        self.call(&func, v, args)
    }

    // §7.1.18 ToObject
    pub fn to_object(&mut self, val: &JsValue) -> JsResult<JsObject> {
        let (kind, proto) = match val {
            JsValue::Undefined | JsValue::Null => {
                return Err(self.throw_type_error("Cannot convert undefined or null to object"));
            }
            JsValue::Object(o) => return Ok(*o),
            JsValue::Boolean(_) => (ObjectKind::Boolean, Intrinsic::BooleanPrototype),
            JsValue::Number(_) => (ObjectKind::Number, Intrinsic::NumberPrototype),
            JsValue::String(_) => (ObjectKind::String, Intrinsic::StringPrototype),
            JsValue::Symbol(_) => (ObjectKind::Symbol, Intrinsic::SymbolPrototype),
            JsValue::BigInt(_) => (ObjectKind::BigInt, Intrinsic::BigIntPrototype),
        };
        let proto = self.intrinsic(proto);
        let obj = self.create_object_with_proto(kind, proto);
        if let Some(data) = self.get_object(obj.id) {
            data.borrow_mut().primitive_value = Some(val.clone());
        }
        Ok(obj)
    }

    // §7.1.1 ToPrimitive
    pub fn to_primitive(&mut self, val: &JsValue, hint: PreferredType) -> JsResult<JsValue> {
        let JsValue::Object(o) = val else {
            return Ok(val.clone());
        };
        if let Some(exotic) = self.get_method(val, WellKnownSymbol::ToPrimitive)? {
            let result = self.call(&exotic, val, &[JsValue::string(hint.as_str())])?;
            if result.is_object() {
                return Err(self.throw_type_error("Cannot convert object to primitive value"));
            }
            return Ok(result);
        }
        self.ordinary_to_primitive(o, hint)
    }

    // §7.1.1.1 OrdinaryToPrimitive
    fn ordinary_to_primitive(&mut self, o: &JsObject, hint: PreferredType) -> JsResult<JsValue> {
        let order = match hint {
            PreferredType::String => ["toString", "valueOf"],
            PreferredType::Number => ["valueOf", "toString"],
        };
        let this = JsValue::Object(*o);
        for name in order {
            let method = self.get(o, name, &this)?;
            if self.is_callable(&method) {
                let result = self.call(&method, &this, &[])?;
                if !result.is_object() {
                    return Ok(result);
                }
            }
        }
        Err(self.throw_type_error("Cannot convert object to primitive value"))
    }

    // §7.1.17 ToString
    pub fn to_string(&mut self, val: &JsValue) -> JsResult<JsString> {
        let prim = self.to_primitive(val, PreferredType::String)?;
        match primitive_to_string(&prim) {
            Some(s) => Ok(JsString::from_str(&s)),
            None => Err(self.throw_type_error("Cannot convert a Symbol value to a string")),
        }
    }

    // §7.1.19 ToPropertyKey
    pub fn to_property_key(&mut self, val: &JsValue) -> JsResult<PropertyKey> {
        let key = self.to_primitive(val, PreferredType::String)?;
        if let JsValue::Symbol(sym) = &key {
            return Ok(sym.to_property_key());
        }
        Ok(PropertyKey::String(self.to_string(&key)?.to_rust_string()))
    }
}
