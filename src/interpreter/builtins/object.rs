use super::*;
use crate::types::WellKnownSymbol;

fn arg(args: &[JsValue], index: usize) -> JsValue {
    args.get(index).cloned().unwrap_or_default()
}

/// Steps 4-14 of Object.prototype.toString: the tag implied by the object's
/// kind. Arm order is the lookup priority; callability outranks every kind
/// below Arguments.
fn builtin_tag(interp: &mut Interpreter, o: &JsObject) -> JsResult<&'static str> {
    if interp.is_array(&JsValue::Object(*o))? {
        return Ok("Array");
    }
    let Some(data) = interp.get_object(o.id) else {
        return Ok("Object");
    };
    let data = data.borrow();
    Ok(match (data.kind, data.callable.is_some()) {
        (ObjectKind::String, _) => "String",
        (ObjectKind::Arguments, _) => "Arguments",
        (_, true) => "Function",
        (ObjectKind::Error, _) => "Error",
        (ObjectKind::Boolean, _) => "Boolean",
        (ObjectKind::Number, _) => "Number",
        (ObjectKind::Date, _) => "Date",
        (ObjectKind::RegExp, _) => "RegExp",
        _ => "Object",
    })
}

impl Interpreter {
    pub(crate) fn setup_object_prototype(&mut self) {
        let Some(proto) = self.intrinsic(Intrinsic::ObjectPrototype) else {
            return;
        };

        // Object.prototype.hasOwnProperty (§20.1.3.2)
        let has_own_fn = self.create_function(JsFunction::native(
            "hasOwnProperty",
            1,
            |interp, this_val, args| {
                // The key is coerced before the receiver.
                let key = propagate!(interp.to_property_key(&arg(args, 0)));
                let o = propagate!(interp.to_object(this_val));
                interp.has_own_property(&o, &key).map(JsValue::Boolean).into()
            },
        ));

        // Object.prototype.isPrototypeOf (§20.1.3.3)
        let is_proto_fn = self.create_function(JsFunction::native(
            "isPrototypeOf",
            1,
            |interp, this_val, args| {
                let JsValue::Object(mut v) = arg(args, 0) else {
                    return Completion::Normal(JsValue::Boolean(false));
                };
                let o = propagate!(interp.to_object(this_val));
                let mut depth = 0;
                loop {
                    match propagate!(interp.get_prototype_of(&v)) {
                        None => return Completion::Normal(JsValue::Boolean(false)),
                        Some(p) if p == o => return Completion::Normal(JsValue::Boolean(true)),
                        Some(p) => v = p,
                    }
                    depth += 1;
                    propagate!(interp.check_chain_depth(depth));
                }
            },
        ));

        // Object.prototype.propertyIsEnumerable (§20.1.3.4)
        let pie_fn = self.create_function(JsFunction::native(
            "propertyIsEnumerable",
            1,
            |interp, this_val, args| {
                let key = propagate!(interp.to_property_key(&arg(args, 0)));
                let o = propagate!(interp.to_object(this_val));
                let desc = propagate!(interp.get_own_property(&o, &key));
                Completion::Normal(JsValue::Boolean(
                    desc.is_some_and(|d| d.is_enumerable()),
                ))
            },
        ));

        // Object.prototype.toLocaleString (§20.1.3.5)
        let to_locale_fn = self.create_function(JsFunction::native(
            "toLocaleString",
            0,
            |interp, this_val, _args| interp.invoke(this_val, "toString", &[]).into(),
        ));

        // Object.prototype.toString (§20.1.3.6)
        let to_string_fn = self.create_function(JsFunction::native(
            "toString",
            0,
            |interp, this_val, _args| {
                match this_val {
                    JsValue::Undefined => {
                        return Completion::Normal(JsValue::string("[object Undefined]"));
                    }
                    JsValue::Null => return Completion::Normal(JsValue::string("[object Null]")),
                    _ => {}
                }
                let o = assert_normal(interp.to_object(this_val));
                let builtin = propagate!(builtin_tag(interp, &o));
                let tag = propagate!(interp.get(&o, WellKnownSymbol::ToStringTag, &JsValue::Object(o)));
                let tag = match tag {
                    JsValue::String(s) => s.to_rust_string(),
                    _ => builtin.to_string(),
                };
                Completion::Normal(JsValue::string(&format!("[object {tag}]")))
            },
        ));

        // Object.prototype.valueOf (§20.1.3.7)
        let value_of_fn = self.create_function(JsFunction::native(
            "valueOf",
            0,
            |interp, this_val, _args| interp.to_object(this_val).map(JsValue::Object).into(),
        ));

        for (name, func) in [
            ("hasOwnProperty", has_own_fn),
            ("isPrototypeOf", is_proto_fn),
            ("propertyIsEnumerable", pie_fn),
            ("toLocaleString", to_locale_fn),
            ("toString", to_string_fn.clone()),
            ("valueOf", value_of_fn.clone()),
        ] {
            if let Some(data) = self.get_object(proto.id) {
                data.borrow_mut().insert_builtin(name, func);
            }
        }

        for (name, func) in [
            (Intrinsic::ObjProtoToString, to_string_fn),
            (Intrinsic::ObjProtoValueOf, value_of_fn),
        ] {
            if let Some(o) = func.as_object() {
                self.realm.set(name, o);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string_tag(interp: &mut Interpreter, this: &JsValue) -> Completion {
        let f = JsValue::Object(interp.intrinsic(Intrinsic::ObjProtoToString).unwrap());
        interp.call_function(&f, this, &[])
    }

    fn call_proto_method(interp: &mut Interpreter, name: &str, this: &JsValue, args: &[JsValue]) -> Completion {
        let proto = interp.intrinsic(Intrinsic::ObjectPrototype).unwrap();
        let f = assert_normal(interp.get(&proto, name, &JsValue::Object(proto)));
        interp.call_function(&f, this, args)
    }

    fn expect_string(c: Completion) -> String {
        match c {
            Completion::Normal(JsValue::String(s)) => s.to_rust_string(),
            other => panic!("expected a string, got {other:?}"),
        }
    }

    fn expect_bool(c: Completion) -> bool {
        match c {
            Completion::Normal(JsValue::Boolean(b)) => b,
            other => panic!("expected a boolean, got {other:?}"),
        }
    }

    fn object_of_kind(interp: &mut Interpreter, kind: ObjectKind) -> JsValue {
        let proto = interp.intrinsic(Intrinsic::ObjectPrototype);
        JsValue::Object(interp.create_object_with_proto(kind, proto))
    }

    #[test]
    fn to_string_handles_nullish_receivers() {
        let mut interp = Interpreter::new();
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Undefined)), "[object Undefined]");
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Null)), "[object Null]");
    }

    #[test]
    fn to_string_reports_builtin_tags() {
        let mut interp = Interpreter::new();
        let arr = JsValue::Object(interp.create_array(vec![]));
        assert_eq!(expect_string(to_string_tag(&mut interp, &arr)), "[object Array]");
        let plain = JsValue::Object(interp.create_object());
        assert_eq!(expect_string(to_string_tag(&mut interp, &plain)), "[object Object]");
        let func = interp.create_function(JsFunction::native("f", 0, |_, _, _| {
            Completion::Normal(JsValue::Undefined)
        }));
        assert_eq!(expect_string(to_string_tag(&mut interp, &func)), "[object Function]");
        let err = interp.create_type_error("x");
        assert_eq!(expect_string(to_string_tag(&mut interp, &err)), "[object Error]");
        for (kind, tag) in [
            (ObjectKind::Arguments, "Arguments"),
            (ObjectKind::Date, "Date"),
            (ObjectKind::RegExp, "RegExp"),
        ] {
            let o = object_of_kind(&mut interp, kind);
            assert_eq!(expect_string(to_string_tag(&mut interp, &o)), format!("[object {tag}]"));
        }
    }

    #[test]
    fn to_string_wraps_primitives() {
        let mut interp = Interpreter::new();
        for (value, tag) in [
            (JsValue::Number(1.0), "[object Number]"),
            (JsValue::Boolean(true), "[object Boolean]"),
            (JsValue::string("s"), "[object String]"),
        ] {
            assert_eq!(expect_string(to_string_tag(&mut interp, &value)), tag);
        }
    }

    #[test]
    fn callable_error_object_is_tagged_function() {
        let mut interp = Interpreter::new();
        let err = interp.create_type_error("x");
        let o = err.as_object().unwrap();
        interp.get_object(o.id).unwrap().borrow_mut().callable =
            Some(JsFunction::native("", 0, |_, _, _| Completion::Normal(JsValue::Undefined)));
        assert_eq!(expect_string(to_string_tag(&mut interp, &err)), "[object Function]");
    }

    #[test]
    fn to_string_tag_overrides_only_when_string() {
        let mut interp = Interpreter::new();
        let o = interp.create_object();
        let key = WellKnownSymbol::ToStringTag.key();
        assert_normal(interp.create_data_property(&o, &key, JsValue::string("Foo")));
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Object(o))), "[object Foo]");

        let arr = interp.create_array(vec![]);
        assert_normal(interp.create_data_property(&arr, &key, JsValue::Number(5.0)));
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Object(arr))), "[object Array]");
    }

    #[test]
    fn string_key_spelled_like_the_tag_symbol_is_ignored() {
        let mut interp = Interpreter::new();
        let o = interp.create_object();
        assert_normal(interp.create_data_property(
            &o,
            "Symbol(Symbol.toStringTag)",
            JsValue::string("Foo"),
        ));
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Object(o))), "[object Object]");

        let JsValue::Symbol(lookalike) = interp.create_symbol(Some("Symbol.toStringTag")) else {
            panic!("expected a symbol");
        };
        assert_normal(interp.create_data_property(&o, lookalike.to_property_key(), JsValue::string("Bar")));
        assert_eq!(expect_string(to_string_tag(&mut interp, &JsValue::Object(o))), "[object Object]");
    }

    #[test]
    fn throwing_to_string_tag_getter_propagates() {
        let mut interp = Interpreter::new();
        let o = interp.create_object();
        let getter = interp.create_function(JsFunction::native("get", 0, |_, _, _| {
            Completion::Throw(JsValue::string("tag"))
        }));
        assert_normal(interp.define_own_property(
            &o,
            WellKnownSymbol::ToStringTag,
            PropertyDescriptor::accessor(Some(getter), None, false, true),
        ));
        let got = to_string_tag(&mut interp, &JsValue::Object(o));
        assert!(matches!(got, Completion::Throw(JsValue::String(ref s)) if s.to_string() == "tag"));
    }

    #[test]
    fn has_own_property_ignores_inherited_keys() {
        let mut interp = Interpreter::new();
        let parent = interp.create_object();
        assert_normal(interp.create_data_property(&parent, "inherited", JsValue::Null));
        let child = interp.create_object_with_proto(ObjectKind::Ordinary, Some(parent));
        assert_normal(interp.create_data_property(&child, "x", JsValue::Null));
        let this = JsValue::Object(child);
        assert!(expect_bool(call_proto_method(&mut interp, "hasOwnProperty", &this, &[JsValue::string("x")])));
        assert!(!expect_bool(call_proto_method(&mut interp, "hasOwnProperty", &this, &[JsValue::string("y")])));
        assert!(!expect_bool(call_proto_method(
            &mut interp,
            "hasOwnProperty",
            &this,
            &[JsValue::string("inherited")]
        )));
    }

    #[test]
    fn has_own_property_coerces_key_before_receiver() {
        let mut interp = Interpreter::new();
        let key = interp.create_object();
        let to_string = interp.create_function(JsFunction::native("toString", 0, |_, _, _| {
            Completion::Throw(JsValue::string("key first"))
        }));
        assert_normal(interp.create_data_property(&key, "toString", to_string));
        let got = call_proto_method(&mut interp, "hasOwnProperty", &JsValue::Undefined, &[JsValue::Object(key)]);
        assert!(matches!(got, Completion::Throw(JsValue::String(ref s)) if s.to_string() == "key first"));

        let got = call_proto_method(&mut interp, "hasOwnProperty", &JsValue::Null, &[JsValue::string("x")]);
        assert!(matches!(got, Completion::Throw(ref e) if interp.is_type_error(e)));
    }

    #[test]
    fn is_prototype_of_walks_the_chain() {
        let mut interp = Interpreter::new();
        let grand = interp.create_object();
        let parent = interp.create_object_with_proto(ObjectKind::Ordinary, Some(grand));
        let child = interp.create_object_with_proto(ObjectKind::Ordinary, Some(parent));
        let unrelated = interp.create_object();
        let g = JsValue::Object(grand);
        assert!(expect_bool(call_proto_method(&mut interp, "isPrototypeOf", &g, &[JsValue::Object(child)])));
        assert!(!expect_bool(call_proto_method(&mut interp, "isPrototypeOf", &g, &[JsValue::Object(unrelated)])));
        assert!(!expect_bool(call_proto_method(&mut interp, "isPrototypeOf", &g, &[JsValue::Object(grand)])));
    }

    #[test]
    fn is_prototype_of_primitive_is_false_before_receiver_check() {
        let mut interp = Interpreter::new();
        let got = call_proto_method(&mut interp, "isPrototypeOf", &JsValue::Undefined, &[JsValue::Number(1.0)]);
        assert!(!expect_bool(got));
        let o = JsValue::Object(interp.create_object());
        let got = call_proto_method(&mut interp, "isPrototypeOf", &JsValue::Undefined, &[o]);
        assert!(matches!(got, Completion::Throw(ref e) if interp.is_type_error(e)));
    }

    #[test]
    fn property_is_enumerable_reads_own_attributes() {
        let mut interp = Interpreter::new();
        let o = interp.create_object();
        assert_normal(interp.create_data_property(&o, "shown", JsValue::Null));
        assert_normal(interp.define_own_property(
            &o,
            "hidden",
            PropertyDescriptor::data(JsValue::Null, true, false, true),
        ));
        let this = JsValue::Object(o);
        assert!(expect_bool(call_proto_method(&mut interp, "propertyIsEnumerable", &this, &[JsValue::string("shown")])));
        assert!(!expect_bool(call_proto_method(&mut interp, "propertyIsEnumerable", &this, &[JsValue::string("hidden")])));
        assert!(!expect_bool(call_proto_method(&mut interp, "propertyIsEnumerable", &this, &[JsValue::string("toString")])));
        let s = JsValue::string("ab");
        assert!(expect_bool(call_proto_method(&mut interp, "propertyIsEnumerable", &s, &[JsValue::Number(1.0)])));
        assert!(!expect_bool(call_proto_method(&mut interp, "propertyIsEnumerable", &s, &[JsValue::string("length")])));
    }

    #[test]
    fn to_locale_string_dispatches_to_to_string() {
        let mut interp = Interpreter::new();
        let o = interp.create_object();
        let custom = interp.create_function(JsFunction::native("toString", 0, |_, _, _| {
            Completion::Normal(JsValue::string("custom"))
        }));
        assert_normal(interp.create_data_property(&o, "toString", custom));
        let got = call_proto_method(&mut interp, "toLocaleString", &JsValue::Object(o), &[]);
        assert_eq!(expect_string(got), "custom");

        let got = call_proto_method(&mut interp, "toLocaleString", &JsValue::Number(2.0), &[]);
        assert_eq!(expect_string(got), "[object Number]");
    }

    #[test]
    fn value_of_returns_the_object() {
        let mut interp = Interpreter::new();
        let o = JsValue::Object(interp.create_object());
        let got = call_proto_method(&mut interp, "valueOf", &o, &[]);
        assert!(matches!(got, Completion::Normal(ref v) if strict_equality(v, &o)));
        let got = call_proto_method(&mut interp, "valueOf", &JsValue::Boolean(true), &[]);
        let Completion::Normal(JsValue::Object(wrapper)) = got else {
            panic!("expected a wrapper object");
        };
        assert_eq!(
            assert_normal(interp.get_prototype_of(&wrapper)),
            interp.intrinsic(Intrinsic::BooleanPrototype)
        );
        let got = call_proto_method(&mut interp, "valueOf", &JsValue::Undefined, &[]);
        assert!(matches!(got, Completion::Throw(ref e) if interp.is_type_error(e)));
    }

    #[test]
    fn methods_are_installed_as_builtins() {
        let mut interp = Interpreter::new();
        let proto = interp.intrinsic(Intrinsic::ObjectPrototype).unwrap();
        for (name, length) in [
            ("hasOwnProperty", 1.0),
            ("isPrototypeOf", 1.0),
            ("propertyIsEnumerable", 1.0),
            ("toLocaleString", 0.0),
            ("toString", 0.0),
            ("valueOf", 0.0),
        ] {
            let desc = assert_normal(interp.get_own_property(&proto, name)).unwrap();
            assert_eq!(desc.writable, Some(true), "{name}");
            assert_eq!(desc.enumerable, Some(false), "{name}");
            assert_eq!(desc.configurable, Some(true), "{name}");
            let f = desc.value.unwrap().as_object().unwrap();
            let len = assert_normal(interp.get(&f, "length", &JsValue::Object(f)));
            assert!(matches!(len, JsValue::Number(n) if n == length), "{name}");
        }
        let to_string = assert_normal(interp.get(&proto, "toString", &JsValue::Object(proto)));
        assert_eq!(to_string.as_object(), interp.intrinsic(Intrinsic::ObjProtoToString));
        let value_of = assert_normal(interp.get(&proto, "valueOf", &JsValue::Object(proto)));
        assert_eq!(value_of.as_object(), interp.intrinsic(Intrinsic::ObjProtoValueOf));
    }
}
