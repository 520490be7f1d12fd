mod iterators;
mod object;

use super::*;

impl Interpreter {
    /// Populates the realm. %Object.prototype% and %Function.prototype% come
    /// first since every later function object inherits from them.
    pub(crate) fn setup_intrinsics(&mut self) {
        let object_prototype = self.create_object_with_proto(ObjectKind::Ordinary, None);
        self.realm.set(Intrinsic::ObjectPrototype, object_prototype);

        // %Function.prototype% is itself callable and returns undefined
        let function_prototype =
            self.create_object_with_proto(ObjectKind::Ordinary, Some(object_prototype));
        if let Some(data) = self.get_object(function_prototype.id) {
            data.borrow_mut().callable = Some(JsFunction::native("", 0, |_, _, _| {
                Completion::Normal(JsValue::Undefined)
            }));
        }
        self.realm.set(Intrinsic::FunctionPrototype, function_prototype);

        let wrappers = [
            (Intrinsic::ArrayPrototype, ObjectKind::Array, None),
            (
                Intrinsic::StringPrototype,
                ObjectKind::String,
                Some(JsValue::string("")),
            ),
            (
                Intrinsic::BooleanPrototype,
                ObjectKind::Boolean,
                Some(JsValue::Boolean(false)),
            ),
            (
                Intrinsic::NumberPrototype,
                ObjectKind::Number,
                Some(JsValue::Number(0.0)),
            ),
            (Intrinsic::SymbolPrototype, ObjectKind::Ordinary, None),
            (Intrinsic::BigIntPrototype, ObjectKind::Ordinary, None),
        ];
        for (name, kind, primitive) in wrappers {
            let proto = self.create_object_with_proto(kind, Some(object_prototype));
            if let Some(data) = self.get_object(proto.id) {
                data.borrow_mut().primitive_value = primitive;
            }
            self.realm.set(name, proto);
        }

        // Error.prototype is an ordinary object, not an Error instance
        let error_prototype = self.create_object_with_proto(ObjectKind::Ordinary, Some(object_prototype));
        self.install_error_fields(error_prototype, "Error");
        self.realm.set(Intrinsic::ErrorPrototype, error_prototype);
        for (name, label) in [
            (Intrinsic::TypeErrorPrototype, "TypeError"),
            (Intrinsic::RangeErrorPrototype, "RangeError"),
        ] {
            let proto = self.create_object_with_proto(ObjectKind::Ordinary, Some(error_prototype));
            self.install_error_fields(proto, label);
            self.realm.set(name, proto);
        }

        self.setup_object_prototype();
        self.setup_iterator_prototypes();
        tracing::debug!(target: "jsse::realm", intrinsics = self.realm.len(), "realm ready");
    }

    fn install_error_fields(&mut self, proto: JsObject, name: &str) {
        if let Some(data) = self.get_object(proto.id) {
            let mut data = data.borrow_mut();
            data.insert_builtin("name", JsValue::string(name));
            data.insert_builtin("message", JsValue::string(""));
        }
    }
}
