use crate::types::JsObject;
use rustc_hash::FxHashMap;

/// Well-known intrinsic names (§6.1.7.4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intrinsic {
    ObjectPrototype,
    FunctionPrototype,
    ArrayPrototype,
    StringPrototype,
    BooleanPrototype,
    NumberPrototype,
    SymbolPrototype,
    BigIntPrototype,
    ErrorPrototype,
    TypeErrorPrototype,
    RangeErrorPrototype,
    IteratorPrototype,
    AsyncIteratorPrototype,
    AsyncFromSyncIteratorPrototype,
    ObjProtoToString,
    ObjProtoValueOf,
}

impl Intrinsic {
    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::ObjectPrototype => "%Object.prototype%",
            Intrinsic::FunctionPrototype => "%Function.prototype%",
            Intrinsic::ArrayPrototype => "%Array.prototype%",
            Intrinsic::StringPrototype => "%String.prototype%",
            Intrinsic::BooleanPrototype => "%Boolean.prototype%",
            Intrinsic::NumberPrototype => "%Number.prototype%",
            Intrinsic::SymbolPrototype => "%Symbol.prototype%",
            Intrinsic::BigIntPrototype => "%BigInt.prototype%",
            Intrinsic::ErrorPrototype => "%Error.prototype%",
            Intrinsic::TypeErrorPrototype => "%TypeError.prototype%",
            Intrinsic::RangeErrorPrototype => "%RangeError.prototype%",
            Intrinsic::IteratorPrototype => "%IteratorPrototype%",
            Intrinsic::AsyncIteratorPrototype => "%AsyncIteratorPrototype%",
            Intrinsic::AsyncFromSyncIteratorPrototype => "%AsyncFromSyncIteratorPrototype%",
            Intrinsic::ObjProtoToString => "%ObjProto_toString%",
            Intrinsic::ObjProtoValueOf => "%ObjProto_valueOf%",
        }
    }
}

/// Realm Record: the intrinsics registry shared by every operation run
/// against one interpreter.
#[derive(Debug, Default)]
pub struct Realm {
    intrinsics: FxHashMap<Intrinsic, JsObject>,
}

impl Realm {
    pub fn get(&self, name: Intrinsic) -> Option<JsObject> {
        self.intrinsics.get(&name).copied()
    }

    pub(crate) fn set(&mut self, name: Intrinsic, obj: JsObject) {
        tracing::trace!(target: "jsse::realm", intrinsic = name.name(), id = obj.id);
        self.intrinsics.insert(name, obj);
    }

    pub fn len(&self) -> usize {
        self.intrinsics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intrinsics.is_empty()
    }
}
