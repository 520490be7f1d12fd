use std::fmt;

#[derive(Clone, Debug, Default)]
pub enum JsValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    Symbol(JsSymbol),
    BigInt(JsBigInt),
    Object(JsObject),
}

// UTF-16 code unit string (§6.1.4)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsString {
    pub code_units: Vec<u16>,
}

impl JsString {
    pub fn from_str(s: &str) -> Self {
        Self {
            code_units: s.encode_utf16().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code_units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.code_units.len()
    }

    pub fn to_rust_string(&self) -> String {
        String::from_utf16_lossy(&self.code_units)
    }

    pub fn slice_utf16(&self, start: usize, end: usize) -> JsString {
        let s = start.min(self.code_units.len());
        let e = end.min(self.code_units.len());
        if s >= e {
            return JsString { code_units: vec![] };
        }
        JsString {
            code_units: self.code_units[s..e].to_vec(),
        }
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rust_string())
    }
}

#[derive(Clone, Debug)]
pub struct JsSymbol {
    pub id: u64,
    pub description: Option<JsString>,
}

impl JsSymbol {
    /// The property key for this symbol. Keys compare by symbol identity, so
    /// neither a string nor another symbol with the same description aliases it.
    pub fn to_property_key(&self) -> PropertyKey {
        PropertyKey::Symbol(self.id)
    }

    // SymbolDescriptiveString (§20.4.3.3.1)
    pub fn descriptive_string(&self) -> String {
        match &self.description {
            Some(desc) => format!("Symbol({desc})"),
            None => "Symbol()".to_string(),
        }
    }
}

/// Key of an own property: a string, or the id of a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(String),
    Symbol(u64),
}

impl PropertyKey {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyKey::String(s) => Some(s),
            PropertyKey::Symbol(_) => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => f.write_str(s),
            PropertyKey::Symbol(id) => match WellKnownSymbol::from_id(*id) {
                Some(wk) => write!(f, "[{}]", wk.description()),
                None => write!(f, "[Symbol #{id}]"),
            },
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(s.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        PropertyKey::String(s)
    }
}

impl From<&String> for PropertyKey {
    fn from(s: &String) -> Self {
        PropertyKey::String(s.clone())
    }
}

impl From<&PropertyKey> for PropertyKey {
    fn from(key: &PropertyKey) -> Self {
        key.clone()
    }
}

impl From<WellKnownSymbol> for PropertyKey {
    fn from(sym: WellKnownSymbol) -> Self {
        sym.key()
    }
}

// Well-known symbols (§6.1.5.1) the protocols here look up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WellKnownSymbol {
    AsyncIterator,
    Iterator,
    ToPrimitive,
    ToStringTag,
}

impl WellKnownSymbol {
    const ALL: [WellKnownSymbol; 4] = [
        WellKnownSymbol::AsyncIterator,
        WellKnownSymbol::Iterator,
        WellKnownSymbol::ToPrimitive,
        WellKnownSymbol::ToStringTag,
    ];

    pub fn description(self) -> &'static str {
        match self {
            WellKnownSymbol::AsyncIterator => "Symbol.asyncIterator",
            WellKnownSymbol::Iterator => "Symbol.iterator",
            WellKnownSymbol::ToPrimitive => "Symbol.toPrimitive",
            WellKnownSymbol::ToStringTag => "Symbol.toStringTag",
        }
    }

    // Reserved ids; user symbols are numbered from a higher base.
    pub fn id(self) -> u64 {
        self as u64 + 1
    }

    pub fn from_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|sym| sym.id() == id)
    }

    /// The property key under which protocol methods for this symbol are stored.
    pub fn key(self) -> PropertyKey {
        PropertyKey::Symbol(self.id())
    }

    pub fn symbol(self) -> JsSymbol {
        JsSymbol {
            id: self.id(),
            description: Some(JsString::from_str(self.description())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JsBigInt {
    pub value: num_bigint::BigInt,
}

/// Handle to an object in the interpreter's object store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JsObject {
    pub id: u64,
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsValue::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JsValue::Boolean(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsValue::Number(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JsValue::String(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, JsValue::Symbol(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, JsValue::Undefined | JsValue::Null)
    }

    pub fn as_object(&self) -> Option<JsObject> {
        match self {
            JsValue::Object(o) => Some(*o),
            _ => None,
        }
    }

    pub fn string(s: &str) -> JsValue {
        JsValue::String(JsString::from_str(s))
    }
}

impl From<JsObject> for JsValue {
    fn from(o: JsObject) -> Self {
        JsValue::Object(o)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Boolean(b)
    }
}

// §6.1.6.1 Number type operations
pub mod number_ops {
    pub fn to_string(x: f64) -> String {
        if x.is_nan() {
            return "NaN".to_string();
        }
        if x == 0.0 {
            return "0".to_string();
        }
        if x.is_infinite() {
            return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }
        // Shortest round-tripping form (Number::toString)
        let mut buf = ryu_js::Buffer::new();
        buf.format(x).to_string()
    }
}
