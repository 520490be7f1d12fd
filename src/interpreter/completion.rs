use crate::types::JsValue;

/// Completion Record (§6.2.4).
///
/// `Break` and `Continue` carry an optional target label followed by an
/// optional payload value.
#[derive(Debug, Clone)]
pub enum Completion {
    Normal(JsValue),
    Return(JsValue),
    Throw(JsValue),
    Break(Option<String>, Option<JsValue>),
    Continue(Option<String>, Option<JsValue>),
}

/// Result of a fallible operation. The error side always holds an abrupt
/// completion, so `?` short-circuits exactly like ReturnIfAbrupt.
pub type JsResult<T> = Result<T, Completion>;

impl Completion {
    pub fn is_abrupt(&self) -> bool {
        !matches!(self, Completion::Normal(_))
    }

    pub fn is_throw(&self) -> bool {
        matches!(self, Completion::Throw(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Completion::Normal(_) => "normal",
            Completion::Return(_) => "return",
            Completion::Throw(_) => "throw",
            Completion::Break(..) => "break",
            Completion::Continue(..) => "continue",
        }
    }

    /// Propagate-if-abrupt: a normal completion unwraps to its value, any
    /// abrupt completion becomes the error to hand back to the caller.
    pub fn into_result(self) -> JsResult<JsValue> {
        match self {
            Completion::Normal(v) => Ok(v),
            abrupt => Err(abrupt),
        }
    }

    /// Assert-normal: unwraps a completion the caller knows cannot be abrupt.
    /// An abrupt completion here is an engine bug.
    pub fn assert_normal(self) -> JsValue {
        match self {
            Completion::Normal(v) => v,
            abrupt => panic!(
                "assert_normal: {} completion from an infallible operation",
                abrupt.kind_name()
            ),
        }
    }
}

impl From<JsResult<JsValue>> for Completion {
    fn from(result: JsResult<JsValue>) -> Self {
        match result {
            Ok(v) => Completion::Normal(v),
            Err(abrupt) => abrupt,
        }
    }
}

/// Assert-normal for typed results.
pub fn assert_normal<T>(result: JsResult<T>) -> T {
    match result {
        Ok(v) => v,
        Err(abrupt) => panic!(
            "assert_normal: {} completion from an infallible operation",
            abrupt.kind_name()
        ),
    }
}

/// ReturnIfAbrupt for functions that return a bare `Completion`
/// (native function bodies, the close operations).
macro_rules! propagate {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(abrupt) => return abrupt,
        }
    };
}
pub(crate) use propagate;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JsString;

    fn s(v: &str) -> JsValue {
        JsValue::String(JsString::from_str(v))
    }

    fn first_abrupt(steps: Vec<Completion>) -> Completion {
        let mut last = JsValue::Undefined;
        for step in steps {
            last = propagate!(step.into_result());
        }
        Completion::Normal(last)
    }

    #[test]
    fn normal_completions_flow_through() {
        let c = first_abrupt(vec![Completion::Normal(s("a")), Completion::Normal(s("b"))]);
        assert!(matches!(c, Completion::Normal(JsValue::String(ref v)) if v.to_string() == "b"));
    }

    #[test]
    fn first_abrupt_completion_short_circuits() {
        let c = first_abrupt(vec![
            Completion::Normal(s("a")),
            Completion::Break(Some("outer".into()), None),
            Completion::Throw(s("never")),
        ]);
        assert!(matches!(c, Completion::Break(Some(ref l), None) if l == "outer"));
    }

    #[test]
    fn every_abrupt_kind_maps_to_err() {
        for c in [
            Completion::Return(JsValue::Undefined),
            Completion::Throw(JsValue::Undefined),
            Completion::Break(None, None),
            Completion::Continue(None, Some(JsValue::Null)),
        ] {
            assert!(c.is_abrupt());
            assert!(c.into_result().is_err());
        }
    }

    #[test]
    fn assert_normal_unwraps() {
        assert!(matches!(
            Completion::Normal(JsValue::Boolean(true)).assert_normal(),
            JsValue::Boolean(true)
        ));
        assert_eq!(assert_normal::<u32>(Ok(3)), 3);
    }

    #[test]
    #[should_panic(expected = "throw completion")]
    fn assert_normal_faults_on_abrupt() {
        Completion::Throw(JsValue::Undefined).assert_normal();
    }
}
