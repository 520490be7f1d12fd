use super::*;
use crate::types::WellKnownSymbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IteratorHint {
    #[default]
    Sync,
    Async,
}

/// Iterator Record (§7.4.1): the iterator object, its cached `next` method,
/// and whether iteration has finished.
#[derive(Debug, Clone)]
pub struct IteratorRecord {
    pub iterator: JsObject,
    pub next_method: JsValue,
    pub done: bool,
}

// Next behavior shared by every list iterator; state lives on `this`.
fn list_iterator_next(interp: &mut Interpreter, this: &JsValue, _args: &[JsValue]) -> Completion {
    let step = this.as_object().and_then(|o| interp.get_object(o.id)).and_then(|data| {
        match &mut data.borrow_mut().iterator_state {
            Some(IteratorState::List { list, next_index }) => {
                let item = list.get(*next_index).cloned();
                if item.is_some() {
                    *next_index += 1;
                }
                Some(item)
            }
            _ => None,
        }
    });
    let Some(item) = step else {
        return interp.throw_type_error("next called on an object that is not a list iterator");
    };
    let result = match item {
        Some(value) => interp.create_iter_result_object(value, false),
        None => interp.create_iter_result_object(JsValue::Undefined, true),
    };
    Completion::Normal(JsValue::Object(result))
}

impl Interpreter {
    // §7.4.2 GetIterator
    pub fn get_iterator(
        &mut self,
        obj: &JsValue,
        hint: IteratorHint,
        method: Option<JsValue>,
    ) -> JsResult<IteratorRecord> {
        let method = match (method, hint) {
            (Some(m), _) => m,
            (None, IteratorHint::Async) => {
                match self.get_method(obj, WellKnownSymbol::AsyncIterator)? {
                    Some(m) => m,
                    None => {
                        let sync_method = self
                            .get_method(obj, WellKnownSymbol::Iterator)?
                            .ok_or_else(|| self.throw_type_error("object is not async iterable"))?;
                        let sync_record =
                            self.get_iterator(obj, IteratorHint::Sync, Some(sync_method))?;
                        return self.create_async_from_sync_iterator(sync_record);
                    }
                }
            }
            (None, IteratorHint::Sync) => self
                .get_method(obj, WellKnownSymbol::Iterator)?
                .ok_or_else(|| self.throw_type_error("object is not iterable"))?,
        };
        let iterator = self.call(&method, obj, &[])?;
        let JsValue::Object(iterator) = iterator else {
            return Err(self.throw_type_error("Result of the iterator method is not an object"));
        };
        // `next` is only checked for callability when it is first invoked.
        let next_method = self.get(&iterator, "next", &JsValue::Object(iterator))?;
        tracing::trace!(target: "jsse::iterator", ?hint, iterator = iterator.id, "acquired");
        Ok(IteratorRecord {
            iterator,
            next_method,
            done: false,
        })
    }

    // §7.4.3 IteratorNext. `None` calls `next` with no arguments at all,
    // which callees can tell apart from an explicit `undefined`.
    pub fn iterator_next(
        &mut self,
        record: &IteratorRecord,
        value: Option<JsValue>,
    ) -> JsResult<JsObject> {
        let this = JsValue::Object(record.iterator);
        let result = match value {
            None => self.call(&record.next_method, &this, &[])?,
            Some(v) => self.call(&record.next_method, &this, &[v])?,
        };
        match result {
            JsValue::Object(o) => Ok(o),
            _ => Err(self.throw_type_error("Iterator result is not an object")),
        }
    }

    // §7.4.4 IteratorComplete
    pub fn iterator_complete(&mut self, iter_result: &JsObject) -> JsResult<bool> {
        let done = self.get(iter_result, "done", &JsValue::Object(*iter_result))?;
        Ok(to_boolean(&done))
    }

    // §7.4.5 IteratorValue
    pub fn iterator_value(&mut self, iter_result: &JsObject) -> JsResult<JsValue> {
        self.get(iter_result, "value", &JsValue::Object(*iter_result))
    }

    /// §7.4.6 IteratorStep. `Ok(None)` is the end-of-sequence signal; the
    /// record is marked done then, and also when stepping throws.
    pub fn iterator_step(&mut self, record: &mut IteratorRecord) -> JsResult<Option<JsObject>> {
        let result = self.iterator_next(record, None).inspect_err(|_| record.done = true)?;
        let done = self
            .iterator_complete(&result)
            .inspect_err(|_| record.done = true)?;
        if done {
            record.done = true;
            return Ok(None);
        }
        Ok(Some(result))
    }

    // §7.4.7 IteratorStepValue
    pub fn iterator_step_value(&mut self, record: &mut IteratorRecord) -> JsResult<Option<JsValue>> {
        let Some(result) = self.iterator_step(record)? else {
            return Ok(None);
        };
        self.iterator_value(&result)
            .inspect_err(|_| record.done = true)
            .map(Some)
    }

    /// §7.4.8 IteratorClose. `completion` is the reason iteration is ending;
    /// a failure while closing only surfaces when that reason was normal.
    pub fn iterator_close(&mut self, record: &IteratorRecord, completion: Completion) -> Completion {
        let iterator = JsValue::Object(record.iterator);
        let inner = match self.get_method(&iterator, "return") {
            Ok(None) => {
                tracing::trace!(target: "jsse::iterator", iterator = record.iterator.id, "no return method");
                return completion;
            }
            Ok(Some(ret)) => self.call_function(&ret, &iterator, &[]),
            Err(abrupt) => abrupt,
        };
        self.merge_close_completions(completion, inner)
    }

    // Shared tail of IteratorClose / AsyncIteratorClose
    pub(crate) fn merge_close_completions(
        &mut self,
        completion: Completion,
        inner: Completion,
    ) -> Completion {
        if completion.is_abrupt() {
            if inner.is_abrupt() {
                tracing::debug!(
                    target: "jsse::iterator",
                    kept = completion.kind_name(),
                    dropped = inner.kind_name(),
                    "close failure masked by original completion"
                );
            }
            return completion;
        }
        if inner.is_abrupt() {
            tracing::debug!(target: "jsse::iterator", kind = inner.kind_name(), "close failed");
            return inner;
        }
        let inner_value = propagate!(inner.into_result());
        if !inner_value.is_object() {
            tracing::debug!(target: "jsse::iterator", "close result is not an object");
            return self.throw_type_error("iterator return() result is not an object");
        }
        completion
    }

    // §7.4.14 CreateIterResultObject
    pub fn create_iter_result_object(&mut self, value: JsValue, done: bool) -> JsObject {
        let obj = self.create_object();
        assert_normal(self.create_data_property(&obj, "value", value));
        assert_normal(self.create_data_property(&obj, "done", JsValue::Boolean(done)));
        obj
    }

    /// §7.4.15 CreateListIteratorRecord: a one-pass iterator over an
    /// already materialized list.
    pub fn create_list_iterator_record(&mut self, list: Vec<JsValue>) -> IteratorRecord {
        let proto = self.intrinsic(Intrinsic::IteratorPrototype);
        let iterator = self.create_object_with_proto(ObjectKind::Ordinary, proto);
        if let Some(data) = self.get_object(iterator.id) {
            data.borrow_mut().iterator_state = Some(IteratorState::List {
                list: list.into(),
                next_index: 0,
            });
        }
        let next_method = self.create_function(JsFunction::native("next", 0, list_iterator_next));
        IteratorRecord {
            iterator,
            next_method,
            done: false,
        }
    }

    // §7.4.12 IterableToList
    pub fn iterable_to_list(
        &mut self,
        items: &JsValue,
        method: Option<JsValue>,
    ) -> JsResult<Vec<JsValue>> {
        let mut record = self.get_iterator(items, IteratorHint::Sync, method)?;
        let mut values = Vec::new();
        while let Some(value) = self.iterator_step_value(&mut record)? {
            values.push(value);
        }
        Ok(values)
    }
}
