use super::*;
use crate::types::WellKnownSymbol;

// [[SyncIteratorRecord]] of an %AsyncFromSyncIteratorPrototype% receiver
fn sync_record_of(interp: &mut Interpreter, this: &JsValue) -> JsResult<IteratorRecord> {
    let record = this.as_object().and_then(|o| interp.get_object(o.id)).and_then(|data| {
        match &data.borrow().iterator_state {
            Some(IteratorState::AsyncFromSync { sync }) => Some(sync.clone()),
            _ => None,
        }
    });
    record.ok_or_else(|| interp.throw_type_error("receiver is not an async-from-sync iterator"))
}

// §27.1.6.4 AsyncFromSyncIteratorContinuation, minus the promise wrapping:
// the sync result is re-packaged as a fresh iterator result.
fn continuation(interp: &mut Interpreter, result: &JsObject) -> Completion {
    let done = propagate!(interp.iterator_complete(result));
    let value = propagate!(interp.iterator_value(result));
    Completion::Normal(JsValue::Object(interp.create_iter_result_object(value, done)))
}

impl Interpreter {
    pub(crate) fn setup_iterator_prototypes(&mut self) {
        // %IteratorPrototype% (§27.1.2)
        let iter_proto = self.create_object();
        let iter_self_fn = self.create_function(JsFunction::native(
            "[Symbol.iterator]",
            0,
            |_interp, this, _args| Completion::Normal(this.clone()),
        ));
        if let Some(data) = self.get_object(iter_proto.id) {
            data.borrow_mut()
                .insert_builtin(WellKnownSymbol::Iterator.key(), iter_self_fn);
        }
        self.realm.set(Intrinsic::IteratorPrototype, iter_proto);

        // %AsyncIteratorPrototype% (§27.1.3)
        let async_iter_proto = self.create_object();
        let async_self_fn = self.create_function(JsFunction::native(
            "[Symbol.asyncIterator]",
            0,
            |_interp, this, _args| Completion::Normal(this.clone()),
        ));
        if let Some(data) = self.get_object(async_iter_proto.id) {
            data.borrow_mut()
                .insert_builtin(WellKnownSymbol::AsyncIterator.key(), async_self_fn);
        }
        self.realm.set(Intrinsic::AsyncIteratorPrototype, async_iter_proto);

        self.setup_async_from_sync_iterator_prototype(async_iter_proto);
    }

    // %AsyncFromSyncIteratorPrototype% (§27.1.6.2)
    fn setup_async_from_sync_iterator_prototype(&mut self, async_iter_proto: JsObject) {
        let proto = self.create_object_with_proto(ObjectKind::Ordinary, Some(async_iter_proto));

        let next_fn = self.create_function(JsFunction::native("next", 1, |interp, this, args| {
            let sync = propagate!(sync_record_of(interp, this));
            let result = propagate!(interp.iterator_next(&sync, args.first().cloned()));
            continuation(interp, &result)
        }));

        let return_fn = self.create_function(JsFunction::native("return", 1, |interp, this, args| {
            let sync = propagate!(sync_record_of(interp, this));
            let iterator = JsValue::Object(sync.iterator);
            let Some(ret) = propagate!(interp.get_method(&iterator, "return")) else {
                let value = args.first().cloned().unwrap_or_default();
                return Completion::Normal(JsValue::Object(
                    interp.create_iter_result_object(value, true),
                ));
            };
            let result = propagate!(interp.call(&ret, &iterator, &args[..args.len().min(1)]));
            let JsValue::Object(result) = result else {
                return interp.throw_type_error("iterator return() result is not an object");
            };
            continuation(interp, &result)
        }));

        let throw_fn = self.create_function(JsFunction::native("throw", 1, |interp, this, args| {
            let sync = propagate!(sync_record_of(interp, this));
            let iterator = JsValue::Object(sync.iterator);
            let Some(throw) = propagate!(interp.get_method(&iterator, "throw")) else {
                // Protocol violation: give the sync iterator a chance to clean up first.
                let closed = interp.iterator_close(&sync, Completion::Normal(JsValue::Undefined));
                if closed.is_abrupt() {
                    return closed;
                }
                return interp.throw_type_error("The iterator does not provide a 'throw' method");
            };
            let result = propagate!(interp.call(&throw, &iterator, &args[..args.len().min(1)]));
            let JsValue::Object(result) = result else {
                return interp.throw_type_error("iterator throw() result is not an object");
            };
            continuation(interp, &result)
        }));

        if let Some(data) = self.get_object(proto.id) {
            let mut data = data.borrow_mut();
            data.insert_builtin("next", next_fn);
            data.insert_builtin("return", return_fn);
            data.insert_builtin("throw", throw_fn);
        }
        self.realm.set(Intrinsic::AsyncFromSyncIteratorPrototype, proto);
    }
}
