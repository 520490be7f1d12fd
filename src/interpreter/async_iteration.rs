use super::*;

/// The suspension point the host provides for `Await`.
///
/// The core never owns an event loop. Whenever an async operation has to wait
/// on a value it either hands that value back to the caller (see
/// [`AsyncCloseStep`]) or, in the convenience drivers, asks an `AwaitHost` to
/// settle it. The returned completion is `Normal(resolution)` when the value
/// fulfilled and `Throw(reason)` when it rejected.
pub trait AwaitHost {
    fn await_value(&mut self, interp: &mut Interpreter, value: JsValue) -> Completion;
}

/// Settles thenables by calling their `then` on the spot. A thenable that
/// does not settle before `then` returns is reported as a TypeError.
#[derive(Debug, Default, Clone, Copy)]
pub struct SynchronousAwait;

impl SynchronousAwait {
    fn settle(interp: &mut Interpreter, thenable: &JsValue, then: &JsValue) -> Completion {
        let settled: Rc<RefCell<Option<Completion>>> = Rc::new(RefCell::new(None));
        let slot = settled.clone();
        let resolve = interp.create_function(JsFunction::native("", 1, move |_, _, args| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(Completion::Normal(args.first().cloned().unwrap_or_default()));
            }
            Completion::Normal(JsValue::Undefined)
        }));
        let slot = settled.clone();
        let reject = interp.create_function(JsFunction::native("", 1, move |_, _, args| {
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(Completion::Throw(args.first().cloned().unwrap_or_default()));
            }
            Completion::Normal(JsValue::Undefined)
        }));
        let called = interp.call_function(then, thenable, &[resolve, reject]);
        if let Some(outcome) = settled.borrow_mut().take() {
            return outcome;
        }
        match called {
            Completion::Throw(reason) => Completion::Throw(reason),
            _ => interp.throw_type_error("awaited thenable did not settle synchronously"),
        }
    }
}

impl AwaitHost for SynchronousAwait {
    fn await_value(&mut self, interp: &mut Interpreter, value: JsValue) -> Completion {
        let mut current = value;
        let mut depth = 0;
        loop {
            if !current.is_object() {
                return Completion::Normal(current);
            }
            let then = propagate!(interp.get_v(&current, "then"));
            if !interp.is_callable(&then) {
                return Completion::Normal(current);
            }
            let resolution = propagate!(Self::settle(interp, &current, &then).into_result());
            if strict_equality(&resolution, &current) {
                return interp.throw_type_error("Chaining cycle detected for thenable");
            }
            depth += 1;
            if let Err(abrupt) = interp.check_chain_depth(depth) {
                return abrupt;
            }
            current = resolution;
        }
    }
}

/// First phase of AsyncIteratorClose: either the close finished without
/// suspending, or the host must await a value and then call
/// [`PendingAsyncClose::resume`].
#[derive(Debug)]
pub enum AsyncCloseStep {
    Complete(Completion),
    Await(PendingAsyncClose),
}

/// An AsyncIteratorClose suspended on the result of the iterator's `return`.
#[derive(Debug)]
#[must_use = "a pending close must be resumed with the awaited outcome"]
pub struct PendingAsyncClose {
    completion: Completion,
    awaited: JsValue,
}

impl PendingAsyncClose {
    /// The value returned by `return()`, to be awaited by the host.
    pub fn awaited(&self) -> &JsValue {
        &self.awaited
    }

    /// The completion that caused the close.
    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    pub fn resume(self, interp: &mut Interpreter, resolution: Completion) -> Completion {
        interp.merge_close_completions(self.completion, resolution)
    }
}

impl Interpreter {
    /// CreateAsyncFromSyncIterator (§27.1.6.1): wraps a sync iterator record
    /// so it can be driven by async iteration. The adapter is then acquired
    /// like any async iterable, through its inherited `[Symbol.asyncIterator]`.
    pub fn create_async_from_sync_iterator(&mut self, sync: IteratorRecord) -> JsResult<IteratorRecord> {
        let proto = self.intrinsic(Intrinsic::AsyncFromSyncIteratorPrototype);
        let adapter = self.create_object_with_proto(ObjectKind::Ordinary, proto);
        if let Some(data) = self.get_object(adapter.id) {
            data.borrow_mut().iterator_state = Some(IteratorState::AsyncFromSync { sync });
        }
        tracing::trace!(target: "jsse::iterator", adapter = adapter.id, "wrapped sync iterator");
        self.get_iterator(&JsValue::Object(adapter), IteratorHint::Async, None)
    }

    // §7.4.11 AsyncIteratorClose, up to the Await on return()'s result
    pub fn async_iterator_close(
        &mut self,
        record: &IteratorRecord,
        completion: Completion,
    ) -> AsyncCloseStep {
        let iterator = JsValue::Object(record.iterator);
        let inner = match self.get_method(&iterator, "return") {
            Ok(None) => return AsyncCloseStep::Complete(completion),
            Ok(Some(ret)) => self.call_function(&ret, &iterator, &[]),
            Err(abrupt) => abrupt,
        };
        match inner {
            Completion::Normal(awaited) => {
                tracing::trace!(target: "jsse::iterator", iterator = record.iterator.id, "close awaiting return()");
                AsyncCloseStep::Await(PendingAsyncClose { completion, awaited })
            }
            abrupt => AsyncCloseStep::Complete(self.merge_close_completions(completion, abrupt)),
        }
    }

    /// Runs AsyncIteratorClose to the end, letting `host` perform the await.
    pub fn async_iterator_close_with(
        &mut self,
        host: &mut dyn AwaitHost,
        record: &IteratorRecord,
        completion: Completion,
    ) -> Completion {
        match self.async_iterator_close(record, completion) {
            AsyncCloseStep::Complete(done) => done,
            AsyncCloseStep::Await(pending) => {
                let resolution = host.await_value(self, pending.awaited().clone());
                pending.resume(self, resolution)
            }
        }
    }
}
