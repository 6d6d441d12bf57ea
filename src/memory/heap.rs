//! Allocation registry for reference-typed values
//!
//! Scripts build reference cycles freely (`obj.self = obj`, a closure stored in
//! the scope it captured), and `Rc` alone never frees those. Every scope, array
//! and object the interpreter allocates is registered here;
//! [`Heap::teardown`] empties whatever is still alive when a run ends, which
//! breaks the cycles and lets everything drop.
//!
//! Arrays and objects are held strongly, so a container is only ever freed
//! here, after its contents were taken out, and every container it held is
//! still registered. Freeing is therefore always shallow: a chain built by
//! `a = [a]` a million times releases one level at a time instead of
//! recursing through the whole chain on the runner's stack. Scopes are held
//! weakly and simply forgotten once dead.
//!
//! Unreferenced containers are swept lazily once the registry doubles in size
//! since the last sweep, so long-running loops do not grow it without bound.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

use super::scope::{Scope, ScopeRef};
use super::value::{ArrayRef, ObjectRef, Value};

const MIN_SWEEP_THRESHOLD: usize = 1024;

/// Everything allocated during one run
#[derive(Debug)]
pub struct Heap {
    scopes: Vec<Weak<RefCell<Scope>>>,
    arrays: Vec<ArrayRef>,
    objects: Vec<ObjectRef>,
    sweep_threshold: usize,
    total_allocations: usize,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            scopes: Vec::new(),
            arrays: Vec::new(),
            objects: Vec::new(),
            sweep_threshold: MIN_SWEEP_THRESHOLD,
            total_allocations: 0,
        }
    }

    pub fn track_scope(&mut self, scope: &ScopeRef) {
        self.scopes.push(Rc::downgrade(scope));
        self.after_allocation();
    }

    pub fn track_array(&mut self, array: &ArrayRef) {
        self.arrays.push(Rc::clone(array));
        self.after_allocation();
    }

    pub fn track_object(&mut self, object: &ObjectRef) {
        self.objects.push(Rc::clone(object));
        self.after_allocation();
    }

    /// Number of allocations made over the lifetime of this heap
    pub fn total_allocations(&self) -> usize {
        self.total_allocations
    }

    /// Number of tracked allocations something outside the registry still
    /// refers to
    pub fn live_count(&self) -> usize {
        self.scopes.iter().filter(|w| w.strong_count() > 0).count()
            + self.arrays.iter().filter(|a| Rc::strong_count(a) > 1).count()
            + self.objects.iter().filter(|o| Rc::strong_count(o) > 1).count()
    }

    fn tracked(&self) -> usize {
        self.scopes.len() + self.arrays.len() + self.objects.len()
    }

    fn after_allocation(&mut self) {
        self.total_allocations += 1;
        if self.tracked() >= self.sweep_threshold {
            self.sweep();
        }
    }

    /// Free every container nothing outside the registry refers to, along
    /// with whatever that orphans in turn
    fn sweep(&mut self) {
        let before = self.tracked();
        self.scopes.retain(|w| w.strong_count() > 0);

        let mut orphans: Vec<Value> = Vec::new();
        for array in self.arrays.iter().filter(|a| Rc::strong_count(a) == 1) {
            take_items(array, &mut orphans);
        }
        for object in self.objects.iter().filter(|o| Rc::strong_count(o) == 1) {
            take_properties(object, &mut orphans);
        }
        // A popped container held only by the registry and this handle is
        // orphaned too; empty it before the handle goes
        while let Some(value) = orphans.pop() {
            match &value {
                Value::Array(array) if Rc::strong_count(array) == 2 => take_items(array, &mut orphans),
                Value::Object(object) if Rc::strong_count(object) == 2 => {
                    take_properties(object, &mut orphans)
                }
                _ => {}
            }
        }
        self.arrays.retain(|a| Rc::strong_count(a) > 1);
        self.objects.retain(|o| Rc::strong_count(o) > 1);

        let live = self.tracked();
        self.sweep_threshold = (live * 2).max(MIN_SWEEP_THRESHOLD);
        trace!("heap sweep: {} -> {} tracked", before, live);
    }

    /// Empty every live allocation so reference cycles fall apart
    pub fn teardown(&mut self) {
        let scopes: Vec<ScopeRef> = self.scopes.drain(..).filter_map(|w| w.upgrade()).collect();
        let arrays = std::mem::take(&mut self.arrays);
        let objects = std::mem::take(&mut self.objects);
        trace!(
            "heap teardown: {} scopes, {} arrays, {} objects",
            scopes.len(),
            arrays.len(),
            objects.len()
        );

        for scope in &scopes {
            if let Ok(mut scope) = scope.try_borrow_mut() {
                scope.clear();
            }
        }
        // Containers stay registered until all of them are empty
        let mut contents = Vec::new();
        for array in &arrays {
            take_items(array, &mut contents);
        }
        for object in &objects {
            take_properties(object, &mut contents);
        }
        drop(contents);
        self.sweep_threshold = MIN_SWEEP_THRESHOLD;
    }
}

/// Move an array's items into `out`; no borrow is held when they later drop
fn take_items(array: &ArrayRef, out: &mut Vec<Value>) {
    if let Ok(mut items) = array.try_borrow_mut() {
        out.append(&mut items);
    }
}

fn take_properties(object: &ObjectRef, out: &mut Vec<Value>) {
    if let Ok(mut obj) = object.try_borrow_mut() {
        out.extend(std::mem::take(&mut obj.properties).into_values());
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Heap {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::scope::{Binding, BindingKind};
    use crate::memory::value::{Object, ObjectClass};

    #[test]
    fn test_teardown_breaks_object_cycle() {
        let mut heap = Heap::new();
        let obj = Rc::new(RefCell::new(Object::new(ObjectClass::Plain)));
        heap.track_object(&obj);
        obj.borrow_mut().set("me", Value::Object(Rc::clone(&obj)));
        let weak = Rc::downgrade(&obj);
        drop(obj);

        assert!(weak.upgrade().is_some(), "cycle keeps the object alive");
        heap.teardown();
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_teardown_breaks_scope_cycle() {
        let mut heap = Heap::new();
        let global = Scope::global();
        heap.track_scope(&global);
        let arr: ArrayRef = Rc::new(RefCell::new(Vec::new()));
        heap.track_array(&arr);
        global
            .borrow_mut()
            .declare("a", Binding::new(BindingKind::Let, Value::Array(Rc::clone(&arr))))
            .unwrap();
        arr.borrow_mut().push(Value::Array(Rc::clone(&arr)));

        let weak_arr = Rc::downgrade(&arr);
        drop(arr);
        drop(global);
        heap.teardown();
        assert!(weak_arr.upgrade().is_none());
    }

    #[test]
    fn test_sweep_discards_dead_entries() {
        let mut heap = Heap::new();
        for _ in 0..(MIN_SWEEP_THRESHOLD * 3) {
            let arr: ArrayRef = Rc::new(RefCell::new(Vec::new()));
            heap.track_array(&arr);
        }
        assert!(heap.tracked() < MIN_SWEEP_THRESHOLD);
        assert_eq!(heap.total_allocations(), MIN_SWEEP_THRESHOLD * 3);
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn test_teardown_releases_deep_chains_without_recursing() {
        let mut heap = Heap::new();
        let depth = 200_000;

        // Outermost first, the order that made a naive teardown recurse
        let root: ObjectRef = Rc::new(RefCell::new(Object::new(ObjectClass::Plain)));
        heap.track_object(&root);
        let mut tail = Rc::clone(&root);
        for _ in 0..depth {
            let next: ObjectRef = Rc::new(RefCell::new(Object::new(ObjectClass::Plain)));
            heap.track_object(&next);
            tail.borrow_mut().set("x", Value::Object(Rc::clone(&next)));
            tail = next;
        }
        drop(tail);

        let mut array: ArrayRef = Rc::new(RefCell::new(Vec::new()));
        heap.track_array(&array);
        for _ in 0..depth {
            let outer: ArrayRef = Rc::new(RefCell::new(vec![Value::Array(array)]));
            heap.track_array(&outer);
            array = outer;
        }

        // Both chains are reachable only through their heads while tearing down
        heap.teardown();
        assert_eq!(heap.live_count(), 0);
        assert!(root.borrow().properties.is_empty());
        assert!(array.borrow().is_empty());

        let weak_root = Rc::downgrade(&root);
        drop(root);
        drop(array);
        assert!(weak_root.upgrade().is_none());
    }

    #[test]
    fn test_sweep_frees_orphaned_chain_without_recursing() {
        let mut heap = Heap::new();
        let mut array: ArrayRef = Rc::new(RefCell::new(Vec::new()));
        heap.track_array(&array);
        let innermost = Rc::downgrade(&array);
        for _ in 0..200_000 {
            let outer: ArrayRef = Rc::new(RefCell::new(vec![Value::Array(array)]));
            heap.track_array(&outer);
            array = outer;
        }
        assert!(innermost.upgrade().is_some());

        drop(array);
        heap.sweep();
        assert_eq!(heap.tracked(), 0);
        assert!(innermost.upgrade().is_none());
    }

    #[test]
    fn test_sweep_keeps_shared_children() {
        let mut heap = Heap::new();
        let child: ObjectRef = Rc::new(RefCell::new(Object::new(ObjectClass::Plain)));
        heap.track_object(&child);
        let parent: ArrayRef = Rc::new(RefCell::new(vec![Value::Object(Rc::clone(&child))]));
        heap.track_array(&parent);

        drop(parent);
        heap.sweep();
        assert_eq!(heap.live_count(), 1);
        assert_eq!(Rc::strong_count(&child), 2);
    }
}

