use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::runner::ds::error::AttrErrorType;
use crate::runner::ds::hooks::{FallbackFn, InterceptFn, InterceptionHooks};
use crate::runner::ds::slot::{AttributeSlot, SlotDecl};

/// Stable identity of a registered class: its index in the engine's class arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered class. Nothing in it changes after registration.
#[derive(Debug)]
pub struct ClassModel {
    id: ClassId,
    name: String,
    bases: Vec<ClassId>,
    /// Class precedence order, the class itself first.
    mro: Vec<ClassId>,
    /// Slots declared directly on this class, keyed by scoped name.
    slots: HashMap<String, AttributeSlot>,
    hooks: InterceptionHooks,
}

impl ClassModel {
    pub(crate) fn new(
        id: ClassId,
        name: String,
        bases: Vec<ClassId>,
        mro: Vec<ClassId>,
        slots: HashMap<String, AttributeSlot>,
        hooks: InterceptionHooks,
    ) -> Self {
        ClassModel {
            id,
            name,
            bases,
            mro,
            slots,
            hooks,
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[ClassId] {
        &self.bases
    }

    pub fn mro(&self) -> &[ClassId] {
        &self.mro
    }

    pub fn hooks(&self) -> &InterceptionHooks {
        &self.hooks
    }

    pub fn own_slot(&self, key: &str) -> Option<&AttributeSlot> {
        self.slots.get(key)
    }

    /// Keys of the slots declared on this class, sorted.
    pub fn own_slot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.slots.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }
}

/// Everything needed to register a class.
pub struct ClassDecl {
    pub(crate) name: String,
    pub(crate) bases: Vec<ClassId>,
    pub(crate) slots: Vec<SlotDecl>,
    pub(crate) hooks: InterceptionHooks,
}

impl ClassDecl {
    pub fn new<S: Into<String>>(name: S) -> Self {
        ClassDecl {
            name: name.into(),
            bases: Vec::new(),
            slots: Vec::new(),
            hooks: InterceptionHooks::new(),
        }
    }

    pub fn with_bases(mut self, bases: Vec<ClassId>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_slot(mut self, slot: SlotDecl) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn with_slots(mut self, slots: Vec<SlotDecl>) -> Self {
        self.slots.extend(slots);
        self
    }

    pub fn with_intercept(mut self, intercept: InterceptFn) -> Self {
        self.hooks.intercept = Some(intercept);
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackFn) -> Self {
        self.hooks.fallback = Some(fallback);
        self
    }

    pub fn with_hooks(mut self, hooks: InterceptionHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Compute the precedence order of a new class `id` named `name` with direct `bases`.
///
/// The order is the depth-first, left to right walk keeping only the last occurrence of
/// every class, as long as that walk puts every class before its bases and keeps every
/// class's bases in declared order. When it does not, the C3 merge of the bases' orders
/// is used, and failing that any order satisfying those constraints. The class is
/// rejected when a base is repeated or when no such order exists.
pub(crate) fn linearize(
    classes: &[ClassModel],
    id: ClassId,
    name: &str,
    bases: &[ClassId],
) -> Result<Vec<ClassId>, AttrErrorType> {
    let mut seen = HashSet::new();
    for base in bases {
        if !seen.insert(*base) {
            return Err(AttrErrorType::InconsistentHierarchy(name.to_string()));
        }
    }

    let walk = depth_first_keep_last(classes, id, bases);
    if respects_precedence(classes, id, bases, &walk) {
        return Ok(walk);
    }
    debug!(class = %name, "depth-first order breaks local precedence");
    c3_merge(classes, id, bases)
        .or_else(|| precedence_sort(classes, id, bases, &walk))
        .ok_or_else(|| AttrErrorType::InconsistentHierarchy(name.to_string()))
}

fn bases_of<'a>(
    classes: &'a [ClassModel],
    id: ClassId,
    bases: &'a [ClassId],
    class: ClassId,
) -> &'a [ClassId] {
    if class == id {
        bases
    } else {
        &classes[class.index()].bases
    }
}

fn depth_first_keep_last(classes: &[ClassModel], id: ClassId, bases: &[ClassId]) -> Vec<ClassId> {
    // Every base's own order is already the deduplicated depth-first walk of its
    // ancestry; keeping last occurrences of the concatenation gives the same result
    // as walking the raw graph.
    let mut walk = vec![id];
    for base in bases {
        walk.extend_from_slice(&classes[base.index()].mro);
    }
    let mut last = HashMap::new();
    for (position, class) in walk.iter().enumerate() {
        last.insert(*class, position);
    }
    walk.iter()
        .enumerate()
        .filter(|(position, class)| last[*class] == *position)
        .map(|(_, class)| *class)
        .collect()
}

/// Does `order` put every class before its bases, with the bases in declared order?
fn respects_precedence(
    classes: &[ClassModel],
    id: ClassId,
    bases: &[ClassId],
    order: &[ClassId],
) -> bool {
    let position: HashMap<ClassId, usize> =
        order.iter().enumerate().map(|(i, class)| (*class, i)).collect();
    order.iter().all(|class| {
        let mut previous = position[class];
        bases_of(classes, id, bases, *class).iter().all(|base| {
            let ordered = position[base] > previous;
            previous = position[base];
            ordered
        })
    })
}

/// C3 merge of the bases' orders and the base list itself.
fn c3_merge(classes: &[ClassModel], id: ClassId, bases: &[ClassId]) -> Option<Vec<ClassId>> {
    let mut sequences: Vec<Vec<ClassId>> = bases
        .iter()
        .map(|base| classes[base.index()].mro.clone())
        .collect();
    sequences.push(bases.to_vec());

    let mut order = vec![id];
    loop {
        sequences.retain(|sequence| !sequence.is_empty());
        if sequences.is_empty() {
            return Some(order);
        }
        let head = sequences.iter().map(|sequence| sequence[0]).find(|candidate| {
            sequences
                .iter()
                .all(|sequence| !sequence[1..].contains(candidate))
        })?;
        order.push(head);
        for sequence in sequences.iter_mut() {
            if sequence[0] == head {
                sequence.remove(0);
            }
        }
    }
}

/// Topological sort of the precedence constraints, preferring the depth-first `walk`
/// position among classes that are ready. `None` when the constraints form a cycle.
fn precedence_sort(
    classes: &[ClassModel],
    id: ClassId,
    bases: &[ClassId],
    walk: &[ClassId],
) -> Option<Vec<ClassId>> {
    let rank: HashMap<ClassId, usize> =
        walk.iter().enumerate().map(|(i, class)| (*class, i)).collect();
    let mut successors: HashMap<ClassId, Vec<ClassId>> = HashMap::new();
    let mut pending: HashMap<ClassId, usize> = walk.iter().map(|class| (*class, 0)).collect();
    for class in walk {
        let mut previous = *class;
        for base in bases_of(classes, id, bases, *class) {
            successors.entry(previous).or_default().push(*base);
            *pending.entry(*base).or_insert(0) += 1;
            previous = *base;
        }
    }

    let mut ready: BTreeSet<(usize, ClassId)> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(class, _)| (rank[class], *class))
        .collect();
    let mut order = Vec::with_capacity(walk.len());
    while let Some(next) = ready.iter().next().copied() {
        ready.remove(&next);
        let (_, class) = next;
        order.push(class);
        for successor in successors.get(&class).into_iter().flatten() {
            let count = pending.entry(*successor).or_insert(0);
            *count -= 1;
            if *count == 0 {
                ready.insert((rank[successor], *successor));
            }
        }
    }
    if order.len() == walk.len() {
        Some(order)
    } else {
        None
    }
}
