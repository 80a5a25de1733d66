//! Dependency resolution over the reference graph
//!
//! Computes the emission order for a dump: every record type appears after
//! all types it references, with deterministic tie-breaking (type name,
//! ascending). Reference cycles are handled by grouping each strongly
//! connected component, ordering components topologically, and marking
//! every reference field whose target lies in the same component as
//! *deferred*: excluded from the first restore pass and applied in a
//! dedicated second pass once all records of the component exist.
//!
//! Pure function of schema metadata; no side effects.

use snapdump_core::{RecordType, SchemaCatalog, SchemaError};
use std::collections::{BTreeSet, HashMap};

/// One record type in resolved order.
#[derive(Debug)]
pub struct ResolvedType<'a> {
    /// The record type
    pub record_type: &'a RecordType,
    /// Indexes of reference fields whose target shares this type's
    /// strongly connected component (self-references included)
    pub deferred_fields: Vec<usize>,
}

impl ResolvedType<'_> {
    /// Whether the field at `index` is deferred.
    pub fn is_deferred(&self, index: usize) -> bool {
        self.deferred_fields.contains(&index)
    }
}

/// Full resolver output: types in emission order plus deferred-field marks.
#[derive(Debug)]
pub struct ResolvedSchema<'a> {
    /// Record types in emission order
    pub order: Vec<ResolvedType<'a>>,
}

impl<'a> ResolvedSchema<'a> {
    /// Look up a resolved type by name.
    pub fn get(&self, type_name: &str) -> Option<&ResolvedType<'a>> {
        self.order.iter().find(|r| r.record_type.name() == type_name)
    }

    /// Deferred field indexes for a type (empty for unknown names).
    pub fn deferred_fields(&self, type_name: &str) -> &[usize] {
        self.get(type_name).map(|r| r.deferred_fields.as_slice()).unwrap_or(&[])
    }
}

/// Compute the emission order for all types in the catalog.
pub fn resolve(catalog: &SchemaCatalog) -> Result<ResolvedSchema<'_>, SchemaError> {
    let types = catalog.types();
    let n = types.len();

    let index_of: HashMap<&str, usize> =
        types.iter().enumerate().map(|(i, t)| (t.name(), i)).collect();

    // adjacency: type -> types it references
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, ty) in types.iter().enumerate() {
        for field in ty.fields() {
            if let Some(target) = field.reference_target() {
                let j = *index_of.get(target).ok_or_else(|| {
                    SchemaError::UnknownReferenceTarget {
                        type_name: ty.name().to_string(),
                        field: field.name.clone(),
                        target: target.to_string(),
                    }
                })?;
                adj[i].push(j);
            }
        }
    }

    // Strongly connected components. DFS roots are visited in name order so
    // component discovery is deterministic.
    let mut tarjan = Tarjan {
        adj: &adj,
        index: vec![None; n],
        low: vec![0; n],
        on_stack: vec![false; n],
        stack: Vec::new(),
        counter: 0,
        components: Vec::new(),
    };
    let mut roots: Vec<usize> = (0..n).collect();
    roots.sort_by_key(|&i| types[i].name());
    for v in roots {
        if tarjan.index[v].is_none() {
            tarjan.strongconnect(v);
        }
    }

    let components = tarjan.components;
    let mut component_of = vec![0usize; n];
    for (c, members) in components.iter().enumerate() {
        for &v in members {
            component_of[v] = c;
        }
    }

    // Kahn's algorithm over the condensation. A component is ready when
    // every component it references has been emitted; ties break on the
    // smallest type name the component contains.
    let k = components.len();
    let mut depends_on: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); k];
    let mut referenced_by: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); k];
    for (i, targets) in adj.iter().enumerate() {
        for &j in targets {
            let (ci, cj) = (component_of[i], component_of[j]);
            if ci != cj {
                depends_on[ci].insert(cj);
                referenced_by[cj].insert(ci);
            }
        }
    }

    let mut sorted_members: Vec<Vec<usize>> = components
        .iter()
        .map(|members| {
            let mut m = members.clone();
            m.sort_by_key(|&v| types[v].name());
            m
        })
        .collect();

    let mut remaining: Vec<usize> = depends_on.iter().map(BTreeSet::len).collect();
    let mut ready: BTreeSet<(&str, usize)> = (0..k)
        .filter(|&c| remaining[c] == 0)
        .map(|c| (types[sorted_members[c][0]].name(), c))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some((_, c)) = ready.pop_first() {
        for &v in &sorted_members[c] {
            let ty = &types[v];
            let deferred_fields = ty
                .fields()
                .iter()
                .enumerate()
                .filter(|(_, f)| {
                    f.reference_target()
                        .and_then(|t| index_of.get(t))
                        .map_or(false, |&j| component_of[j] == c)
                })
                .map(|(i, _)| i)
                .collect();
            order.push(ResolvedType { record_type: ty, deferred_fields });
        }
        for &d in &referenced_by[c] {
            remaining[d] -= 1;
            if remaining[d] == 0 {
                ready.insert((types[sorted_members[d][0]].name(), d));
            }
        }
        sorted_members[c].clear();
    }

    Ok(ResolvedSchema { order })
}

struct Tarjan<'g> {
    adj: &'g [Vec<usize>],
    index: Vec<Option<u32>>,
    low: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    counter: u32,
    components: Vec<Vec<usize>>,
}

impl Tarjan<'_> {
    // Recursion depth is bounded by the number of record types.
    fn strongconnect(&mut self, v: usize) {
        self.index[v] = Some(self.counter);
        self.low[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for &w in &self.adj[v] {
            if self.index[w].is_none() {
                self.strongconnect(w);
                self.low[v] = self.low[v].min(self.low[w]);
            } else if self.on_stack[w] {
                self.low[v] = self.low[v].min(self.index[w].unwrap_or(0));
            }
        }

        if Some(self.low[v]) == self.index[v] {
            let mut component = Vec::new();
            loop {
                let w = match self.stack.pop() {
                    Some(w) => w,
                    None => break,
                };
                self.on_stack[w] = false;
                component.push(w);
                if w == v {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
