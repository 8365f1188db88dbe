//! Table-driven window evaluation.
//!
//! Every signal (a mesh, a caption, an ambient soundscape) is active while the
//! timeline position lies inside one of its half-open `[start, end)` windows.
//! The machine remembers the previous membership and only reports changes.

use crate::error::OverlapWarning;
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Visibility,
    Caption,
    Ambient,
}

impl SignalKind {
    pub fn label(self) -> &'static str {
        match self {
            SignalKind::Visibility => "visibility",
            SignalKind::Caption => "caption",
            SignalKind::Ambient => "ambient",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub signal: String,
    pub start: f32,
    pub end: f32,
}

impl Window {
    pub fn new(signal: impl Into<String>, start: f32, end: f32) -> Self {
        Self {
            signal: signal.into(),
            start,
            end,
        }
    }

    /// Half-open membership: `start` inclusive, `end` exclusive.
    #[inline]
    pub fn contains(&self, position: f32) -> bool {
        self.start <= position && position < self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// An ordered list of windows for one kind of signal.
///
/// When `exclusive` is set the table forms one exclusivity group: at most one of
/// its signals is active at any position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowTable {
    pub kind: SignalKind,
    #[serde(default)]
    pub exclusive: bool,
    pub windows: Vec<Window>,
}

impl WindowTable {
    pub fn new(kind: SignalKind, exclusive: bool, windows: Vec<Window>) -> Self {
        Self {
            kind,
            exclusive,
            windows,
        }
    }

    /// Pairs of windows of different signals that overlap inside an exclusive
    /// table. Non-exclusive tables never warn.
    pub fn overlap_warnings(&self) -> Vec<OverlapWarning> {
        let mut out = Vec::new();
        if !self.exclusive {
            return out;
        }
        for (i, a) in self.windows.iter().enumerate() {
            for b in &self.windows[i + 1..] {
                if a.signal != b.signal && a.overlaps(b) {
                    out.push(OverlapWarning {
                        table: self.kind.label(),
                        first: a.signal.clone(),
                        first_start: a.start,
                        first_end: a.end,
                        second: b.signal.clone(),
                        second_start: b.start,
                        second_end: b.end,
                    });
                }
            }
        }
        out
    }
}

/// Dense handle for a signal registered with a [`WindowStateMachine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Enter,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub kind: SignalKind,
    pub signal: SignalId,
    pub edge: Edge,
}

pub type Transitions = SmallVec<[Transition; 8]>;

#[derive(Clone, Debug)]
struct CompiledTable {
    exclusive: bool,
    windows: Vec<(SignalId, f32, f32)>,
}

fn kind_slot(kind: SignalKind) -> usize {
    match kind {
        SignalKind::Visibility => 0,
        SignalKind::Caption => 1,
        SignalKind::Ambient => 2,
    }
}

#[derive(Clone, Debug)]
pub struct WindowStateMachine {
    tables: Vec<CompiledTable>,
    names: Vec<(SignalKind, String)>,
    // one name map per signal kind, indexed by `kind_slot`
    lookup: [FnvHashMap<String, SignalId>; 3],
    active: Vec<bool>,
    next: Vec<bool>,
}

impl WindowStateMachine {
    /// Intern every signal named by the tables. Validation of window bounds is
    /// the caller's job (see [`crate::PresentationConfig::validate`]).
    pub fn new(tables: &[WindowTable]) -> Self {
        let mut names: Vec<(SignalKind, String)> = Vec::new();
        let mut lookup: [FnvHashMap<String, SignalId>; 3] = Default::default();
        let mut compiled = Vec::with_capacity(tables.len());
        for table in tables {
            let mut windows = Vec::with_capacity(table.windows.len());
            for w in &table.windows {
                let id = *lookup[kind_slot(table.kind)]
                    .entry(w.signal.clone())
                    .or_insert_with(|| {
                        names.push((table.kind, w.signal.clone()));
                        SignalId(names.len() - 1)
                    });
                windows.push((id, w.start, w.end));
            }
            compiled.push(CompiledTable {
                exclusive: table.exclusive,
                windows,
            });
        }
        let n = names.len();
        Self {
            tables: compiled,
            names,
            lookup,
            active: vec![false; n],
            next: vec![false; n],
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, kind: SignalKind, name: &str) -> Option<SignalId> {
        self.lookup[kind_slot(kind)].get(name).copied()
    }

    pub fn name(&self, id: SignalId) -> &str {
        &self.names[id.0].1
    }

    pub fn kind(&self, id: SignalId) -> SignalKind {
        self.names[id.0].0
    }

    pub fn is_active(&self, id: SignalId) -> bool {
        self.active.get(id.0).copied().unwrap_or(false)
    }

    /// Names of the currently active signals of one kind, in declaration order.
    pub fn active_names(&self, kind: SignalKind) -> impl Iterator<Item = &str> + '_ {
        self.names
            .iter()
            .zip(self.active.iter())
            .filter(move |((k, _), on)| *k == kind && **on)
            .map(|((_, name), _)| name.as_str())
    }

    /// Evaluate membership at `position` and return the edges since the last
    /// call. All exits are listed before any enter, so an exclusive group never
    /// shows two live members in between.
    pub fn evaluate(&mut self, position: f32) -> Transitions {
        let mut out = Transitions::new();
        if !position.is_finite() {
            log::debug!("[windows] ignoring non-finite position {}", position);
            return out;
        }

        self.next.iter_mut().for_each(|v| *v = false);
        for table in &self.tables {
            if table.exclusive {
                // later declarations win where windows overlap
                let winner = table
                    .windows
                    .iter()
                    .rev()
                    .find(|(_, s, e)| *s <= position && position < *e);
                if let Some((id, _, _)) = winner {
                    self.next[id.0] = true;
                }
            } else {
                for (id, s, e) in &table.windows {
                    if *s <= position && position < *e {
                        self.next[id.0] = true;
                    }
                }
            }
        }

        for (i, (was, now)) in self.active.iter().zip(self.next.iter()).enumerate() {
            if *was && !*now {
                out.push(Transition {
                    kind: self.names[i].0,
                    signal: SignalId(i),
                    edge: Edge::Exit,
                });
            }
        }
        for (i, (was, now)) in self.active.iter().zip(self.next.iter()).enumerate() {
            if !*was && *now {
                out.push(Transition {
                    kind: self.names[i].0,
                    signal: SignalId(i),
                    edge: Edge::Enter,
                });
            }
        }
        std::mem::swap(&mut self.active, &mut self.next);
        out
    }

    /// Forget all membership; the next evaluation re-enters whatever is active.
    pub fn clear(&mut self) {
        self.active.iter_mut().for_each(|v| *v = false);
    }
}
