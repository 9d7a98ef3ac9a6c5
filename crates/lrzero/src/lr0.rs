//! Construction of the canonical collection of LR(0) item sets.

use crate::{
    closure::closure,
    grammar::{Alphabet, Grammar},
    item::{Item, ItemSet},
    util::{display_fn, Map, Queue},
};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateID(u32);

impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}

impl fmt::Display for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StateID {
    pub const START: Self = Self(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The LR(0) automaton, i.e. the canonical collection of item sets.
#[derive(Debug)]
pub struct LR0Automaton {
    states: Vec<ItemSet>,
    alphabet: Alphabet,
}

impl LR0Automaton {
    /// Iterate the states in discovery order.
    pub fn states(&self) -> impl Iterator<Item = (StateID, &ItemSet)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateID(i as u32), state))
    }

    pub fn state(&self, id: StateID) -> &ItemSet {
        &self.states[id.index()]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The terminal and nonterminal symbols met during construction.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    // `I0:` followed by one item per line.
    pub fn display(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            for (id, state) in self.states() {
                writeln!(f, "{:?}:", id)?;
                for (index, item) in state.items().enumerate() {
                    if state.is_goto_origin(index) {
                        let lookahead = item.lookahead();
                        if let Some(next) = state.goto(lookahead) {
                            let item = item.to_string();
                            writeln!(f, "\t{:<20} goto({})={:?}", item, lookahead, next)?;
                            continue;
                        }
                    }
                    writeln!(f, "\t{}", item)?;
                }
            }
            Ok(())
        })
    }
}

/// Calculate the LR(0) automaton based on the specified grammar.
///
/// The target of a transition is identified by the item it was shifted
/// from: once a state has been created by shifting some item, every other
/// state shifting the same item reuses it, regardless of the rest of its
/// contents.
#[tracing::instrument(skip_all)]
pub fn lr0(g: &Grammar) -> LR0Automaton {
    let mut states = vec![];
    let mut alphabet = Alphabet::default();
    let mut shifted_from = Map::<Item, StateID>::default();
    let mut pending = Queue::default();

    let mut initial = ItemSet::default();
    initial.insert(g.start_item());
    states.push(initial);
    pending.push(StateID::START);

    while let Some(current) = pending.pop() {
        let span = tracing::debug_span!("state", id = current.0);
        let _entered = span.enter();

        let added = closure(&mut states[current.index()], g, &mut alphabet);
        tracing::trace!("closure added {} items", added);

        // the item list may grow while walking it when a transition loops back.
        let mut index = 0;
        while let Some(item) = states[current.index()].item(index).cloned() {
            index += 1;

            let lookahead = item.lookahead();
            let shifted = match item.advance() {
                Some(shifted) => shifted,
                None => continue,
            };

            match states[current.index()].goto(lookahead) {
                None => {
                    let next = match shifted_from.get(&item).copied() {
                        Some(next) => {
                            tracing::trace!("goto({}) reuses {:?} for {}", lookahead, next, item);
                            next
                        }
                        None => {
                            let next = StateID(states.len() as u32);
                            let mut state = ItemSet::default();
                            state.insert(shifted);
                            states.push(state);
                            shifted_from.insert(item, next);
                            pending.push(next);
                            tracing::trace!("goto({}) creates {:?}", lookahead, next);
                            next
                        }
                    };
                    states[current.index()].set_goto(lookahead, next);
                }
                Some(next) => {
                    if states[next.index()].insert(shifted) {
                        tracing::trace!("goto({}) merges into {:?}", lookahead, next);
                        // an already processed target has to be closed again.
                        pending.push(next);
                    }
                }
            }
        }
    }

    tracing::debug!("{} states", states.len());
    LR0Automaton { states, alphabet }
}
