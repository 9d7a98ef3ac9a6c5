//! Derivation of the LR(0) parse table with conflict detection.

use crate::{
    grammar::{Grammar, ProductionID, Symbol},
    lr0::{LR0Automaton, StateID},
    util::{display_fn, Map},
};
use std::fmt;

/// The action that the LR(0) automaton in a state performs on a particular
/// lookahead symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    /// Read a lookahead symbol and transition to the specified state.
    Shift(StateID),

    /// Reduce to the specified production rule.
    Reduce(ProductionID),

    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(next) => write!(f, "s{}", next),
            Self::Reduce(production) => write!(f, "r{}", production),
            Self::Accept => f.write_str("acc"),
        }
    }
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ParseTableRow {
    pub actions: Map<Symbol, Action>,
    pub gotos: Map<Symbol, StateID>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// A completed item is mixed with items that still have transitions.
    ShiftReduce,

    /// Several completed items share a state without any transition.
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftReduce => f.write_str("shift/reduce"),
            Self::ReduceReduce => f.write_str("reduce/reduce"),
        }
    }
}

/// A state that LR(0) cannot decide on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateID,
    pub kind: ConflictKind,
    /// The productions completed in the state.
    pub reduces: Vec<ProductionID>,
}

#[derive(Debug)]
pub struct ParseTable {
    pub rows: Map<StateID, ParseTableRow>,
    pub conflicts: Vec<Conflict>,
    terminals: Vec<Symbol>,
    nonterminals: Vec<Symbol>,
}

impl ParseTable {
    #[tracing::instrument(skip_all)]
    pub fn generate(g: &Grammar, lr0: &LR0Automaton) -> Self {
        let terminals: Vec<_> = lr0.alphabet().terminals().collect();
        let nonterminals: Vec<_> = lr0.alphabet().nonterminals().collect();

        let mut rows = Map::default();
        let mut conflicts = vec![];
        for (id, state) in lr0.states() {
            let mut row = ParseTableRow::default();

            let items: Vec<_> = state.items().collect();
            match &items[..] {
                [item] if item.is_complete() => match g.reduce(item) {
                    Some(ProductionID::ACCEPT) => {
                        row.actions.insert(Symbol::EOI, Action::Accept);
                    }
                    Some(production) => {
                        for &t in terminals.iter().chain(Some(&Symbol::EOI)) {
                            row.actions.insert(t, Action::Reduce(production));
                        }
                    }
                    None => {
                        tracing::warn!("{:?}: no production is completed by {}", id, item);
                    }
                },
                items => {
                    for (symbol, next) in state.gotos() {
                        if symbol.is_nonterminal() {
                            row.gotos.insert(symbol, next);
                        } else {
                            row.actions.insert(symbol, Action::Shift(next));
                        }
                    }

                    let reduces: Vec<_> = items
                        .iter()
                        .filter(|item| item.is_complete())
                        .filter_map(|item| g.reduce(item))
                        .collect();
                    if items.len() > 1 && !reduces.is_empty() {
                        let kind = if state.gotos().next().is_some() {
                            ConflictKind::ShiftReduce
                        } else {
                            ConflictKind::ReduceReduce
                        };
                        tracing::debug!("{:?}: {} conflict", id, kind);
                        conflicts.push(Conflict {
                            state: id,
                            kind,
                            reduces,
                        });
                    }
                }
            }

            rows.insert(id, row);
        }

        Self {
            rows,
            conflicts,
            terminals,
            nonterminals,
        }
    }

    /// Whether the grammar can be analyzed by LR(0).
    pub fn is_lr0(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// The column symbols: terminals, the end-marker, then nonterminals.
    pub fn columns(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals
            .iter()
            .chain(Some(&Symbol::EOI))
            .chain(&self.nonterminals)
            .copied()
    }

    /// The cell at the specified row and column, if any.
    pub fn cell(&self, state: StateID, column: Symbol) -> Option<String> {
        let row = self.rows.get(&state)?;
        if column.is_nonterminal() {
            row.gotos.get(&column).map(|next| next.to_string())
        } else {
            row.actions.get(&column).map(|action| action.to_string())
        }
    }

    // tab-separated grid, one row per state.
    pub fn display(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            for column in self.columns() {
                write!(f, "\t{}", column)?;
            }
            writeln!(f)?;
            for &id in self.rows.keys() {
                write!(f, "{}", id)?;
                for column in self.columns() {
                    f.write_str("\t")?;
                    if let Some(cell) = self.cell(id, column) {
                        f.write_str(&cell)?;
                    }
                }
                writeln!(f)?;
            }
            Ok(())
        })
    }
}
