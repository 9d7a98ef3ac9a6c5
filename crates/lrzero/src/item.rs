//! LR(0) items and item sets.

use crate::{
    grammar::{Production, Symbol},
    lr0::StateID,
    util::{Map, Set},
};
use std::{fmt, rc::Rc};

/// The LR(0) item, a production with a dot marking how much of it has been
/// recognized.
///
/// Two items are equal iff they have the same left-hand side, the same
/// right-hand side and the same dot offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    left: Symbol,
    right: Rc<[Symbol]>,
    dot: usize,
}

impl Item {
    /// Create the item with the dot at the beginning of the production.
    pub fn new(production: &Production) -> Self {
        Self {
            left: production.left(),
            right: production.right().clone(),
            dot: 0,
        }
    }

    /// Create the item with the dot at the end of the production.
    pub fn complete(production: &Production) -> Self {
        Self {
            dot: production.right().len(),
            ..Self::new(production)
        }
    }

    pub fn left(&self) -> Symbol {
        self.left
    }

    pub fn right(&self) -> &[Symbol] {
        &self.right[..]
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    /// The symbol immediately after the dot, or `Symbol::EOI` if the dot is
    /// at the end.
    pub fn lookahead(&self) -> Symbol {
        self.right.get(self.dot).copied().unwrap_or(Symbol::EOI)
    }

    pub fn is_complete(&self) -> bool {
        self.dot >= self.right.len()
    }

    /// Return the item whose dot is moved over the lookahead symbol.
    pub fn advance(&self) -> Option<Self> {
        if self.is_complete() {
            return None;
        }
        Some(Self {
            left: self.left,
            right: self.right.clone(),
            dot: self.dot + 1,
        })
    }
}

// `"S->A.b"`
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->", self.left)?;
        for (i, symbol) in self.right.iter().enumerate() {
            if i == self.dot {
                f.write_str(".")?;
            }
            write!(f, "{}", symbol)?;
        }
        if self.is_complete() {
            f.write_str(".")?;
        }
        Ok(())
    }
}

/// A state of the LR(0) automaton.
#[derive(Debug, Default, Clone)]
pub struct ItemSet {
    items: Set<Item>,
    gotos: Map<Symbol, StateID>,
}

impl ItemSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get_index(index)
    }

    /// Iterate the items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    /// Insert an item, returning `false` if it already exists.
    pub fn insert(&mut self, item: Item) -> bool {
        self.items.insert(item)
    }

    pub fn goto(&self, symbol: Symbol) -> Option<StateID> {
        self.gotos.get(&symbol).copied()
    }

    /// Iterate the outgoing transitions in the order they were created.
    pub fn gotos(&self) -> impl Iterator<Item = (Symbol, StateID)> + '_ {
        self.gotos.iter().map(|(symbol, next)| (*symbol, *next))
    }

    pub(crate) fn set_goto(&mut self, symbol: Symbol, next: StateID) {
        debug_assert!(
            !self.gotos.contains_key(&symbol),
            "transition on {:?} already exists",
            symbol
        );
        self.gotos.insert(symbol, next);
    }

    /// Whether the item at `index` is the one that created the transition
    /// on its lookahead symbol.
    pub fn is_goto_origin(&self, index: usize) -> bool {
        let Some(item) = self.item(index) else {
            return false;
        };
        let lookahead = item.lookahead();
        if self.goto(lookahead).is_none() {
            return false;
        }
        self.items.iter().position(|i| i.lookahead() == lookahead) == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, ProductionID};

    fn grammar() -> Grammar {
        Grammar::load([('S', "aSb"), ('S', "")]).unwrap()
    }

    #[test]
    fn advance_moves_dot() {
        let g = grammar();
        let item = Item::new(g.production(ProductionID::from_raw(1)));
        assert_eq!(item.to_string(), "S->.aSb");
        assert_eq!(item.lookahead(), Symbol::new('a'));

        let item = item.advance().unwrap();
        assert_eq!(item.to_string(), "S->a.Sb");
        assert_eq!(item.lookahead(), Symbol::new('S'));

        let item = item.advance().unwrap().advance().unwrap();
        assert_eq!(item.to_string(), "S->aSb.");
        assert!(item.is_complete());
        assert_eq!(item.lookahead(), Symbol::EOI);
        assert_eq!(item.advance(), None);
    }

    #[test]
    fn empty_production_is_complete() {
        let g = grammar();
        let item = Item::new(g.production(ProductionID::from_raw(2)));
        assert!(item.is_complete());
        assert_eq!(item.lookahead(), Symbol::EOI);
        assert_eq!(item, Item::complete(g.production(ProductionID::from_raw(2))));
        assert_eq!(item.to_string(), "S->.");
        assert_eq!(item.advance(), None);
    }

    #[test]
    fn item_set_ignores_duplicates() {
        let g = grammar();
        let mut set = ItemSet::default();
        assert!(set.insert(g.start_item()));
        assert!(!set.insert(g.start_item()));
        assert!(set.contains(&g.start_item()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn goto_origin_is_first_item_on_lookahead() {
        let g = Grammar::load([('S', "aA"), ('S', "aB")]).unwrap();
        let mut set = ItemSet::default();
        set.insert(Item::new(g.production(ProductionID::from_raw(1))));
        set.insert(Item::new(g.production(ProductionID::from_raw(2))));
        assert!(!set.is_goto_origin(0));

        set.set_goto(Symbol::new('a'), StateID::from_raw(1));
        assert!(set.is_goto_origin(0));
        assert!(!set.is_goto_origin(1));
        assert!(!set.is_goto_origin(2));
    }
}
