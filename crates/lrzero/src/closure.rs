//! The closure operator on item sets.

use crate::{
    grammar::{Alphabet, Grammar},
    item::{Item, ItemSet},
};

/// Expand `state` with the initial items of every nonterminal found right
/// after a dot, until nothing more can be added.
///
/// Every lookahead symbol met on the way is recorded into `alphabet`.
/// Returns the number of inserted items.
pub fn closure(state: &mut ItemSet, g: &Grammar, alphabet: &mut Alphabet) -> usize {
    let mut added = 0;
    // items inserted below are visited by this same loop.
    let mut index = 0;
    while let Some(item) = state.item(index) {
        index += 1;

        let lookahead = item.lookahead();
        alphabet.record(lookahead);
        if !lookahead.is_nonterminal() {
            continue;
        }

        for production in g.rules(lookahead) {
            if state.insert(Item::new(production)) {
                tracing::trace!("closure: add {}", production);
                added += 1;
            }
        }
    }
    added
}
