//! LR(0) automaton construction and parse table derivation.
//!
//! ```
//! use lrzero::{grammar::Grammar, lr0::lr0, table::ParseTable};
//!
//! let grammar = Grammar::load([('S', "A"), ('A', "a")]).unwrap();
//! let automaton = lr0(&grammar);
//! let table = ParseTable::generate(&grammar, &automaton);
//! assert!(table.is_lr0());
//! ```

pub mod closure;
pub mod grammar;
pub mod item;
pub mod lr0;
pub mod report;
pub mod syntax;
pub mod table;
pub mod util;
