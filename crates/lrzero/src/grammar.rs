//! Grammar types.

use crate::{
    item::Item,
    syntax::{self, ParseOptions, SyntaxError},
    util::{display_fn, Map, Set},
};
use std::{fmt, fs, io, path::Path, rc::Rc};

/// A grammar symbol.
///
/// Symbols are single characters. Uppercase ASCII letters are nonterminals and
/// every other character is a terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(char);

impl Symbol {
    /// Reserved symbol used as a terminal symbol that means the end of input.
    pub const EOI: Self = Self('\0');

    /// Reserved symbol used as the left-hand side of the augmented start production.
    pub const START: Self = Self('\'');

    #[inline]
    pub const fn new(ch: char) -> Self {
        Self(ch)
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self.0
    }

    pub fn is_reserved(self) -> bool {
        self == Self::EOI || self == Self::START
    }

    pub fn is_nonterminal(self) -> bool {
        self == Self::START || self.0.is_ascii_uppercase()
    }

    pub fn is_terminal(self) -> bool {
        !self.is_nonterminal()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EOI => f.write_str("$eoi"),
            Self::START => f.write_str("$start"),
            _ => write!(f, "{:?}", self.0),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EOI => f.write_str("#"),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// The ordinal of a production in load order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ProductionID(u16);

impl ProductionID {
    /// The augmented start production. Reducing by it means acceptance.
    pub const ACCEPT: Self = Self(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for ProductionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ACCEPT => write!(f, "P#Accept"),
            _ => write!(f, "P#{:03}", self.0),
        }
    }
}

impl fmt::Display for ProductionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A production rule in grammar.
#[derive(Debug, Clone)]
pub struct Production {
    id: ProductionID,
    left: Symbol,
    right: Rc<[Symbol]>,
}

impl Production {
    pub fn id(&self) -> ProductionID {
        self.id
    }

    /// Return the left-hand side of this production.
    pub fn left(&self) -> Symbol {
        self.left
    }

    /// Return the right-hand side of this production.
    pub fn right(&self) -> &Rc<[Symbol]> {
        &self.right
    }
}

// `"S->Ab"`
impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->", self.left)?;
        for symbol in self.right.iter() {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// The terminal and nonterminal symbols in the order they are first seen
/// as lookaheads during construction.
#[derive(Debug, Default, Clone)]
pub struct Alphabet {
    terminals: Set<Symbol>,
    nonterminals: Set<Symbol>,
}

impl Alphabet {
    /// Record a lookahead symbol. The end-marker is never recorded.
    pub fn record(&mut self, symbol: Symbol) -> bool {
        if symbol == Symbol::EOI {
            false
        } else if symbol.is_nonterminal() {
            self.nonterminals.insert(symbol)
        } else {
            self.terminals.insert(symbol)
        }
    }

    pub fn terminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.terminals.iter().copied()
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.nonterminals.iter().copied()
    }
}

/// The augmented grammar.
#[derive(Debug)]
#[non_exhaustive]
pub struct Grammar {
    productions: Vec<Production>,
    rules: Map<Symbol, Vec<ProductionID>>,
    reduces: Map<Item, ProductionID>,
}

impl Grammar {
    pub fn from_file(
        path: impl AsRef<Path>,
        options: ParseOptions,
    ) -> Result<Grammar, GrammarDefError> {
        let source = fs::read_to_string(path).map_err(GrammarDefError::IO)?;
        Self::from_str(&source, options)
    }

    pub fn from_str(source: &str, options: ParseOptions) -> Result<Grammar, GrammarDefError> {
        let source = syntax::parse(source, options).map_err(GrammarDefError::Syntax)?;
        Self::augment(&source.start, source.productions.iter().map(|(l, r)| (*l, &**r)))
    }

    /// Build the augmented grammar whose start production derives the
    /// left-hand side of the first production.
    pub fn load<'a, I>(productions: I) -> Result<Self, GrammarDefError>
    where
        I: IntoIterator<Item = (char, &'a str)>,
    {
        Self::define(|g| {
            for (left, right) in productions {
                g.production(left, right)?;
            }
            Ok(())
        })
    }

    /// Build the augmented grammar with an explicit right-hand side of the
    /// start production.
    pub fn augment<'a, I>(start: &str, productions: I) -> Result<Self, GrammarDefError>
    where
        I: IntoIterator<Item = (char, &'a str)>,
    {
        Self::define(|g| {
            g.start(start)?;
            for (left, right) in productions {
                g.production(left, right)?;
            }
            Ok(())
        })
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef {
            start: None,
            productions: vec![],
        };
        f(&mut def)?;
        def.end()
    }

    pub fn production(&self, id: ProductionID) -> &Production {
        &self.productions[id.0 as usize]
    }

    /// Iterate the productions in load order, starting with the augmented one.
    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.productions.iter()
    }

    /// Iterate the productions whose left-hand side is `left`.
    ///
    /// A nonterminal without any production yields nothing.
    pub fn rules(&self, left: Symbol) -> impl Iterator<Item = &Production> + '_ {
        self.rules
            .get(&left)
            .into_iter()
            .flatten()
            .map(|id| self.production(*id))
    }

    /// The item `'->.S` the automaton starts from.
    pub fn start_item(&self) -> Item {
        Item::new(self.production(ProductionID::ACCEPT))
    }

    /// Look up the production completed by the specified item.
    pub fn reduce(&self, item: &Item) -> Option<ProductionID> {
        self.reduces.get(item).copied()
    }

    pub fn display(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            for production in &self.productions {
                writeln!(f, "{} {}", production.id, production)?;
            }
            Ok(())
        })
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    start: Option<Vec<Symbol>>,
    productions: Vec<(Symbol, Vec<Symbol>)>,
}

impl GrammarDef {
    /// Specify the right-hand side of the augmented start production.
    ///
    /// When omitted, the left-hand side of the first production is used.
    pub fn start(&mut self, right: &str) -> Result<(), GrammarDefError> {
        let right = symbols(right)?;
        self.start.replace(right);
        Ok(())
    }

    /// Specify a production rule into this grammar.
    pub fn production(&mut self, left: char, right: &str) -> Result<ProductionID, GrammarDefError> {
        let left = Symbol::new(left);
        if left.is_reserved() {
            return Err(GrammarDefError::ReservedSymbol {
                symbol: left.as_char(),
            });
        }
        if !left.is_nonterminal() {
            return Err(GrammarDefError::InvalidLhs {
                lhs: left.as_char(),
            });
        }
        let right = symbols(right)?;

        let id = u16::try_from(self.productions.len())
            .ok()
            .and_then(|len| ProductionID::OFFSET.checked_add(len))
            .map(ProductionID)
            .ok_or(GrammarDefError::TooManyProductions)?;
        self.productions.push((left, right));
        Ok(id)
    }

    fn end(self) -> Result<Grammar, GrammarDefError> {
        let start = match self.start {
            Some(start) => start,
            None => match self.productions.first() {
                Some((left, _)) => vec![*left],
                None => return Err(GrammarDefError::Empty),
            },
        };

        let mut productions = Vec::with_capacity(self.productions.len() + 1);
        let mut rules: Map<Symbol, Vec<ProductionID>> = Map::default();
        let mut reduces = Map::default();

        let augmented = Some((Symbol::START, start)).into_iter();
        for (raw, (left, right)) in augmented.chain(self.productions).enumerate() {
            let id = u16::try_from(raw)
                .map(ProductionID)
                .map_err(|_| GrammarDefError::TooManyProductions)?;
            let production = Production {
                id,
                left,
                right: right.into(),
            };
            rules.entry(left).or_default().push(id);
            // duplicated productions are reduced by the last one.
            reduces.insert(Item::complete(&production), id);
            productions.push(production);
        }

        // every nonterminal referenced on some right-hand side owns an entry.
        for production in &productions {
            for symbol in production.right.iter() {
                if symbol.is_nonterminal() {
                    rules.entry(*symbol).or_default();
                }
            }
        }

        tracing::debug!(
            "defined {} productions over {} nonterminals",
            productions.len(),
            rules.len()
        );

        Ok(Grammar {
            productions,
            rules,
            reduces,
        })
    }
}

fn symbols(s: &str) -> Result<Vec<Symbol>, GrammarDefError> {
    s.chars()
        .map(Symbol::new)
        .map(|symbol| {
            if symbol.is_reserved() {
                Err(GrammarDefError::ReservedSymbol {
                    symbol: symbol.as_char(),
                })
            } else {
                Ok(symbol)
            }
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("IO error: {}", _0)]
    IO(io::Error),

    #[error("Syntax error: {}", _0)]
    Syntax(SyntaxError),

    #[error("the reserved symbol {symbol:?} cannot appear in a grammar")]
    ReservedSymbol { symbol: char },

    #[error("the left-hand side {lhs:?} is not a nonterminal symbol")]
    InvalidLhs { lhs: char },

    #[error("the grammar has no productions")]
    Empty,

    #[error("too many productions")]
    TooManyProductions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_classes() {
        assert!(Symbol::new('S').is_nonterminal());
        assert!(Symbol::new('a').is_terminal());
        assert!(Symbol::new('+').is_terminal());
        assert!(Symbol::EOI.is_terminal());
        assert!(Symbol::START.is_nonterminal());
        assert_eq!(Symbol::EOI.to_string(), "#");
    }

    #[test]
    fn load_prepends_start_production() {
        let g = Grammar::load([('S', "A"), ('A', "a")]).unwrap();
        let shown: Vec<_> = g.productions().map(|p| p.to_string()).collect();
        assert_eq!(shown, ["'->S", "S->A", "A->a"]);
        assert_eq!(g.display().to_string(), "0 '->S\n1 S->A\n2 A->a\n");
    }

    #[test]
    fn reduce_ordinals_follow_load_order() {
        let g = Grammar::load([('E', "aA"), ('A', "cA"), ('A', "d"), ('A', "")]).unwrap();
        for (raw, production) in g.productions().enumerate() {
            assert_eq!(production.id(), ProductionID::from_raw(raw as u16));
            assert_eq!(g.reduce(&Item::complete(production)), Some(production.id()));
        }
        assert_eq!(g.reduce(&g.start_item()), None);
    }

    #[test]
    fn production_ordinals_are_bounded() {
        let mut last = None;
        let result = Grammar::define(|g| {
            for _ in 0..u16::MAX {
                last = Some(g.production('S', "a")?);
            }
            g.production('S', "b")?;
            Ok(())
        });
        assert_eq!(last, Some(ProductionID::from_raw(u16::MAX)));
        assert!(matches!(result, Err(GrammarDefError::TooManyProductions)));
    }

    #[test]
    fn duplicated_production_reduces_by_last() {
        let g = Grammar::load([('S', "a"), ('S', "a")]).unwrap();
        let first = g.production(ProductionID::from_raw(1));
        assert_eq!(
            g.reduce(&Item::complete(first)),
            Some(ProductionID::from_raw(2))
        );
        assert_eq!(g.rules(Symbol::new('S')).count(), 2);
    }

    #[test]
    fn referenced_nonterminal_owns_entry() {
        let g = Grammar::load([('S', "aB")]).unwrap();
        assert!(g.rules.contains_key(&Symbol::new('B')));
        assert_eq!(g.rules(Symbol::new('B')).count(), 0);
        assert!(!g.rules.contains_key(&Symbol::new('a')));
    }

    #[test]
    fn explicit_start_right_side() {
        let g = Grammar::augment("E", [('E', "a")]).unwrap();
        assert_eq!(g.production(ProductionID::ACCEPT).to_string(), "'->E");
    }

    #[test]
    fn rejects_reserved_symbols() {
        assert!(matches!(
            Grammar::load([('S', "a'")]),
            Err(GrammarDefError::ReservedSymbol { symbol: '\'' })
        ));
        assert!(matches!(
            Grammar::augment("S\0", [('S', "a")]),
            Err(GrammarDefError::ReservedSymbol { symbol: '\0' })
        ));
        assert!(matches!(
            Grammar::load([('\'', "a")]),
            Err(GrammarDefError::ReservedSymbol { .. })
        ));
    }

    #[test]
    fn rejects_terminal_left_side() {
        assert!(matches!(
            Grammar::load([('s', "a")]),
            Err(GrammarDefError::InvalidLhs { lhs: 's' })
        ));
    }

    #[test]
    fn rejects_empty_grammar() {
        assert!(matches!(
            Grammar::load(std::iter::empty()),
            Err(GrammarDefError::Empty)
        ));
    }
}
