//! Human-readable report of the construction.

use crate::{grammar::Grammar, lr0::LR0Automaton, table::ParseTable, util::display_fn};
use std::fmt;

/// The report made of the augmented grammar, the item sets and the parse
/// table, ending with the LR(0) verdict.
#[derive(Debug)]
pub struct Report<'a> {
    grammar: &'a Grammar,
    automaton: &'a LR0Automaton,
    table: &'a ParseTable,
}

impl<'a> Report<'a> {
    pub fn new(grammar: &'a Grammar, automaton: &'a LR0Automaton, table: &'a ParseTable) -> Self {
        Self {
            grammar,
            automaton,
            table,
        }
    }

    fn verdict(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            if self.table.is_lr0() {
                return writeln!(f, "This grammar can be analyzed by LR(0).");
            }
            writeln!(f, "----------------------------------")?;
            writeln!(f, "This grammar can't be analyzed by LR(0)!")?;
            for conflict in &self.table.conflicts {
                write!(f, "- {:?}: {} conflict, completing", conflict.state, conflict.kind)?;
                for (i, &reduce) in conflict.reduces.iter().enumerate() {
                    let sep = if i > 0 { "," } else { "" };
                    write!(f, "{} {}", sep, self.grammar.production(reduce))?;
                }
                writeln!(f)?;
            }
            Ok(())
        })
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#### Augmented Grammar")?;
        write!(f, "{}", self.grammar.display())?;
        writeln!(f)?;

        writeln!(f, "#### Sets of LR(0) Items")?;
        write!(f, "{}", self.automaton.display())?;
        writeln!(f)?;

        writeln!(f, "#### LR(0) Analyze Table")?;
        write!(f, "{}", self.table.display())?;
        writeln!(f)?;

        write!(f, "{}", self.verdict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lr0::lr0;

    fn report(productions: &[(char, &str)]) -> String {
        let g = Grammar::load(productions.iter().copied()).unwrap();
        let lr0 = lr0(&g);
        let table = ParseTable::generate(&g, &lr0);
        Report::new(&g, &lr0, &table).to_string()
    }

    #[test]
    fn lr0_grammar() {
        let shown = report(&[('S', "A"), ('A', "a")]);
        let expected = format!(
            "#### Augmented Grammar\n\
             0 '->S\n\
             1 S->A\n\
             2 A->a\n\
             \n\
             #### Sets of LR(0) Items\n\
             I0:\n\
             \t{:<20} goto(S)=I1\n\
             \t{:<20} goto(A)=I2\n\
             \t{:<20} goto(a)=I3\n\
             I1:\n\
             \t'->S.\n\
             I2:\n\
             \tS->A.\n\
             I3:\n\
             \tA->a.\n\
             \n\
             #### LR(0) Analyze Table\n\
             \ta\t#\tS\tA\n\
             0\ts3\t\t1\t2\n\
             1\t\tacc\t\t\n\
             2\tr1\tr1\t\t\n\
             3\tr2\tr2\t\t\n\
             \n\
             This grammar can be analyzed by LR(0).\n",
            "'->.S", "S->.A", "A->.a",
        );
        assert_eq!(shown, expected);
    }

    #[test]
    fn conflicting_grammar() {
        let shown = report(&[('S', "A"), ('S', "a"), ('A', "a")]);
        assert!(shown.ends_with(
            "This grammar can't be analyzed by LR(0)!\n\
             - I3: reduce/reduce conflict, completing S->a, A->a\n"
        ));
    }
}
