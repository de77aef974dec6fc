use std::{collections::BTreeMap, fmt::Display};

use crate::{
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{
    grammar::{Grammar, Production},
    lr0::CanonicalCollection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    Error,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(production) => write!(f, "r{}", production),
            Action::Accept => write!(f, "acc"),
            Action::Error => write!(f, "err"),
        }
    }
}

/// A table cell that received two different actions, and how it was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub terminal: TokenKind,
    pub kept: Action,
    pub discarded: Action,
}

/// SLR(1) action and goto tables for a grammar.
///
/// Conflicts are resolved deterministically: a shift beats any reduce on the
/// same cell, and between two reduces the one recorded first stays. The
/// accept action behaves like a shift for this purpose.
#[derive(Debug, Clone)]
pub struct ParseTable {
    grammar: Grammar,
    collection: CanonicalCollection,
    actions: BTreeMap<(usize, TokenKind), Action>,
    gotos: BTreeMap<(usize, String), usize>,
    conflicts: Vec<Conflict>,
}

impl ParseTable {
    /// Loads `text` and builds its tables.
    pub fn build(text: &str) -> Result<ParseTable, Error> {
        Ok(ParseTable::new(Grammar::load(text)?))
    }

    pub fn new(grammar: Grammar) -> ParseTable {
        let collection = CanonicalCollection::build(&grammar);
        let mut table = ParseTable {
            grammar,
            collection,
            actions: BTreeMap::new(),
            gotos: BTreeMap::new(),
            conflicts: vec![],
        };

        table.fill();

        log::debug!(
            "built parse table: {} states, {} actions, {} gotos, {} conflicts",
            table.collection.states().len(),
            table.actions.len(),
            table.gotos.len(),
            table.conflicts.len()
        );

        table
    }

    fn fill(&mut self) {
        let mut pending = vec![];

        for (state, items) in self.collection.states().iter().enumerate() {
            for item in items {
                match item.next_symbol(&self.grammar) {
                    Some(symbol) => {
                        if let Some(kind) = self.grammar.terminal_kind(symbol) {
                            if let Some(target) = self.collection.transition(state, symbol) {
                                pending.push((state, kind, Action::Shift(target)));
                            }
                        }
                    }
                    None if item.production == 0 => {
                        pending.push((state, TokenKind::EOF, Action::Accept));
                    }
                    None => {
                        let lhs = &self.grammar.productions()[item.production].lhs;
                        if let Some(follow) = self.grammar.follow(lhs) {
                            for kind in follow {
                                pending.push((state, *kind, Action::Reduce(item.production)));
                            }
                        }
                    }
                }
            }
        }

        for (state, terminal, action) in pending {
            self.record(state, terminal, action);
        }

        for ((state, symbol), target) in self.collection.transitions() {
            if self.grammar.is_nonterminal(symbol) {
                self.gotos.insert((*state, symbol.clone()), *target);
            }
        }
    }

    fn record(&mut self, state: usize, terminal: TokenKind, action: Action) {
        let Some(existing) = self.actions.get(&(state, terminal)).copied() else {
            self.actions.insert((state, terminal), action);
            return;
        };

        if existing == action {
            return;
        }

        let (kept, discarded) = match (existing, action) {
            (Action::Reduce(_), Action::Shift(_) | Action::Accept) => (action, existing),
            _ => (existing, action),
        };

        log::debug!(
            "conflict in state {} on {}: kept {}, discarded {}",
            state,
            terminal,
            kept,
            discarded
        );

        self.actions.insert((state, terminal), kept);
        self.conflicts.push(Conflict {
            state,
            terminal,
            kept,
            discarded,
        });
    }

    /// The action for a cell. Cells never filled are `Error`.
    pub fn action(&self, state: usize, terminal: TokenKind) -> Action {
        self.actions
            .get(&(state, terminal))
            .copied()
            .unwrap_or(Action::Error)
    }

    pub fn goto(&self, state: usize, nonterminal: &str) -> Option<usize> {
        self.gotos.get(&(state, nonterminal.to_string())).copied()
    }

    pub fn production(&self, id: usize) -> Result<&Production, Error> {
        self.grammar.production(id)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn collection(&self) -> &CanonicalCollection {
        &self.collection
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn state_count(&self) -> usize {
        self.collection.states().len()
    }

    /// Every filled action cell, ordered by state then terminal.
    pub fn actions(&self) -> &BTreeMap<(usize, TokenKind), Action> {
        &self.actions
    }

    pub fn gotos(&self) -> &BTreeMap<(usize, String), usize> {
        &self.gotos
    }
}
