//! Grammar loading and the FIRST/FOLLOW fixpoints.
//!
//! A grammar is written one rule per line as `LHS -> A B | C | ε`. Every
//! left-hand side is a nonterminal; every other symbol must be one of the
//! terminal names in [`TERMINAL_LOOKUP`]. After loading, the synthetic
//! production `S' -> Start` is inserted as production 0, where `Start` is the
//! left-hand side of the first rule.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    rc::Rc,
};

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{TokenKind, TERMINAL_LOOKUP},
    Position,
};

/// Marks an empty alternative in grammar text.
pub const EPSILON: &str = "ε";
/// Left-hand side of the augmentation production.
pub const AUGMENTED_START: &str = "S'";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: usize,
    pub lhs: String,
    pub rhs: Vec<String>,
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.rhs.is_empty() {
            write!(f, "{} -> {}", self.lhs, EPSILON)
        } else {
            write!(f, "{} -> {}", self.lhs, self.rhs.join(" "))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    productions: Vec<Production>,
    start: String,
    nonterminals: BTreeSet<String>,
    terminals: BTreeMap<String, TokenKind>,
    by_lhs: BTreeMap<String, Vec<usize>>,
    epsilon: BTreeSet<String>,
    first: BTreeMap<String, BTreeSet<TokenKind>>,
    follow: BTreeMap<String, BTreeSet<TokenKind>>,
}

impl Grammar {
    /// Parses grammar text, augments it and computes epsilon-derivability,
    /// FIRST and FOLLOW.
    pub fn load(text: &str) -> Result<Grammar, Error> {
        let file = Rc::new(String::from("<grammar>"));
        let mut rules: Vec<(String, Vec<String>, u32)> = vec![];

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let line_number = index as u32 + 1;
            let malformed = || {
                Error::new(
                    ErrorImpl::MalformedGrammarLine {
                        line: line.to_string(),
                    },
                    Position(line_number, Rc::clone(&file)),
                )
            };

            let (lhs, rhs) = line.split_once("->").ok_or_else(malformed)?;
            let lhs_symbols = lhs.split_whitespace().collect::<Vec<&str>>();
            if lhs_symbols.len() != 1 {
                return Err(malformed());
            }

            for alternative in rhs.split('|') {
                let symbols = alternative.split_whitespace().collect::<Vec<&str>>();

                if symbols.is_empty() {
                    return Err(malformed());
                }

                if symbols.contains(&EPSILON) {
                    if symbols.len() != 1 {
                        return Err(malformed());
                    }
                    rules.push((lhs_symbols[0].to_string(), vec![], line_number));
                } else {
                    rules.push((
                        lhs_symbols[0].to_string(),
                        symbols.iter().map(|symbol| symbol.to_string()).collect(),
                        line_number,
                    ));
                }
            }
        }

        if rules.is_empty() {
            return Err(Error::new(ErrorImpl::EmptyGrammar, Position(0, file)));
        }

        let start = rules[0].0.clone();
        let mut nonterminals = rules
            .iter()
            .map(|(lhs, _, _)| lhs.clone())
            .collect::<BTreeSet<String>>();
        nonterminals.insert(AUGMENTED_START.to_string());

        let mut terminals = BTreeMap::new();
        for (_, rhs, line_number) in &rules {
            for symbol in rhs {
                if nonterminals.contains(symbol) {
                    continue;
                }

                match TERMINAL_LOOKUP.get(symbol.as_str()) {
                    Some(kind) => {
                        terminals.insert(symbol.clone(), *kind);
                    }
                    None => {
                        return Err(Error::new(
                            ErrorImpl::UnresolvedSymbol {
                                symbol: symbol.clone(),
                            },
                            Position(*line_number, Rc::clone(&file)),
                        ))
                    }
                }
            }
        }

        let mut productions = vec![Production {
            id: 0,
            lhs: AUGMENTED_START.to_string(),
            rhs: vec![start.clone()],
        }];
        for (lhs, rhs, _) in rules {
            productions.push(Production {
                id: productions.len(),
                lhs,
                rhs,
            });
        }

        let mut by_lhs: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for production in &productions {
            by_lhs
                .entry(production.lhs.clone())
                .or_default()
                .push(production.id);
        }

        let mut grammar = Grammar {
            first: nonterminals
                .iter()
                .map(|symbol| (symbol.clone(), BTreeSet::new()))
                .collect(),
            follow: nonterminals
                .iter()
                .map(|symbol| (symbol.clone(), BTreeSet::new()))
                .collect(),
            productions,
            start,
            nonterminals,
            terminals,
            by_lhs,
            epsilon: BTreeSet::new(),
        };

        while grammar.epsilon_step() {}
        while grammar.first_step() {}

        for symbol in [AUGMENTED_START.to_string(), grammar.start.clone()] {
            if let Some(follow) = grammar.follow.get_mut(&symbol) {
                follow.insert(TokenKind::EOF);
            }
        }
        while grammar.follow_step() {}

        log::debug!(
            "loaded grammar: {} productions, {} nonterminals, {} terminals",
            grammar.productions.len(),
            grammar.nonterminals.len(),
            grammar.terminals.len()
        );

        Ok(grammar)
    }

    /// One pass of the epsilon-derivability fixpoint. Returns whether anything changed.
    pub(crate) fn epsilon_step(&mut self) -> bool {
        let mut changed = false;

        for production in &self.productions {
            if self.epsilon.contains(&production.lhs) {
                continue;
            }

            let derives_empty = production
                .rhs
                .iter()
                .all(|symbol| self.epsilon.contains(symbol));

            if derives_empty {
                self.epsilon.insert(production.lhs.clone());
                changed = true;
            }
        }

        changed
    }

    /// One pass of the FIRST fixpoint. Returns whether any set grew.
    pub(crate) fn first_step(&mut self) -> bool {
        let mut changed = false;

        for production in &self.productions {
            let (additions, _) = self.first_of(&production.rhs);

            if let Some(first) = self.first.get_mut(&production.lhs) {
                for kind in additions {
                    changed |= first.insert(kind);
                }
            }
        }

        changed
    }

    /// One pass of the FOLLOW fixpoint. Returns whether any set grew.
    pub(crate) fn follow_step(&mut self) -> bool {
        let mut changed = false;

        for production in &self.productions {
            for (index, symbol) in production.rhs.iter().enumerate() {
                if !self.nonterminals.contains(symbol) {
                    continue;
                }

                let (mut additions, rest_is_empty) = self.first_of(&production.rhs[index + 1..]);
                if rest_is_empty {
                    if let Some(follow_lhs) = self.follow.get(&production.lhs) {
                        additions.extend(follow_lhs.iter().copied());
                    }
                }

                if let Some(follow) = self.follow.get_mut(symbol) {
                    for kind in additions {
                        changed |= follow.insert(kind);
                    }
                }
            }
        }

        changed
    }

    /// FIRST of a symbol sequence, and whether the whole sequence can derive ε.
    pub fn first_of(&self, symbols: &[String]) -> (BTreeSet<TokenKind>, bool) {
        let mut first = BTreeSet::new();

        for symbol in symbols {
            if let Some(kind) = self.terminals.get(symbol) {
                first.insert(*kind);
                return (first, false);
            }

            if let Some(symbol_first) = self.first.get(symbol) {
                first.extend(symbol_first.iter().copied());
            }

            if !self.epsilon.contains(symbol) {
                return (first, false);
            }
        }

        (first, true)
    }

    pub fn derives_epsilon(&self, symbol: &str) -> bool {
        self.epsilon.contains(symbol)
    }

    pub fn first(&self, symbol: &str) -> Option<&BTreeSet<TokenKind>> {
        self.first.get(symbol)
    }

    pub fn follow(&self, symbol: &str) -> Option<&BTreeSet<TokenKind>> {
        self.follow.get(symbol)
    }

    pub fn production(&self, id: usize) -> Result<&Production, Error> {
        self.productions.get(id).ok_or_else(|| {
            Error::new(
                ErrorImpl::InvalidProduction { id },
                Position(0, Rc::new(String::from("<grammar>"))),
            )
        })
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Ids of the productions whose left-hand side is `symbol`, in text order.
    pub fn productions_for(&self, symbol: &str) -> &[usize] {
        self.by_lhs
            .get(symbol)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.nonterminals.contains(symbol)
    }

    pub fn terminal_kind(&self, symbol: &str) -> Option<TokenKind> {
        self.terminals.get(symbol).copied()
    }

    pub fn nonterminals(&self) -> &BTreeSet<String> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &BTreeMap<String, TokenKind> {
        &self.terminals
    }

    /// Every symbol that can label a transition, in sorted order.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols = self
            .nonterminals
            .iter()
            .filter(|symbol| symbol.as_str() != AUGMENTED_START)
            .chain(self.terminals.keys())
            .map(|symbol| symbol.as_str())
            .collect::<Vec<&str>>();
        symbols.sort_unstable();
        symbols
    }
}
