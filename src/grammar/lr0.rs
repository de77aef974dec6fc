use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use super::grammar::Grammar;

/// An LR(0) item: a production with a dot position in `0..=rhs.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

pub type ItemSet = BTreeSet<Item>;

impl Item {
    pub fn new(production: usize, dot: usize) -> Self {
        Item { production, dot }
    }

    /// The symbol right after the dot, if the dot is not at the end.
    pub fn next_symbol<'g>(&self, grammar: &'g Grammar) -> Option<&'g str> {
        grammar
            .productions()
            .get(self.production)
            .and_then(|production| production.rhs.get(self.dot))
            .map(|symbol| symbol.as_str())
    }

    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        grammar
            .productions()
            .get(self.production)
            .map(|production| self.dot >= production.rhs.len())
            .unwrap_or(true)
    }

    fn advance(&self) -> Item {
        Item::new(self.production, self.dot + 1)
    }
}

/// Adds `(q, 0)` for every production `q` of every nonterminal right after a dot,
/// until nothing new appears.
pub fn closure(grammar: &Grammar, items: &ItemSet) -> ItemSet {
    let mut result = items.clone();
    let mut pending = items.iter().copied().collect::<Vec<Item>>();

    while let Some(item) = pending.pop() {
        let Some(symbol) = item.next_symbol(grammar) else {
            continue;
        };

        if !grammar.is_nonterminal(symbol) {
            continue;
        }

        for production in grammar.productions_for(symbol) {
            let expanded = Item::new(*production, 0);
            if result.insert(expanded) {
                pending.push(expanded);
            }
        }
    }

    result
}

/// Advances the dot over `symbol` in every item that allows it, then closes the result.
pub fn goto(grammar: &Grammar, items: &ItemSet, symbol: &str) -> ItemSet {
    let kernel = items
        .iter()
        .filter(|item| item.next_symbol(grammar) == Some(symbol))
        .map(|item| item.advance())
        .collect::<ItemSet>();

    if kernel.is_empty() {
        return kernel;
    }

    closure(grammar, &kernel)
}

/// The canonical collection of LR(0) item sets and the transitions between them.
#[derive(Debug, Clone)]
pub struct CanonicalCollection {
    states: Vec<ItemSet>,
    transitions: BTreeMap<(usize, String), usize>,
}

impl CanonicalCollection {
    /// Builds the collection breadth-first from `closure({(0, 0)})`, visiting
    /// symbols in sorted order so state numbering only depends on the grammar.
    pub fn build(grammar: &Grammar) -> Self {
        let initial = closure(grammar, &ItemSet::from([Item::new(0, 0)]));
        let symbols = grammar.symbols();

        let mut states = vec![initial.clone()];
        let mut index_of: HashMap<ItemSet, usize> = HashMap::from([(initial, 0)]);
        let mut transitions = BTreeMap::new();
        let mut queue = VecDeque::from([0usize]);

        while let Some(state) = queue.pop_front() {
            for symbol in &symbols {
                let target = goto(grammar, &states[state], symbol);
                if target.is_empty() {
                    continue;
                }

                let target_index = match index_of.get(&target) {
                    Some(index) => *index,
                    None => {
                        let index = states.len();
                        states.push(target.clone());
                        index_of.insert(target, index);
                        queue.push_back(index);
                        index
                    }
                };

                transitions.insert((state, symbol.to_string()), target_index);
            }
        }

        CanonicalCollection {
            states,
            transitions,
        }
    }

    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    pub fn state(&self, index: usize) -> Option<&ItemSet> {
        self.states.get(index)
    }

    pub fn transition(&self, state: usize, symbol: &str) -> Option<usize> {
        self.transitions.get(&(state, symbol.to_string())).copied()
    }

    pub fn transitions(&self) -> &BTreeMap<(usize, String), usize> {
        &self.transitions
    }
}
