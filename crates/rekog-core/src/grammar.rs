//! Grammar: an owning registry of named recognizer roots.

use indexmap::IndexMap;

use crate::first_set::FirstSets;
use crate::recognizer::{NodeId, Recognizer, RuleId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
}

#[derive(Debug, Clone)]
struct RuleSlot {
    /// Spelling of the first declaration.
    name: String,
    root: Option<NodeId>,
}

/// Compiled grammar.
///
/// Rule names are case-insensitive: the table is keyed by the ASCII
/// lowercased name. Mutation is only expected while the grammar is being
/// built; once shared it is read-only.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    name: String,
    nodes: Vec<Recognizer>,
    rules: IndexMap<String, RuleSlot>,
    first_sets: Option<FirstSets>,
}

fn rule_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl Grammar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends a node to the arena.
    pub fn add_node(&mut self, recognizer: Recognizer) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(recognizer);
        self.first_sets = None;
        id
    }

    /// # Panics
    /// Panics if `id` was not produced by this grammar.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Recognizer {
        &self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Convenience for a fresh `RuleRef` node to `name`.
    pub fn rule_ref(&mut self, name: &str) -> NodeId {
        let target = self.declare_rule(name);
        self.add_node(Recognizer::RuleRef(target))
    }

    /// Returns the slot for `name`, creating an undefined one if needed.
    pub fn declare_rule(&mut self, name: &str) -> RuleId {
        let entry = self.rules.entry(rule_key(name));
        let index = entry.index();
        entry.or_insert_with(|| RuleSlot {
            name: name.to_owned(),
            root: None,
        });
        RuleId::from_index(index)
    }

    /// Registers `name` with the given root, replacing any previous root.
    ///
    /// Referenced names are not validated here; see [`Grammar::is_complete`].
    pub fn add_rule(&mut self, name: &str, root: NodeId) -> RuleId {
        let id = self.declare_rule(name);
        self.rules[id.index()].root = Some(root);
        self.first_sets = None;
        id
    }

    /// Appends an alternative to an already defined rule (ABNF `=/`).
    pub fn extend_rule(&mut self, name: &str, alternative: NodeId) -> Result<RuleId, GrammarError> {
        let id = self.rule(name)?;
        let Some(root) = self.rules[id.index()].root else {
            return Err(GrammarError::UnknownRule(name.to_owned()));
        };

        let alternatives: Box<[NodeId]> = match self.node(root) {
            Recognizer::Choice(existing) => existing
                .iter()
                .copied()
                .chain(std::iter::once(alternative))
                .collect(),
            _ => Box::new([root, alternative]),
        };
        let new_root = self.add_node(Recognizer::Choice(alternatives));
        self.rules[id.index()].root = Some(new_root);
        Ok(id)
    }

    /// Lookup of a declared rule (defined or not).
    pub fn find_rule(&self, name: &str) -> Option<RuleId> {
        self.rules.get_index_of(&rule_key(name)).map(RuleId::from_index)
    }

    /// Lookup of a defined rule.
    pub fn rule(&self, name: &str) -> Result<RuleId, GrammarError> {
        self.find_rule(name)
            .filter(|&id| self.rule_root(id).is_some())
            .ok_or_else(|| GrammarError::UnknownRule(name.to_owned()))
    }

    /// # Panics
    /// Panics if `id` was not produced by this grammar.
    pub fn rule_name(&self, id: RuleId) -> &str {
        &self.rules[id.index()].name
    }

    pub fn rule_root(&self, id: RuleId) -> Option<NodeId> {
        self.rules.get_index(id.index()).and_then(|(_, slot)| slot.root)
    }

    /// Number of defined rules.
    pub fn rule_count(&self) -> usize {
        self.rules.values().filter(|slot| slot.root.is_some()).count()
    }

    /// Number of declared slots, including undefined ones.
    pub fn declared_count(&self) -> usize {
        self.rules.len()
    }

    /// Defined rules in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &str, NodeId)> + '_ {
        self.rules.values().enumerate().filter_map(|(i, slot)| {
            slot.root
                .map(|root| (RuleId::from_index(i), slot.name.as_str(), root))
        })
    }

    /// Names referenced or declared but never given a root.
    pub fn undefined_rules(&self) -> impl Iterator<Item = &str> + '_ {
        self.rules
            .values()
            .filter(|slot| slot.root.is_none())
            .map(|slot| slot.name.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.rules.values().all(|slot| slot.root.is_some())
    }

    /// Copies every rule of `base` that this grammar does not define.
    ///
    /// References inside copied rules resolve by name in this grammar, so a
    /// local definition shadows the base one everywhere.
    pub fn include(&mut self, base: &Grammar) {
        let offset = self.nodes.len();
        let rule_map: Vec<RuleId> = base
            .rules
            .values()
            .map(|slot| self.declare_rule(&slot.name))
            .collect();

        self.nodes.extend(base.nodes.iter().map(|node| {
            node.remap(
                |n| NodeId::from_index(n.index() + offset),
                |r| rule_map[r.index()],
            )
        }));

        for (slot, &local) in base.rules.values().zip(&rule_map) {
            let Some(root) = slot.root else {
                continue;
            };
            let target = &mut self.rules[local.index()];
            if target.root.is_none() {
                target.root = Some(NodeId::from_index(root.index() + offset));
            }
        }

        self.first_sets = None;
    }

    /// Precomputes first-byte sets used to skip hopeless alternatives.
    ///
    /// Any later mutation discards them again.
    pub fn optimize(&mut self) {
        self.first_sets = Some(FirstSets::compute(self));
    }

    pub fn first_sets(&self) -> Option<&FirstSets> {
        self.first_sets.as_ref()
    }

    pub fn is_optimized(&self) -> bool {
        self.first_sets.is_some()
    }
}
