// SPDX-License-Identifier: Apache-2.0

//! Collapses pass-through `.names` buffers into a single net.
//!
//! Every `.names a b` table with the lone entry `1 1` is a wire: `b` is just
//! another name for whatever drives `a`. The parser records those as
//! [`UnifyEdge`]s and this module replays them in source order over a
//! union-find forest, moving the alias's connections onto the canonical net
//! and finally releasing every alias.

use std::collections::HashMap;
use std::fmt;

use crate::blif::scanner::Pos;
use crate::design::{Design, ModelId, NetId};

/// `driver` drives `alias` through a buffer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifyEdge {
    pub driver: NetId,
    pub alias: NetId,
    /// Position of the `.names` directive that produced this edge.
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    /// Following the alias chain from the driver leads back to the alias.
    Cycle { net: String, pos: Pos },
    /// The alias was already given a different driver by an earlier table.
    ConflictingOutputs { net: String, pos: Pos },
}

impl UnifyError {
    pub fn pos(&self) -> Pos {
        match self {
            UnifyError::Cycle { pos, .. } | UnifyError::ConflictingOutputs { pos, .. } => *pos,
        }
    }
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::Cycle { net, .. } => write!(f, ".names cycle through net `{}'", net),
            UnifyError::ConflictingOutputs { net, .. } => {
                write!(f, "conflicting .names outputs: net `{}' driven twice", net)
            }
        }
    }
}

impl std::error::Error for UnifyError {}

/// Alias → canonical mapping with path compression.
#[derive(Debug, Default)]
pub struct ReplacementMap {
    parent: HashMap<NetId, NetId>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical net for `net`. Every net visited on the way is repointed
    /// straight at the result.
    pub fn resolve(&mut self, net: NetId) -> NetId {
        let mut root = net;
        while let Some(next) = self.parent.get(&root) {
            root = *next;
        }
        let mut x = net;
        while x != root {
            let next = self.parent[&x];
            self.parent.insert(x, root);
            x = next;
        }
        root
    }

    pub fn contains(&self, net: NetId) -> bool {
        self.parent.contains_key(&net)
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    fn insert(&mut self, alias: NetId, canonical: NetId) {
        self.parent.insert(alias, canonical);
    }

    /// All aliases, in net creation order.
    pub fn aliases(&self) -> Vec<NetId> {
        let mut aliases: Vec<NetId> = self.parent.keys().copied().collect();
        aliases.sort();
        aliases
    }
}

/// Replays `edges` over the nets of `design`, then releases every alias net
/// from `model`. Returns the final replacement map.
pub fn unify_nets(
    design: &mut Design,
    model: ModelId,
    edges: &[UnifyEdge],
) -> Result<ReplacementMap, UnifyError> {
    let mut map = ReplacementMap::new();
    for edge in edges {
        let canonical = map.resolve(edge.driver);
        if canonical == edge.alias {
            return Err(UnifyError::Cycle {
                net: design.net_name(edge.alias).to_string(),
                pos: edge.pos,
            });
        }
        design.replace_net(edge.alias, canonical);
        if map.contains(edge.alias) {
            return Err(UnifyError::ConflictingOutputs {
                net: design.net_name(edge.alias).to_string(),
                pos: edge.pos,
            });
        }
        log::trace!(
            "unify: `{}' -> `{}'",
            design.net_name(edge.alias),
            design.net_name(canonical)
        );
        map.insert(edge.alias, canonical);
    }

    for alias in map.aliases() {
        debug_assert_eq!(design.net(alias).model, model);
        design.remove_net(alias);
    }
    log::debug!(
        "unify: {} edges, {} nets released from `{}'",
        edges.len(),
        map.len(),
        design.model_name(model)
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Direction;
    use pretty_assertions::assert_eq;

    const POS: Pos = Pos { lineno: 1 };

    fn edge(driver: NetId, alias: NetId) -> UnifyEdge {
        UnifyEdge {
            driver,
            alias,
            pos: POS,
        }
    }

    fn design_with_nets(names: &[&str]) -> (Design, ModelId, Vec<NetId>) {
        let mut d = Design::new();
        let top = d.add_model("top");
        d.set_top(top);
        let nets = names.iter().map(|n| d.find_or_add_net(top, n)).collect();
        (d, top, nets)
    }

    #[test]
    fn test_resolve_compresses_paths() {
        let mut map = ReplacementMap::new();
        let (a, b, c, d) = (NetId(0), NetId(1), NetId(2), NetId(3));
        map.insert(d, c);
        map.insert(c, b);
        map.insert(b, a);
        assert_eq!(map.resolve(d), a);
        assert_eq!(map.parent[&d], a);
        assert_eq!(map.parent[&c], a);
        assert_eq!(map.parent[&b], a);
        assert_eq!(map.resolve(a), a);
    }

    #[test]
    fn test_chain_collapses_to_first_driver() {
        let (mut d, top, nets) = design_with_nets(&["a", "b", "c"]);
        let (a, b, c) = (nets[0], nets[1], nets[2]);
        let out = d.add_port(top, "c", Direction::Out);
        d.connect(out, c);

        let map = unify_nets(&mut d, top, &[edge(a, b), edge(b, c)]).unwrap();

        assert_eq!(map.aliases(), vec![b, c]);
        assert_eq!(d.model_nets(top).collect::<Vec<_>>(), vec![a]);
        assert!(!d.is_live_net(b));
        assert!(!d.is_live_net(c));
        assert_eq!(d.port(out).connection, Some(a));
        assert_eq!(d.net(a).connections, vec![out]);
    }

    #[test]
    fn test_edges_out_of_order_still_resolve() {
        // b drives c is seen before a drives b.
        let (mut d, top, nets) = design_with_nets(&["a", "b", "c"]);
        let (a, b, c) = (nets[0], nets[1], nets[2]);
        let mut map = unify_nets(&mut d, top, &[edge(b, c), edge(a, b)]).unwrap();
        assert_eq!(map.resolve(c), a);
        assert_eq!(d.model_nets(top).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_two_cycle_is_reported() {
        let (mut d, top, nets) = design_with_nets(&["a", "b"]);
        let err = unify_nets(&mut d, top, &[edge(nets[0], nets[1]), edge(nets[1], nets[0])])
            .unwrap_err();
        assert_eq!(
            err,
            UnifyError::Cycle {
                net: "a".to_string(),
                pos: POS
            }
        );
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let (mut d, top, nets) = design_with_nets(&["a"]);
        let err = unify_nets(&mut d, top, &[edge(nets[0], nets[0])]).unwrap_err();
        assert!(matches!(err, UnifyError::Cycle { .. }));
    }

    #[test]
    fn test_alias_with_two_drivers_conflicts() {
        let (mut d, top, nets) = design_with_nets(&["a", "b", "y"]);
        let err = unify_nets(&mut d, top, &[edge(nets[0], nets[2]), edge(nets[1], nets[2])])
            .unwrap_err();
        assert_eq!(
            err,
            UnifyError::ConflictingOutputs {
                net: "y".to_string(),
                pos: POS
            }
        );
        assert_eq!(err.to_string(), "conflicting .names outputs: net `y' driven twice");
    }

    #[test]
    fn test_fan_out_from_one_driver() {
        let (mut d, top, nets) = design_with_nets(&["a", "x", "y"]);
        unify_nets(&mut d, top, &[edge(nets[0], nets[1]), edge(nets[0], nets[2])]).unwrap();
        assert_eq!(d.model_nets(top).collect::<Vec<_>>(), vec![nets[0]]);
    }
}
