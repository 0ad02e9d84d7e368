// SPDX-License-Identifier: Apache-2.0

//! Arena-backed netlist graph: models, ports, nets and instances.
//!
//! Everything is owned by a [`Design`] and referred to by typed indices.
//! Names are interned once per design, so the per-entity records stay small
//! and name comparisons are symbol comparisons.
//!
//! Invariants maintained by the mutators here:
//! - A port is connected to at most one net, and a net's `connections` list
//!   contains exactly the ports whose `connection` points back at it.
//! - A released net is gone from its model's name index and from every port;
//!   its `NetId` is never handed out again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use string_interner::symbol::SymbolU32;
use string_interner::{backend::StringBackend, StringInterner};

use crate::bits::Bits;
use crate::blif::scanner::Pos;
use crate::standard_models;

pub type NameId = SymbolU32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub usize);

/// Index into `Design.instances`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    Inout,
}

impl Direction {
    /// Direction after a port already declared as `self` is declared again
    /// as `declared`. Opposite declarations meet at `Inout`; nothing ever
    /// moves back from `Inout`.
    pub fn merge(self, declared: Direction) -> Direction {
        match (self, declared) {
            (Direction::In, Direction::Out) | (Direction::Out, Direction::In) => Direction::Inout,
            (current, _) => current,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "input"),
            Direction::Out => write!(f, "output"),
            Direction::Inout => write!(f, "inout"),
        }
    }
}

/// Constant driven onto a net by a `.names` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Zero,
    One,
}

/// Attribute or parameter value attached to an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Const {
    Bits(Bits),
    String(String),
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Bits(bits) => write!(f, "{}", crate::bits::bits_to_string(bits)),
            Const::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOwner {
    Model(ModelId),
    Instance(InstId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: NameId,
    pub direction: Direction,
    pub owner: PortOwner,
    pub connection: Option<NetId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub name: NameId,
    pub model: ModelId,
    pub constant: Option<Value>,
    /// Ports attached to this net, in connection order.
    pub connections: Vec<PortId>,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: NameId,
    ports: Vec<PortId>,
    port_by_name: HashMap<NameId, PortId>,
    /// Creation order; may still mention released nets, which are skipped on
    /// enumeration.
    nets: Vec<NetId>,
    net_by_name: HashMap<NameId, NetId>,
    instances: Vec<InstId>,
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub instance_of: ModelId,
    pub parent: ModelId,
    pub ports: Vec<PortId>,
    port_by_name: HashMap<NameId, PortId>,
    pub attrs: BTreeMap<String, Const>,
    pub params: BTreeMap<String, Const>,
    /// Position of the `.gate` line that created this instance.
    pub pos: Option<Pos>,
}

#[derive(Debug)]
pub struct Design {
    pub interner: StringInterner<StringBackend<SymbolU32>>,
    models: Vec<Model>,
    model_by_name: HashMap<NameId, ModelId>,
    ports: Vec<Port>,
    nets: Vec<Option<Net>>,
    instances: Vec<Instance>,
    top: Option<ModelId>,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    /// Creates an empty design with no models at all.
    pub fn new() -> Self {
        Design {
            interner: StringInterner::new(),
            models: Vec::new(),
            model_by_name: HashMap::new(),
            ports: Vec::new(),
            nets: Vec::new(),
            instances: Vec::new(),
            top: None,
        }
    }

    /// Creates a design pre-populated with the iCE40 primitive library.
    pub fn with_standard_models() -> Self {
        let mut design = Design::new();
        standard_models::add_standard_models(&mut design);
        design
    }

    pub fn intern(&mut self, s: &str) -> NameId {
        self.interner.get_or_intern(s)
    }

    pub fn resolve(&self, name: NameId) -> &str {
        self.interner.resolve(name).unwrap_or("<unknown>")
    }

    // -- models

    /// Registers a new model. The caller is responsible for checking that
    /// the name is not already taken; see [`Design::find_model`].
    pub fn add_model(&mut self, name: &str) -> ModelId {
        let name = self.intern(name);
        assert!(
            !self.model_by_name.contains_key(&name),
            "model `{}' defined twice",
            self.resolve(name)
        );
        let id = ModelId(self.models.len());
        self.models.push(Model {
            name,
            ports: Vec::new(),
            port_by_name: HashMap::new(),
            nets: Vec::new(),
            net_by_name: HashMap::new(),
            instances: Vec::new(),
        });
        self.model_by_name.insert(name, id);
        id
    }

    pub fn find_model(&self, name: &str) -> Option<ModelId> {
        let sym = self.interner.get(name)?;
        self.model_by_name.get(&sym).copied()
    }

    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn model_name(&self, id: ModelId) -> &str {
        self.resolve(self.models[id.0].name)
    }

    pub fn models(&self) -> impl Iterator<Item = ModelId> + '_ {
        (0..self.models.len()).map(ModelId)
    }

    pub fn set_top(&mut self, id: ModelId) {
        self.top = Some(id);
    }

    pub fn top(&self) -> Option<ModelId> {
        self.top
    }

    // -- ports

    pub fn add_port(&mut self, model: ModelId, name: &str, direction: Direction) -> PortId {
        let name = self.intern(name);
        let id = PortId(self.ports.len());
        self.ports.push(Port {
            name,
            direction,
            owner: PortOwner::Model(model),
            connection: None,
        });
        let m = &mut self.models[model.0];
        m.ports.push(id);
        m.port_by_name.insert(name, id);
        id
    }

    pub fn find_port(&self, model: ModelId, name: &str) -> Option<PortId> {
        let sym = self.interner.get(name)?;
        self.models[model.0].port_by_name.get(&sym).copied()
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0]
    }

    pub fn port_name(&self, id: PortId) -> &str {
        self.resolve(self.ports[id.0].name)
    }

    pub fn set_port_direction(&mut self, id: PortId, direction: Direction) {
        self.ports[id.0].direction = direction;
    }

    /// Ports of `model` in declaration order.
    pub fn model_ports(&self, model: ModelId) -> &[PortId] {
        &self.models[model.0].ports
    }

    /// Attaches `port` to `net`, detaching it from any previous net first.
    pub fn connect(&mut self, port: PortId, net: NetId) {
        if self.ports[port.0].connection == Some(net) {
            return;
        }
        self.disconnect(port);
        self.net_mut(net).connections.push(port);
        self.ports[port.0].connection = Some(net);
    }

    pub fn disconnect(&mut self, port: PortId) {
        if let Some(prev) = self.ports[port.0].connection.take() {
            self.net_mut(prev).connections.retain(|p| *p != port);
        }
    }

    /// Returns the port at the other end of `port`'s net when the net joins
    /// exactly two ports.
    pub fn connection_other_port(&self, port: PortId) -> Option<PortId> {
        let net = self.net(self.ports[port.0].connection?);
        if net.connections.len() != 2 {
            return None;
        }
        net.connections.iter().copied().find(|p| *p != port)
    }

    /// Whether `port` sources the value of the net it is attached to.
    ///
    /// Instance ports drive through their outputs. Model ports are seen from
    /// inside the model, where an input is a source.
    pub fn port_drives_net(&self, port: PortId) -> bool {
        let p = &self.ports[port.0];
        match p.owner {
            PortOwner::Instance(_) => matches!(p.direction, Direction::Out | Direction::Inout),
            PortOwner::Model(_) => matches!(p.direction, Direction::In | Direction::Inout),
        }
    }

    // -- nets

    pub fn find_net(&self, model: ModelId, name: &str) -> Option<NetId> {
        let sym = self.interner.get(name)?;
        self.models[model.0].net_by_name.get(&sym).copied()
    }

    pub fn find_or_add_net(&mut self, model: ModelId, name: &str) -> NetId {
        let name = self.intern(name);
        if let Some(id) = self.models[model.0].net_by_name.get(&name) {
            return *id;
        }
        let id = NetId(self.nets.len());
        self.nets.push(Some(Net {
            name,
            model,
            constant: None,
            connections: Vec::new(),
        }));
        let m = &mut self.models[model.0];
        m.nets.push(id);
        m.net_by_name.insert(name, id);
        id
    }

    /// Returns the net record for `id`.
    ///
    /// Panics if the net has been released by [`Design::remove_net`].
    pub fn net(&self, id: NetId) -> &Net {
        match &self.nets[id.0] {
            Some(net) => net,
            None => panic!("{:?} used after it was released", id),
        }
    }

    fn net_mut(&mut self, id: NetId) -> &mut Net {
        match &mut self.nets[id.0] {
            Some(net) => net,
            None => panic!("{:?} used after it was released", id),
        }
    }

    pub fn net_name(&self, id: NetId) -> &str {
        self.resolve(self.net(id).name)
    }

    pub fn is_live_net(&self, id: NetId) -> bool {
        self.nets.get(id.0).map(Option::is_some).unwrap_or(false)
    }

    pub fn set_net_constant(&mut self, id: NetId, value: Value) {
        self.net_mut(id).constant = Some(value);
    }

    /// Live nets of `model` in creation order.
    pub fn model_nets(&self, model: ModelId) -> impl Iterator<Item = NetId> + '_ {
        self.models[model.0]
            .nets
            .iter()
            .copied()
            .filter(|id| self.nets[id.0].is_some())
    }

    /// Moves every connection of `from` onto `to`, leaving `from` with no
    /// connections.
    pub fn replace_net(&mut self, from: NetId, to: NetId) {
        if from == to {
            return;
        }
        let moved = std::mem::take(&mut self.net_mut(from).connections);
        for port in &moved {
            self.ports[port.0].connection = Some(to);
        }
        self.net_mut(to).connections.extend(moved);
    }

    /// Detaches `id` from its model and releases the slot.
    pub fn remove_net(&mut self, id: NetId) {
        let Some(net) = self.nets[id.0].take() else {
            return;
        };
        for port in &net.connections {
            self.ports[port.0].connection = None;
        }
        let m = &mut self.models[net.model.0];
        if m.net_by_name.get(&net.name) == Some(&id) {
            m.net_by_name.remove(&net.name);
        }
    }

    // -- instances

    /// Creates an instance of `of` inside `parent`, with one unconnected port
    /// per port of `of`.
    pub fn add_instance(&mut self, parent: ModelId, of: ModelId, pos: Option<Pos>) -> InstId {
        let id = InstId(self.instances.len());
        let template: Vec<(NameId, Direction)> = self.models[of.0]
            .ports
            .iter()
            .map(|p| (self.ports[p.0].name, self.ports[p.0].direction))
            .collect();
        let mut ports = Vec::with_capacity(template.len());
        let mut port_by_name = HashMap::with_capacity(template.len());
        for (name, direction) in template {
            let port = PortId(self.ports.len());
            self.ports.push(Port {
                name,
                direction,
                owner: PortOwner::Instance(id),
                connection: None,
            });
            ports.push(port);
            port_by_name.insert(name, port);
        }
        self.instances.push(Instance {
            instance_of: of,
            parent,
            ports,
            port_by_name,
            attrs: BTreeMap::new(),
            params: BTreeMap::new(),
            pos,
        });
        self.models[parent.0].instances.push(id);
        id
    }

    pub fn instance(&self, id: InstId) -> &Instance {
        &self.instances[id.0]
    }

    pub fn model_instances(&self, model: ModelId) -> &[InstId] {
        &self.models[model.0].instances
    }

    pub fn find_instance_port(&self, inst: InstId, formal: &str) -> Option<PortId> {
        let sym = self.interner.get(formal)?;
        self.instances[inst.0].port_by_name.get(&sym).copied()
    }

    pub fn set_attr(&mut self, inst: InstId, key: &str, value: Const) {
        self.instances[inst.0].attrs.insert(key.to_string(), value);
    }

    pub fn set_param(&mut self, inst: InstId, key: &str, value: Const) {
        self.instances[inst.0].params.insert(key.to_string(), value);
    }
}
