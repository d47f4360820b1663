// Licensed under the Apache-2.0 license

//! The elaborated address-map tree consumed by the model builder.
//!
//! This is the hand-off point from the upstream SystemRDL elaborator: every
//! instance is placed, every inherited property is resolved, and the tree is
//! read-only from here on. Nodes live in an arena and refer to each other by
//! index, so references such as `swwe = other_field` stay cheap and
//! lifetime-free.
//!
//! ```text
//! ElaboratedTree
//! ├── node_arena: Vec<Node>   # every node, never removed
//! └── top: NodeIdx            # the top-level addrmap
//!     └── children            # declaration order is preserved
//! ```

use std::collections::HashMap;

use strum_macros::{Display, EnumString};

use crate::error::{BuildError, BuildResult};
use crate::value::{Property, Value};

/// Index into the node arena.
pub type NodeIdx = usize;

/// The component type of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    AddrMap,
    RegFile,
    Reg,
    Field,
    Mem,
    Signal,
}

/// Dimensions and stride of an arrayed instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayInfo {
    /// Array dimensions, e.g. `[4]` or `[2, 3]`.
    pub dimensions: Vec<u64>,
    /// Byte distance between consecutive elements.
    pub stride: u64,
}

impl ArrayInfo {
    /// Number of elements once all dimensions are flattened, or `None` if
    /// the count does not fit in 64 bits.
    pub fn element_count(&self) -> Option<u64> {
        self.dimensions
            .iter()
            .try_fold(1u64, |count, dim| count.checked_mul(*dim))
    }
}

/// Bit position of a field within its register, lsb0 ordering.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BitRange {
    pub lsb: u32,
    pub msb: u32,
}

/// One elaborated instance.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Instance name. Anonymous blocks carry an empty name.
    pub inst_name: String,
    pub parent: Option<NodeIdx>,
    /// Child nodes in declaration order.
    pub children: Vec<NodeIdx>,
    pub array: Option<ArrayInfo>,
    /// Offset as declared, relative to the parent. For arrays this is the
    /// offset of the first element.
    pub raw_address_offset: u64,
    /// Resolved offset relative to the parent.
    pub address_offset: u64,
    /// Only set for fields.
    pub bit_range: Option<BitRange>,
    /// Register implemented outside the generated block (`external`).
    pub external: bool,
    /// Parameters declared on an addrmap, in declaration order.
    pub parameters: Vec<(String, Value)>,
    properties: HashMap<Property, Value>,
}

impl Node {
    /// A node of `kind` with no properties assigned.
    pub fn new(kind: NodeKind, name: &str) -> Self {
        Self {
            kind,
            inst_name: name.to_string(),
            parent: None,
            children: vec![],
            array: None,
            raw_address_offset: 0,
            address_offset: 0,
            bit_range: None,
            external: false,
            parameters: vec![],
            properties: HashMap::new(),
        }
    }

    pub fn addrmap(name: &str) -> Self {
        Self::new(NodeKind::AddrMap, name)
    }

    pub fn regfile(name: &str) -> Self {
        Self::new(NodeKind::RegFile, name)
    }

    pub fn reg(name: &str) -> Self {
        Self::new(NodeKind::Reg, name)
    }

    pub fn signal(name: &str) -> Self {
        Self::new(NodeKind::Signal, name)
    }

    /// A field occupying bits `lsb..=msb`.
    pub fn field(name: &str, lsb: u32, msb: u32) -> Self {
        Self {
            bit_range: Some(BitRange { lsb, msb }),
            ..Self::new(NodeKind::Field, name)
        }
    }

    /// A memory of `entries` words of `width` bits.
    pub fn mem(name: &str, entries: u64, width: u64) -> Self {
        Self::new(NodeKind::Mem, name)
            .with_property(Property::Mementries, entries)
            .with_property(Property::Memwidth, width)
    }

    /// Place the instance at `offset` bytes from its parent.
    pub fn at(mut self, offset: u64) -> Self {
        self.raw_address_offset = offset;
        self.address_offset = offset;
        self
    }

    pub fn array(mut self, dimensions: &[u64], stride: u64) -> Self {
        self.array = Some(ArrayInfo {
            dimensions: dimensions.to_vec(),
            stride,
        });
        self
    }

    pub fn external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    pub fn with_property(mut self, property: Property, value: impl Into<Value>) -> Self {
        self.properties.insert(property, value.into());
        self
    }

    pub fn with_parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.push((name.to_string(), value.into()));
        self
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// The explicitly assigned value, or the property's default.
    pub fn get_property(&self, property: Property) -> Option<Value> {
        self.properties
            .get(&property)
            .cloned()
            .or_else(|| property.default_value())
    }

    /// Whether the property was assigned on this node.
    pub fn has_property(&self, property: Property) -> bool {
        self.properties.contains_key(&property)
    }
}

/// Arena holding a fully elaborated address map.
#[derive(Clone, Debug)]
pub struct ElaboratedTree {
    /// All nodes. Indices are stable because nodes are never removed.
    pub node_arena: Vec<Node>,
    /// The top-level node.
    pub top: NodeIdx,
}

impl ElaboratedTree {
    pub fn new(top: Node) -> Self {
        Self {
            node_arena: vec![top],
            top: 0,
        }
    }

    /// Append `node` as the last child of `parent` and return its index.
    pub fn add_child(&mut self, parent: NodeIdx, mut node: Node) -> NodeIdx {
        let idx = self.node_arena.len();
        node.parent = Some(parent);
        self.node_arena.push(node);
        self.node_arena[parent].children.push(idx);
        idx
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.node_arena[idx]
    }

    pub fn children(&self, idx: NodeIdx) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.node_arena[idx]
            .children
            .iter()
            .map(move |&child| (child, &self.node_arena[child]))
    }

    /// Registers placed directly under `idx`.
    pub fn registers(&self, idx: NodeIdx) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.children(idx)
            .filter(|(_, node)| node.kind == NodeKind::Reg)
    }

    /// Dotted instance path from the top, e.g. `uart.ctrl.nco`.
    pub fn path(&self, idx: NodeIdx) -> String {
        let mut names = vec![];
        let mut cur = Some(idx);
        while let Some(i) = cur {
            let node = &self.node_arena[i];
            names.push(if node.inst_name.is_empty() {
                "<anon>"
            } else {
                node.inst_name.as_str()
            });
            cur = node.parent;
        }
        names.reverse();
        names.join(".")
    }

    pub fn get_property(&self, idx: NodeIdx, property: Property) -> Option<Value> {
        self.node_arena[idx].get_property(property)
    }

    /// Typed lookup. `Ok(None)` when the property is absent and has no default.
    pub fn property<T>(&self, idx: NodeIdx, property: Property) -> BuildResult<Option<T>>
    where
        T: TryFrom<Value, Error = anyhow::Error>,
    {
        self.get_property(idx, property)
            .map(T::try_from)
            .transpose()
            .map_err(|cause| BuildError::Property {
                path: self.path(idx),
                property,
                cause,
            })
    }

    pub fn property_bool(&self, idx: NodeIdx, property: Property) -> BuildResult<bool> {
        Ok(self.property::<bool>(idx, property)?.unwrap_or(false))
    }

    /// Lookup for flags that may also hold a signal or clock reference.
    pub fn property_flag(&self, idx: NodeIdx, property: Property) -> bool {
        self.get_property(idx, property)
            .is_some_and(|value| value.as_bool())
    }
}
