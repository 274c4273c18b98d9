//! Network model (SlotMap-backed).
//!
//! Storage uses SlotMap arenas with stable keys ([`NodeKey`], [`MessageKey`],
//! [`SignalKey`]); iteration follows the declaration-order vectors so the
//! model reproduces the source file order exactly. Lookups go through
//! normalized maps: `get_message_by_id` is O(1) on the numeric id,
//! `get_node_by_name` on the exact node name.

use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

use crate::types::attributes::{Attribute, AttributeDefinition};
use crate::types::bit_timing::BitTiming;
use crate::types::message::Message;
use crate::types::node::Node;
use crate::types::signal::Signal;
use crate::types::value_table::ValueTable;

new_key_type! { pub struct NodeKey; }
new_key_type! { pub struct MessageKey; }
new_key_type! { pub struct SignalKey; }

/// Immutable in-memory representation of one CAN network, as declared by a
/// `.dbc` file.
///
/// Built exclusively by the lowering pass; every entity is owned (directly or
/// through an arena) by the network and lives exactly as long as it.
#[derive(Clone, Debug, Default)]
pub struct Network {
    pub(crate) version: String,
    pub(crate) new_symbols: Vec<String>,
    pub(crate) bit_timing: BitTiming,
    /// Network-scoped comment (`CM_ "text";`).
    pub(crate) comment: String,

    // Main storage (stable-key arenas).
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    pub(crate) messages: SlotMap<MessageKey, Message>,
    pub(crate) signals: SlotMap<SignalKey, Signal>,

    // Declaration-order views over the arenas.
    pub(crate) nodes_order: Vec<NodeKey>,
    pub(crate) messages_order: Vec<MessageKey>,

    pub(crate) value_tables: Vec<ValueTable>,
    pub(crate) attribute_definitions: Vec<AttributeDefinition>,
    pub(crate) attribute_defaults: Vec<Attribute>,
    pub(crate) attributes: Vec<Attribute>,

    // Lookups.
    pub(crate) msg_key_by_id: HashMap<u64, MessageKey>,
    pub(crate) node_key_by_name: HashMap<String, NodeKey>,
}

impl Network {
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Symbol names listed in the `NS_` section, in file order.
    pub fn new_symbols(&self) -> &[String] {
        &self.new_symbols
    }

    pub fn bit_timing(&self) -> &BitTiming {
        &self.bit_timing
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes_order.iter().filter_map(move |&key| self.nodes.get(key))
    }

    pub fn nodes_len(&self) -> usize {
        self.nodes_order.len()
    }

    /// Messages in declaration order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages_order
            .iter()
            .filter_map(move |&key| self.messages.get(key))
    }

    pub fn messages_len(&self) -> usize {
        self.messages_order.len()
    }

    pub fn value_tables(&self) -> &[ValueTable] {
        &self.value_tables
    }

    pub fn attribute_definitions(&self) -> &[AttributeDefinition] {
        &self.attribute_definitions
    }

    pub fn attribute_defaults(&self) -> &[Attribute] {
        &self.attribute_defaults
    }

    /// Network-scoped attribute values.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get_node_by_key(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_message_by_key(&self, key: MessageKey) -> Option<&Message> {
        self.messages.get(key)
    }

    pub fn get_sig_by_key(&self, key: SignalKey) -> Option<&Signal> {
        self.signals.get(key)
    }

    pub fn get_node_by_name(&self, name: &str) -> Option<&Node> {
        let key = *self.node_key_by_name.get(name)?;
        self.nodes.get(key)
    }

    pub fn get_message_by_id(&self, id: u64) -> Option<&Message> {
        let key = *self.msg_key_by_id.get(&id)?;
        self.messages.get(key)
    }

    /// Resolves the message owning `signal` through its parent key.
    ///
    /// Identity-based: a signal borrowed from message `M`'s arena entries
    /// always resolves back to `M`.
    pub fn parent_message(&self, signal: &Signal) -> Option<&Message> {
        self.messages.get(signal.message)
    }
}
