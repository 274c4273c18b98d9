//! Lowering: `NetworkAst` → immutable [`Network`] model.
//!
//! Cross-references (attribute values, `VAL_` descriptions, comments,
//! `BO_TX_BU_`, `SIG_GROUP_`, `SIG_VALTYPE_`, `SG_MUL_VAL_`, `SGTYPE_`) are
//! resolved through an index cache built in one pass over the AST, then the
//! statement lists are walked in declaration order so the model reproduces
//! source order exactly. Lowering never fails: inconsistencies are reported
//! through `tracing` and flagged on the affected entity.
//!
//! The filtered variant drops whole messages and single signals by predicate
//! before anything for them is cached or built, and reports the drop counts
//! once at info level.

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::ast::{
    AttributeObjectType, AttributeTarget, AttributeValueAst, CommentTarget, MessageAst, MuxMarker,
    NetworkAst, SignalAst, ValueDescriptionAst,
};
use crate::types::attributes::{AttrObject, Attribute, AttributeDefinition};
use crate::types::bit_timing::BitTiming;
use crate::types::message::{Message, MessageErrorCode, SignalGroup};
use crate::types::network::{MessageKey, Network};
use crate::types::node::Node;
use crate::types::signal::{
    Endianness, ExtendedValueType, Multiplexer, Signal, SignalErrorCode, SignalMultiplexerValue,
    Signess,
};
use crate::types::value_table::{SignalType, ValueEncodingDescription, ValueTable};

/// Keeps a message in the model when it returns `true` for `(id, name)`.
pub type MessageFilter<'a> = dyn Fn(u64, &str) -> bool + 'a;
/// Keeps a signal in the model when it returns `true` for `(name, message_id)`.
pub type SignalFilter<'a> = dyn Fn(&str, u64) -> bool + 'a;

#[derive(Default)]
struct SignalCache<'a> {
    attributes: Vec<&'a AttributeValueAst>,
    value_descriptions: Option<&'a ValueDescriptionAst>,
    comment: Option<&'a str>,
}

#[derive(Default)]
struct MessageCache<'a> {
    attributes: Vec<&'a AttributeValueAst>,
    signals: HashMap<&'a str, SignalCache<'a>>,
    comment: Option<&'a str>,
}

#[derive(Default)]
struct NodeCache<'a> {
    attributes: Vec<&'a AttributeValueAst>,
    comment: Option<&'a str>,
}

#[derive(Default)]
struct Cache<'a> {
    network_attributes: Vec<&'a AttributeValueAst>,
    network_comment: Option<&'a str>,
    nodes: HashMap<&'a str, NodeCache<'a>>,
    messages: HashMap<u64, MessageCache<'a>>,
}

/// Lowers the full AST with no filtering.
pub fn lower(ast: &NetworkAst) -> Network {
    lower_filtered(ast, &|_, _| true, &|_, _| true)
}

/// Lowers the AST, keeping only the messages and signals the predicates
/// accept. Network-, node-, value-table-, bit-timing- and
/// attribute-definition-level content is preserved regardless.
pub fn lower_filtered(
    ast: &NetworkAst,
    message_filter: &MessageFilter<'_>,
    signal_filter: &SignalFilter<'_>,
) -> Network {
    // Ids of the messages that survive; cache entries for the rest are never
    // built.
    let kept: HashSet<u64> = ast
        .messages
        .iter()
        .filter(|m| message_filter(m.id, &m.name))
        .map(|m| m.id)
        .collect();

    let cache = build_cache(ast, &kept, signal_filter);

    let mut net = Network {
        version: ast.version.clone(),
        new_symbols: ast.new_symbols.clone(),
        bit_timing: ast
            .bit_timing
            .as_ref()
            .map(|bt| BitTiming {
                baudrate: bt.baudrate,
                btr1: bt.btr1,
                btr2: bt.btr2,
            })
            .unwrap_or_default(),
        comment: cache.network_comment.unwrap_or_default().to_string(),
        ..Network::default()
    };

    for n in &ast.nodes {
        let node_cache = cache.nodes.get(n.name.as_str());
        let node = Node {
            name: n.name.clone(),
            comment: node_cache
                .and_then(|c| c.comment)
                .unwrap_or_default()
                .to_string(),
            attributes: node_cache
                .map(|c| convert_attributes(&c.attributes, AttrObject::Node))
                .unwrap_or_default(),
        };
        let key = net.nodes.insert(node);
        net.nodes_order.push(key);
        net.node_key_by_name.insert(n.name.clone(), key);
    }

    net.value_tables = ast
        .value_tables
        .iter()
        .map(|vt| ValueTable {
            name: vt.name.clone(),
            signal_type: find_signal_type(ast, &vt.name),
            entries: vt
                .descriptions
                .iter()
                .map(|d| ValueEncodingDescription {
                    value: d.value,
                    description: d.description.clone(),
                })
                .collect(),
        })
        .collect();

    let mut dropped_messages = 0u32;
    let mut dropped_signals = 0u32;

    for m in &ast.messages {
        if !message_filter(m.id, &m.name) {
            dropped_messages += 1;
            continue;
        }
        let key = build_message(&mut net, ast, m, &cache, signal_filter, &mut dropped_signals);
        net.messages_order.push(key);
        // Duplicate ids: the lookup resolves to the last declaration.
        net.msg_key_by_id.insert(m.id, key);
    }

    if dropped_messages > 0 || dropped_signals > 0 {
        info!(
            "Filter discarded {} messages and {} signals",
            dropped_messages, dropped_signals
        );
    }

    net.attribute_definitions = ast
        .attribute_definitions
        .iter()
        .filter_map(|ad| {
            Some(AttributeDefinition {
                name: ad.name.clone(),
                object_type: collapse_object_type(ad.object_type)?,
                value_type: ad.value_type.clone(),
            })
        })
        .collect();

    net.attribute_defaults = ast
        .attribute_defaults
        .iter()
        .map(|ad| Attribute {
            name: ad.name.clone(),
            object_type: AttrObject::Network,
            value: ad.value.clone(),
        })
        .collect();

    net.attributes = convert_attributes(&cache.network_attributes, AttrObject::Network);

    net
}

/// One pass over the statement lists that carry cross-references, indexed so
/// the build walk can attach them without rescanning the AST.
fn build_cache<'a>(
    ast: &'a NetworkAst,
    kept: &HashSet<u64>,
    signal_filter: &SignalFilter<'_>,
) -> Cache<'a> {
    let mut cache = Cache::default();

    for av in &ast.attribute_values {
        match &av.target {
            AttributeTarget::Network => cache.network_attributes.push(av),
            AttributeTarget::Node { name } => {
                cache.nodes.entry(name).or_default().attributes.push(av);
            }
            AttributeTarget::Message { id } => {
                if kept.contains(id) {
                    cache.messages.entry(*id).or_default().attributes.push(av);
                }
            }
            AttributeTarget::Signal {
                message_id,
                signal_name,
            } => {
                if kept.contains(message_id) && signal_filter(signal_name, *message_id) {
                    cache
                        .messages
                        .entry(*message_id)
                        .or_default()
                        .signals
                        .entry(signal_name)
                        .or_default()
                        .attributes
                        .push(av);
                }
            }
        }
    }

    for vd in &ast.value_descriptions {
        if kept.contains(&vd.message_id) && signal_filter(&vd.signal_name, vd.message_id) {
            // Duplicate VAL_ for one signal: last wins.
            cache
                .messages
                .entry(vd.message_id)
                .or_default()
                .signals
                .entry(&vd.signal_name)
                .or_default()
                .value_descriptions = Some(vd);
        }
    }

    for cm in &ast.comments {
        match &cm.target {
            CommentTarget::Network => cache.network_comment = Some(&cm.text),
            CommentTarget::Node { name } => {
                cache.nodes.entry(name).or_default().comment = Some(&cm.text);
            }
            CommentTarget::Message { id } => {
                if kept.contains(id) {
                    cache.messages.entry(*id).or_default().comment = Some(&cm.text);
                }
            }
            CommentTarget::Signal {
                message_id,
                signal_name,
            } => {
                if kept.contains(message_id) && signal_filter(signal_name, *message_id) {
                    cache
                        .messages
                        .entry(*message_id)
                        .or_default()
                        .signals
                        .entry(signal_name)
                        .or_default()
                        .comment = Some(&cm.text);
                }
            }
        }
    }

    cache
}

fn build_message(
    net: &mut Network,
    ast: &NetworkAst,
    m: &MessageAst,
    cache: &Cache<'_>,
    signal_filter: &SignalFilter<'_>,
    dropped_signals: &mut u32,
) -> MessageKey {
    let msg_cache = cache.messages.get(&m.id);

    // The arena key must exist before its signals do: each signal stores the
    // parent key.
    let key = net.messages.insert(Message {
        id: m.id,
        name: m.name.clone(),
        size: m.size,
        transmitter: m.transmitter.clone(),
        transmitters: Vec::new(),
        signals: Vec::new(),
        attributes: Vec::new(),
        signal_groups: Vec::new(),
        mux_signal: None,
        comment: String::new(),
        error: MessageErrorCode::NoError,
    });

    let mut signal_keys = Vec::with_capacity(m.signals.len());
    let mut mux_signal = None;
    let mut have_mux_value = false;

    for s in &m.signals {
        if !signal_filter(&s.name, m.id) {
            *dropped_signals += 1;
            continue;
        }
        let sig_cache = msg_cache.and_then(|c| c.signals.get(s.name.as_str()));
        let sig = build_signal(ast, m, s, key, sig_cache);
        let sig_key = net.signals.insert(sig);
        match s.mux {
            MuxMarker::Switch => mux_signal = Some(sig_key),
            MuxMarker::Value { .. } => have_mux_value = true,
            MuxMarker::None => {}
        }
        signal_keys.push(sig_key);
    }

    let error = if have_mux_value && mux_signal.is_none() {
        warn!("Message '{}' has mux value but no mux signal", m.name);
        MessageErrorCode::MuxValueWithoutMuxSignal
    } else {
        MessageErrorCode::NoError
    };

    // Duplicate BO_TX_BU_ for one id: the last statement wins.
    let transmitters = ast
        .message_transmitters
        .iter()
        .rfind(|mt| mt.message_id == m.id)
        .map(|mt| mt.transmitters.clone())
        .unwrap_or_default();

    let signal_groups = ast
        .signal_groups
        .iter()
        .filter(|sg| sg.message_id == m.id)
        .map(|sg| SignalGroup {
            message_id: sg.message_id,
            name: sg.group_name.clone(),
            repetitions: sg.repetitions,
            signal_names: sg.signal_names.clone(),
        })
        .collect();

    let Some(msg) = net.messages.get_mut(key) else {
        return key;
    };
    msg.transmitters = transmitters;
    msg.signals = signal_keys;
    msg.attributes = msg_cache
        .map(|c| convert_attributes(&c.attributes, AttrObject::Message))
        .unwrap_or_default();
    msg.signal_groups = signal_groups;
    msg.mux_signal = mux_signal;
    msg.comment = msg_cache
        .and_then(|c| c.comment)
        .unwrap_or_default()
        .to_string();
    msg.error = error;

    key
}

fn build_signal(
    ast: &NetworkAst,
    m: &MessageAst,
    s: &SignalAst,
    message_key: MessageKey,
    sig_cache: Option<&SignalCache<'_>>,
) -> Signal {
    let (multiplexer, extended_switch) = match s.mux {
        MuxMarker::None => (Multiplexer::None, false),
        MuxMarker::Switch => (Multiplexer::Switch, false),
        MuxMarker::Value { value, extended } => (Multiplexer::Value(value), extended),
    };

    let extended_value_type = ast
        .signal_extended_value_types
        .iter()
        .find(|sevt| sevt.message_id == m.id && sevt.signal_name == s.name)
        .map(|sevt| match sevt.value_type {
            1 => ExtendedValueType::Float,
            2 => ExtendedValueType::Double,
            _ => ExtendedValueType::Integer,
        })
        .unwrap_or_default();

    let multiplexer_value_ranges = ast
        .signal_multiplexer_values
        .iter()
        .filter(|smv| smv.message_id == m.id && smv.signal_name == s.name)
        .map(|smv| SignalMultiplexerValue {
            switch_name: smv.switch_name.clone(),
            value_ranges: smv.value_ranges.clone(),
        })
        .collect();

    let mut error_mask = 0u32;

    // The doubled bound admits Motorola signals whose start bit indexes the
    // MSB of the payload.
    if s.start_bit + s.bit_size > 2 * 8 * m.size {
        warn!(
            "Signal '{}::{}' start_bit + bit_size exceeds the byte size of the message; \
             decoding this signal reads garbage data",
            m.name, s.name
        );
        error_mask |= SignalErrorCode::SignalExceedsMessageSize as u32;
    }

    let expected_bits = match extended_value_type {
        ExtendedValueType::Integer => None,
        ExtendedValueType::Float => Some(32),
        ExtendedValueType::Double => Some(64),
    };
    if let Some(bits) = expected_bits {
        if s.bit_size != bits {
            warn!(
                "Signal '{}::{}' bit_size does not fit the bit size of the specified extended value type",
                m.name, s.name
            );
            error_mask |= SignalErrorCode::WrongBitSizeForExtendedDataType as u32;
        }
    }

    Signal {
        message: message_key,
        name: s.name.clone(),
        multiplexer,
        extended_switch,
        start_bit: s.start_bit,
        bit_size: s.bit_size,
        byte_order: if s.byte_order == '0' {
            Endianness::Motorola
        } else {
            Endianness::Intel
        },
        sign: if s.sign == '-' {
            Signess::Signed
        } else {
            Signess::Unsigned
        },
        factor: s.factor,
        offset: s.offset,
        minimum: s.minimum,
        maximum: s.maximum,
        unit: s.unit.clone(),
        receivers: s.receivers.clone(),
        extended_value_type,
        value_descriptions: sig_cache
            .and_then(|c| c.value_descriptions)
            .map(|vd| {
                vd.descriptions
                    .iter()
                    .map(|d| ValueEncodingDescription {
                        value: d.value,
                        description: d.description.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        attributes: sig_cache
            .map(|c| convert_attributes(&c.attributes, AttrObject::Signal))
            .unwrap_or_default(),
        multiplexer_value_ranges,
        comment: sig_cache
            .and_then(|c| c.comment)
            .unwrap_or_default()
            .to_string(),
        error_mask,
    }
}

fn convert_attributes(values: &[&AttributeValueAst], object_type: AttrObject) -> Vec<Attribute> {
    values
        .iter()
        .map(|av| Attribute {
            name: av.attribute_name.clone(),
            object_type,
            value: av.value.clone(),
        })
        .collect()
}

/// `SGTYPE_` entry bound to a value table by name, if any.
fn find_signal_type(ast: &NetworkAst, table_name: &str) -> Option<SignalType> {
    ast.signal_types
        .iter()
        .find(|st| st.value_table == table_name)
        .map(|st| SignalType {
            name: st.name.clone(),
            bit_size: st.size,
            byte_order: if st.byte_order == '0' {
                Endianness::Motorola
            } else {
                Endianness::Intel
            },
            sign: if st.sign == '-' {
                Signess::Signed
            } else {
                Signess::Unsigned
            },
            factor: st.factor,
            offset: st.offset,
            minimum: st.minimum,
            maximum: st.maximum,
            unit: st.unit.clone(),
            default_value: st.default_value,
            value_table_name: st.value_table.clone(),
        })
}

/// Rel-scoped definition variants collapse onto their plain counterpart;
/// EV_-scoped definitions never reach lowering (the parser discards them).
fn collapse_object_type(object_type: AttributeObjectType) -> Option<AttrObject> {
    match object_type {
        AttributeObjectType::Network => Some(AttrObject::Network),
        AttributeObjectType::Node | AttributeObjectType::RelNode => Some(AttrObject::Node),
        AttributeObjectType::Message | AttributeObjectType::RelMessage => Some(AttrObject::Message),
        AttributeObjectType::Signal | AttributeObjectType::RelSignal => Some(AttrObject::Signal),
        AttributeObjectType::EnvironmentVariable => None,
    }
}
