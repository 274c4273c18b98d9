//! Parse-tree data for DBC statements.
//!
//! One plain struct per statement kind, aggregated into [`NetworkAst`]. The
//! parser fills these verbatim; cross-references (attribute values naming
//! message ids, `VAL_` naming signals, `SG_MUL_VAL_` naming switches) stay
//! unresolved until the lowering pass. Every statement node carries the
//! [`Position`] of its first token for diagnostics.

use crate::types::attributes::{AttributeValue, AttributeValueType};
use crate::types::signal::MuxValueRange;

/// 1-based source location of a statement's first token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BitTimingAst {
    pub baudrate: u64,
    pub btr1: u64,
    pub btr2: u64,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeAst {
    pub name: String,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValueEncodingDescriptionAst {
    pub value: i64,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ValueTableAst {
    pub name: String,
    pub descriptions: Vec<ValueEncodingDescriptionAst>,
    pub pos: Position,
}

/// Multiplex indicator as written after the signal name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MuxMarker {
    #[default]
    None,
    /// Bare `M`: the multiplexer switch.
    Switch,
    /// `m<n>` (`extended` false) or `m<n>M` (`extended` true).
    Value { value: u64, extended: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalAst {
    pub name: String,
    pub mux: MuxMarker,
    pub start_bit: u64,
    pub bit_size: u64,
    /// `'0'` Motorola, `'1'` Intel, as written.
    pub byte_order: char,
    /// `'+'` unsigned, `'-'` signed, as written.
    pub sign: char,
    pub factor: f64,
    pub offset: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub unit: String,
    pub receivers: Vec<String>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageAst {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub transmitter: String,
    pub signals: Vec<SignalAst>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MessageTransmitterAst {
    pub message_id: u64,
    pub transmitters: Vec<String>,
    pub pos: Position,
}

/// What a `CM_` statement annotates.
#[derive(Clone, Debug, PartialEq)]
pub enum CommentTarget {
    Network,
    Node { name: String },
    Message { id: u64 },
    Signal { message_id: u64, signal_name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommentAst {
    pub target: CommentTarget,
    pub text: String,
    pub pos: Position,
}

/// Object scope of a `BA_DEF_` / `BA_DEF_REL_` statement.
///
/// `EnvironmentVariable` is recognized so the parser can discard the
/// definition (environment variables are out of scope); the `Rel*` variants
/// collapse to their plain counterpart during lowering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttributeObjectType {
    #[default]
    Network,
    Node,
    Message,
    Signal,
    EnvironmentVariable,
    RelNode,
    RelMessage,
    RelSignal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefinitionAst {
    pub object_type: AttributeObjectType,
    pub name: String,
    pub value_type: AttributeValueType,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefaultAst {
    pub name: String,
    pub value: AttributeValue,
    pub pos: Position,
}

/// Object a `BA_` statement attaches its value to.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeTarget {
    Network,
    Node { name: String },
    Message { id: u64 },
    Signal { message_id: u64, signal_name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValueAst {
    pub target: AttributeTarget,
    pub attribute_name: String,
    pub value: AttributeValue,
    pub pos: Position,
}

/// `VAL_`: value descriptions bound to a signal post-parse.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueDescriptionAst {
    pub message_id: u64,
    pub signal_name: String,
    pub descriptions: Vec<ValueEncodingDescriptionAst>,
    pub pos: Position,
}

/// `SIG_VALTYPE_`: 0 integer, 1 float, 2 double.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalExtendedValueTypeAst {
    pub message_id: u64,
    pub signal_name: String,
    pub value_type: u64,
    pub pos: Position,
}

/// `SG_MUL_VAL_`: extended-multiplexing binding.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalMultiplexerValueAst {
    pub message_id: u64,
    pub signal_name: String,
    pub switch_name: String,
    pub value_ranges: Vec<MuxValueRange>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalGroupAst {
    pub message_id: u64,
    pub group_name: String,
    pub repetitions: u64,
    pub signal_names: Vec<String>,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignalTypeAst {
    pub name: String,
    pub size: u64,
    pub byte_order: char,
    pub sign: char,
    pub factor: f64,
    pub offset: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub unit: String,
    pub default_value: f64,
    pub value_table: String,
    pub pos: Position,
}

/// The whole parsed document, statement lists in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkAst {
    pub version: String,
    pub new_symbols: Vec<String>,
    pub bit_timing: Option<BitTimingAst>,
    pub nodes: Vec<NodeAst>,
    pub value_tables: Vec<ValueTableAst>,
    pub messages: Vec<MessageAst>,
    pub message_transmitters: Vec<MessageTransmitterAst>,
    pub signal_types: Vec<SignalTypeAst>,
    pub comments: Vec<CommentAst>,
    pub attribute_definitions: Vec<AttributeDefinitionAst>,
    pub attribute_defaults: Vec<AttributeDefaultAst>,
    pub attribute_values: Vec<AttributeValueAst>,
    pub value_descriptions: Vec<ValueDescriptionAst>,
    pub signal_groups: Vec<SignalGroupAst>,
    pub signal_extended_value_types: Vec<SignalExtendedValueTypeAst>,
    pub signal_multiplexer_values: Vec<SignalMultiplexerValueAst>,
}
