use crate::types::attributes::Attribute;
use crate::types::network::MessageKey;
use crate::types::value_table::ValueEncodingDescription;

/// Bit ordering of a signal inside the frame payload.
///
/// DBC spells this as a single digit after `@`: `0` is Motorola (big endian,
/// the start bit indexes the MSB), `1` is Intel (little endian).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Motorola, // 0
    Intel, // 1
}

/// Signedness of the raw value (`+` unsigned, `-` signed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Signess {
    #[default]
    Unsigned, // +
    Signed, // -
}

/// Role of a signal in message multiplexing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Multiplexer {
    /// Always present in the frame.
    #[default]
    None,
    /// The multiplexer switch (`M`).
    Switch,
    /// Present only when the switch carries this value (`m<n>`).
    Value(u64),
}

/// Physical interpretation of the raw bits beyond plain integers, declared by
/// `SIG_VALTYPE_` (0 integer, 1 IEEE 754 float, 2 IEEE 754 double).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtendedValueType {
    #[default]
    Integer,
    Float,
    Double,
}

/// Consistency findings attached to a signal during lowering. These are
/// warnings: the signal stays in the model either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalErrorCode {
    /// `start_bit + bit_size` overruns the doubled message byte size.
    SignalExceedsMessageSize = 1,
    /// Extended value type Float/Double with a bit size other than 32/64.
    WrongBitSizeForExtendedDataType = 1 << 1,
    /// The host float encoding is not IEEE 754. Never set on this
    /// implementation (`f32` is IEEE 754 by language definition); present for
    /// parity with other bindings of the same model.
    MachineFloatEncodingNotSupported = 1 << 2,
    /// As above, for `f64`.
    MachineDoubleEncodingNotSupported = 1 << 3,
}

/// Closed `[from, to]` range of switch values (extended multiplexing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MuxValueRange {
    pub from: u64,
    pub to: u64,
}

/// One `SG_MUL_VAL_` binding attached to a multiplexed signal: the name of
/// the switch gating it and the switch values under which it is meaningful.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalMultiplexerValue {
    pub(crate) switch_name: String,
    pub(crate) value_ranges: Vec<MuxValueRange>,
}

impl SignalMultiplexerValue {
    pub fn switch_name(&self) -> &str {
        &self.switch_name
    }

    pub fn value_ranges(&self) -> &[MuxValueRange] {
        &self.value_ranges
    }
}

/// Definition of one signal within a CAN message.
///
/// Carries everything an external decoder needs (position, width, byte
/// order, sign, scaling, range, extended value type); the decoding arithmetic
/// itself lives outside this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    /// Parent message key.
    pub(crate) message: MessageKey,
    pub(crate) name: String,
    pub(crate) multiplexer: Multiplexer,
    /// Set for the `m<n>M` form: the signal is multiplexed *and* acts as a
    /// second-level switch for other signals (extended multiplexing).
    pub(crate) extended_switch: bool,
    pub(crate) start_bit: u64,
    pub(crate) bit_size: u64,
    pub(crate) byte_order: Endianness,
    pub(crate) sign: Signess,
    pub(crate) factor: f64,
    pub(crate) offset: f64,
    pub(crate) minimum: f64,
    pub(crate) maximum: f64,
    pub(crate) unit: String,
    pub(crate) receivers: Vec<String>,
    pub(crate) extended_value_type: ExtendedValueType,
    pub(crate) value_descriptions: Vec<ValueEncodingDescription>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) multiplexer_value_ranges: Vec<SignalMultiplexerValue>,
    /// Associated comment (DBC `CM_ SG_` section).
    pub(crate) comment: String,
    pub(crate) error_mask: u32,
}

impl Signal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplexer(&self) -> Multiplexer {
        self.multiplexer
    }

    /// `true` when the signal was declared with the `m<n>M` indicator and
    /// therefore also gates other signals (see
    /// [`multiplexer_value_ranges`](Self::multiplexer_value_ranges) on the
    /// gated side).
    pub fn extended_switch(&self) -> bool {
        self.extended_switch
    }

    pub fn start_bit(&self) -> u64 {
        self.start_bit
    }

    pub fn bit_size(&self) -> u64 {
        self.bit_size
    }

    pub fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    pub fn sign(&self) -> Signess {
        self.sign
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Receiver node names, verbatim from the declaration. The sentinel
    /// `Vector__XXX` stands for "no receiver".
    pub fn receivers(&self) -> &[String] {
        &self.receivers
    }

    pub fn extended_value_type(&self) -> ExtendedValueType {
        self.extended_value_type
    }

    pub fn value_descriptions(&self) -> &[ValueEncodingDescription] {
        &self.value_descriptions
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn multiplexer_value_ranges(&self) -> &[SignalMultiplexerValue] {
        &self.multiplexer_value_ranges
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether the given consistency finding was flagged during lowering.
    pub fn has_error(&self, code: SignalErrorCode) -> bool {
        self.error_mask & code as u32 != 0
    }
}
