use crate::types::attributes::Attribute;
use crate::types::network::{Network, SignalKey};
use crate::types::signal::Signal;

/// Consistency state of a message after lowering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageErrorCode {
    #[default]
    NoError,
    /// At least one signal is declared `m<n>` but no signal carries the `M`
    /// switch marker.
    MuxValueWithoutMuxSignal,
}

/// A named group of signals inside one message (`SIG_GROUP_`).
#[derive(Clone, Debug, PartialEq)]
pub struct SignalGroup {
    pub(crate) message_id: u64,
    pub(crate) name: String,
    pub(crate) repetitions: u64,
    pub(crate) signal_names: Vec<String>,
}

impl SignalGroup {
    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repetitions(&self) -> u64 {
        self.repetitions
    }

    pub fn signal_names(&self) -> &[String] {
        &self.signal_names
    }
}

/// CAN message (frame definition) from a `BO_` statement.
///
/// The id is kept verbatim as parsed (decimal or hex in source); producers
/// conventionally encode the extended-frame flag in the high bit and this
/// model does not reinterpret it.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) size: u64,
    pub(crate) transmitter: String,
    pub(crate) transmitters: Vec<String>,
    /// Signals in declaration order; resolve through the network arena.
    pub(crate) signals: Vec<SignalKey>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) signal_groups: Vec<SignalGroup>,
    pub(crate) mux_signal: Option<SignalKey>,
    /// Associated comment (DBC `CM_ BO_` section).
    pub(crate) comment: String,
    pub(crate) error: MessageErrorCode,
}

impl Message {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Transmitter from the `BO_` line itself.
    pub fn transmitter(&self) -> &str {
        &self.transmitter
    }

    /// Transmitters from the matching `BO_TX_BU_` statement, if any.
    pub fn transmitters(&self) -> &[String] {
        &self.transmitters
    }

    /// Arena keys of this message's signals, in declaration order.
    pub fn signal_keys(&self) -> &[SignalKey] {
        &self.signals
    }

    /// Convenience iterator over the [`Signal`]s of this message.
    pub fn signals<'a>(&'a self, net: &'a Network) -> impl Iterator<Item = &'a Signal> + 'a {
        self.signals.iter().filter_map(move |&key| net.get_sig_by_key(key))
    }

    /// Looks up one of this message's signals by name.
    pub fn get_signal_by_name<'a>(&'a self, net: &'a Network, name: &str) -> Option<&'a Signal> {
        self.signals(net).find(|sig| sig.name() == name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn signal_groups(&self) -> &[SignalGroup] {
        &self.signal_groups
    }

    /// The multiplexer switch signal (`M`), when the message has one.
    pub fn mux_signal<'a>(&self, net: &'a Network) -> Option<&'a Signal> {
        self.mux_signal.and_then(|key| net.get_sig_by_key(key))
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn error(&self) -> MessageErrorCode {
        self.error
    }
}
