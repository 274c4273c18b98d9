use std::fmt;

/// The kind of object an attribute applies to.
///
/// The relation-scoped declarations (`BA_DEF_REL_` with `BU_SG_REL_` /
/// `BU_BO_REL_` / `BU_EV_REL_`) collapse onto these variants during lowering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttrObject {
    #[default]
    Network,
    Node,
    Message,
    Signal,
}

impl fmt::Display for AttrObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttrObject::Network => "Network",
            AttrObject::Node => "Node",
            AttrObject::Message => "Message",
            AttrObject::Signal => "Signal",
        })
    }
}

/// Concrete attribute value as written in a `BA_` or `BA_DEF_DEF_` statement.
///
/// The variant follows the token kind at parse time; numeric values are never
/// coerced between integer and float.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Value-type constraint declared by a `BA_DEF_` statement.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValueType {
    Int { min: i64, max: i64 },
    Hex { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    String,
    Enum { values: Vec<String> },
}

/// A user attribute definition (`BA_DEF_` family).
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDefinition {
    pub(crate) name: String,
    pub(crate) object_type: AttrObject,
    pub(crate) value_type: AttributeValueType,
}

impl AttributeDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_type(&self) -> AttrObject {
        self.object_type
    }

    pub fn value_type(&self) -> &AttributeValueType {
        &self.value_type
    }
}

/// An attribute value attached to the network, a node, a message, or a
/// signal; also used for the defaults declared by `BA_DEF_DEF_`.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) object_type: AttrObject,
    pub(crate) value: AttributeValue,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object_type(&self) -> AttrObject {
        self.object_type
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }
}
