use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub start_index: usize,
    pub end_index: usize,
}

pub trait HasMeta {
    fn get_meta(&self) -> &Meta;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramData {
    pub body: Vec<ItemType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemType {
    Class(ClassDeclData),
    Statement(StatementType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierData {
    pub name: String,
    pub meta: Meta,
}

impl HasMeta for IdentifierData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclData {
    pub name: IdentifierData,
    pub bases: Vec<IdentifierData>,
    pub members: Vec<MemberType>,
    pub meta: Meta,
}

impl HasMeta for ClassDeclData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Intercept,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberType {
    Hook {
        meta: Meta,
        kind: HookKind,
        native: IdentifierData,
    },
    Slot {
        meta: Meta,
        name: IdentifierData,
        value: SlotValueType,
    },
}

impl HasMeta for MemberType {
    fn get_meta(&self) -> &Meta {
        match self {
            MemberType::Hook { meta, .. } | MemberType::Slot { meta, .. } => meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    Data,
    NonData,
    Lazy,
    Field,
    Shared,
}

impl DescriptorKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DescriptorKind::Data => "data",
            DescriptorKind::NonData => "nondata",
            DescriptorKind::Lazy => "lazy",
            DescriptorKind::Field => "field",
            DescriptorKind::Shared => "shared",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotValueType {
    Literal(LiteralData),
    Descriptor {
        meta: Meta,
        kind: DescriptorKind,
        arguments: Vec<ArgumentData>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentData {
    pub name: IdentifierData,
    pub value: ArgumentValue,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Literal(LiteralData),
    Identifier(IdentifierData),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    NoneLiteral,
    BooleanLiteral(bool),
    IntegerLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralData {
    pub value: LiteralType,
    pub meta: Meta,
}

impl HasMeta for LiteralData {
    fn get_meta(&self) -> &Meta {
        &self.meta
    }
}

/// `object.attribute`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRefData {
    pub object: IdentifierData,
    pub attribute: IdentifierData,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionType {
    Literal(LiteralData),
    Attribute(AttributeRefData),
    /// `super(Class, object).attribute`
    Super {
        meta: Meta,
        class: IdentifierData,
        object: IdentifierData,
        attribute: IdentifierData,
    },
}

impl HasMeta for ExpressionType {
    fn get_meta(&self) -> &Meta {
        match self {
            ExpressionType::Literal(data) => &data.meta,
            ExpressionType::Attribute(data) => &data.meta,
            ExpressionType::Super { meta, .. } => meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementType {
    Let {
        meta: Meta,
        variable: IdentifierData,
        class: IdentifierData,
    },
    Assign {
        meta: Meta,
        target: AttributeRefData,
        value: ExpressionType,
    },
    Delete {
        meta: Meta,
        target: AttributeRefData,
    },
    Print {
        meta: Meta,
        value: ExpressionType,
    },
    Try {
        meta: Meta,
        statement: Box<StatementType>,
    },
}

impl HasMeta for StatementType {
    fn get_meta(&self) -> &Meta {
        match self {
            StatementType::Let { meta, .. }
            | StatementType::Assign { meta, .. }
            | StatementType::Delete { meta, .. }
            | StatementType::Print { meta, .. }
            | StatementType::Try { meta, .. } => meta,
        }
    }
}
