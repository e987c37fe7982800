//! The abstract syntax tree (AST).
//!
//! Nodes are created by the parser only and live until their owning
//! [`SourceFile`] is dropped. Child lists are owned vectors in source order;
//! a node never appears in two lists.

use lexer::token::TokenValue;
use span::{SourceFileIndex, Span, Spanning};
use std::fmt;

pub use ty::{Primitive, TypeRef};

mod ty;

/// The parse result of one source buffer.
///
/// The root namespace always has `name == None`.
#[derive(PartialEq, Debug)]
pub struct SourceFile {
    pub file: SourceFileIndex,
    pub span: Span,
    pub root: Namespace,
}

#[derive(PartialEq, Debug)]
pub struct Namespace {
    pub span: Span,
    /// `None` for the file-level root; possibly dotted otherwise.
    pub name: Option<Identifier>,
    pub extern_aliases: Vec<Identifier>,
    pub usings: Vec<Using>,
    pub namespaces: Vec<Namespace>,
    pub types: Vec<TypeDeclaration>,
    pub global_attributes: Vec<Attribute>,
}

impl Namespace {
    pub fn new(span: Span, name: Option<Identifier>) -> Self {
        Self {
            span,
            name,
            extern_aliases: Vec::new(),
            usings: Vec::new(),
            namespaces: Vec::new(),
            types: Vec::new(),
            global_attributes: Vec::new(),
        }
    }
}

#[derive(PartialEq, Debug)]
pub struct Using {
    pub span: Span,
    pub target: UsingTarget,
}

#[derive(PartialEq, Debug)]
pub enum UsingTarget {
    /// `using System.Collections;`
    Namespace(QualifiedName),
    /// `using Alias = Some.Type;`
    Alias { alias: Identifier, ty: TypeRef },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
        })
    }
}

#[derive(PartialEq, Debug)]
pub struct TypeDeclaration {
    pub span: Span,
    pub name: Identifier,
    pub kind: TypeKind,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub bases: Vec<TypeRef>,
    pub events: Vec<Event>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub nested_types: Vec<TypeDeclaration>,
    /// Enum declarations record their member names shallowly.
    pub enum_members: Vec<Identifier>,
    /// Delegate declarations record their return type here.
    pub return_type: Option<TypeRef>,
}

impl TypeDeclaration {
    pub fn new(span: Span, name: Identifier, kind: TypeKind) -> Self {
        Self {
            span,
            name,
            kind,
            attributes: Vec::new(),
            modifiers: Vec::new(),
            bases: Vec::new(),
            events: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            nested_types: Vec::new(),
            enum_members: Vec::new(),
            return_type: None,
        }
    }
}

/// A declaration modifier. `partial` is contextual but recorded like the
/// keyword modifiers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Modifier {
    Abstract,
    Const,
    Extern,
    Internal,
    New,
    Override,
    Partial,
    Private,
    Protected,
    Public,
    Readonly,
    Sealed,
    Static,
    Unsafe,
    Virtual,
    Volatile,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Abstract => "abstract",
            Self::Const => "const",
            Self::Extern => "extern",
            Self::Internal => "internal",
            Self::New => "new",
            Self::Override => "override",
            Self::Partial => "partial",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Public => "public",
            Self::Readonly => "readonly",
            Self::Sealed => "sealed",
            Self::Static => "static",
            Self::Unsafe => "unsafe",
            Self::Virtual => "virtual",
            Self::Volatile => "volatile",
        })
    }
}

#[derive(PartialEq, Debug)]
pub struct Event {
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: Identifier,
}

#[derive(PartialEq, Debug)]
pub struct Field {
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: Identifier,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MethodKind {
    Ordinary,
    Constructor,
    Destructor,
}

#[derive(PartialEq, Debug)]
pub struct Method {
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub kind: MethodKind,
    /// `None` for constructors and destructors.
    pub return_type: Option<TypeRef>,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterDirection {
    Value,
    Ref,
    Out,
    Params,
}

#[derive(PartialEq, Debug)]
pub struct Parameter {
    pub span: Span,
    pub direction: ParameterDirection,
    pub ty: TypeRef,
    pub name: Identifier,
}

#[derive(PartialEq, Debug)]
pub struct Property {
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: Identifier,
    pub is_indexer: bool,
}

#[derive(PartialEq, Debug)]
pub struct Attribute {
    pub span: Span,
    pub target: Option<AttributeTarget>,
    pub ty: TypeRef,
    pub positional: Vec<AttributeArgument>,
    pub named: Vec<(Identifier, AttributeArgument)>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttributeTarget {
    Assembly,
    Event,
    Field,
    Method,
    Param,
    Property,
    Return,
    Type,
    Typevar,
}

impl AttributeTarget {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "assembly" => Self::Assembly,
            "event" => Self::Event,
            "field" => Self::Field,
            "method" => Self::Method,
            "param" => Self::Param,
            "property" => Self::Property,
            "return" => Self::Return,
            "type" => Self::Type,
            "typevar" => Self::Typevar,
            _ => return None,
        })
    }
}

impl fmt::Display for AttributeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assembly => "assembly",
            Self::Event => "event",
            Self::Field => "field",
            Self::Method => "method",
            Self::Param => "param",
            Self::Property => "property",
            Self::Return => "return",
            Self::Type => "type",
            Self::Typevar => "typevar",
        })
    }
}

/// An attribute argument: the constant subset of expressions the front end
/// understands without a general expression grammar.
#[derive(PartialEq, Debug)]
pub struct AttributeArgument {
    pub span: Span,
    pub bare: BareArgument,
}

#[derive(PartialEq, Debug)]
pub enum BareArgument {
    Constant(TokenValue),
    Name(QualifiedName),
    Negative(Box<AttributeArgument>),
}

/// A possibly alias-qualified dotted name.
#[derive(Clone, PartialEq, Debug)]
pub struct QualifiedName {
    /// The `alias` of `alias::Name`.
    pub qualifier: Option<Identifier>,
    pub segments: Vec<Identifier>,
}

impl QualifiedName {
    pub fn simple(segment: Identifier) -> Self {
        Self { qualifier: None, segments: vec![segment] }
    }

    pub fn span(&self) -> Span {
        let start = self
            .qualifier
            .as_ref()
            .or_else(|| self.segments.first())
            .expect("empty qualified name");
        let end = self.segments.last().unwrap_or(start);
        start.span.merge(end.span)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{}::", qualifier.name)?;
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }
}

impl Spanning for Identifier {
    fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
