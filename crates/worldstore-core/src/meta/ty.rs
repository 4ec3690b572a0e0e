use crate::meta::KEY_ATTR;
use std::fmt;
use worldstore_primitives::PrimitiveKind;

///
/// Ty
///
/// Logical schema tree of a storable type.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Ty {
    Primitive(PrimitiveKind),
    Struct(Struct),
    Enum(Enum),
    Tuple(Vec<Ty>),
    Array(Box<Ty>),
    FixedArray(Box<Ty>, u32),
    ByteArray,
}

impl Ty {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Primitive(kind) => kind.name().to_string(),
            Self::Struct(s) => s.name.clone(),
            Self::Enum(e) => e.name.clone(),
            Self::Tuple(items) => {
                let names: Vec<String> = items.iter().map(Self::name).collect();
                format!("({})", names.join(", "))
            }
            Self::Array(item) => format!("Array<{}>", item.name()),
            Self::FixedArray(item, len) => format!("[{}; {len}]", item.name()),
            Self::ByteArray => "ByteArray".to_string(),
        }
    }

    /// Depth-first walk over this node and every struct/enum child.
    #[must_use]
    pub fn iter(&self) -> TyIter<'_> {
        TyIter { stack: vec![self] }
    }

    #[must_use]
    pub const fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_struct(&self) -> Option<&Struct> {
        match self {
            Self::Struct(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_enum(&self) -> Option<&Enum> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Parts of `self` that are absent from or different in `other`.
    ///
    /// Structs and enums are compared member by member (matched by name),
    /// tuples element-wise. Nodes of different kinds differ entirely.
    #[must_use]
    pub fn diff(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Struct(left), Self::Struct(right)) => {
                let children: Vec<Member> = left
                    .children
                    .iter()
                    .filter_map(|member| match right.member(&member.name) {
                        Some(theirs) => member.ty.diff(&theirs.ty).map(|ty| Member {
                            ty,
                            ..member.clone()
                        }),
                        None => Some(member.clone()),
                    })
                    .collect();

                (!children.is_empty()).then(|| {
                    Self::Struct(Struct {
                        children,
                        ..left.clone()
                    })
                })
            }
            (Self::Enum(left), Self::Enum(right)) => {
                let children: Vec<EnumVariant> = left
                    .children
                    .iter()
                    .filter_map(|variant| {
                        match right.children.iter().find(|v| v.name == variant.name) {
                            Some(theirs) => variant.ty.diff(&theirs.ty).map(|ty| EnumVariant {
                                name: variant.name.clone(),
                                ty,
                            }),
                            None => Some(variant.clone()),
                        }
                    })
                    .collect();

                (!children.is_empty()).then(|| {
                    Self::Enum(Enum {
                        children,
                        ..left.clone()
                    })
                })
            }
            (Self::Tuple(left), Self::Tuple(right)) if left.len() == right.len() => {
                let items: Vec<Self> = left
                    .iter()
                    .zip(right)
                    .filter_map(|(mine, theirs)| mine.diff(theirs))
                    .collect();

                (!items.is_empty()).then_some(Self::Tuple(items))
            }
            (Self::Tuple(left), Self::Tuple(right)) => Some(Self::Tuple(
                left.iter()
                    .filter(|item| !right.contains(item))
                    .cloned()
                    .collect(),
            )),
            _ => (self != other).then(|| self.clone()),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

///
/// TyIter
///

pub struct TyIter<'a> {
    stack: Vec<&'a Ty>,
}

impl<'a> Iterator for TyIter<'a> {
    type Item = &'a Ty;

    fn next(&mut self) -> Option<Self::Item> {
        let ty = self.stack.pop()?;

        match ty {
            Ty::Struct(s) => self.stack.extend(s.children.iter().rev().map(|m| &m.ty)),
            Ty::Enum(e) => self.stack.extend(e.children.iter().rev().map(|v| &v.ty)),
            _ => {}
        }

        Some(ty)
    }
}

///
/// Struct
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Struct {
    pub name: String,
    pub attrs: Vec<String>,
    pub children: Vec<Member>,
}

impl Struct {
    #[must_use]
    pub fn new(name: impl Into<String>, children: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children,
        }
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.children.iter().find(|member| member.name == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Member> {
        self.children.iter().filter(|member| member.is_key())
    }

    pub fn values(&self) -> impl Iterator<Item = &Member> {
        self.children.iter().filter(|member| !member.is_key())
    }
}

///
/// Member
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Member {
    pub name: String,
    pub attrs: Vec<String>,
    pub ty: Ty,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: Vec<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            attrs,
            ty,
        }
    }

    #[must_use]
    pub fn is_key(&self) -> bool {
        self.attrs.iter().any(|attr| attr == KEY_ATTR)
    }
}

///
/// Enum
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Enum {
    pub name: String,
    pub attrs: Vec<String>,
    pub children: Vec<EnumVariant>,
}

impl Enum {
    #[must_use]
    pub fn new(name: impl Into<String>, children: Vec<EnumVariant>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children,
        }
    }
}

///
/// EnumVariant
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub ty: Ty,
}

impl EnumVariant {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}
