//! An inspectable view of arbitrary values, used by `Equal`.
//!
//! [`Inspect`] turns a value into a [`Value`] tree that keeps enough type
//! information to compare "in type and value", render the failure message,
//! and produce a type-annotated canonical form.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{self, Write as _};
use std::rc::Rc;
use std::sync::Arc;

/// The absent value. Renders as `<nil>` and equals only other nils.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Nil;

/// Primitive numeric types, in the order the conversion step reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumType {
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
}

impl NumType {
    pub fn name(self) -> &'static str {
        match self {
            NumType::I8 => "i8",
            NumType::I16 => "i16",
            NumType::I32 => "i32",
            NumType::I64 => "i64",
            NumType::I128 => "i128",
            NumType::Isize => "isize",
            NumType::U8 => "u8",
            NumType::U16 => "u16",
            NumType::U32 => "u32",
            NumType::U64 => "u64",
            NumType::U128 => "u128",
            NumType::Usize => "usize",
            NumType::F32 => "f32",
            NumType::F64 => "f64",
        }
    }
}

impl fmt::Display for NumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value as seen by the equality comparator.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int { ty: NumType, v: i128 },
    Uint { ty: NumType, v: u128 },
    Float { ty: NumType, v: f64 },
    Char(char),
    Text(String),
    Seq(Vec<Value>),
    /// Entries sorted by the canonical form of their keys, so hash ordering
    /// never affects comparison.
    Map(Vec<(Value, Value)>),
    Record {
        ty: &'static str,
        fields: Vec<Value>,
    },
    /// A shared owner (`Rc`, `Arc`). `addr` identifies the allocation.
    Shared { addr: usize, inner: Box<Value> },
    /// Anything only known through its `Debug` output.
    Opaque { ty: &'static str, repr: String },
}

impl Value {
    /// View any `Debug` value as opaque, compared by type name and `{:?}`.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Value::Opaque {
            ty: std::any::type_name::<T>(),
            repr: format!("{value:?}"),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Identity: both sides are handles to the same allocation.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Shared { addr: a, .. }, Value::Shared { addr: b, .. }) => a == b,
            _ => false,
        }
    }

    /// Fully-qualified, type-annotated rendering, e.g. `i32(1)` or
    /// `[]{bool(true)}`.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        // Writing to a String cannot fail.
        let _ = match self {
            Value::Nil => write!(out, "nil"),
            Value::Bool(b) => write!(out, "bool({b})"),
            Value::Int { ty, v } => write!(out, "{ty}({v})"),
            Value::Uint { ty, v } => write!(out, "{ty}({v})"),
            Value::Float {
                ty: NumType::F32,
                v,
            } => write!(out, "f32({:?})", *v as f32),
            Value::Float { ty, v } => write!(out, "{ty}({v:?})"),
            Value::Char(c) => write!(out, "char({c:?})"),
            Value::Text(s) => write!(out, "{s:?}"),
            Value::Seq(items) => {
                out.push_str("[]{");
                write_joined(out, items, |out, item| item.write_canonical(out));
                out.push('}');
                Ok(())
            }
            Value::Map(entries) => {
                out.push_str("map{");
                write_joined(out, entries, |out, (k, v)| {
                    k.write_canonical(out);
                    out.push_str(": ");
                    v.write_canonical(out);
                });
                out.push('}');
                Ok(())
            }
            Value::Record { ty, fields } => {
                out.push_str(ty);
                out.push('{');
                write_joined(out, fields, |out, field| field.write_canonical(out));
                out.push('}');
                Ok(())
            }
            Value::Shared { inner, .. } => {
                out.push('&');
                inner.write_canonical(out);
                Ok(())
            }
            Value::Opaque { ty, repr } => write!(out, "{ty}{{{repr}}}"),
        };
    }
}

fn write_joined<T>(out: &mut String, items: &[T], mut each: impl FnMut(&mut String, &T)) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        each(out, item);
    }
}

/// Structural equality: same type and same value, element by element.
///
/// Shared handles compare by what they point to. Floats follow IEEE rules,
/// so `NaN` is unequal to itself here.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int { ty: ta, v: a }, Value::Int { ty: tb, v: b }) => ta == tb && a == b,
            (Value::Uint { ty: ta, v: a }, Value::Uint { ty: tb, v: b }) => ta == tb && a == b,
            (Value::Float { ty: ta, v: a }, Value::Float { ty: tb, v: b }) => ta == tb && a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Record {
                    ty: ta,
                    fields: fa,
                },
                Value::Record {
                    ty: tb,
                    fields: fb,
                },
            ) => ta == tb && fa == fb,
            (Value::Shared { inner: a, .. }, Value::Shared { inner: b, .. }) => a == b,
            (Value::Opaque { ty: ta, repr: ra }, Value::Opaque { ty: tb, repr: rb }) => {
                ta == tb && ra == rb
            }
            _ => false,
        }
    }
}

/// Infinities print as `+Inf`/`-Inf`; `f32` values print at their own
/// precision rather than widened.
fn fmt_float(f: &mut fmt::Formatter<'_>, ty: NumType, v: f64) -> fmt::Result {
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "+Inf" } else { "-Inf" });
    }
    match ty {
        NumType::F32 => write!(f, "{}", v as f32),
        _ => write!(f, "{v}"),
    }
}

/// Default rendering used in `a != b` messages.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("<nil>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int { v, .. } => write!(f, "{v}"),
            Value::Uint { v, .. } => write!(f, "{v}"),
            Value::Float { ty, v } => fmt_float(f, *ty, *v),
            Value::Char(c) => write!(f, "{c}"),
            Value::Text(s) => f.write_str(s),
            Value::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("map[")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Value::Record { fields, .. } => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str("}")
            }
            Value::Shared { inner, .. } => write!(f, "&{inner}"),
            Value::Opaque { repr, .. } => f.write_str(repr),
        }
    }
}

/// A value `Equal` can compare.
///
/// Implement it for your own types by building a [`Value`], usually
/// [`Value::debug`] or a [`Value::Record`] of the fields.
pub trait Inspect {
    fn inspect(&self) -> Value;
}

impl Inspect for Value {
    fn inspect(&self) -> Value {
        self.clone()
    }
}

impl Inspect for Nil {
    fn inspect(&self) -> Value {
        Value::Nil
    }
}

impl Inspect for () {
    fn inspect(&self) -> Value {
        Value::Record {
            ty: "()",
            fields: Vec::new(),
        }
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Inspect for char {
    fn inspect(&self) -> Value {
        Value::Char(*self)
    }
}

macro_rules! inspect_number {
    ($variant:ident as $raw:ty => $($ty:ty: $num:ident),+) => {
        $(
            impl Inspect for $ty {
                fn inspect(&self) -> Value {
                    Value::$variant {
                        ty: NumType::$num,
                        v: *self as $raw,
                    }
                }
            }
        )+
    };
}

inspect_number!(Int as i128 => i8: I8, i16: I16, i32: I32, i64: I64, i128: I128, isize: Isize);
inspect_number!(Uint as u128 => u8: U8, u16: U16, u32: U32, u64: U64, u128: U128, usize: Usize);
inspect_number!(Float as f64 => f32: F32, f64: F64);

impl Inspect for str {
    fn inspect(&self) -> Value {
        Value::Text(self.to_owned())
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value {
        match self {
            Some(v) => v.inspect(),
            None => Value::Nil,
        }
    }
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value {
        Value::Seq(self.iter().map(Inspect::inspect).collect())
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value {
        self.as_slice().inspect()
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self) -> Value {
        Value::Seq(self.iter().map(Inspect::inspect).collect())
    }
}

fn map_of<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: Inspect + 'a,
    V: Inspect + 'a,
{
    let mut entries: Vec<(String, Value, Value)> = entries
        .map(|(k, v)| {
            let key = k.inspect();
            (key.canonical(), key, v.inspect())
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Value::Map(entries.into_iter().map(|(_, k, v)| (k, v)).collect())
}

fn set_of<'a, T: Inspect + 'a>(items: impl Iterator<Item = &'a T>) -> Value {
    let mut items: Vec<(String, Value)> = items
        .map(|item| {
            let value = item.inspect();
            (value.canonical(), value)
        })
        .collect();
    items.sort_by(|a, b| a.0.cmp(&b.0));
    Value::Seq(items.into_iter().map(|(_, v)| v).collect())
}

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value {
        map_of(self.iter())
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value {
        map_of(self.iter())
    }
}

impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn inspect(&self) -> Value {
        set_of(self.iter())
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self) -> Value {
        set_of(self.iter())
    }
}

macro_rules! inspect_tuple {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Inspect),+> Inspect for ($($ty,)+) {
            fn inspect(&self) -> Value {
                let ($($var,)+) = self;
                Value::Record {
                    ty: std::any::type_name::<Self>(),
                    fields: vec![$($var.inspect()),+],
                }
            }
        }
    };
}

inspect_tuple!(A a);
inspect_tuple!(A a, B b);
inspect_tuple!(A a, B b, C c);
inspect_tuple!(A a, B b, C c, D d);
inspect_tuple!(A a, B b, C c, D d, E e);
inspect_tuple!(A a, B b, C c, D d, E e, F f);

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for &mut T {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect + ?Sized> Inspect for Box<T> {
    fn inspect(&self) -> Value {
        (**self).inspect()
    }
}

impl<T: Inspect> Inspect for Rc<T> {
    fn inspect(&self) -> Value {
        Value::Shared {
            addr: Rc::as_ptr(self) as usize,
            inner: Box::new((**self).inspect()),
        }
    }
}

impl<T: Inspect> Inspect for Arc<T> {
    fn inspect(&self) -> Value {
        Value::Shared {
            addr: Arc::as_ptr(self) as usize,
            inner: Box::new((**self).inspect()),
        }
    }
}
