//! Dependency fingerprints.
//!
//! A [`Fingerprint`] is the ordered list of keys a computation depends on.
//! When the list changes between two compositions the computation is run
//! again:
//!
//! ```rust
//! use awaitkit_core::*;
//!
//! let user_id = 7u64;
//! let a = deps![user_id, "profile"];
//! let b = deps![user_id, "profile"];
//! assert!(!fingerprint_changed(Some(&a), &b));
//! assert!(fingerprint_changed(Some(&a), &deps![8u64, "profile"]));
//! assert!(fingerprint_changed(None, &a));
//! ```
//!
//! Keys compare by value for scalars and strings, bitwise for floats (`NaN`
//! equals itself, `0.0` and `-0.0` differ), and by allocation for
//! [`DepKey::ptr`].

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Object-safe equality for arbitrary key values.
pub trait DepValue: fmt::Debug + 'static {
    fn as_any(&self) -> &dyn Any;
    fn dep_eq(&self, other: &dyn DepValue) -> bool;
}

impl<T: PartialEq + fmt::Debug + 'static> DepValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dep_eq(&self, other: &dyn DepValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

#[derive(Clone)]
pub enum DepKey {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(Rc<str>),
    /// Identity of a shared allocation. Holding the `Rc` keeps the address
    /// from being reused while the fingerprint is alive.
    Ptr(Rc<dyn Any>),
    Value(Rc<dyn DepValue>),
    Type(TypeId),
}

impl DepKey {
    pub fn ptr<T: 'static>(rc: &Rc<T>) -> Self {
        DepKey::Ptr(rc.clone())
    }

    pub fn value<T: PartialEq + fmt::Debug + 'static>(v: T) -> Self {
        DepKey::Value(Rc::new(v))
    }

    pub fn type_of<T: ?Sized + 'static>() -> Self {
        DepKey::Type(TypeId::of::<T>())
    }
}

impl PartialEq for DepKey {
    fn eq(&self, other: &Self) -> bool {
        use DepKey::*;
        match (self, other) {
            (Unit, Unit) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Uint(a), Uint(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Char(a), Char(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Ptr(a), Ptr(b)) => Rc::ptr_eq(a, b),
            (Value(a), Value(b)) => a.dep_eq(&**b),
            (Type(a), Type(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for DepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepKey::Unit => write!(f, "()"),
            DepKey::Bool(v) => write!(f, "{v:?}"),
            DepKey::Int(v) => write!(f, "{v:?}"),
            DepKey::Uint(v) => write!(f, "{v:?}u"),
            DepKey::Float(v) => write!(f, "{v:?}"),
            DepKey::Char(v) => write!(f, "{v:?}"),
            DepKey::Str(v) => write!(f, "{v:?}"),
            DepKey::Ptr(rc) => write!(f, "Ptr({:p})", Rc::as_ptr(rc)),
            DepKey::Value(v) => write!(f, "Value({v:?})"),
            DepKey::Type(t) => write!(f, "{t:?}"),
        }
    }
}

macro_rules! dep_key_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for DepKey {
                fn from(v: $t) -> Self {
                    DepKey::$variant(v as $target)
                }
            }
        )*
    };
}

dep_key_from!(Int as i64: i8, i16, i32, i64, isize);
dep_key_from!(Uint as u64: u8, u16, u32, u64, usize);
dep_key_from!(Float as f64: f32, f64);

impl From<()> for DepKey {
    fn from(_: ()) -> Self {
        DepKey::Unit
    }
}

impl From<bool> for DepKey {
    fn from(v: bool) -> Self {
        DepKey::Bool(v)
    }
}

impl From<char> for DepKey {
    fn from(v: char) -> Self {
        DepKey::Char(v)
    }
}

impl From<&str> for DepKey {
    fn from(v: &str) -> Self {
        DepKey::Str(v.into())
    }
}

impl From<String> for DepKey {
    fn from(v: String) -> Self {
        DepKey::Str(v.into())
    }
}

impl From<&String> for DepKey {
    fn from(v: &String) -> Self {
        DepKey::Str(v.as_str().into())
    }
}

impl From<Rc<str>> for DepKey {
    fn from(v: Rc<str>) -> Self {
        DepKey::Str(v)
    }
}

/// Ordered dependency keys. Most call sites pass a handful of keys, so they
/// are stored inline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fingerprint(SmallVec<[DepKey; 4]>);

impl Fingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback used when a caller gives no dependency list: the type of the
    /// source callable. Each closure literal has its own type, so a call site
    /// that rebuilds the same closure every composition keeps its result.
    pub fn identity_of<F: ?Sized + 'static>() -> Self {
        let mut fp = Self::new();
        fp.push(DepKey::type_of::<F>());
        fp
    }

    pub fn push(&mut self, key: impl Into<DepKey>) {
        self.0.push(key.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> &[DepKey] {
        &self.0
    }
}

impl FromIterator<DepKey> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = DepKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<DepKey>> for Fingerprint {
    fn from(keys: Vec<DepKey>) -> Self {
        Self(SmallVec::from_vec(keys))
    }
}

/// Whether `next` differs from the fingerprint of the previous evaluation.
/// A missing `prev` (first evaluation) always counts as a change.
pub fn fingerprint_changed(prev: Option<&Fingerprint>, next: &Fingerprint) -> bool {
    match prev {
        None => true,
        Some(prev) => {
            prev.len() != next.len() || prev.keys().iter().zip(next.keys()).any(|(a, b)| a != b)
        }
    }
}

/// Builds a [`Fingerprint`] from values convertible into [`DepKey`].
#[macro_export]
macro_rules! deps {
    ($($key:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut fp = $crate::fingerprint::Fingerprint::new();
        $(fp.push($key);)*
        fp
    }};
}
