//! # Lenses
//!
//! A lens is a get/set pair focused on one part of a larger value. `set`
//! never mutates its source; it returns a new source with only the focus
//! replaced. Lenses compose with [`Lens::then`], so a path of any depth is
//! built out of single-step lenses.
//!
//! Laws every lens here satisfies:
//! - get-set: `l.set(s, l.get(s)) == s`
//! - set-get: `l.get(&l.set(s, a)) == a`
//! - set-set: `l.set(&l.set(s, a), b) == l.set(s, b)`
//!
//! [`Typed`] is the exception for get-set when the source carries fields the
//! typed view does not know about.

use std::marker::PhantomData;

use crate::path::{Path, Segment};
use crate::value::{FromValue, IntoValue, Value};

pub trait Lens {
    type Source;
    type Target;

    fn get(&self, source: &Self::Source) -> Self::Target;

    fn set(&self, source: &Self::Source, value: Self::Target) -> Self::Source;

    fn modify(
        &self,
        source: &Self::Source,
        f: impl FnOnce(Self::Target) -> Self::Target,
    ) -> Self::Source {
        self.set(source, f(self.get(source)))
    }

    fn then<L>(self, inner: L) -> Compose<Self, L>
    where
        Self: Sized,
        L: Lens<Source = Self::Target>,
    {
        Compose { outer: self, inner }
    }
}

impl Lens for Segment {
    type Source = Value;
    type Target = Value;

    fn get(&self, source: &Value) -> Value {
        source.get(self).clone()
    }

    fn set(&self, source: &Value, value: Value) -> Value {
        source.with(self, value)
    }
}

impl Lens for Path {
    type Source = Value;
    type Target = Value;

    fn get(&self, source: &Value) -> Value {
        source.get_in(self.segments()).clone()
    }

    fn set(&self, source: &Value, value: Value) -> Value {
        source.set_in(self.segments(), value)
    }
}

/// Two lenses run outer-then-inner
#[derive(Debug, Clone)]
pub struct Compose<A, B> {
    outer: A,
    inner: B,
}

impl<A, B> Lens for Compose<A, B>
where
    A: Lens,
    B: Lens<Source = A::Target>,
{
    type Source = A::Source;
    type Target = B::Target;

    fn get(&self, source: &A::Source) -> B::Target {
        self.inner.get(&self.outer.get(source))
    }

    fn set(&self, source: &A::Source, value: B::Target) -> A::Source {
        let focus = self.outer.get(source);
        self.outer.set(source, self.inner.set(&focus, value))
    }
}

/// Views a [`Value`] as a typed `T`
#[derive(Debug)]
pub struct Typed<T>(PhantomData<fn() -> T>);

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: FromValue + IntoValue> Lens for Typed<T> {
    type Source = Value;
    type Target = T;

    fn get(&self, source: &Value) -> T {
        T::from_value(source)
    }

    fn set(&self, _source: &Value, value: T) -> Value {
        value.into_value()
    }
}

/// Lens on a record field
pub fn field(key: impl Into<String>) -> Segment {
    Segment::field(key)
}

/// Lens on a list element
pub fn index(index: usize) -> Segment {
    Segment::Index(index)
}
