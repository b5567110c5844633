#![allow(non_snake_case)]
//! Widgets and the `Await` component.

pub mod await_view;

pub use await_view::{Await, AwaitConfig};

use awaitkit_core::*;

pub fn Empty() -> View {
    View::empty()
}

pub fn Box() -> View {
    View::new(ViewKind::Box)
}

pub fn Row() -> View {
    View::new(ViewKind::Row)
}

pub fn Column() -> View {
    View::new(ViewKind::Column)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(ViewKind::Text { text: text.into() })
}
