//! Site checks, run in this order: main index, manifest, one per content item.

pub mod index;
pub mod manifest;
pub mod pages;
