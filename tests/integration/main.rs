#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

#[path = "../common/mod.rs"]
mod common;

mod filler;
