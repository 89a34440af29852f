//! Row management for the treatment planner form.
//!
//! This crate is compiled to WebAssembly and enhances the server-rendered
//! planner form: wiring repeated procedure rows, adding and removing them,
//! toggling the custom-name field and the global finance controls, and
//! injecting excluded-row markers right before the form submits. All logic
//! runs against the [`dom::Document`] trait so it can be tested natively on
//! [`memory::MemoryDom`]; the `hydrate` feature adds the browser binding.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | The form row controller and event routing |
//! | [`dom`] | DOM primitives the controller depends on |
//! | [`memory`] | In-memory DOM arena for tests and native hosts |
//! | [`config`] | Element ids and selectors, with JSON overrides |
//! | [`selector`] | The CSS selector subset used by the config |
//! | [`submission`] | The field set a submit would send |
//! | [`consts`] | Field names, labels, and the procedure sentinel |
//! | `web` | `web-sys` binding and wasm entrypoint (feature `hydrate`) |

pub mod config;
pub mod consts;
pub mod controller;
pub mod dom;
pub mod memory;
pub mod selector;
pub mod submission;
#[cfg(feature = "hydrate")]
pub mod web;
