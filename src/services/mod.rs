//! Request-scoped operations behind the HTTP surface: fetch, normalize,
//! classify, aggregate.

pub mod dashboard;
