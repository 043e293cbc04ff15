pub(crate) mod common;
mod scenarios;
