//! Interactive dialog library exports for testing

pub mod core;
pub mod submit;
pub mod tui;

#[cfg(test)]
pub mod test_support;
