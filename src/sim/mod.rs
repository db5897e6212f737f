pub mod codec;
pub mod event;
pub mod level;
pub mod session;
pub mod step;

#[cfg(test)]
pub(crate) mod test_util;
