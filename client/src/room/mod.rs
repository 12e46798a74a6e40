pub mod player;
#[allow(clippy::module_inception)]
pub mod room;
