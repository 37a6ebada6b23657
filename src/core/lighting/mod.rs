pub mod lamp_tables;
#[allow(clippy::module_inception)]
pub mod lighting;
