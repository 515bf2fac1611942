pub mod bto;
pub mod roster;
