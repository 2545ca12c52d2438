pub mod cli;
pub mod launcher;
pub mod terminal;
