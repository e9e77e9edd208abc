pub mod config;
pub mod document;
pub mod event;
pub mod mappings;
pub mod song;
pub mod track;
