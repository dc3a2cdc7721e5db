//! Laboratory reservation service: students book morning or afternoon lab
//! slots, administrators review them and manage accounts.

pub mod backend;
