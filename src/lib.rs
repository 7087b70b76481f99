pub mod cli;
pub mod config;
pub mod container;
pub mod driver;
pub mod logging;
pub mod pairing;
pub mod reference;
pub mod runtime;
pub mod stage1;
pub mod stage2;
pub mod stage4;
pub mod summary;
pub mod translation;
pub mod universalize;
