pub mod builder;
pub mod defaults;
