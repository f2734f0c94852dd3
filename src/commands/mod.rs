pub mod export;
pub mod meditate;
pub mod settings;
pub mod speech;
pub mod verse;
