pub mod data;
pub mod inst;
pub mod reg;
pub mod syscall;
