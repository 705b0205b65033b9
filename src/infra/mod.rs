//! Host adapters: CPU tick counters.

pub mod cpu_stat;

pub use cpu_stat::{CpuTickSource, CpuTicks, ProcStatSource, ScriptedSource};
