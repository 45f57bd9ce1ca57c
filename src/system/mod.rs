//! Operating-system counters
//!
//! CPU time per core and state from `/proc/stat`

mod cpu_time;

pub use cpu_time::{parse_cpu_times, CpuSample, CpuState, CpuTimeSampler, SamplerError, USER_HZ};
