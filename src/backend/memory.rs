use super::source::SystemSource;

/// System-wide memory load in percent, or `0.0` if it cannot be read.
pub fn sample_memory(source: &impl SystemSource) -> f64 {
    source.memory_load_percent().unwrap_or_else(|| {
        log::debug!("Memory load unavailable, reporting 0%");
        0.0
    })
}
