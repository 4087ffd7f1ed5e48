#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// Tracks process memory while a pipeline runs. The generation phases are
/// network-bound, so memory plus wall time is all that gets reported.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    inner: Mutex<Inner>,
    pid: Pid,
    started: Instant,
    enabled: bool,
}

#[cfg(feature = "cli")]
struct Inner {
    system: System,
    peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = sysinfo::get_current_pid().expect("Failed to get current PID");
        Self {
            inner: Mutex::new(Inner {
                system: System::new_all(),
                peak_memory_mb: 0,
            }),
            pid,
            started: Instant::now(),
            enabled,
        }
    }

    pub fn get_stats(&self) -> Option<PhaseStats> {
        if !self.enabled {
            return None;
        }

        let mut inner = self.inner.lock().ok()?;
        inner.system.refresh_all();

        let memory_mb = inner.system.process(self.pid)?.memory() / 1024 / 1024;
        if memory_mb > inner.peak_memory_mb {
            inner.peak_memory_mb = memory_mb;
        }

        Some(PhaseStats {
            memory_mb,
            peak_memory_mb: inner.peak_memory_mb,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - Memory: {}MB (peak {}MB), Time: {:?}",
                phase,
                stats.memory_mb,
                stats.peak_memory_mb,
                stats.elapsed
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.elapsed,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// No-op stand-in when the cli feature (and with it sysinfo) is disabled.
#[cfg(not(feature = "cli"))]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
