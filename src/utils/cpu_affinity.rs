//! Thread pinning for timing runs.
//!
//! On Linux the current thread is pinned with `sched_setaffinity` and the
//! previous mask is restored on drop. Other platforms get a guard that does
//! nothing.

#[cfg(target_os = "linux")]
mod platform {
    pub struct Saved(libc::cpu_set_t);

    pub fn current_cpu() -> Option<usize> {
        // SAFETY: no arguments, returns -1 on failure.
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu as usize)
    }

    pub fn pin(core: usize) -> Option<Saved> {
        // SAFETY: cpu_set_t is plain data; both calls receive valid pointers
        // and the exact size of the set.
        unsafe {
            let mut saved: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut saved) != 0 {
                return None;
            }
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core, &mut set);
            if libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
                return None;
            }
            Some(Saved(saved))
        }
    }

    pub fn restore(saved: &Saved) {
        // SAFETY: restores a mask previously read from the kernel.
        unsafe {
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &saved.0);
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub struct Saved;

    pub fn current_cpu() -> Option<usize> {
        None
    }

    pub fn pin(_core: usize) -> Option<Saved> {
        None
    }

    pub fn restore(_saved: &Saved) {}
}

/// RAII guard: pins on creation, restores the previous affinity on drop.
pub struct CorePin {
    core: Option<usize>,
    saved: Option<platform::Saved>,
}

impl CorePin {
    /// Pin to the core the thread is running on (core 0 if unknown).
    pub fn current() -> Self {
        Self::to_core(platform::current_cpu().unwrap_or(0))
    }

    pub fn to_core(core: usize) -> Self {
        match platform::pin(core) {
            Some(saved) => Self {
                core: Some(core),
                saved: Some(saved),
            },
            None => {
                log::debug!("could not pin thread to core {core}");
                Self {
                    core: None,
                    saved: None,
                }
            }
        }
    }

    /// Core the thread is pinned to, if pinning succeeded.
    pub fn core(&self) -> Option<usize> {
        self.core
    }
}

impl Drop for CorePin {
    fn drop(&mut self) {
        if let Some(saved) = &self.saved {
            platform::restore(saved);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_guard_round_trip() {
        let guard = CorePin::current();
        if let Some(core) = guard.core() {
            #[cfg(target_os = "linux")]
            assert_eq!(platform::current_cpu(), Some(core));
        }
        drop(guard);
    }
}
