#![allow(missing_copy_implementations, missing_debug_implementations)]

//! Event profiling behind the `profiler` feature.
//!
//! With the feature enabled, evaluation hot spots record measureme
//! intervals to `./terrarium_trace`; without it every call compiles to
//! nothing.

#[cfg(feature = "profiler")]
use measureme::{EventId, TimingGuard};
#[cfg(feature = "profiler")]
use once_cell::sync::OnceCell;
#[cfg(feature = "profiler")]
use std::path::Path;

#[cfg(feature = "profiler")]
pub struct Profiler {
    profiler: measureme::Profiler,
}

#[cfg(feature = "profiler")]
static INSTANCE: OnceCell<Profiler> = OnceCell::new();

#[cfg(feature = "profiler")]
impl Profiler {
    pub fn global() -> &'static Self {
        INSTANCE.get_or_init(|| {
            let profiler = measureme::Profiler::new(Path::new("./terrarium_trace"))
                .expect("could not create profiler trace file");
            Self { profiler }
        })
    }

    pub fn start_event(&self, label: &str, category: &str) -> TimingGuard<'_> {
        let kind = self.profiler.alloc_string(category);
        let id = EventId::from_label(self.profiler.alloc_string(label));
        // The interpreter is single-threaded; one logical thread is enough.
        self.profiler.start_recording_interval_event(kind, id, 0)
    }
}

#[cfg(not(feature = "profiler"))]
pub struct Profiler;

#[cfg(not(feature = "profiler"))]
impl Profiler {
    #[inline(always)]
    pub fn global() -> Self {
        Self
    }

    #[inline(always)]
    #[allow(clippy::unused_self)]
    pub fn start_event(&self, _label: &str, _category: &str) {}
}
