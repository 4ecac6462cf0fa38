// Global allocator: jemalloc handles the churn of book updates better
// than the system allocator under sustained load.
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod shared;
