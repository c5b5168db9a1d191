use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use sysinfo::{System, SystemExt};

/// Cached, low-overhead memory watcher.
/// - Refreshes at most every `REFRESH_EVERY`.
/// - Uses available/total RAM to decide when the feeder should back off.
struct MemState {
    sys: System,
    last_check: Instant,
    last_frac: f64, // available / total (0.0..1.0)
}

static STATE: OnceLock<Mutex<MemState>> = OnceLock::new();
const REFRESH_EVERY: Duration = Duration::from_millis(500);

/// Returns a recent estimate of available memory fraction (0.0..1.0).
pub fn available_memory_fraction() -> f64 {
    let m = STATE.get_or_init(|| {
        let mut s = System::new();
        s.refresh_memory();
        Mutex::new(MemState {
            sys: s,
            last_check: Instant::now() - REFRESH_EVERY * 2,
            last_frac: 1.0,
        })
    });
    let mut st = m.lock().unwrap();
    let now = Instant::now();
    if now.duration_since(st.last_check) >= REFRESH_EVERY {
        st.sys.refresh_memory();
        let total = st.sys.total_memory() as f64;
        let avail = st.sys.available_memory() as f64;
        st.last_frac = if total > 0.0 { (avail / total).clamp(0.0, 1.0) } else { 1.0 };
        st.last_check = now;
    }
    st.last_frac
}

/// Cooperative backoff: yields briefly if available memory is below `threshold`
/// (e.g., 0.10 for 10%). Safe to call frequently — uses cached values internally.
pub fn maybe_throttle_low_memory(threshold: f64) {
    if available_memory_fraction() < threshold {
        std::thread::sleep(Duration::from_millis(25));
    }
}
