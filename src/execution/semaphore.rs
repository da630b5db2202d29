use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A small, blocking counting semaphore.
///
/// Used to implement throttling/backpressure for chunked execution.
pub struct Semaphore {
    permits: Mutex<usize>,
    cv: Condvar,
}

/// Returns its permit to the semaphore when dropped, including during unwinding.
pub struct Permit<'a> {
    sem: &'a Semaphore,
}

impl Semaphore {
    pub fn new(permits: usize) -> Self {
        assert!(permits > 0, "permits must be > 0");
        Self {
            permits: Mutex::new(permits),
            cv: Condvar::new(),
        }
    }

    /// Acquire one permit, blocking until available.
    ///
    /// Also returns the time spent waiting (zero if no wait was required).
    pub fn acquire(&self) -> (Permit<'_>, Duration) {
        let start = Instant::now();
        let mut waited = false;
        let mut g = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        while *g == 0 {
            waited = true;
            g = self.cv.wait(g).unwrap_or_else(PoisonError::into_inner);
        }
        *g -= 1;
        let wait = if waited { start.elapsed() } else { Duration::ZERO };
        (Permit { sem: self }, wait)
    }

    fn release(&self) {
        let mut g = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *g += 1;
        self.cv.notify_one();
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.sem.release();
    }
}

#[cfg(test)]
mod tests {
    use super::Semaphore;
    use std::time::Duration;

    #[test]
    fn permits_are_returned_on_drop() {
        let sem = Semaphore::new(1);
        {
            let (_permit, waited) = sem.acquire();
            assert_eq!(waited, Duration::ZERO);
        }
        let (_again, waited) = sem.acquire();
        assert_eq!(waited, Duration::ZERO);
    }
}
