use std::sync::Arc;

/// Surface that shows a spinner while a flow awaits the network.
pub trait BusyIndicator: Send + Sync {
    fn set_busy(&self, busy: bool);
}

/// Raises the indicator on creation and lowers it when dropped.
pub struct BusyGuard {
    indicator: Arc<dyn BusyIndicator>,
}

impl BusyGuard {
    pub fn new(indicator: Arc<dyn BusyIndicator>) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<bool>>);

    impl BusyIndicator for Recorder {
        fn set_busy(&self, busy: bool) {
            self.0.lock().unwrap().push(busy);
        }
    }

    #[test]
    fn test_busy_guard_raises_and_lowers() {
        let recorder = Arc::new(Recorder::default());
        {
            let _guard = BusyGuard::new(recorder.clone());
            assert_eq!(*recorder.0.lock().unwrap(), vec![true]);
        }
        assert_eq!(*recorder.0.lock().unwrap(), vec![true, false]);
    }
}
