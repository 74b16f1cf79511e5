use tokio::sync::watch;

/// Per-operation "request in flight" indicator.
///
/// A flow acquires the flag with [`BusyFlag::try_begin`] and holds the returned
/// guard for its whole duration; dropping the guard clears the flag on every
/// exit path, including early returns and `?` propagation.
#[derive(Debug)]
pub struct BusyFlag {
    name: &'static str,
    tx: watch::Sender<bool>,
}

impl BusyFlag {
    pub fn new(name: &'static str) -> Self {
        let (tx, _) = watch::channel(false);
        Self { name, tx }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_busy(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Returns `None` when the flag is already held.
    pub fn try_begin(&self) -> Option<BusyGuard<'_>> {
        let acquired = self.tx.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        acquired.then_some(BusyGuard { flag: self })
    }
}

#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.tx.send_replace(false);
    }
}
