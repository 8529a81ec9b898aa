//! Debounce gate: at most one pending dispatch per session.

use std::time::Duration;

/// Identifies one scheduled dispatch. A timer that fires with a ticket that is
/// no longer live is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Tracks the pending timer handle `T` of a debounced dispatch.
#[derive(Debug)]
pub struct DebounceGate<T> {
    delay: Duration,
    pending: Option<(Ticket, T)>,
    issued: u64,
}

impl<T> DebounceGate<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            issued: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Takes effect for the next dispatch; a pending one keeps its timer.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Zero delay: dispatch synchronously.
    pub fn is_immediate(&self) -> bool {
        self.delay.is_zero()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the pending dispatch, if any, then schedule a new one.
    ///
    /// `cancel` runs before `schedule`. If scheduling fails nothing is pending.
    pub fn rearm<C, S, E>(&mut self, cancel: C, schedule: S) -> Result<Ticket, E>
    where
        C: FnOnce(T),
        S: FnOnce(Duration, Ticket) -> Result<T, E>,
    {
        if let Some((_, timer)) = self.pending.take() {
            cancel(timer);
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        let timer = schedule(self.delay, ticket)?;
        self.pending = Some((ticket, timer));
        Ok(ticket)
    }

    /// A timer fired. Returns `true` and clears the pending slot when `ticket`
    /// is the live dispatch.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        match &self.pending {
            Some((live, _)) if *live == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Remove the pending timer so the caller can cancel it.
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.take().map(|(_, timer)| timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_rearm_cancels_previous() {
        let mut gate: DebounceGate<u32> = DebounceGate::new(Duration::from_millis(200));
        let mut cancelled = Vec::new();

        let first = gate
            .rearm(|t| cancelled.push(t), |_, _| Ok::<_, Infallible>(1))
            .unwrap();
        let second = gate
            .rearm(|t| cancelled.push(t), |delay, _| {
                assert_eq!(delay, Duration::from_millis(200));
                Ok::<_, Infallible>(2)
            })
            .unwrap();

        assert_eq!(cancelled, vec![1]);
        assert_ne!(first, second);

        // The replaced timer's ticket no longer completes anything.
        assert!(!gate.complete(first));
        assert!(gate.has_pending());
        assert!(gate.complete(second));
        assert!(!gate.has_pending());
        assert!(!gate.complete(second));
    }

    #[test]
    fn test_failed_schedule_leaves_nothing_pending() {
        let mut gate: DebounceGate<u32> = DebounceGate::new(Duration::from_millis(10));
        gate.rearm(|_| {}, |_, _| Ok::<_, String>(1)).unwrap();

        let mut cancelled = None;
        let result = gate.rearm(|t| cancelled = Some(t), |_, _| Err("no timers".to_string()));
        assert!(result.is_err());
        assert_eq!(cancelled, Some(1));
        assert!(!gate.has_pending());
    }

    #[test]
    fn test_take_pending() {
        let mut gate: DebounceGate<u32> = DebounceGate::new(Duration::from_millis(10));
        assert!(gate.take_pending().is_none());

        let ticket = gate.rearm(|_| {}, |_, _| Ok::<_, Infallible>(9)).unwrap();
        assert_eq!(gate.take_pending(), Some(9));
        assert!(!gate.complete(ticket));
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let gate: DebounceGate<()> = DebounceGate::new(Duration::ZERO);
        assert!(gate.is_immediate());
        assert!(!DebounceGate::<()>::new(Duration::from_millis(1)).is_immediate());
    }
}
