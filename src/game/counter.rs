/// Mutable non-negative counter shared across one level run.
///
/// The per-level runtime only ever calls `increase` on the score counter
/// and `decrease` on the lives counter; the run supervisor owns both and
/// reads them between turns.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counter {
    value: u32,
}

impl Counter {
    pub fn new(initial: u32) -> Self {
        Counter { value: initial }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn increase(&mut self, n: u32) {
        self.value = self.value.saturating_add(n);
    }

    /// Floors at zero rather than underflowing.
    pub fn decrease(&mut self, n: u32) {
        self.value = self.value.saturating_sub(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_and_decrease() {
        let mut c = Counter::new(7);
        c.decrease(1);
        assert_eq!(c.get(), 6);
        c.increase(5);
        assert_eq!(c.get(), 11);
    }

    #[test]
    fn decrease_floors_at_zero() {
        let mut c = Counter::new(2);
        c.decrease(10);
        assert_eq!(c.get(), 0);
    }
}
