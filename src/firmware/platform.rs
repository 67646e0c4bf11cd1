use badge_wireless::Clock;
use embassy_time::Instant;
use esp_hal::rng::Rng;
use rand_core::{impls, RngCore};

#[derive(Clone, Copy, Default)]
pub(crate) struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Hardware RNG behind the `rand_core` interface. Only random while the
/// radio is powered, which holds for every sender address we draw.
pub(crate) struct HardwareRng(Rng);

impl HardwareRng {
    pub(crate) fn new() -> Self {
        Self(Rng::new())
    }
}

impl RngCore for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        self.0.random()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
