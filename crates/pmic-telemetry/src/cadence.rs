//! Fixed-period collection loop with latency compensation.

use crate::{sample, ProtocolWriter, Result};
use register_bus::RegisterBus;
use std::convert::Infallible;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Time left in the period after `latency`; zero when the cycle overran.
pub fn compensated_sleep(period: Duration, latency: Duration) -> Duration {
    period.saturating_sub(latency)
}

/// Drives sample -> report -> sleep for the process lifetime.
pub struct Collector<B, W: Write> {
    bus: B,
    writer: ProtocolWriter<W>,
    period: Duration,
    last_end: Option<Instant>,
}

impl<B: RegisterBus, W: Write> Collector<B, W> {
    /// `bus` must already be selected and have its ADC enabled.
    pub fn new(bus: B, out: W, period: Duration) -> Self {
        Self {
            bus,
            writer: ProtocolWriter::new(out),
            period,
            last_end: None,
        }
    }

    pub fn announce(&mut self) -> Result<()> {
        self.writer.announce()?;
        Ok(())
    }

    /// One cycle without the trailing sleep. Returns how long to sleep before the next one.
    pub fn tick(&mut self) -> Result<Duration> {
        let start = Instant::now();
        let since_last = self
            .last_end
            .map(|end| start.saturating_duration_since(end));

        let snapshot = sample(&mut self.bus)?;
        self.writer.report(&snapshot, since_last)?;

        let end = Instant::now();
        self.last_end = Some(end);
        let latency = end.saturating_duration_since(start);
        let sleep = compensated_sleep(self.period, latency);
        if sleep.is_zero() {
            warn!(?latency, period = ?self.period, "collection overran its period");
        } else {
            debug!(?latency, ?sleep, valid = snapshot.valid_count(), "cycle complete");
        }
        Ok(sleep)
    }

    /// Announce, then collect forever. Only returns on a fatal error.
    pub fn run(mut self) -> Result<Infallible> {
        self.announce()?;
        info!(period = ?self.period, "collecting");
        loop {
            let sleep = self.tick()?;
            thread::sleep(sleep);
        }
    }

    pub fn output(&self) -> &W {
        self.writer.get_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{CHARGE_CONTROL, POWER_STATUS};
    use crate::{Error, AXP209_ADDRESS, CHARTS};
    use register_bus::MockBus;

    fn collector(period: Duration) -> anyhow::Result<Collector<MockBus, Vec<u8>>> {
        let mut bus = MockBus::open("mock0")?;
        bus.select(AXP209_ADDRESS)?;
        Ok(Collector::new(bus, Vec::new(), period))
    }

    fn output(c: &Collector<MockBus, Vec<u8>>) -> String {
        String::from_utf8_lossy(c.output()).into_owned()
    }

    #[test]
    fn sleep_subtracts_latency() {
        let period = Duration::from_secs(1);
        let latency = Duration::from_micros(12_345);
        assert_eq!(
            compensated_sleep(period, latency),
            Duration::from_micros(1_000_000 - 12_345)
        );
        assert_eq!(
            compensated_sleep(Duration::from_secs(360), Duration::from_millis(1)),
            Duration::from_micros(360 * 1_000_000 - 1_000)
        );
    }

    #[test]
    fn sleep_clamps_to_zero_on_overrun() {
        let period = Duration::from_secs(1);
        assert_eq!(compensated_sleep(period, period), Duration::ZERO);
        assert_eq!(
            compensated_sleep(period, Duration::from_millis(1500)),
            Duration::ZERO
        );
    }

    #[test]
    fn only_first_report_omits_the_gap() -> anyhow::Result<()> {
        let mut c = collector(Duration::from_secs(1))?;
        c.announce()?;
        c.tick()?;
        c.tick()?;
        c.tick()?;

        let out = output(&c);
        let begins: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("BEGIN Chip.temps"))
            .collect();
        assert_eq!(begins.len(), 3);
        assert_eq!(begins[0], "BEGIN Chip.temps");
        for line in &begins[1..] {
            let gap = line.rsplit(' ').next().unwrap_or_default();
            assert!(gap.parse::<u64>().is_ok(), "{line}");
        }
        Ok(())
    }

    #[test]
    fn announce_precedes_every_block() -> anyhow::Result<()> {
        let mut c = collector(Duration::from_secs(1))?;
        c.announce()?;
        c.tick()?;
        let out = output(&c);
        let first_begin = out.find("BEGIN ").unwrap_or(usize::MAX);
        let last_dimension = out.rfind("DIMENSION ").unwrap_or(0);
        assert!(last_dimension < first_begin);
        assert_eq!(out.matches("END\n").count(), CHARTS.len());
        Ok(())
    }

    #[test]
    fn tick_sleep_never_exceeds_period() -> anyhow::Result<()> {
        let period = Duration::from_secs(2);
        let mut c = collector(period)?;
        let sleep = c.tick()?;
        assert!(sleep <= period);
        Ok(())
    }

    #[test]
    fn zero_period_yields_zero_sleep() -> anyhow::Result<()> {
        let mut c = collector(Duration::ZERO)?;
        assert_eq!(c.tick()?, Duration::ZERO);
        Ok(())
    }

    #[test]
    fn subsystem_appearing_later_becomes_valid() -> anyhow::Result<()> {
        let mut c = collector(Duration::from_secs(1))?;
        c.tick()?;
        assert!(output(&c).contains("SET chargelimit = \n"));

        c.bus.set(CHARGE_CONTROL, 0x80);
        c.bus.set(POWER_STATUS, 0x20);
        c.tick()?;
        assert!(output(&c).contains("SET chargelimit = 300\n"));
        Ok(())
    }

    #[test]
    fn bus_failure_stops_the_cycle_before_reporting() -> anyhow::Result<()> {
        let mut c = collector(Duration::from_secs(1))?;
        c.bus.fail_on(POWER_STATUS);
        assert!(matches!(c.tick(), Err(Error::Read { .. })));
        assert!(c.output().is_empty());
        Ok(())
    }
}
