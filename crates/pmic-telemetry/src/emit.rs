//! Writer for the external plugin text protocol.

use crate::{Snapshot, CHARTS};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

/// Buffers one full announce or report and hands it to the sink in a single flush.
pub struct ProtocolWriter<W: Write> {
    out: W,
    buffer: String,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::with_capacity(2048),
        }
    }

    /// Chart and dimension definitions. Sent once before the first report.
    pub fn announce(&mut self) -> io::Result<()> {
        for chart in &CHARTS {
            let _ = writeln!(
                self.buffer,
                "CHART {} \"\" \"{}\" \"{}\"",
                chart.id, chart.title, chart.units
            );
            for q in chart.quantities {
                let def = q.def();
                let _ = writeln!(
                    self.buffer,
                    "DIMENSION {} \"{}\" {}",
                    def.id,
                    def.name,
                    def.algorithm.as_str()
                );
            }
        }
        self.flush()
    }

    /// One `BEGIN`/`SET`/`END` block per chart.
    ///
    /// `since_last` is the gap since the previous report and is omitted from `BEGIN` when
    /// `None` (first report).
    pub fn report(&mut self, snapshot: &Snapshot, since_last: Option<Duration>) -> io::Result<()> {
        for chart in &CHARTS {
            match since_last {
                Some(gap) => {
                    let _ = writeln!(self.buffer, "BEGIN {} {}", chart.id, gap.as_micros());
                }
                None => {
                    let _ = writeln!(self.buffer, "BEGIN {}", chart.id);
                }
            }
            for &q in chart.quantities {
                let _ = writeln!(self.buffer, "SET {} = {}", q.id(), snapshot.render(q));
            }
            self.buffer.push_str("END\n");
        }
        self.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self
            .out
            .write_all(self.buffer.as_bytes())
            .and_then(|()| self.out.flush());
        self.buffer.clear();
        result
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Quantity, Value};

    fn text(writer: ProtocolWriter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&writer.into_inner()).into_owned()
    }

    #[test]
    fn announce_declares_each_chart_then_its_dimensions() -> anyhow::Result<()> {
        let mut w = ProtocolWriter::new(Vec::new());
        w.announce()?;
        let out = text(w);
        let lines: Vec<&str> = out.lines().collect();

        let charts = lines.iter().filter(|l| l.starts_with("CHART ")).count();
        let dims = lines.iter().filter(|l| l.starts_with("DIMENSION ")).count();
        assert_eq!(charts, CHARTS.len());
        assert_eq!(dims, Quantity::COUNT);

        assert_eq!(lines[0], r#"CHART Chip.temps "" "Temperature" "Degrees (F)""#);
        assert_eq!(lines[1], r#"DIMENSION internaltemp "Internal Temp" absolute"#);
        assert_eq!(lines[4], r#"CHART Chip.batterycurrent "" "Battery Current" "mA""#);
        assert_eq!(
            &lines[5..9],
            &[
                r#"DIMENSION chargelimit "Charge Limit" absolute"#,
                r#"DIMENSION chargeterm "Charge Termination Limit" absolute"#,
                r#"DIMENSION batcharge "Batt Charge" absolute"#,
                r#"DIMENSION batdischarge "Batt Discharge" absolute"#,
            ]
        );
        Ok(())
    }

    #[test]
    fn first_report_has_no_gap_field() -> anyhow::Result<()> {
        let mut w = ProtocolWriter::new(Vec::new());
        w.report(&Snapshot::new(), None)?;
        let out = text(w);
        let begins: Vec<&str> = out.lines().filter(|l| l.starts_with("BEGIN ")).collect();
        assert_eq!(begins.len(), CHARTS.len());
        assert!(begins.iter().all(|l| l.split(' ').count() == 2));
        assert_eq!(begins[0], "BEGIN Chip.temps");
        Ok(())
    }

    #[test]
    fn later_reports_carry_microseconds() -> anyhow::Result<()> {
        let mut w = ProtocolWriter::new(Vec::new());
        w.report(&Snapshot::new(), Some(Duration::from_millis(998)))?;
        let out = text(w);
        assert!(out
            .lines()
            .filter(|l| l.starts_with("BEGIN "))
            .all(|l| l.ends_with(" 998000")));
        Ok(())
    }

    #[test]
    fn report_blocks_follow_chart_order() -> anyhow::Result<()> {
        let mut snap = Snapshot::new();
        snap.record(Quantity::InternalTemp, Value::F32(98.6));
        snap.record(Quantity::VbusCurrentLimit, Value::U16(500));

        let mut w = ProtocolWriter::new(Vec::new());
        w.report(&snap, None)?;
        let out = text(w);

        let expected = "\
BEGIN Chip.temps
SET internaltemp = 98.6
END
BEGIN Chip.batterylevel
SET batlevel = 
END
BEGIN Chip.batterycurrent
SET chargelimit = 
SET chargeterm = 
SET batcharge = 
SET batdischarge = 
END
BEGIN Chip.batteryvoltage
SET batvoltage = 
END
BEGIN Chip.acinvoltage
SET acinvoltage = 
END
BEGIN Chip.acincurrent
SET acincurrent = 
END
BEGIN Chip.vbusvoltage
SET vbusvoltage = 
SET vbusvoltagelimit = 
END
BEGIN Chip.vbuscurrent
SET vbuscurrent = 
SET vbuscurrentlimit = 500
END
";
        assert_eq!(out, expected);
        Ok(())
    }

    #[test]
    fn each_call_flushes_and_resets_the_buffer() -> anyhow::Result<()> {
        let mut w = ProtocolWriter::new(Vec::new());
        w.announce()?;
        let after_announce = w.get_ref().len();
        w.report(&Snapshot::new(), None)?;
        assert!(w.get_ref().len() > after_announce);
        assert!(w.buffer.is_empty());
        Ok(())
    }
}
