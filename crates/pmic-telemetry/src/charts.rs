use crate::Quantity;

/// A group of quantities drawn together by the consumer.
#[derive(Debug, Clone, Copy)]
pub struct Chart {
    /// `type.id` as announced on the `CHART` line.
    pub id: &'static str,
    pub title: &'static str,
    pub units: &'static str,
    /// Dimension order on both `DIMENSION` and `SET` lines.
    pub quantities: &'static [Quantity],
}

pub const MAX_CHART_DIMENSIONS: usize = 4;

/// Announce and report both walk this table in order.
pub static CHARTS: [Chart; 8] = [
    Chart {
        id: "Chip.temps",
        title: "Temperature",
        units: "Degrees (F)",
        quantities: &[Quantity::InternalTemp],
    },
    Chart {
        id: "Chip.batterylevel",
        title: "Battery Level",
        units: "%",
        quantities: &[Quantity::BatteryLevel],
    },
    Chart {
        id: "Chip.batterycurrent",
        title: "Battery Current",
        units: "mA",
        quantities: &[
            Quantity::ChargeLimit,
            Quantity::ChargeTermination,
            Quantity::BatteryCharge,
            Quantity::BatteryDischarge,
        ],
    },
    Chart {
        id: "Chip.batteryvoltage",
        title: "Battery Voltage",
        units: "mV",
        quantities: &[Quantity::BatteryVoltage],
    },
    Chart {
        id: "Chip.acinvoltage",
        title: "ACIN Voltage",
        units: "mV",
        quantities: &[Quantity::AcinVoltage],
    },
    Chart {
        id: "Chip.acincurrent",
        title: "ACIN Current",
        units: "mA",
        quantities: &[Quantity::AcinCurrent],
    },
    Chart {
        id: "Chip.vbusvoltage",
        title: "VBUS Voltage",
        units: "mV",
        quantities: &[Quantity::VbusVoltage, Quantity::VbusVoltageLimit],
    },
    Chart {
        id: "Chip.vbuscurrent",
        title: "VBUS Current",
        units: "mA",
        quantities: &[Quantity::VbusCurrent, Quantity::VbusCurrentLimit],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_chart_has_one_to_four_dimensions() {
        for chart in &CHARTS {
            assert!(
                (1..=MAX_CHART_DIMENSIONS).contains(&chart.quantities.len()),
                "{}",
                chart.id
            );
        }
    }

    #[test]
    fn every_quantity_is_charted_exactly_once() {
        let charted: Vec<Quantity> = CHARTS
            .iter()
            .flat_map(|c| c.quantities.iter().copied())
            .collect();
        let unique: HashSet<Quantity> = charted.iter().copied().collect();
        assert_eq!(charted.len(), unique.len());
        for q in Quantity::ALL {
            assert!(unique.contains(&q), "{} not charted", q.id());
        }
    }

    #[test]
    fn chart_ids_are_unique_and_typed() {
        let ids: HashSet<_> = CHARTS.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CHARTS.len());
        assert!(CHARTS.iter().all(|c| c.id.starts_with("Chip.")));
    }
}
