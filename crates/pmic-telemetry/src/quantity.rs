/// Numeric representation a quantity is stored and rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    F32,
    U8,
    U16,
}

/// How a valid value becomes text on a `SET` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
    /// Fixed-point with the given number of decimals.
    Fixed(usize),
    /// Plain decimal integer.
    Integer,
}

/// Dimension accumulation mode. Every reading here is instantaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Absolute,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Absolute => "absolute",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuantityDef {
    /// Dimension id used on `DIMENSION` and `SET` lines.
    pub id: &'static str,
    /// Display name shown by the consumer.
    pub name: &'static str,
    pub kind: ValueKind,
    pub format: FormatRule,
    pub algorithm: Algorithm,
}

/// Every value decoded from the PMIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    InternalTemp,
    BatteryLevel,
    ChargeLimit,
    ChargeTermination,
    BatteryCharge,
    BatteryDischarge,
    BatteryVoltage,
    AcinVoltage,
    AcinCurrent,
    VbusVoltage,
    VbusVoltageLimit,
    VbusCurrent,
    VbusCurrentLimit,
}

impl Quantity {
    pub const COUNT: usize = 13;

    pub const ALL: [Quantity; Quantity::COUNT] = [
        Quantity::InternalTemp,
        Quantity::BatteryLevel,
        Quantity::ChargeLimit,
        Quantity::ChargeTermination,
        Quantity::BatteryCharge,
        Quantity::BatteryDischarge,
        Quantity::BatteryVoltage,
        Quantity::AcinVoltage,
        Quantity::AcinCurrent,
        Quantity::VbusVoltage,
        Quantity::VbusVoltageLimit,
        Quantity::VbusCurrent,
        Quantity::VbusCurrentLimit,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn def(self) -> &'static QuantityDef {
        &DEFINITIONS[self.index()]
    }

    pub fn id(self) -> &'static str {
        self.def().id
    }
}

const fn float(id: &'static str, name: &'static str, decimals: usize) -> QuantityDef {
    QuantityDef {
        id,
        name,
        kind: ValueKind::F32,
        format: FormatRule::Fixed(decimals),
        algorithm: Algorithm::Absolute,
    }
}

const fn integer(id: &'static str, name: &'static str, kind: ValueKind) -> QuantityDef {
    QuantityDef {
        id,
        name,
        kind,
        format: FormatRule::Integer,
        algorithm: Algorithm::Absolute,
    }
}

// Indexed by `Quantity as usize`; order must match the enum.
static DEFINITIONS: [QuantityDef; Quantity::COUNT] = [
    float("internaltemp", "Internal Temp", 1),
    integer("batlevel", "Charge", ValueKind::U8),
    integer("chargelimit", "Charge Limit", ValueKind::U16),
    integer("chargeterm", "Charge Termination Limit", ValueKind::U16),
    float("batcharge", "Batt Charge", 1),
    integer("batdischarge", "Batt Discharge", ValueKind::U16),
    float("batvoltage", "Voltage", 1),
    float("acinvoltage", "Voltage", 1),
    float("acincurrent", "Current", 3),
    float("vbusvoltage", "Voltage", 1),
    integer("vbusvoltagelimit", "Limit", ValueKind::U16),
    float("vbuscurrent", "Current", 3),
    integer("vbuscurrentlimit", "Limit", ValueKind::U16),
];
