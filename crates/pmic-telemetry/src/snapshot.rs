use crate::{FormatRule, Quantity, ValueKind};

/// One decoded reading, tagged with its storage width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    F32(f32),
    U8(u8),
    U16(u16),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::F32(_) => ValueKind::F32,
            Value::U8(_) => ValueKind::U8,
            Value::U16(_) => ValueKind::U16,
        }
    }

    pub fn format(&self, rule: FormatRule) -> String {
        match (*self, rule) {
            (Value::F32(v), FormatRule::Fixed(decimals)) => format!("{v:.decimals$}"),
            (Value::F32(v), FormatRule::Integer) => format!("{v:.0}"),
            (Value::U8(v), _) => v.to_string(),
            (Value::U16(v), _) => v.to_string(),
        }
    }
}

/// One cycle of readings. Quantities whose subsystem was absent stay invalid (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    values: [Option<Value>; Quantity::COUNT],
}

impl Snapshot {
    /// All quantities invalid.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, quantity: Quantity, value: Value) {
        debug_assert_eq!(value.kind(), quantity.def().kind, "{}", quantity.id());
        self.values[quantity.index()] = Some(value);
    }

    pub fn get(&self, quantity: Quantity) -> Option<Value> {
        self.values[quantity.index()]
    }

    pub fn is_valid(&self, quantity: Quantity) -> bool {
        self.get(quantity).is_some()
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Text for the `SET` line; empty when the quantity is invalid this cycle.
    pub fn render(&self, quantity: Quantity) -> String {
        self.get(quantity)
            .map(|v| v.format(quantity.def().format))
            .unwrap_or_default()
    }
}
