use crate::{BusError, PeripheralAddress, Register, RegisterBus, Result};

/// An in-process register file. Reads return whatever was last stored; writes are stored
/// and recorded so tests can inspect them.
pub struct MockBus {
    name: String,
    selected: Option<PeripheralAddress>,
    registers: [u8; 256],
    reads: Vec<Register>,
    writes: Vec<(Register, u8)>,
    failing: Option<Register>,
    refuse_select: bool,
}

impl MockBus {
    /// Preload a register value without recording a write.
    pub fn set(&mut self, reg: Register, value: u8) {
        self.registers[usize::from(reg.0)] = value;
    }

    pub fn get(&self, reg: Register) -> u8 {
        self.registers[usize::from(reg.0)]
    }

    pub fn selected(&self) -> Option<PeripheralAddress> {
        self.selected
    }

    /// Registers read so far, in order.
    pub fn reads(&self) -> &[Register] {
        &self.reads
    }

    /// Register writes issued so far, in order.
    pub fn writes(&self) -> &[(Register, u8)] {
        &self.writes
    }

    /// Make every transfer touching `reg` fail with an I/O error.
    pub fn fail_on(&mut self, reg: Register) {
        self.failing = Some(reg);
    }

    /// Make `select` fail, as if nothing answered at the address.
    pub fn refuse_select(&mut self) {
        self.refuse_select = true;
    }

    fn check(&self, reg: Register) -> Result<()> {
        if self.selected.is_none() {
            return Err(BusError::NotSelected);
        }
        if self.failing == Some(reg) {
            return Err(BusError::Io(format!("{}: injected failure at {reg}", self.name)));
        }
        Ok(())
    }
}

impl RegisterBus for MockBus {
    fn open(name: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            selected: None,
            registers: [0u8; 256],
            reads: Vec::new(),
            writes: Vec::new(),
            failing: None,
            refuse_select: false,
        })
    }

    fn select(&mut self, address: PeripheralAddress) -> Result<()> {
        if self.refuse_select {
            return Err(BusError::Select {
                address,
                reason: "no acknowledge".to_string(),
            });
        }
        self.selected = Some(address);
        Ok(())
    }

    fn read_register(&mut self, reg: Register) -> Result<u8> {
        self.check(reg)?;
        self.reads.push(reg);
        Ok(self.get(reg))
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        self.check(reg)?;
        self.writes.push((reg, value));
        self.set(reg, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_bus() -> anyhow::Result<MockBus> {
        let mut bus = MockBus::open("mock0")?;
        let addr = PeripheralAddress::new(0x34).ok_or_else(|| anyhow::anyhow!("address"))?;
        bus.select(addr)?;
        Ok(bus)
    }

    #[test]
    fn transfers_require_selection() -> anyhow::Result<()> {
        let mut bus = MockBus::open("mock0")?;
        assert!(matches!(
            bus.read_register(Register(0x01)),
            Err(BusError::NotSelected)
        ));
        Ok(())
    }

    #[test]
    fn writes_are_stored_and_recorded() -> anyhow::Result<()> {
        let mut bus = selected_bus()?;
        bus.write_register(Register(0x82), 0xCC)?;
        assert_eq!(bus.read_register(Register(0x82))?, 0xCC);
        assert_eq!(bus.writes(), &[(Register(0x82), 0xCC)]);
        assert_eq!(bus.reads(), &[Register(0x82)]);
        Ok(())
    }

    #[test]
    fn injected_failure_surfaces_as_io_error() -> anyhow::Result<()> {
        let mut bus = selected_bus()?;
        bus.fail_on(Register(0x30));
        assert!(matches!(bus.read_register(Register(0x30)), Err(BusError::Io(_))));
        assert!(bus.read_register(Register(0x31)).is_ok());
        Ok(())
    }

    #[test]
    fn refused_select_reports_address() -> anyhow::Result<()> {
        let mut bus = MockBus::open("mock0")?;
        bus.refuse_select();
        let addr = PeripheralAddress::new(0x34).ok_or_else(|| anyhow::anyhow!("address"))?;
        let err = bus.select(addr).err().ok_or_else(|| anyhow::anyhow!("expected error"))?;
        assert_eq!(err.to_string(), "unable to select peripheral 0x34: no acknowledge");
        Ok(())
    }
}
