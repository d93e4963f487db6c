#![allow(dead_code)]
use embassy_time::Instant;
use power_status::{BatterySense, Pmic, SenseInterrupt, Trigger};

/// PMIC stand-in with settable register state.
#[derive(Debug, Default)]
pub struct FakePmic {
    pub power_good: bool,
    pub charging: bool,
}

impl FakePmic {
    pub fn new(power_good: bool, charging: bool) -> Self {
        Self { power_good, charging }
    }
}

impl Pmic for FakePmic {
    fn is_power_good(&mut self) -> bool {
        self.power_good
    }

    fn is_charging(&mut self) -> bool {
        self.charging
    }
}

/// Records the trigger the sense interrupt was attached with.
#[derive(Debug, Default)]
pub struct FakeInterrupt {
    pub trigger: Option<Trigger>,
}

impl SenseInterrupt for FakeInterrupt {
    fn enable(&mut self, trigger: Trigger) {
        self.trigger = Some(trigger);
    }
}

/// Sense-pin edge: time in ms and the pin level after the edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub at_ms: u64,
    pub pin_high: bool,
}

pub const fn remove(at_ms: u64) -> Edge {
    Edge { at_ms, pin_high: false }
}

pub const fn insert(at_ms: u64) -> Edge {
    Edge { at_ms, pin_high: true }
}

/// Feeds `edges` to the filter as the EXTI vector would.
pub fn replay(sense: &BatterySense, edges: &[Edge]) {
    for edge in edges {
        sense.on_edge(edge.pin_high, Instant::from_millis(edge.at_ms));
    }
}
