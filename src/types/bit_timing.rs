/// Network bit timing from the `BS_` section.
///
/// An empty `BS_:` line (the common case in modern exports) produces the
/// all-zero record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitTiming {
    pub(crate) baudrate: u64,
    pub(crate) btr1: u64,
    pub(crate) btr2: u64,
}

impl BitTiming {
    pub fn baudrate(&self) -> u64 {
        self.baudrate
    }

    pub fn btr1(&self) -> u64 {
        self.btr1
    }

    pub fn btr2(&self) -> u64 {
        self.btr2
    }
}
