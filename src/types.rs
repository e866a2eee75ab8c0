pub type Raw = u16;
pub type Millivolts = u32;
pub type Volts = f32;
pub type Percent = f32;

pub fn from_millivolts_to_volts(millivolts: Millivolts) -> Volts {
    millivolts as Volts / 1000.0
}
