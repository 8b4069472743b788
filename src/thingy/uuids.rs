use uuid::Uuid;

// Nordic Thingy:52 GATT layout, base EF68xxxx-9B35-4933-9B10-52FFA9740042
const fn thingy_uuid(short: u16) -> Uuid {
    Uuid::from_u128(0xEF68_0000_9B35_4933_9B10_52FF_A974_0042 | ((short as u128) << 96))
}

// Environment service
pub const TEMPERATURE: Uuid = thingy_uuid(0x0201);
pub const PRESSURE: Uuid = thingy_uuid(0x0202);
pub const HUMIDITY: Uuid = thingy_uuid(0x0203);
pub const GAS: Uuid = thingy_uuid(0x0204);
pub const COLOR: Uuid = thingy_uuid(0x0205);
pub const CONFIGURATION: Uuid = thingy_uuid(0x0206);

// User interface service
pub const LED: Uuid = thingy_uuid(0x0301);
pub const BUTTON: Uuid = thingy_uuid(0x0302);

// Standard battery service, battery level characteristic 0x2A19
pub const BATTERY_LEVEL: Uuid = Uuid::from_u128(0x0000_2A19_0000_1000_8000_0080_5F9B_34FB);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expands_short_ids_into_the_thingy_base() {
        assert_eq!(TEMPERATURE.to_string(), "ef680201-9b35-4933-9b10-52ffa9740042");
        assert_eq!(LED.to_string(), "ef680301-9b35-4933-9b10-52ffa9740042");
        assert_eq!(BATTERY_LEVEL.to_string(), "00002a19-0000-1000-8000-00805f9b34fb");
    }
}
