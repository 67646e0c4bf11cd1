/// Network names advertised by the beacon engine, in transmit order.
///
/// Entries differ only by leading/trailing spaces so passive scanners list
/// each one as a separate network.
pub const BEACON_IDENTITIES: [&str; 10] = [
    "BADGE BEACON",
    "BADGE BEACON ",
    " BADGE BEACON",
    "BADGE BEACON  ",
    "  BADGE BEACON",
    "BADGE BEACON   ",
    "   BADGE BEACON",
    "BADGE BEACON    ",
    "    BADGE BEACON",
    "BADGE BEACON     ",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SSID_MAX_LEN;

    #[test]
    fn identities_are_distinct_and_fit_ssid_element() {
        for (idx, name) in BEACON_IDENTITIES.iter().enumerate() {
            assert!(name.len() <= SSID_MAX_LEN);
            assert_eq!(name.trim(), "BADGE BEACON");
            for other in &BEACON_IDENTITIES[idx + 1..] {
                assert_ne!(name, other);
            }
        }
    }
}
