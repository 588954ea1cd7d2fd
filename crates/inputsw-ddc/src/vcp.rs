//! VCP code constants (MCCS standard) used by the input switcher.

/// VCP code for Input Source Select.
pub const VCP_INPUT_SOURCE: u8 = 0x60;

/// Input values commonly reported for VCP 0x60.
///
/// Manufacturers are free to pick their own values, so this is advisory:
/// 4 means HDMI-1 on some monitors and something else entirely on others.
pub const COMMON_INPUT_SOURCES: &[(u32, &str)] = &[
    (1, "VGA"),
    (3, "DVI"),
    (4, "HDMI-1 (some monitors)"),
    (15, "DisplayPort"),
    (17, "HDMI-1"),
    (18, "HDMI-2"),
];

/// Label from [`COMMON_INPUT_SOURCES`] for `value`, if any.
pub fn input_source_label(value: u32) -> Option<&'static str> {
    COMMON_INPUT_SOURCES
        .iter()
        .find(|(code, _)| *code == value)
        .map(|(_, label)| *label)
}
