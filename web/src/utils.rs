use mineboard_core::{NamePrompt, Seconds};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Three-digit counter display, clamped to what fits.
pub(crate) fn format_for_counter(value: i32) -> String {
    let value = value.clamp(-99, 999);
    if value < 0 {
        format!("-{:02}", -value)
    } else {
        format!("{:03}", value)
    }
}

pub(crate) fn format_time(time: Seconds) -> String {
    format!("{}:{:02}", time / 60, time % 60)
}

/// Asks for the winner's name with the browser's blocking `prompt()` dialog.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BrowserPrompt;

impl NamePrompt for BrowserPrompt {
    fn request_name(&mut self, time: Seconds) -> Option<String> {
        log::debug!("asking name for {}s", time);
        gloo::dialogs::prompt("You win! Name:", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_pads_and_clamps() {
        assert_eq!(format_for_counter(7), "007");
        assert_eq!(format_for_counter(1234), "999");
        assert_eq!(format_for_counter(-3), "-03");
        assert_eq!(format_for_counter(-500), "-99");
    }

    #[test]
    fn time_is_minutes_and_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(125), "2:05");
    }
}
