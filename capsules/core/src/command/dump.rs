//! Configuration dump rendering, in the parallel plain/HTML formats named
//! by this core's external interface design notes. Grounded on the shape
//! of `original_source/io.c`'s `dump_strings` table: one row per pin,
//! carrying mode, flags, mode-specific parameters, current value, and a
//! provider-specific description; an undetected provider renders a single
//! "not found" line instead of one row per pin.

use crate::io_core::{IoCore, PinDump, PinFlags, ProviderId};

#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Format {
    Plain,
    Html,
}

enum Section {
    NotFound(ProviderId),
    Provider(ProviderId, Vec<(usize, Option<PinDump>)>),
}

pub fn render(io: &mut IoCore, provider: Option<ProviderId>, pin: Option<usize>, fmt: Format) -> String {
    let providers: Vec<ProviderId> = match provider {
        Some(p) => vec![p],
        None => vec![ProviderId::Gpio, ProviderId::Aux],
    };

    let mut sections = Vec::new();
    for id in providers {
        if !io.is_detected(id) {
            sections.push(Section::NotFound(id));
            continue;
        }
        let pins: Vec<usize> = match pin {
            Some(p) => vec![p],
            None => (0..io.pin_count(id)).collect(),
        };
        let rows = pins.into_iter().map(|p| (p, io.describe_pin(id, p))).collect();
        sections.push(Section::Provider(id, rows));
    }

    match fmt {
        Format::Plain => render_plain(&sections),
        Format::Html => render_html(&sections),
    }
}

fn format_flags(flags: &PinFlags) -> String {
    let mut parts = Vec::new();
    if flags.autostart {
        parts.push("autostart");
    }
    if flags.repeat {
        parts.push("repeat");
    }
    if flags.pullup {
        parts.push("pullup");
    }
    if flags.reset_on_read {
        parts.push("reset-on-read");
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(",")
    }
}

fn render_plain(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        match section {
            Section::NotFound(id) => out.push_str(&format!("{}: not found\n", id.as_str())),
            Section::Provider(id, rows) => {
                for (pin, dump) in rows {
                    match dump {
                        Some(d) => out.push_str(&format!(
                            "{} {} mode={} flags={} {} value={} info={}\n",
                            id.as_str(),
                            pin,
                            d.mode.as_str(),
                            format_flags(&d.flags),
                            d.params,
                            d.value.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
                            d.provider_info,
                        )),
                        None => out.push_str(&format!("{} {}: not found\n", id.as_str(), pin)),
                    }
                }
            }
        }
    }
    out.trim_end().to_string()
}

fn render_html(sections: &[Section]) -> String {
    let mut out = String::from("<table>\n");
    for section in sections {
        match section {
            Section::NotFound(id) => out.push_str(&format!(
                "<tr><td colspan=\"7\">{}: not found</td></tr>\n",
                id.as_str()
            )),
            Section::Provider(id, rows) => {
                for (pin, dump) in rows {
                    match dump {
                        Some(d) => out.push_str(&format!(
                            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                            id.as_str(),
                            pin,
                            d.mode.as_str(),
                            format_flags(&d.flags),
                            d.params,
                            d.value.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
                            d.provider_info,
                        )),
                        None => out.push_str(&format!(
                            "<tr><td colspan=\"7\">{} {}: not found</td></tr>\n",
                            id.as_str(),
                            pin
                        )),
                    }
                }
            }
        }
    }
    out.push_str("</table>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::hil::pin::ModeKind;

    #[test]
    fn dumps_all_pins_when_unscoped() {
        let mut io = IoCore::new();
        io.init();
        io.set_mode(ProviderId::Gpio, 0, ModeKind::OutputDigital, crate::io_core::ModeArgs::Plain).unwrap();
        let text = render(&mut io, None, None, Format::Plain);
        assert!(text.contains("gpio 0 mode=outputd"));
        assert!(text.contains("value=0"));
        assert!(text.contains("aux 0 mode=disabled"));
    }

    #[test]
    fn undetected_provider_renders_not_found() {
        let mut io = IoCore::new();
        let text = render(&mut io, Some(ProviderId::Gpio), None, Format::Plain);
        assert_eq!(text, "gpio: not found");
    }

    #[test]
    fn html_format_wraps_rows_in_table() {
        let mut io = IoCore::new();
        io.init();
        let text = render(&mut io, Some(ProviderId::Gpio), Some(0), Format::Html);
        assert!(text.starts_with("<table>"));
        assert!(text.ends_with("</table>"));
    }
}
