//! Tokenizes and parses one command line into a [`Command`].
//!
//! Grounded on `original_source/io.c`'s `application_function_io_mode`/
//! `io_read`/`io_write`/`io_clear_set_flag`: progressive disclosure (a
//! provider/pin pair is always required; mode-specific parameters follow
//! the mode keyword) and the exact mode/flag name vocabulary
//! (`io_mode_traits`, `pin_flag_from_string`).

use kernel::hil::pin::ModeKind;

use crate::io_core::{Direction, Flag, I2cRole, ModeArgs, ProviderId};

#[derive(Debug)]
pub enum Command {
    IoMode { provider: ProviderId, pin: usize, kind: ModeKind, args: ModeArgs },
    IoFlag { provider: ProviderId, pin: usize, flag: Flag, enabled: bool },
    IoRead { provider: ProviderId, pin: usize },
    IoWrite { provider: ProviderId, pin: usize, value: i32 },
    StatusTrigger { provider: ProviderId, pin: usize },
    Ntp { server: String, timezone: String },
    Dump { provider: Option<ProviderId>, pin: Option<usize> },
    DumpHtml { provider: Option<ProviderId>, pin: Option<usize> },
}

pub fn parse(line: &str) -> Result<Command, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, rest)) = tokens.split_first() else {
        return Err("empty command".into());
    };

    match *verb {
        "io-mode" => parse_io_mode(rest),
        "io-flag" => parse_io_flag(rest),
        "io-read" => parse_io_read(rest),
        "io-write" => parse_io_write(rest),
        "status-trigger" => parse_status_trigger(rest),
        "ntp" => parse_ntp(rest),
        "dump" => parse_dump(rest, false),
        "dump-html" => parse_dump(rest, true),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn provider_pin<'a>(rest: &'a [&'a str]) -> Result<(ProviderId, usize, &'a [&'a str]), String> {
    let (&provider_tok, rest) = rest.split_first().ok_or("missing provider")?;
    let (&pin_tok, rest) = rest.split_first().ok_or("missing pin")?;
    let provider = ProviderId::from_str(provider_tok).ok_or("unknown provider")?;
    let pin: usize = pin_tok.parse().map_err(|_| "invalid pin number")?;
    Ok((provider, pin, rest))
}

fn parse_io_mode(rest: &[&str]) -> Result<Command, String> {
    let (provider, pin, rest) = provider_pin(rest)?;
    let (&mode_tok, rest) = rest.split_first().ok_or("missing mode")?;
    let kind = ModeKind::from_str(mode_tok).ok_or("unknown mode")?;

    let args = match kind {
        ModeKind::Timer => {
            let (&dir_tok, rest) = rest.split_first().ok_or("timer requires up|down")?;
            let direction = match dir_tok {
                "up" => Direction::Up,
                "down" => Direction::Down,
                _ => return Err("timer direction must be up or down".into()),
            };
            let delay_ms: u32 = rest
                .first()
                .ok_or("timer requires <delay-ms>")?
                .parse()
                .map_err(|_| "invalid delay-ms")?;
            if delay_ms < 10 || delay_ms % 10 != 0 {
                return Err("timer delay-ms must be >= 10 and a multiple of 10".into());
            }
            ModeArgs::Timer { direction, delay_ms }
        }
        ModeKind::OutputAnalog => {
            let lower_bound = rest.first().ok_or("outputa requires <lower_bound>")?
                .parse().map_err(|_| "invalid lower_bound")?;
            let upper_bound = rest.get(1).ok_or("outputa requires <upper_bound>")?
                .parse().map_err(|_| "invalid upper_bound")?;
            let speed_ms = rest.get(2).ok_or("outputa requires <speed_ms>")?
                .parse().map_err(|_| "invalid speed_ms")?;
            ModeArgs::OutputAnalog { lower_bound, upper_bound, speed_ms }
        }
        ModeKind::I2c => {
            let (&role_tok, rest) = rest.split_first().ok_or("i2c requires sda|scl")?;
            match role_tok {
                "sda" => ModeArgs::I2c { role: I2cRole::Sda, delay_ms: 0 },
                "scl" => {
                    let delay_ms = rest
                        .first()
                        .ok_or("i2c scl requires <delay>")?
                        .parse()
                        .map_err(|_| "invalid delay")?;
                    ModeArgs::I2c { role: I2cRole::Scl, delay_ms }
                }
                _ => return Err("i2c role must be sda or scl".into()),
            }
        }
        _ => ModeArgs::Plain,
    };

    Ok(Command::IoMode { provider, pin, kind, args })
}

fn parse_io_flag(rest: &[&str]) -> Result<Command, String> {
    let (&action_tok, rest) = rest.split_first().ok_or("missing set/clear")?;
    let enabled = match action_tok {
        "set" => true,
        "clear" => false,
        _ => return Err("io-flag requires 'set' or 'clear'".into()),
    };
    let (provider, pin, rest) = provider_pin(rest)?;
    let (&flag_tok, _) = rest.split_first().ok_or("missing flag name")?;
    let flag = Flag::from_str(flag_tok).ok_or("unknown flag")?;
    Ok(Command::IoFlag { provider, pin, flag, enabled })
}

fn parse_io_read(rest: &[&str]) -> Result<Command, String> {
    let (provider, pin, _) = provider_pin(rest)?;
    Ok(Command::IoRead { provider, pin })
}

fn parse_io_write(rest: &[&str]) -> Result<Command, String> {
    let (provider, pin, rest) = provider_pin(rest)?;
    let value: i32 = rest.first().ok_or("missing value")?
        .parse().map_err(|_| "invalid value")?;
    Ok(Command::IoWrite { provider, pin, value })
}

fn parse_status_trigger(rest: &[&str]) -> Result<Command, String> {
    let (provider, pin, _) = provider_pin(rest)?;
    Ok(Command::StatusTrigger { provider, pin })
}

fn parse_ntp(rest: &[&str]) -> Result<Command, String> {
    let (&server, rest) = rest.split_first().ok_or("missing ntp server")?;
    let (&timezone, _) = rest.split_first().ok_or("missing ntp timezone")?;
    Ok(Command::Ntp { server: server.to_string(), timezone: timezone.to_string() })
}

fn parse_dump(rest: &[&str], html: bool) -> Result<Command, String> {
    let provider = rest.first().and_then(|s| ProviderId::from_str(s));
    let pin = if provider.is_some() {
        rest.get(1).and_then(|s| s.parse().ok())
    } else {
        None
    };
    if html {
        Ok(Command::DumpHtml { provider, pin })
    } else {
        Ok(Command::Dump { provider, pin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timer_mode_with_direction_and_delay() {
        let cmd = parse("io-mode gpio 3 timer up 500").unwrap();
        match cmd {
            Command::IoMode {
                kind: ModeKind::Timer,
                args: ModeArgs::Timer { direction, delay_ms },
                ..
            } => {
                assert_eq!(direction, Direction::Up);
                assert_eq!(delay_ms, 500);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn timer_delay_must_be_a_multiple_of_ten() {
        assert!(parse("io-mode gpio 3 timer up 15").is_err());
        assert!(parse("io-mode gpio 3 timer up 5").is_err());
    }

    #[test]
    fn parses_i2c_scl_with_delay() {
        let cmd = parse("io-mode gpio 1 i2c scl 5").unwrap();
        match cmd {
            Command::IoMode {
                kind: ModeKind::I2c,
                args: ModeArgs::I2c { role: I2cRole::Scl, delay_ms },
                ..
            } => assert_eq!(delay_ms, 5),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(parse("io-read nope 0").is_err());
    }

    #[test]
    fn io_flag_uses_set_clear_grammar() {
        let cmd = parse("io-flag set gpio 0 reset-on-read").unwrap();
        assert!(matches!(cmd, Command::IoFlag { flag: Flag::ResetOnRead, enabled: true, .. }));

        let cmd = parse("io-flag clear gpio 0 autostart").unwrap();
        assert!(matches!(cmd, Command::IoFlag { flag: Flag::Autostart, enabled: false, .. }));

        assert!(parse("io-flag gpio 0 autostart on").is_err());
    }

    #[test]
    fn parses_ntp_server_and_timezone() {
        let cmd = parse("ntp pool.ntp.org UTC").unwrap();
        match cmd {
            Command::Ntp { server, timezone } => {
                assert_eq!(server, "pool.ntp.org");
                assert_eq!(timezone, "UTC");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn progressive_dump_disclosure() {
        assert!(matches!(parse("dump").unwrap(), Command::Dump { provider: None, pin: None }));
        assert!(matches!(
            parse("dump gpio").unwrap(),
            Command::Dump { provider: Some(ProviderId::Gpio), pin: None }
        ));
        assert!(matches!(
            parse("dump gpio 3").unwrap(),
            Command::Dump { provider: Some(ProviderId::Gpio), pin: Some(3) }
        ));
    }
}
