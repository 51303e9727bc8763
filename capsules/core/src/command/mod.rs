//! Command-line parser and dispatcher for the `io-*` command verbs and
//! the configuration dump, the external interface described by this
//! core's design notes §6.

pub mod dump;
pub mod parser;

use kernel::errorcode::CoreError;

use crate::io_core::IoCore;
use parser::Command;

/// Parses and executes one command line, returning the response text
/// (without a trailing line terminator — the bridge channel owns framing).
pub fn dispatch_line(line: &str, io: &mut IoCore) -> String {
    match parser::parse(line) {
        Ok(cmd) => dispatch(cmd, io),
        Err(msg) => format!("ERROR: {msg}"),
    }
}

/// Formats a failed operation's `ErrorCode`, contextualized with `what`,
/// through [`CoreError`] — the replacement for the original's
/// `string_t *errormsg` out parameter threaded through command dispatch.
fn err_response(what: &str, err: CoreError) -> String {
    format!("ERROR {}: {}", what, err)
}

fn dispatch(cmd: Command, io: &mut IoCore) -> String {
    match cmd {
        Command::IoMode { provider, pin, kind, args } => match io.set_mode(provider, pin, kind, args) {
            Ok(()) => format!("OK {} {} mode {}", provider.as_str(), pin, kind.as_str()),
            Err(e) => err_response(
                &format!("{} {} mode", provider.as_str(), pin),
                CoreError::from(e),
            ),
        },
        Command::IoFlag { provider, pin, flag, enabled } => {
            match io.set_flag(provider, pin, flag, enabled) {
                Ok(()) => format!(
                    "OK {} {} flag {} {}",
                    provider.as_str(),
                    pin,
                    flag.as_str(),
                    enabled
                ),
                Err(e) => err_response(
                    &format!("{} {} flag {}", provider.as_str(), pin, flag.as_str()),
                    CoreError::from(e),
                ),
            }
        }
        Command::IoRead { provider, pin } => match io.read_pin(provider, pin) {
            Ok(value) => format!("{} {} = {}", provider.as_str(), pin, value),
            Err(e) => err_response(&format!("{} {} read", provider.as_str(), pin), CoreError::from(e)),
        },
        Command::IoWrite { provider, pin, value } => match io.write_pin(provider, pin, value) {
            Ok(()) => format!("OK {} {} write {}", provider.as_str(), pin, value),
            Err(e) => err_response(&format!("{} {} write", provider.as_str(), pin), CoreError::from(e)),
        },
        Command::StatusTrigger { provider, pin } => match io.set_status_trigger(provider, pin) {
            Ok(()) => format!("OK status-trigger {} {}", provider.as_str(), pin),
            Err(e) => err_response("status-trigger", CoreError::from(e)),
        },
        Command::Ntp { server, timezone } => {
            io.set_ntp(server.clone(), timezone.clone());
            format!("OK ntp {} {}", server, timezone)
        }
        Command::Dump { provider, pin } => dump::render(io, provider, pin, dump::Format::Plain),
        Command::DumpHtml { provider, pin } => dump::render(io, provider, pin, dump::Format::Html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_includes_context_and_code() {
        let mut io = IoCore::new();
        let response = dispatch_line("io-read gpio 0", &mut io);
        assert!(response.starts_with("ERROR gpio 0 read:"));
    }

    #[test]
    fn ntp_verb_updates_core_state() {
        let mut io = IoCore::new();
        let response = dispatch_line("ntp pool.ntp.org UTC", &mut io);
        assert_eq!(response, "OK ntp pool.ntp.org UTC");
        assert_eq!(io.ntp().unwrap().server, "pool.ntp.org");
    }
}
