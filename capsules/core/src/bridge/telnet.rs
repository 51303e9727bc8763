//! Telnet IAC stripping, shared by both TCP bridge channels.
//!
//! Grounded on `original_source/user_main.c`'s 3-state `telnet_strip_state_t`
//! (`ts_raw`/`ts_dodont`/`ts_data`). The state machine is local to a single
//! call: the original resets it to `ts_raw` at the top of every receive
//! callback, so an IAC sequence split across two TCP segments is not
//! reassembled. That is preserved here rather than "fixed" — a known
//! limitation of the original this core stays faithful to.

enum State {
    Raw,
    Dodont,
    Data,
}

/// Strips telnet IAC (`0xff`) sequences from `data`, optionally keeping
/// only printable ASCII (`' '..='~'`), and stops once `max_len` output
/// bytes have been produced.
pub fn strip(data: &[u8], strip_enabled: bool, filter_printable: bool, max_len: usize) -> Vec<u8> {
    let mut state = State::Raw;
    let mut out = Vec::with_capacity(data.len().min(max_len));

    for &byte in data {
        if out.len() >= max_len {
            break;
        }
        match state {
            State::Raw => {
                if strip_enabled && byte == 0xff {
                    state = State::Dodont;
                } else if !filter_printable || (byte >= b' ' && byte <= b'~') {
                    out.push(byte);
                }
            }
            State::Dodont => state = State::Data,
            State::Data => state = State::Raw,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_iac_dodont_pair() {
        let input = [b'a', 0xff, 0xfd, 0x01, b'b'];
        assert_eq!(strip(&input, true, false, 64), vec![b'a', b'b']);
    }

    #[test]
    fn filters_non_printable_on_command_channel() {
        let input = [b'h', b'i', 0x07, b'\n'];
        assert_eq!(strip(&input, true, true, 64), vec![b'h', b'i']);
    }

    #[test]
    fn respects_max_len() {
        let input = [b'a', b'b', b'c', b'd'];
        assert_eq!(strip(&input, true, false, 2), vec![b'a', b'b']);
    }

    #[test]
    fn split_iac_sequence_is_not_reassembled_across_calls() {
        let first = strip(&[0xff], true, false, 64);
        let second = strip(&[0xfd, 0x01, b'x'], true, false, 64);
        assert!(first.is_empty());
        // because state resets, 0xfd/0x01 are treated as ordinary bytes
        // on the second call rather than as the tail of the first IAC.
        assert_eq!(second, vec![0xfd, 0x01, b'x']);
    }
}
