//! Help text layout

const SCREEN_WIDTH: usize = 79;
const OPT_INDENT: usize = 2;
const MSG_INDENT: usize = 7;

/// Heading for a group of options
pub fn help_message_group(message: &str) -> String {
    format!("{}\n\n", message)
}

/// One option and its wrapped description
pub fn help_message_opt(option: &str, message: &str) -> String {
    format!(
        "{}{}\n{}{}\n\n",
        " ".repeat(OPT_INDENT),
        option,
        " ".repeat(MSG_INDENT),
        format_paragraph(message, SCREEN_WIDTH - MSG_INDENT, MSG_INDENT)
    )
}

/// Greedy word wrap
///
/// Lines break at the last space that fits in `width`. Lines produced by
/// wrapping are indented by `indent` spaces; lines that follow a newline
/// already present in `text` are not. A word longer than the line is kept
/// whole.
pub fn format_paragraph(text: &str, width: usize, indent: usize) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    let mut indented = 0;

    while pos < bytes.len() {
        let line_end = find_from(bytes, pos, |b| b == b'\n').unwrap_or(bytes.len());
        let remaining = width.saturating_sub(indented);

        if line_end - pos <= remaining {
            // Rest of the hard line fits, newline included.
            let end = (line_end + 1).min(bytes.len());
            out.push_str(&text[pos..end]);
            pos = line_end + 1;
            indented = 0;
            continue;
        }

        let limit = (pos + remaining).min(bytes.len() - 1);
        let split = match rfind_between(bytes, pos, limit, |b| b == b' ' || b == b'\n') {
            Some(split) => split,
            None => match find_from(bytes, pos, |b| b == b' ' || b == b'\n') {
                Some(split) => split,
                None => {
                    out.push_str(&text[pos..]);
                    break;
                }
            },
        };

        out.push_str(&text[pos..split]);
        out.push('\n');
        if bytes[split] == b'\n' {
            indented = 0;
        } else if indent > 0 {
            out.push_str(&" ".repeat(indent));
            indented = indent;
        }
        pos = split + 1;
    }

    out
}

fn find_from(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> Option<usize> {
    bytes[start..].iter().position(|&b| pred(b)).map(|i| start + i)
}

fn rfind_between(bytes: &[u8], start: usize, end: usize, pred: impl Fn(u8) -> bool) -> Option<usize> {
    bytes[start..=end].iter().rposition(|&b| pred(b)).map(|i| start + i)
}

/// Full usage text for the `nodecfg` binary
pub fn usage() -> String {
    let mut text = format!(
        "{} v{}\n\nUsage:\n  {} [options]\n\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_NAME")
    );

    text.push_str(&help_message_group("Options:"));
    text.push_str(&help_message_opt("-?, -help", "Print this help message and exit"));
    text.push_str(&help_message_opt("-version", "Print version and exit"));
    text.push_str(&help_message_opt(
        "-conf=<file>",
        "Specify configuration file. Relative paths are resolved against the data directory (default: nodecfg.conf)",
    ));
    text.push_str(&help_message_opt("-datadir=<dir>", "Specify data directory"));
    text.push_str(&help_message_opt(
        "-exportdir=<dir>",
        "Specify directory to be used when exporting data",
    ));
    text.push_str(&help_message_opt(
        "-printsettings",
        "Print the resolved settings, one key=value per line, and exit",
    ));

    text.push_str(&help_message_group("Debugging/Testing options:"));
    text.push_str(&help_message_opt(
        "-debug=<category>",
        "Output debugging information (default: 0). If <category> is not supplied or if <category> = 1, output all debugging information. Can be given more than once",
    ));
    text.push_str(&help_message_opt(
        "-debuglogfile",
        "Write log output to debug.log and aux.log in the data directory (default: 1)",
    ));
    text.push_str(&help_message_opt(
        "-printtoconsole",
        "Send trace/debug info to console instead of debug.log file",
    ));
    text.push_str(&help_message_opt(
        "-logtimestamps",
        "Prepend debug output with timestamp (default: 1)",
    ));
    text.push_str(&help_message_opt(
        "-logtimemicros",
        "Add microsecond precision to debug timestamps (default: 0)",
    ));
    text.push_str(&help_message_opt(
        "-shrinkdebugfile",
        "Shrink debug.log file on client startup (default: 1 when no -debug)",
    ));

    text
}
