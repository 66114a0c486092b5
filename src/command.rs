// Chat command parsing

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one workload, or the suite for `all`.
    Benchmark { keyword: String },

    /// Round-trip latency probe.
    Ping,
}

/// Parse one inbound chat line against the configured command prefix.
///
/// The trigger must be the first whitespace-delimited token. `benchmark`
/// (alias `bench`) takes an optional second token naming the workload,
/// defaulting to `all`; extra tokens are ignored. `ping` takes nothing.
/// Any other line is not a command.
pub fn parse(line: &str, prefix: &str) -> Option<Command> {
    let mut tokens = line.split_whitespace();
    let trigger = tokens.next()?;
    let name = trigger.strip_prefix(prefix)?;

    match name {
        "benchmark" | "bench" => {
            let keyword = tokens.next().unwrap_or("all").to_string();
            Some(Command::Benchmark { keyword })
        }
        "ping" => Some(Command::Ping),
        _ => None,
    }
}
